use std::env;

use chrono::Duration;
use fwl_common::{helpers::parse_boolean_flag, Secret};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use razorpay_tools::RazorpayConfig;

const DEFAULT_FWL_HOST: &str = "127.0.0.1";
const DEFAULT_FWL_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/farewell_ledger.db";
const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 12;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Razorpay credentials and client settings. Read once at start-up and handed to the gateway client.
    pub razorpay: RazorpayConfig,
    /// If true, outstanding database migrations are applied when the server starts.
    pub run_migrations: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_FWL_HOST.to_string(),
            port: DEFAULT_FWL_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            razorpay: RazorpayConfig::default(),
            run_migrations: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("FWL_HOST").ok().unwrap_or_else(|| DEFAULT_FWL_HOST.into());
        let port = env::var("FWL_PORT").ok().map(|s| parse_port(&s)).unwrap_or(DEFAULT_FWL_PORT);
        let database_url = env::var("FWL_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ FWL_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|| {
            warn!("🪛️ FWL_JWT_SECRET is not set. Reverting to a random per-session secret.");
            AuthConfig::default()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        if !razorpay.has_credentials() {
            warn!("🪛️ Razorpay credentials are incomplete. Online payments are unavailable until they are configured.");
        }
        let run_migrations = parse_boolean_flag(env::var("FWL_RUN_MIGRATIONS").ok(), true);
        Self { host, port, database_url, auth, razorpay, run_migrations }
    }
}

fn parse_port(s: &str) -> u16 {
    s.trim().parse::<u16>().unwrap_or_else(|e| {
        error!("🪛️ {s} is not a valid port for FWL_PORT. {e} Using the default, {DEFAULT_FWL_PORT}, instead.");
        DEFAULT_FWL_PORT
    })
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
/// Caller identity comes from HS256 bearer tokens issued by the identity provider with a shared secret.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
    /// How long tokens issued by this server are valid for.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. Tokens issued by your \
             identity provider will NOT be accepted. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        Self::new(&secret)
    }
}

impl AuthConfig {
    pub fn new(secret: &str) -> Self {
        let token_lifetime = Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS);
        Self { jwt_secret: Secret::new(secret.to_string()), token_lifetime }
    }

    pub fn try_from_env() -> Option<Self> {
        let secret = env::var("FWL_JWT_SECRET").ok().filter(|s| !s.trim().is_empty())?;
        if secret.len() < 32 {
            warn!("🪛️ FWL_JWT_SECRET is shorter than 32 characters. Consider using a longer secret.");
        }
        Some(Self::new(&secret))
    }
}
