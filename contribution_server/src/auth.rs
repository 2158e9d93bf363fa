//! Bearer-token caller identity.
//!
//! Every `/api` handler takes a [`JwtClaims`] argument. Extraction verifies the HS256 signature and expiry of the
//! `Authorization: Bearer <jwt>` header against the shared secret, so a handler only ever runs for a verified caller.
//! The `sub` claim is the caller's user id.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::Utc;
use contribution_engine::db_types::UserId;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: UserId,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> &UserId {
        &self.sub
    }
}

pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self { decoding_key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::ValidationError(e.to_string()),
        })?;
        Ok(data.claims)
    }
}

/// Issues access tokens with the shared secret. The identity provider normally does this; the server uses it for
/// tooling and tests.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    lifetime: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { encoding_key, lifetime: config.token_lifetime }
    }

    pub fn issue_token(&self, user_id: &UserId) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = JwtClaims { sub: user_id.clone(), exp: (now + self.lifetime).timestamp(), iat: now.timestamp() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServerError::CouldNotSerializeAccessToken(e.to_string()))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|_| AuthError::PoorlyFormattedToken)?;
    value.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty()).ok_or(AuthError::PoorlyFormattedToken)
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<TokenVerifier>>() {
            None => {
                error!("💻️ No token verifier has been registered with the app");
                Err(ServerError::ConfigurationError("Token verification is not configured".to_string()))
            },
            Some(verifier) => bearer_token(req).and_then(|token| verifier.verify(token)).map_err(|e| {
                debug!("💻️ Rejecting request to {}. {e}", req.path());
                ServerError::from(e)
            }),
        };
        ready(result)
    }
}
