use std::time::Duration;

use actix_web::{
    dev::Server,
    error::JsonPayloadError,
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
    Scope,
};
use contribution_engine::{
    traits::{ContributionDatabase, PaymentGateway},
    ContributionApi,
    SqliteDatabase,
};
use log::*;
use razorpay_tools::RazorpayApi;

use crate::{
    auth::TokenVerifier,
    config::ServerConfig,
    errors::ServerError,
    integrations::razorpay::RazorpayGateway,
    routes::{
        health,
        AddContributionRoute,
        ApproveRoute,
        AuditLogRoute,
        CreateOrderRoute,
        HistoryRoute,
        OfflinePaymentRoute,
        PendingRoute,
        RejectRoute,
        VerifyAndCaptureRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.run_migrations {
        db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    }
    let api = RazorpayApi::new(config.razorpay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = RazorpayGateway::new(api);
    let srv = create_server_instance(config, db, gateway)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: RazorpayGateway,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let contribution_api = ContributionApi::new(db.clone(), gateway.clone());
        let verifier = TokenVerifier::new(&config.auth);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("fwl::access_log"))
            .app_data(web::Data::new(contribution_api))
            .app_data(web::Data::new(verifier))
            .app_data(json_config())
            .service(health)
            .service(api_scope::<SqliteDatabase, RazorpayGateway>())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("💻️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Every route under `/api`. Each handler takes a `JwtClaims` argument, so all of them require a verified caller.
pub fn api_scope<B, G>() -> Scope
where
    B: ContributionDatabase + 'static,
    G: PaymentGateway + 'static,
{
    web::scope("/api")
        .service(CreateOrderRoute::<B, G>::new())
        .service(VerifyAndCaptureRoute::<B, G>::new())
        .service(AddContributionRoute::<B, G>::new())
        .service(OfflinePaymentRoute::<B, G>::new())
        .service(ApproveRoute::<B, G>::new())
        .service(RejectRoute::<B, G>::new())
        .service(PendingRoute::<B, G>::new())
        .service(HistoryRoute::<B, G>::new())
        .service(AuditLogRoute::<B, G>::new())
}

/// Malformed JSON bodies get the same `{"success": false, "error": …}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        debug!("💻️ Rejecting request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
