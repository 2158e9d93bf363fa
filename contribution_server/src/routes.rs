//! Request handler definitions
//!
//! Define each route and its handler here. Handlers stay thin: they unpack the request, call the
//! [`ContributionApi`], and wrap the result. Authorization rules live in the engine.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every database and gateway call here is awaited, so a slow gateway
//! does not stall other requests on the same worker.
use actix_web::{get, web, HttpResponse, Responder};
use contribution_engine::{
    db_types::TransactionMethod,
    ledger_objects::{OfflineContribution, PaymentCallback},
    traits::{ContributionDatabase, PaymentGateway},
    ContributionApi,
};
use log::*;

use crate::{
    auth::JwtClaims,
    data_objects::{ApproveParams, CreateOrderParams, HistoryQuery, JsonResponse, RejectParams},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

type Api<B, G> = web::Data<ContributionApi<B, G>>;

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Razorpay  ----------------------------------------------------
route!(create_order => Post "/razorpay/create-order" impl ContributionDatabase, PaymentGateway);
/// Opens a gateway order for a checkout. The amount is in paisa. Returns `{id, amount, currency, key_id}`, which is
/// everything the client needs to open the payment dialog.
pub async fn create_order<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    body: web::Json<CreateOrderParams>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let CreateOrderParams { amount, order } = body.into_inner();
    debug!("💻️ {} is creating an order for {amount} paisa", claims.sub);
    let handle = api.create_order_in_minor_units(amount, order).await?;
    Ok(HttpResponse::Ok().json(handle))
}

route!(verify_and_capture => Post "/razorpay/verify-and-capture" impl ContributionDatabase, PaymentGateway);
/// Checks a checkout callback and records the payment. Returns `{success, saved}`.
pub async fn verify_and_capture<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    body: web::Json<PaymentCallback>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let callback = body.into_inner();
    debug!("💻️ {} sent a payment callback for order {}", claims.sub, callback.razorpay_order_id);
    let receipt = api.verify_and_record_online_payment(claims.user_id(), callback).await?;
    Ok(HttpResponse::Ok().json(receipt))
}

//----------------------------------------------   Contributions  ----------------------------------------------------
route!(add_contribution => Post "/contributions/add" impl ContributionDatabase, PaymentGateway);
pub async fn add_contribution<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    body: web::Json<OfflineContribution>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let tx = api.add_offline_transaction(claims.user_id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(tx)))
}

route!(offline_payment => Post "/contributions/offline-payment" impl ContributionDatabase, PaymentGateway);
/// Same as `/contributions/add`, but the method is always `offline`, so the entry waits for review unless an admin
/// logs it.
pub async fn offline_payment<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    body: web::Json<OfflineContribution>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let contribution = body.into_inner().with_method(TransactionMethod::Offline);
    let tx = api.add_offline_transaction(claims.user_id(), contribution).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(tx)))
}

route!(approve => Post "/contributions/approve" impl ContributionDatabase, PaymentGateway);
pub async fn approve<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    body: web::Json<ApproveParams>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let result = api.approve_offline(claims.user_id(), body.transaction_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(result)))
}

route!(reject => Post "/contributions/reject" impl ContributionDatabase, PaymentGateway);
pub async fn reject<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    body: web::Json<RejectParams>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let RejectParams { transaction_id, reason } = body.into_inner();
    let result = api.reject_offline(claims.user_id(), transaction_id, reason).await?;
    Ok(HttpResponse::Ok().json(result))
}

route!(pending => Get "/contributions/pending" impl ContributionDatabase, PaymentGateway);
pub async fn pending<B, G>(claims: JwtClaims, api: Api<B, G>) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let rows = api.list_pending_offline(claims.user_id()).await?;
    trace!("💻️ {} pending offline transactions for {}", rows.len(), claims.sub);
    Ok(HttpResponse::Ok().json(JsonResponse::success(rows)))
}

route!(history => Get "/contributions/history" impl ContributionDatabase, PaymentGateway);
/// The caller's contribution history. Admins may pass `?user_id=` to see someone else's.
pub async fn history<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let history = api.transactions_for_user(claims.user_id(), query.user_id.as_ref()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(history)))
}

route!(audit_log => Get "/contributions/{id}/audit" impl ContributionDatabase, PaymentGateway);
pub async fn audit_log<B, G>(
    claims: JwtClaims,
    api: Api<B, G>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError>
where
    B: ContributionDatabase,
    G: PaymentGateway,
{
    let entries = api.audit_log_for_transaction(claims.user_id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(entries)))
}
