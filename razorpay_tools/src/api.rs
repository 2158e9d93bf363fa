use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    Url,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{NewRazorpayOrder, RazorpayOrder, RazorpayPayment},
    RazorpayApiError,
};

/// Thin REST client for the Razorpay API. Cloning is cheap; the underlying connection pool is shared.
///
/// Every request is authenticated with HTTP basic auth built from the configured key id and secret, and is bounded by
/// the configured timeout. Requests are never retried.
#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Url::parse(&config.api_url)
            .map_err(|e| RazorpayApiError::Initialization(format!("Invalid API url {}: {e}", config.api_url)))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn key_id(&self) -> &str {
        self.config.key_id.as_str()
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        if !self.config.has_credentials() {
            return Err(RazorpayApiError::MissingCredentials);
        }
        let url = self.url(path)?;
        trace!("💳️ Sending REST query: {method} {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(self.config.key_id.as_str(), Some(self.config.key_secret.reveal().as_str()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("💳️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await?;
            warn!("💳️ Razorpay returned an error. {status}: {message}");
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    /// Builds the request url from path segments, so that gateway ids are always percent-encoded.
    pub fn url(&self, path: &[&str]) -> Result<Url, RazorpayApiError> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| RazorpayApiError::RequestFailed(format!("Invalid API url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RazorpayApiError::RequestFailed("API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    pub async fn create_order(&self, order: &NewRazorpayOrder) -> Result<RazorpayOrder, RazorpayApiError> {
        debug!("💳️ Creating order for {} {} ({})", order.amount, order.currency, order.receipt);
        let result = self.rest_query::<RazorpayOrder, _>(Method::POST, &["v1", "orders"], Some(order)).await?;
        info!("💳️ Created order {} for {} {}", result.id, result.amount, result.currency);
        Ok(result)
    }

    pub async fn fetch_order(&self, order_id: &str) -> Result<RazorpayOrder, RazorpayApiError> {
        Self::check_id(order_id)?;
        debug!("💳️ Fetching order {order_id}");
        let result = self.rest_query::<RazorpayOrder, ()>(Method::GET, &["v1", "orders", order_id], None).await?;
        debug!("💳️ Fetched order {order_id} [{}]", result.status);
        Ok(result)
    }

    pub async fn fetch_payment(&self, payment_id: &str) -> Result<RazorpayPayment, RazorpayApiError> {
        Self::check_id(payment_id)?;
        debug!("💳️ Fetching payment {payment_id}");
        let result = self.rest_query::<RazorpayPayment, ()>(Method::GET, &["v1", "payments", payment_id], None).await?;
        debug!("💳️ Fetched payment {payment_id} [{}]", result.status.as_deref().unwrap_or("unknown"));
        Ok(result)
    }

    fn check_id(id: &str) -> Result<(), RazorpayApiError> {
        if id.trim().is_empty() {
            return Err(RazorpayApiError::RequestFailed("Gateway id cannot be empty".to_string()));
        }
        Ok(())
    }
}
