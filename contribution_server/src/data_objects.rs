use contribution_engine::{db_types::UserId, ledger_objects::OrderRequest};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> JsonResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Body of `POST /api/razorpay/create-order`. The amount is in paisa, as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderParams {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub amount: f64,
    #[serde(flatten)]
    pub order: OrderRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApproveParams {
    #[serde(deserialize_with = "transaction_id")]
    pub transaction_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectParams {
    #[serde(deserialize_with = "transaction_id")]
    pub transaction_id: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub user_id: Option<UserId>,
}

fn number_or_numeric_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| de::Error::custom("Invalid amount")),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| de::Error::custom("Invalid amount")),
        _ => Err(de::Error::custom("Invalid amount")),
    }
}

fn transaction_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0).ok_or_else(|| de::Error::custom("transaction_id required"))
}
