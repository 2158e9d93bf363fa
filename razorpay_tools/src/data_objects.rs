use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /v1/orders`. Amounts are in minor units (paisa).
#[derive(Debug, Clone, Serialize)]
pub struct NewRazorpayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
    pub notes: Map<String, Value>,
}

impl NewRazorpayOrder {
    pub fn new(amount: i64, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
            receipt: crate::helpers::default_receipt(),
            payment_capture: 1,
            notes: Map::new(),
        }
    }

    pub fn with_receipt(mut self, receipt: Option<String>) -> Self {
        if let Some(receipt) = receipt.filter(|r| !r.trim().is_empty()) {
            self.receipt = receipt;
        }
        self
    }

    pub fn with_notes(mut self, notes: Option<Map<String, Value>>) -> Self {
        self.notes = notes.unwrap_or_default();
        self
    }
}

/// An order as reported by the gateway. Fields we do not use are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default, deserialize_with = "minor_units")]
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub receipt: Option<String>,
    /// Razorpay sends `[]` rather than `{}` when an order has no notes, so this is left as a raw value.
    #[serde(default)]
    pub notes: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A payment as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayPayment {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "optional_minor_units")]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub vpa: Option<String>,
    #[serde(default)]
    pub captured: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Minor-unit amounts must be whole numbers. `50000` and `50000.0` are accepted, `500.5` is not.
fn optional_minor_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(None),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Some(i)),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
            _ => Err(de::Error::custom(format!("{n} is not a whole number of minor units"))),
        },
        _ => Err(de::Error::custom(format!("{value} is not a valid minor-unit amount"))),
    }
}

fn minor_units<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    optional_minor_units(deserializer).map(Option::unwrap_or_default)
}
