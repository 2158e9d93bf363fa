use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::db_types::{Paisa, TransactionStatus, AUDIT_APPROVED_OFFLINE, AUDIT_REJECTED_OFFLINE};

//--------------------------------------    NewGatewayOrder    ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq)]
pub struct NewGatewayOrder {
    pub amount: Paisa,
    pub currency: String,
    /// Defaults to `rcpt_<unix millis>` when absent.
    pub receipt: Option<String>,
    pub notes: Option<Map<String, Value>>,
}

//--------------------------------------     GatewayOrder      ---------------------------------------------------------
/// An order as reported by the gateway. Everything the ledger does not interpret is kept in `extra`.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: Paisa,
    pub currency: String,
    pub status: String,
    pub receipt: Option<String>,
    pub notes: Value,
    pub extra: Map<String, Value>,
}

//--------------------------------------    GatewayPayment     ---------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct GatewayPayment {
    pub id: String,
    pub order_id: Option<String>,
    pub amount: Option<Paisa>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub bank: Option<String>,
    pub vpa: Option<String>,
    pub captured: Option<bool>,
    /// The full payload, as the gateway sent it.
    pub raw: Value,
}

//--------------------------------------  OfflineResolution    ---------------------------------------------------------
/// An admin's decision on a pending offline transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflineResolution {
    Approve,
    Reject { reason: Option<String> },
}

impl OfflineResolution {
    pub fn target_status(&self) -> TransactionStatus {
        match self {
            Self::Approve => TransactionStatus::Completed,
            Self::Reject { .. } => TransactionStatus::Failed,
        }
    }

    pub fn audit_action(&self) -> &'static str {
        match self {
            Self::Approve => AUDIT_APPROVED_OFFLINE,
            Self::Reject { .. } => AUDIT_REJECTED_OFFLINE,
        }
    }

    pub fn audit_metadata(&self) -> Option<Value> {
        match self {
            Self::Approve => None,
            Self::Reject { reason } => Some(json!({ "reason": reason })),
        }
    }
}
