use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db_types::{Paisa, Transaction, TransactionMethod, TransactionStatus, TransactionType, UserId};

//--------------------------------------    SecondaryWrite     ---------------------------------------------------------
/// The outcome of a best-effort write that accompanies a primary ledger operation (shadow copies of gateway records,
/// notification updates). A failed secondary write never fails the primary operation; it is reported here instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryWrite {
    Persisted,
    Failed(String),
}

impl SecondaryWrite {
    pub fn from_result<T, E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::Persisted,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }
}

//--------------------------------------     OrderRequest      ---------------------------------------------------------
/// Optional order details. The currency defaults to INR and the receipt to `rcpt_<unix millis>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: Option<Map<String, Value>>,
}

/// What a checkout client needs to open the gateway's payment dialog.
#[derive(Debug, Clone, Serialize)]
pub struct OrderHandle {
    pub id: String,
    /// In minor units, as the gateway reports it.
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    #[serde(skip)]
    pub shadow_copy: SecondaryWrite,
}

//--------------------------------------  OfflineContribution  ---------------------------------------------------------
/// A manually reported contribution. `amount` is in rupees and may be given as a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct OfflineContribution {
    pub user_id: UserId,
    pub amount: Paisa,
    #[serde(default)]
    pub method: Option<TransactionMethod>,
    /// Older clients send the payment method as `type`. It is only read when `method` is absent, and transaction
    /// types such as `contribution` in this field are ignored.
    #[serde(default, rename = "type")]
    pub legacy_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    /// Set when an admin logs the payment on someone's behalf. Must be the caller's own id.
    #[serde(default)]
    pub logged_by_admin_id: Option<UserId>,
}

impl OfflineContribution {
    pub fn new(user_id: UserId, amount: Paisa) -> Self {
        Self {
            user_id,
            amount,
            method: None,
            legacy_type: None,
            notes: None,
            receipt_url: None,
            logged_by_admin_id: None,
        }
    }

    pub fn with_method(mut self, method: TransactionMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_notes<S: Into<String>>(mut self, notes: S) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn logged_by(mut self, admin: UserId) -> Self {
        self.logged_by_admin_id = Some(admin);
        self
    }

    /// The payment method the contributor chose, if any. `Err` carries a message for an unrecognised `type`.
    pub fn method(&self) -> Result<Option<TransactionMethod>, String> {
        if self.method.is_some() {
            return Ok(self.method);
        }
        let Some(label) = self.legacy_type.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        if let Ok(method) = label.parse::<TransactionMethod>() {
            return Ok(Some(method));
        }
        match label.parse::<TransactionType>() {
            Ok(_) => Ok(None),
            Err(_) => Err(format!("Invalid payment method: {label}")),
        }
    }
}

//--------------------------------------    PaymentCallback    ---------------------------------------------------------
/// The payload a checkout client forwards after the gateway reports a completed payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCallback {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// Admins may record an online payment on behalf of another user.
    #[serde(default, alias = "selected_user")]
    pub selected_user_id: Option<UserId>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl PaymentCallback {
    pub fn new(order_id: &str, payment_id: &str, signature: &str) -> Self {
        Self {
            razorpay_order_id: order_id.to_string(),
            razorpay_payment_id: payment_id.to_string(),
            razorpay_signature: signature.to_string(),
            selected_user_id: None,
            metadata: None,
        }
    }

    pub fn for_user(mut self, user_id: UserId) -> Self {
        self.selected_user_id = Some(user_id);
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Free-text notes carried in `metadata.notes`, if any.
    pub fn notes(&self) -> Option<String> {
        self.metadata.as_ref().and_then(|m| m.get("notes")).and_then(Value::as_str).map(String::from)
    }
}

//--------------------------------------    Operation results  ---------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct OnlinePaymentReceipt {
    pub success: bool,
    pub saved: Transaction,
    pub payment_shadow_copy: SecondaryWrite,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalResult {
    pub transaction_id: i64,
    pub status: TransactionStatus,
    pub approved_by: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectionResult {
    pub success: bool,
    pub transaction: Transaction,
    pub notifications: SecondaryWrite,
}

/// A user's contributions, newest first, with the sum of the completed ones.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionHistory {
    pub user_id: UserId,
    pub total_completed: Paisa,
    pub transactions: Vec<Transaction>,
}

impl ContributionHistory {
    pub fn new(user_id: UserId, transactions: Vec<Transaction>) -> Self {
        let total_completed = transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed)
            .map(|t| t.amount)
            .sum();
        Self { user_id, total_completed, transactions }
    }
}
