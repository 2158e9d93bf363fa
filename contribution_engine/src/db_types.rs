use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use fwl_common::{Paisa, DEFAULT_CURRENCY_CODE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------        UserId         ---------------------------------------------------------
/// The identity provider's id for a user. Opaque to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates `Display` and `FromStr` for the closed enumerations stored as lowercase text in the ledger.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ConversionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    s => Err(ConversionError(format!("Invalid {}: {s}", stringify!($name)))),
                }
            }
        }
    };
}

//--------------------------------------   TransactionMethod   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionMethod {
    /// Paid through the payment gateway
    Online,
    #[default]
    Offline,
    Cash,
    Upi,
    Other,
}

text_enum!(TransactionMethod { Online => "online", Offline => "offline", Cash => "cash", Upi => "upi", Other => "other" });

impl TransactionMethod {
    /// Methods recorded by manual report rather than through the gateway.
    pub const OFFLINE_METHODS: [TransactionMethod; 4] = [Self::Offline, Self::Cash, Self::Upi, Self::Other];

    pub fn is_offline(&self) -> bool {
        !matches!(self, Self::Online)
    }

    /// Cash and UPI hand-overs are settled on the spot, so they do not wait for approval.
    pub fn settles_immediately(&self) -> bool {
        matches!(self, Self::Cash | Self::Upi)
    }
}

//--------------------------------------   TransactionStatus   ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    /// Refunds are handled outside this subsystem. The status exists so that the ledger can represent them.
    Refunded,
}

text_enum!(TransactionStatus {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
    Refunded => "refunded"
});

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

//--------------------------------------    TransactionType    ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    #[default]
    Contribution,
    Refund,
    Adjustment,
}

text_enum!(TransactionType { Contribution => "contribution", Refund => "refund", Adjustment => "adjustment" });

//--------------------------------------     FarewellRole      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FarewellRole {
    MainAdmin,
    ParallelAdmin,
    Organizer,
    Student,
    Guest,
}

text_enum!(FarewellRole {
    MainAdmin => "main_admin",
    ParallelAdmin => "parallel_admin",
    Organizer => "organizer",
    Student => "student",
    Guest => "guest"
});

impl FarewellRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::MainAdmin | Self::ParallelAdmin)
    }
}

//--------------------------------------      Membership       ---------------------------------------------------------
/// A user's membership of a farewell group.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Membership {
    pub farewell_id: i64,
    pub role: FarewellRole,
}

//--------------------------------------      Transaction      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: UserId,
    pub farewell_id: i64,
    pub amount: Paisa,
    pub currency: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub method: TransactionMethod,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    pub payment_gateway_id: Option<String>,
    pub logged_by_admin_id: Option<UserId>,
    pub metadata: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------    NewTransaction     ---------------------------------------------------------
/// A ledger row about to be inserted. The id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub farewell_id: i64,
    pub amount: Paisa,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub method: TransactionMethod,
    pub status: TransactionStatus,
    pub notes: Option<String>,
    pub receipt_url: Option<String>,
    pub payment_gateway_id: Option<String>,
    pub logged_by_admin_id: Option<UserId>,
    pub metadata: Option<Value>,
}

impl NewTransaction {
    pub fn new(user_id: UserId, farewell_id: i64, amount: Paisa, method: TransactionMethod) -> Self {
        Self {
            user_id,
            farewell_id,
            amount,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            transaction_type: TransactionType::Contribution,
            method,
            status: TransactionStatus::Pending,
            notes: None,
            receipt_url: None,
            payment_gateway_id: None,
            logged_by_admin_id: None,
            metadata: None,
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_receipt_url(mut self, receipt_url: Option<String>) -> Self {
        self.receipt_url = receipt_url;
        self
    }

    pub fn with_payment_gateway_id(mut self, id: Option<String>) -> Self {
        self.payment_gateway_id = id;
        self
    }

    pub fn with_logged_by_admin(mut self, admin: Option<UserId>) -> Self {
        self.logged_by_admin_id = admin;
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

//--------------------------------------  PendingTransaction   ---------------------------------------------------------
/// An offline transaction awaiting review, with the display names an admin needs to review it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingTransaction {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: Transaction,
    pub user_full_name: Option<String>,
    pub logged_by_admin_name: Option<String>,
}

//--------------------------------------  Gateway shadow rows  ---------------------------------------------------------
/// Local mirror of a gateway order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GatewayOrderRecord {
    pub id: String,
    pub amount: Paisa,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    pub metadata: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Local mirror of a gateway payment, including the raw payload the gateway returned.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GatewayPaymentRecord {
    pub id: String,
    pub order_id: Option<String>,
    pub amount: Option<Paisa>,
    pub currency: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub bank: Option<String>,
    pub vpa: Option<String>,
    pub captured: Option<bool>,
    pub raw: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     Audit entries     ---------------------------------------------------------
pub const AUDIT_APPROVED_OFFLINE: &str = "approved_offline";
pub const AUDIT_REJECTED_OFFLINE: &str = "rejected_offline";

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub transaction_id: i64,
    pub action: String,
    pub performed_by: UserId,
    pub metadata: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub transaction_id: i64,
    pub action: String,
    pub performed_by: UserId,
    pub metadata: Option<Value>,
}

impl NewAuditLogEntry {
    pub fn new<S: Into<String>>(transaction_id: i64, action: S, performed_by: UserId) -> Self {
        Self { transaction_id, action: action.into(), performed_by, metadata: None }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
