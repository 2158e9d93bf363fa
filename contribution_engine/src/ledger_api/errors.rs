use thiserror::Error;

use crate::traits::{GatewayError, LedgerError};

/// The error taxonomy of the transaction service. Every variant carries a message that can be shown to the caller
/// as-is.
#[derive(Debug, Clone, Error)]
pub enum ContributionError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    AuthorizationError(String),
    #[error("{0}")]
    NotFoundError(String),
    #[error("Invalid payment signature")]
    SignatureError,
    #[error("{0}")]
    GatewayError(String),
    #[error("{0}")]
    ConfigurationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<LedgerError> for ContributionError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::DatabaseError(s) => Self::DatabaseError(s),
            LedgerError::TransactionNotFound(id) => Self::NotFoundError(format!("Transaction {id} not found")),
            LedgerError::NoMembership(_) => Self::NotFoundError("User not in any group".to_string()),
            LedgerError::AlreadyResolved { id, status } => {
                Self::ValidationError(format!("Transaction {id} is already resolved ({status})"))
            },
            LedgerError::DuplicateGatewayPayment(id) => {
                Self::ValidationError(format!("Payment {id} has already been recorded"))
            },
        }
    }
}

impl From<GatewayError> for ContributionError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Configuration(s) => Self::ConfigurationError(s),
            GatewayError::Upstream(s) | GatewayError::InvalidResponse(s) => Self::GatewayError(s),
        }
    }
}
