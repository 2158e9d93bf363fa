use thiserror::Error;

use crate::{
    db_types::{
        GatewayOrderRecord,
        GatewayPaymentRecord,
        Membership,
        NewTransaction,
        PendingTransaction,
        Transaction,
        TransactionStatus,
        UserId,
    },
    traits::{GatewayOrder, GatewayPayment, OfflineResolution},
};

/// Storage for the contribution ledger.
///
/// Shadow copies of gateway records are caches; the gateway remains the source of truth for them. Ledger rows are
/// never deleted.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// The group membership the ledger attributes a user's contributions to. If a user belongs to several groups,
    /// the earliest membership wins.
    ///
    /// Returns [`LedgerError::NoMembership`] if the user does not belong to any group.
    async fn fetch_membership(&self, user_id: &UserId) -> Result<Membership, LedgerError>;

    /// True iff the user holds an admin role (`main_admin` or `parallel_admin`) in any group.
    async fn is_admin(&self, user_id: &UserId) -> Result<bool, LedgerError>;

    /// Inserts a ledger row. A gateway payment id can appear on at most one row; a second insert for the same payment
    /// fails with [`LedgerError::DuplicateGatewayPayment`].
    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, LedgerError>;

    async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, LedgerError>;

    /// The ledger row recording the given gateway payment, if there is one.
    async fn fetch_transaction_by_gateway_payment(&self, payment_id: &str) -> Result<Option<Transaction>, LedgerError>;

    /// Moves a `pending` transaction to its resolved state and records the acting admin, appending the matching audit
    /// entry, all in one atomic database transaction.
    ///
    /// The update is conditional on the row still being `pending`, so of several concurrent resolutions exactly one
    /// succeeds. The others fail with [`LedgerError::AlreadyResolved`]. Unknown ids fail with
    /// [`LedgerError::TransactionNotFound`].
    async fn resolve_offline_transaction(
        &self,
        id: i64,
        admin: &UserId,
        resolution: &OfflineResolution,
    ) -> Result<Transaction, LedgerError>;

    /// Offline transactions awaiting review, newest first, with contributor and admin display names.
    async fn fetch_pending_offline_transactions(&self, limit: i64) -> Result<Vec<PendingTransaction>, LedgerError>;

    /// A user's transactions, newest first.
    async fn fetch_transactions_for_user(&self, user_id: &UserId) -> Result<Vec<Transaction>, LedgerError>;

    /// Idempotent insert of the order's shadow copy. Only the status is refreshed on an existing record.
    async fn upsert_gateway_order(&self, order: &GatewayOrder) -> Result<(), LedgerError>;

    /// Idempotent insert or refresh of a payment's shadow copy.
    async fn upsert_gateway_payment(&self, payment: &GatewayPayment) -> Result<(), LedgerError>;

    async fn fetch_gateway_order(&self, order_id: &str) -> Result<Option<GatewayOrderRecord>, LedgerError>;

    async fn fetch_gateway_payment(&self, payment_id: &str) -> Result<Option<GatewayPaymentRecord>, LedgerError>;

    /// Marks notifications whose payload refers to the given transaction as read. Returns the number of
    /// notifications that were updated.
    async fn mark_notifications_read_for_transaction(&self, transaction_id: i64) -> Result<u64, LedgerError>;
}

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("The requested transaction {0} does not exist")]
    TransactionNotFound(i64),
    #[error("User {0} is not in any group")]
    NoMembership(UserId),
    #[error("Transaction {id} has already been resolved. It is {status}")]
    AlreadyResolved { id: i64, status: TransactionStatus },
    #[error("Gateway payment {0} has already been recorded")]
    DuplicateGatewayPayment(String),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
