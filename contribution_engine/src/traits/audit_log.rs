use crate::{
    db_types::{AuditLogEntry, NewAuditLogEntry},
    traits::LedgerError,
};

/// Write-once record of administrative actions. Entries can not be updated or deleted.
#[allow(async_fn_in_trait)]
pub trait AuditLog {
    /// Appends a new entry and returns it as stored.
    async fn append_audit_entry(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, LedgerError>;

    /// All entries for the given transaction, oldest first.
    async fn fetch_audit_log(&self, transaction_id: i64) -> Result<Vec<AuditLogEntry>, LedgerError>;
}
