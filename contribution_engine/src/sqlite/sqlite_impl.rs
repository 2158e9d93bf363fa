//! `SqliteDatabase` is a concrete implementation of a contribution ledger backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{audit_log, db_url, gateway_records, memberships, new_pool, notifications, transactions};
use crate::{
    db_types::{
        AuditLogEntry,
        GatewayOrderRecord,
        GatewayPaymentRecord,
        Membership,
        NewAuditLogEntry,
        NewTransaction,
        PendingTransaction,
        Transaction,
        UserId,
    },
    traits::{AuditLog, GatewayOrder, GatewayPayment, LedgerDatabase, LedgerError, OfflineResolution},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl LedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_membership(&self, user_id: &UserId) -> Result<Membership, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        memberships::fetch_membership(user_id, &mut conn).await?.ok_or_else(|| LedgerError::NoMembership(user_id.clone()))
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let result = memberships::is_admin(user_id, &mut conn).await?;
        Ok(result)
    }

    async fn insert_transaction(&self, transaction: NewTransaction) -> Result<Transaction, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let payment_id = transaction.payment_gateway_id.clone();
        let tx = transactions::insert_transaction(transaction, &mut conn).await.map_err(|e| match payment_id {
            Some(id) if is_unique_violation(&e) => LedgerError::DuplicateGatewayPayment(id),
            _ => LedgerError::from(e),
        })?;
        debug!("🗃️ Transaction #{} ({} {} via {}) saved as {}", tx.id, tx.amount, tx.currency, tx.method, tx.status);
        Ok(tx)
    }

    async fn fetch_transaction(&self, id: i64) -> Result<Option<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let tx = transactions::fetch_transaction(id, &mut conn).await?;
        Ok(tx)
    }

    async fn fetch_transaction_by_gateway_payment(&self, payment_id: &str) -> Result<Option<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let tx = transactions::fetch_by_gateway_payment(payment_id, &mut conn).await?;
        Ok(tx)
    }

    /// In a single atomic database transaction,
    /// * conditionally moves the transaction from `pending` to the resolution's target status, recording the admin,
    /// * appends the matching audit log entry.
    ///
    /// If the conditional update touches no rows, nothing is written and the reason is reported.
    async fn resolve_offline_transaction(
        &self,
        id: i64,
        admin: &UserId,
        resolution: &OfflineResolution,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let Some(updated) = transactions::resolve_pending(id, resolution.target_status(), admin, &mut tx).await? else {
            let existing = transactions::fetch_transaction(id, &mut tx).await?;
            tx.rollback().await?;
            return match existing {
                Some(t) => {
                    debug!("🗃️ Transaction #{id} is already {}. Not resolving it again.", t.status);
                    Err(LedgerError::AlreadyResolved { id, status: t.status })
                },
                None => Err(LedgerError::TransactionNotFound(id)),
            };
        };
        let mut entry = NewAuditLogEntry::new(id, resolution.audit_action(), admin.clone());
        entry.metadata = resolution.audit_metadata();
        let entry = audit_log::append(entry, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Transaction #{id} is now {} by {admin}. Audit entry #{} recorded.", updated.status, entry.id);
        Ok(updated)
    }

    async fn fetch_pending_offline_transactions(&self, limit: i64) -> Result<Vec<PendingTransaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let pending = transactions::fetch_pending_offline(limit, &mut conn).await?;
        trace!("🗃️ {} pending offline transactions", pending.len());
        Ok(pending)
    }

    async fn fetch_transactions_for_user(&self, user_id: &UserId) -> Result<Vec<Transaction>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let result = transactions::fetch_for_user(user_id, &mut conn).await?;
        Ok(result)
    }

    async fn upsert_gateway_order(&self, order: &GatewayOrder) -> Result<(), LedgerError> {
        let mut conn = self.pool.acquire().await?;
        gateway_records::upsert_order(order, &mut conn).await?;
        trace!("🗃️ Shadow copy of order {} saved", order.id);
        Ok(())
    }

    async fn upsert_gateway_payment(&self, payment: &GatewayPayment) -> Result<(), LedgerError> {
        let mut conn = self.pool.acquire().await?;
        gateway_records::upsert_payment(payment, &mut conn).await?;
        trace!("🗃️ Shadow copy of payment {} saved", payment.id);
        Ok(())
    }

    async fn fetch_gateway_order(&self, order_id: &str) -> Result<Option<GatewayOrderRecord>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let result = gateway_records::fetch_order(order_id, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_gateway_payment(&self, payment_id: &str) -> Result<Option<GatewayPaymentRecord>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let result = gateway_records::fetch_payment(payment_id, &mut conn).await?;
        Ok(result)
    }

    async fn mark_notifications_read_for_transaction(&self, transaction_id: i64) -> Result<u64, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let count = notifications::mark_read_for_transaction(transaction_id, &mut conn).await?;
        trace!("🗃️ {count} notifications for transaction #{transaction_id} marked as read");
        Ok(count)
    }
}

impl AuditLog for SqliteDatabase {
    async fn append_audit_entry(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let entry = audit_log::append(entry, &mut conn).await?;
        debug!("🗃️ Audit entry #{} ({}) recorded for transaction #{}", entry.id, entry.action, entry.transaction_id);
        Ok(entry)
    }

    async fn fetch_audit_log(&self, transaction_id: i64) -> Result<Vec<AuditLogEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        let entries = audit_log::fetch_for_transaction(transaction_id, &mut conn).await?;
        Ok(entries)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies any outstanding schema migrations.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) {
        self.pool.close().await;
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error().map(|e| e.is_unique_violation()).unwrap_or(false)
}
