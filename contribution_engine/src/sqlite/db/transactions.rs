use log::trace;
use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{NewTransaction, PendingTransaction, Transaction, TransactionStatus, UserId};

const TRANSACTION_COLUMNS: &str = "id, user_id, farewell_id, amount, currency, type, method, status, notes, \
                                   receipt_url, payment_gateway_id, logged_by_admin_id, metadata, created_at, \
                                   updated_at";

/// Inserts a new ledger row using the given connection. This is not atomic. You can embed this call inside a
/// transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_transaction(
    transaction: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<Transaction, sqlx::Error> {
    let sql = format!(
        r#"
            INSERT INTO transactions (
                user_id,
                farewell_id,
                amount,
                currency,
                type,
                method,
                status,
                notes,
                receipt_url,
                payment_gateway_id,
                logged_by_admin_id,
                metadata
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {TRANSACTION_COLUMNS};
        "#
    );
    let row = sqlx::query_as(&sql)
        .bind(transaction.user_id)
        .bind(transaction.farewell_id)
        .bind(transaction.amount)
        .bind(transaction.currency)
        .bind(transaction.transaction_type)
        .bind(transaction.method)
        .bind(transaction.status)
        .bind(transaction.notes)
        .bind(transaction.receipt_url)
        .bind(transaction.payment_gateway_id)
        .bind(transaction.logged_by_admin_id)
        .bind(transaction.metadata.map(Json))
        .fetch_one(conn)
        .await?;
    Ok(row)
}

pub async fn fetch_transaction(id: i64, conn: &mut SqliteConnection) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1");
    sqlx::query_as(&sql).bind(id).fetch_optional(conn).await
}

pub async fn fetch_by_gateway_payment(
    payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE payment_gateway_id = $1");
    sqlx::query_as(&sql).bind(payment_id).fetch_optional(conn).await
}

/// Sets the status of a *pending* transaction and records the admin who resolved it.
///
/// This is a single conditional update, so if two callers race to resolve the same transaction, only one of them
/// sees the updated row. Returns `None` if the transaction does not exist or is no longer pending.
pub async fn resolve_pending(
    id: i64,
    status: TransactionStatus,
    admin: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, sqlx::Error> {
    let sql = format!(
        r#"
            UPDATE transactions
            SET status = $1,
                logged_by_admin_id = $2,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = $3 AND status = 'pending'
            RETURNING {TRANSACTION_COLUMNS};
        "#
    );
    let row: Option<Transaction> = sqlx::query_as(&sql).bind(status).bind(admin).bind(id).fetch_optional(conn).await?;
    trace!("🗃️ Conditional resolution of transaction #{id} to {status}: {}", row.is_some());
    Ok(row)
}

pub async fn fetch_pending_offline(
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<PendingTransaction>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT
                t.id,
                t.user_id,
                t.farewell_id,
                t.amount,
                t.currency,
                t.type,
                t.method,
                t.status,
                t.notes,
                t.receipt_url,
                t.payment_gateway_id,
                t.logged_by_admin_id,
                t.metadata,
                t.created_at,
                t.updated_at,
                u.full_name AS user_full_name,
                a.full_name AS logged_by_admin_name
            FROM transactions t
                LEFT JOIN profiles u ON u.id = t.user_id
                LEFT JOIN profiles a ON a.id = t.logged_by_admin_id
            WHERE t.method IN ('offline', 'cash', 'upi', 'other')
              AND t.status = 'pending'
            ORDER BY t.created_at DESC, t.id DESC
            LIMIT $1;
        "#,
    )
    .bind(limit)
    .fetch_all(conn)
    .await
}

pub async fn fetch_for_user(user_id: &UserId, conn: &mut SqliteConnection) -> Result<Vec<Transaction>, sqlx::Error> {
    let sql = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    );
    sqlx::query_as(&sql).bind(user_id).fetch_all(conn).await
}
