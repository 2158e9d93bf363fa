use sqlx::{types::Json, SqliteConnection};

use crate::db_types::{AuditLogEntry, NewAuditLogEntry};

/// Appends an entry to the audit log. This is not atomic on its own; pass `&mut *tx` to make it part of a larger
/// database transaction.
pub async fn append(entry: NewAuditLogEntry, conn: &mut SqliteConnection) -> Result<AuditLogEntry, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO transaction_audit_logs (transaction_id, action, performed_by, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING id, transaction_id, action, performed_by, metadata, created_at;
        "#,
    )
    .bind(entry.transaction_id)
    .bind(entry.action)
    .bind(entry.performed_by)
    .bind(entry.metadata.map(Json))
    .fetch_one(conn)
    .await
}

pub async fn fetch_for_transaction(
    transaction_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT id, transaction_id, action, performed_by, metadata, created_at
            FROM transaction_audit_logs
            WHERE transaction_id = $1
            ORDER BY created_at ASC, id ASC;
        "#,
    )
    .bind(transaction_id)
    .fetch_all(conn)
    .await
}
