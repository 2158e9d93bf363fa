use sqlx::SqliteConnection;

/// Marks every notification whose JSON payload carries `transaction_id` as read. Payloads that are not valid JSON are
/// ignored.
pub async fn mark_read_for_transaction(transaction_id: i64, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE notifications
            SET read = 1
            WHERE read = 0
              AND CASE
                    WHEN json_valid(payload) THEN CAST(json_extract(payload, '$.transaction_id') AS TEXT)
                  END = $1;
        "#,
    )
    .bind(transaction_id.to_string())
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
