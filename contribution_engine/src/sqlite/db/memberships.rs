use sqlx::SqliteConnection;

use crate::db_types::{Membership, UserId};

/// The user's earliest group membership, if any.
pub async fn fetch_membership(
    user_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<Membership>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT farewell_id, role
            FROM farewell_participants
            WHERE user_id = $1
            ORDER BY joined_at ASC, id ASC
            LIMIT 1;
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

pub async fn is_admin(user_id: &UserId, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        r#"
            SELECT COUNT(*)
            FROM farewell_participants
            WHERE user_id = $1 AND role IN ('main_admin', 'parallel_admin');
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}
