//! Raw SQL fixtures. Groups, profiles and notifications are owned by other services, so the ledger has no API to
//! write them.
use sqlx::SqlitePool;

pub const ADMIN: &str = "admin-asha";
pub const CO_ADMIN: &str = "admin-vikram";
pub const ORGANIZER: &str = "organizer-neha";
pub const STUDENT: &str = "student-ravi";
pub const OTHER_STUDENT: &str = "student-meera";
pub const OUTSIDER: &str = "outsider-joe";

pub async fn create_farewell(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO farewells (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("Error creating farewell")
}

pub async fn add_profile(pool: &SqlitePool, user_id: &str, full_name: &str) {
    sqlx::query("INSERT INTO profiles (id, full_name) VALUES ($1, $2)")
        .bind(user_id)
        .bind(full_name)
        .execute(pool)
        .await
        .expect("Error creating profile");
}

pub async fn add_participant(pool: &SqlitePool, farewell_id: i64, user_id: &str, role: &str) {
    sqlx::query("INSERT INTO farewell_participants (farewell_id, user_id, role) VALUES ($1, $2, $3)")
        .bind(farewell_id)
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await
        .expect("Error adding participant");
}

/// One farewell group with two admins, an organizer and two students. [`OUTSIDER`] has a profile but no membership.
pub async fn seed_farewell(pool: &SqlitePool) -> i64 {
    let farewell = create_farewell(pool, "Class of 2024 Farewell").await;
    for (id, name, role) in [
        (ADMIN, "Asha Iyer", "main_admin"),
        (CO_ADMIN, "Vikram Rao", "parallel_admin"),
        (ORGANIZER, "Neha Gupta", "organizer"),
        (STUDENT, "Ravi Kumar", "student"),
        (OTHER_STUDENT, "Meera Nair", "student"),
    ] {
        add_profile(pool, id, name).await;
        add_participant(pool, farewell, id, role).await;
    }
    add_profile(pool, OUTSIDER, "Joe Bloggs").await;
    farewell
}

pub async fn add_notification(pool: &SqlitePool, farewell_id: i64, payload: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO notifications (farewell_id, type, payload) VALUES ($1, 'payment', $2) RETURNING id")
        .bind(farewell_id)
        .bind(payload)
        .fetch_one(pool)
        .await
        .expect("Error creating notification")
}

pub async fn notification_is_read(pool: &SqlitePool, id: i64) -> bool {
    sqlx::query_scalar("SELECT read FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Error fetching notification")
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}")).fetch_one(pool).await.expect("Error counting rows")
}
