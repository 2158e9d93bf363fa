//! Shadow copies of gateway orders and payments.
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{GatewayOrderRecord, GatewayPaymentRecord},
    traits::{GatewayOrder, GatewayPayment},
};

/// Inserts the order if it is new. For an existing order, only the status is refreshed.
pub async fn upsert_order(order: &GatewayOrder, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO gateway_orders (id, amount, currency, receipt, status, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                status = excluded.status,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now');
        "#,
    )
    .bind(&order.id)
    .bind(order.amount)
    .bind(&order.currency)
    .bind(&order.receipt)
    .bind(&order.status)
    .bind(Json(&order.notes))
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_payment(payment: &GatewayPayment, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
            INSERT INTO gateway_payments (id, order_id, amount, currency, method, status, bank, vpa, captured, raw)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                order_id = excluded.order_id,
                amount = excluded.amount,
                currency = excluded.currency,
                method = excluded.method,
                status = excluded.status,
                bank = excluded.bank,
                vpa = excluded.vpa,
                captured = excluded.captured,
                raw = excluded.raw,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now');
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.order_id)
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(&payment.method)
    .bind(&payment.status)
    .bind(&payment.bank)
    .bind(&payment.vpa)
    .bind(payment.captured)
    .bind(Json(&payment.raw))
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn fetch_order(order_id: &str, conn: &mut SqliteConnection) -> Result<Option<GatewayOrderRecord>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT id, amount, currency, receipt, status, metadata, created_at, updated_at
            FROM gateway_orders
            WHERE id = $1;
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await
}

pub async fn fetch_payment(
    payment_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<GatewayPaymentRecord>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT id, order_id, amount, currency, method, status, bank, vpa, captured, raw, created_at, updated_at
            FROM gateway_payments
            WHERE id = $1;
        "#,
    )
    .bind(payment_id)
    .fetch_optional(conn)
    .await
}
