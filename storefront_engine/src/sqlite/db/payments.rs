use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPayment, Payment, PaymentNo, PaymentStatus},
    traits::PaymentApiError,
};

pub async fn insert_payment(
    payment_no: PaymentNo,
    payment: NewPayment,
    conn: &mut SqliteConnection,
) -> Result<Payment, PaymentApiError> {
    let now = Utc::now();
    let no = payment_no.clone();
    let payment = sqlx::query_as(
        r#"
            INSERT INTO payments
                (payment_no, user_id, amount, currency, status, provider, return_url, notify_url, extra,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *;
        "#,
    )
    .bind(payment_no)
    .bind(payment.user_id)
    .bind(payment.amount)
    .bind(payment.currency)
    .bind(PaymentStatus::Pending)
    .bind(payment.provider)
    .bind(payment.return_url)
    .bind(payment.notify_url)
    .bind(payment.extra)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => PaymentApiError::PaymentAlreadyExists(no),
        _ => PaymentApiError::from(e),
    })?;
    Ok(payment)
}

pub async fn fetch_by_payment_no(
    payment_no: &PaymentNo,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE payment_no = $1")
        .bind(payment_no.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

/// The idempotent paid-transition: one conditional write, guarded on the current status still being
/// `Pending`. The affected-row count is the whole truth — 1 means this call settled the payment, 0 means
/// it was already settled, already failed, or never existed.
pub async fn settle(
    payment_no: &PaymentNo,
    provider_trade_no: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE payments SET status = $1, provider_trade_no = $2, updated_at = $3
            WHERE payment_no = $4 AND status = $5
        "#,
    )
    .bind(PaymentStatus::Paid)
    .bind(provider_trade_no)
    .bind(Utc::now())
    .bind(payment_no.as_str())
    .bind(PaymentStatus::Pending)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// `Pending → Failed`, same conditional-write shape as [`settle`].
pub async fn mark_failed(payment_no: &PaymentNo, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE payments SET status = $1, updated_at = $2
            WHERE payment_no = $3 AND status = $4
        "#,
    )
    .bind(PaymentStatus::Failed)
    .bind(Utc::now())
    .bind(payment_no.as_str())
    .bind(PaymentStatus::Pending)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
