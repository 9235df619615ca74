//! Small support utilities: payment-number generation, extra-payload serialization, and error triage.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::db_types::PaymentNo;

static PAYMENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generates a fresh payment number: a timestamp for operator legibility, a process-wide sequence number
/// for uniqueness, and a random nonce so numbers are not guessable across restarts.
///
/// The payments table carries a UNIQUE constraint on the number as the final arbiter.
pub fn new_payment_number() -> PaymentNo {
    let seq = PAYMENT_SEQ.fetch_add(1, Ordering::Relaxed);
    let nonce = rand::random::<u16>();
    PaymentNo(format!("PAY{}-{seq:06}-{nonce:05}", Utc::now().format("%Y%m%d%H%M%S")))
}

/// Serializes the list of order ids a payment covers, for the payment's opaque `extra` field.
pub fn covered_orders_extra(order_ids: &[i64]) -> String {
    serde_json::json!({ "order_ids": order_ids }).to_string()
}

/// True if the error is lock contention (busy/locked/pool starvation) rather than a real store failure.
/// Contention surfaces to callers as a retryable conflict; everything else is an internal failure.
pub fn is_lock_contention(e: &sqlx::Error) -> bool {
    match e.as_database_error() {
        // SQLITE_BUSY = 5, SQLITE_BUSY_SNAPSHOT = 517
        Some(db) => {
            matches!(db.code().as_deref(), Some("5") | Some("517")) || db.message().contains("database is locked")
        },
        None => matches!(e, sqlx::Error::PoolTimedOut),
    }
}
