use thiserror::Error;

use crate::{
    db_types::{NewPayment, Payment, PaymentNo},
    helpers::is_lock_contention,
};

/// Payment record contract.
///
/// The two status transitions are expressed as conditional writes rather than read-modify-write, so they
/// are idempotent by construction: a duplicate request matches zero rows and reports `false`.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement: Clone {
    /// Persists a new `Pending` payment under the given payment number.
    async fn insert_payment(&self, payment_no: PaymentNo, payment: NewPayment) -> Result<Payment, PaymentApiError>;

    async fn fetch_payment_by_no(&self, payment_no: &PaymentNo) -> Result<Option<Payment>, PaymentApiError>;

    /// Applies `Pending → Paid` and records the gateway trade number, as one conditional write.
    ///
    /// Returns `true` only if the write changed a row. An already-settled (or failed, or unknown) payment
    /// returns `false` without error; that is normal idempotent behaviour, not a fault.
    async fn settle_payment(
        &self,
        payment_no: &PaymentNo,
        provider_trade_no: &str,
    ) -> Result<bool, PaymentApiError>;

    /// Applies `Pending → Failed`, same conditional-write shape as [`Self::settle_payment`].
    async fn fail_payment(&self, payment_no: &PaymentNo) -> Result<bool, PaymentApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentApiError {
    #[error("Invalid payment request: {0}")]
    InvalidArgument(String),
    #[error("Payment {0} does not exist")]
    PaymentNotFound(PaymentNo),
    #[error("Cannot insert payment, since it already exists with payment number {0}")]
    PaymentAlreadyExists(PaymentNo),
    #[error("The gateway notification signature is invalid")]
    InvalidSignature,
    #[error("The system is busy. Please retry.")]
    ConcurrencyConflict,
    #[error("Internal storage error: {0}")]
    PersistenceFailure(String),
}

impl From<sqlx::Error> for PaymentApiError {
    fn from(e: sqlx::Error) -> Self {
        if is_lock_contention(&e) {
            PaymentApiError::ConcurrencyConflict
        } else {
            PaymentApiError::PersistenceFailure(e.to_string())
        }
    }
}
