use std::{collections::HashMap, fmt::Debug};

use log::*;
use sfe_common::Money;

use crate::{
    db_types::{NewPayment, Payment, PaymentNo},
    events::{EventProducers, PaymentSettledEvent},
    helpers::new_payment_number,
    traits::{PaymentApiError, PaymentManagement, SignatureVerifier},
};

/// Parameter keys a gateway notification must carry. Real gateways use provider-specific names; the
/// out-of-scope transport layer normalizes them to these before calling in.
pub const PARAM_PAYMENT_NO: &str = "payment_no";
pub const PARAM_TRADE_NO: &str = "trade_no";

/// `PaymentFlowApi` handles payment intents and the idempotent settlement state machine.
///
/// The signature verifier is injected at construction; settlement from a gateway notification is refused
/// unless the verifier accepts the request.
pub struct PaymentFlowApi<B, V> {
    db: B,
    verifier: V,
    producers: EventProducers,
}

impl<B, V> Debug for PaymentFlowApi<B, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<B, V> PaymentFlowApi<B, V> {
    pub fn new(db: B, verifier: V, producers: EventProducers) -> Self {
        Self { db, verifier, producers }
    }
}

impl<B, V> PaymentFlowApi<B, V>
where
    B: PaymentManagement,
    V: SignatureVerifier,
{
    /// Opens a payment intent: generates a fresh payment number and persists a `Pending` record.
    pub async fn create_payment(&self, payment: NewPayment) -> Result<Payment, PaymentApiError> {
        validate_new_payment(&payment)?;
        let payment_no = new_payment_number();
        let payment = self.db.insert_payment(payment_no, payment).await?;
        debug!("🔄️💳️ Payment {} created as {} for user {}", payment.payment_no, payment.status, payment.user_id);
        Ok(payment)
    }

    pub async fn get_by_payment_no(&self, payment_no: &PaymentNo) -> Result<Option<Payment>, PaymentApiError> {
        self.db.fetch_payment_by_no(payment_no).await
    }

    /// Applies the `Pending → Paid` transition and records the gateway trade number.
    ///
    /// Returns `true` only if this call performed the transition. A repeat call — the classic duplicate
    /// gateway notification — returns `false` without error and leaves the first trade number in place.
    ///
    /// Callers handling raw gateway traffic should go through [`Self::process_gateway_notification`],
    /// which verifies authenticity first.
    pub async fn mark_paid(
        &self,
        payment_no: &PaymentNo,
        provider_trade_no: &str,
    ) -> Result<bool, PaymentApiError> {
        let settled = self.db.settle_payment(payment_no, provider_trade_no).await?;
        if settled {
            debug!("🔄️💳️ Payment {payment_no} settled with trade no {provider_trade_no}");
            self.call_payment_settled_hook(payment_no).await;
        } else {
            debug!("🔄️💳️ Payment {payment_no} was not Pending; settle request ignored");
        }
        Ok(settled)
    }

    /// Applies the `Pending → Failed` transition. Same idempotent contract as [`Self::mark_paid`].
    pub async fn mark_failed(&self, payment_no: &PaymentNo) -> Result<bool, PaymentApiError> {
        let failed = self.db.fail_payment(payment_no).await?;
        if failed {
            debug!("🔄️💳️ Payment {payment_no} marked as failed");
        }
        Ok(failed)
    }

    /// Delegates to the injected provider-specific verifier.
    pub async fn verify_signature(&self, provider: &str, params: &HashMap<String, String>) -> bool {
        self.verifier.verify(provider, params).await
    }

    /// Full gateway-callback flow: verify authenticity, resolve the payment, settle.
    ///
    /// * An unverifiable request is refused with [`PaymentApiError::InvalidSignature`]; nothing is read or
    ///   written.
    /// * A notification for an unknown payment number fails with [`PaymentApiError::PaymentNotFound`].
    /// * Otherwise returns the [`Self::mark_paid`] outcome: `true` if this notification performed the
    ///   transition, `false` if it was a duplicate.
    pub async fn process_gateway_notification(
        &self,
        provider: &str,
        params: &HashMap<String, String>,
    ) -> Result<bool, PaymentApiError> {
        if !self.verifier.verify(provider, params).await {
            warn!("🔄️💳️ Rejecting {provider} notification with invalid signature");
            return Err(PaymentApiError::InvalidSignature);
        }
        let payment_no = required_param(params, PARAM_PAYMENT_NO)?;
        let trade_no = required_param(params, PARAM_TRADE_NO)?;
        let payment_no = PaymentNo(payment_no.to_string());
        self.db
            .fetch_payment_by_no(&payment_no)
            .await?
            .ok_or_else(|| PaymentApiError::PaymentNotFound(payment_no.clone()))?;
        self.mark_paid(&payment_no, trade_no).await
    }

    async fn call_payment_settled_hook(&self, payment_no: &PaymentNo) {
        if self.producers.payment_settled_producer.is_empty() {
            return;
        }
        match self.db.fetch_payment_by_no(payment_no).await {
            Ok(Some(payment)) => {
                for producer in &self.producers.payment_settled_producer {
                    producer.publish_event(PaymentSettledEvent::new(payment.clone())).await;
                }
            },
            Ok(None) => error!("🔄️💳️ Payment {payment_no} vanished right after settling"),
            Err(e) => error!("🔄️💳️ Could not load settled payment {payment_no} for event hooks: {e}"),
        }
    }
}

fn validate_new_payment(payment: &NewPayment) -> Result<(), PaymentApiError> {
    if payment.user_id <= 0 {
        return Err(PaymentApiError::InvalidArgument(format!(
            "user id must be positive, got {}",
            payment.user_id
        )));
    }
    if payment.amount <= Money::zero() {
        return Err(PaymentApiError::InvalidArgument(format!(
            "amount must be positive, got {}",
            payment.amount
        )));
    }
    if payment.provider.trim().is_empty() {
        return Err(PaymentApiError::InvalidArgument("provider must not be empty".to_string()));
    }
    Ok(())
}

fn required_param<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, PaymentApiError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| PaymentApiError::InvalidArgument(format!("notification is missing the {key} parameter")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_payment_validation() {
        let ok = NewPayment::new(1, Money::from(10), "ALIPAY");
        assert!(validate_new_payment(&ok).is_ok());
        let bad_user = NewPayment::new(0, Money::from(10), "ALIPAY");
        assert!(matches!(validate_new_payment(&bad_user), Err(PaymentApiError::InvalidArgument(_))));
        let bad_amount = NewPayment::new(1, Money::zero(), "ALIPAY");
        assert!(matches!(validate_new_payment(&bad_amount), Err(PaymentApiError::InvalidArgument(_))));
        let bad_provider = NewPayment::new(1, Money::from(10), "  ");
        assert!(matches!(validate_new_payment(&bad_provider), Err(PaymentApiError::InvalidArgument(_))));
    }
}
