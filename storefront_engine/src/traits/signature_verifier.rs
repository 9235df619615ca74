use std::collections::HashMap;

/// Gateway-authenticity check, injected into [`crate::PaymentFlowApi`] at construction.
///
/// The engine treats this as an opaque boolean contract: it refuses to settle a payment from a gateway
/// notification unless `verify` returns `true`. Cryptographic details (RSA, HMAC, whatever the provider
/// mandates) live entirely behind this trait.
#[allow(async_fn_in_trait)]
pub trait SignatureVerifier: Clone {
    async fn verify(&self, provider: &str, params: &HashMap<String, String>) -> bool;
}
