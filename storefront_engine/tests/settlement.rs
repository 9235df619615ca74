use std::collections::HashMap;

use sfe_common::Money;
use storefront_engine::{
    db_types::{NewPayment, PaymentNo, PaymentStatus},
    events::EventProducers,
    helpers::covered_orders_extra,
    PaymentApiError,
    PaymentFlowApi,
    SignatureVerifier,
    SqliteDatabase,
};

use crate::support::prepare_env::prepare_test_env;

mod support;

/// Test double for the gateway verifier: accepts or rejects everything.
#[derive(Clone)]
struct StaticVerifier(bool);

impl SignatureVerifier for StaticVerifier {
    async fn verify(&self, _provider: &str, _params: &HashMap<String, String>) -> bool {
        self.0
    }
}

fn payment_api(db: &SqliteDatabase, accept: bool) -> PaymentFlowApi<SqliteDatabase, StaticVerifier> {
    PaymentFlowApi::new(db.clone(), StaticVerifier(accept), EventProducers::default())
}

async fn open_payment(api: &PaymentFlowApi<SqliteDatabase, StaticVerifier>) -> PaymentNo {
    let request = NewPayment::new(1, Money::from(100), "ALIPAY")
        .with_urls("https://shop.example/return", "https://shop.example/notify")
        .with_extra(covered_orders_extra(&[11, 12]));
    let payment = api.create_payment(request).await.unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.provider_trade_no.is_none());
    payment.payment_no
}

#[tokio::test]
async fn create_and_fetch_round_trip() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);
    let payment_no = open_payment(&api).await;

    let payment = api.get_by_payment_no(&payment_no).await.unwrap().unwrap();
    assert_eq!(payment.payment_no, payment_no);
    assert_eq!(payment.amount, Money::from(100));
    assert_eq!(payment.currency, "USD");
    assert_eq!(payment.provider, "ALIPAY");
    assert_eq!(payment.extra.as_deref(), Some(covered_orders_extra(&[11, 12]).as_str()));

    let missing = api.get_by_payment_no(&PaymentNo("PAY-nope".to_string())).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn settlement_is_idempotent() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);
    let payment_no = open_payment(&api).await;

    // First notification settles.
    assert!(api.mark_paid(&payment_no, "TRADE1").await.unwrap());
    let payment = api.get_by_payment_no(&payment_no).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.provider_trade_no.as_deref(), Some("TRADE1"));

    // The duplicate — same or different trade number — is a silent no-op.
    assert!(!api.mark_paid(&payment_no, "TRADE1").await.unwrap());
    assert!(!api.mark_paid(&payment_no, "TRADE2").await.unwrap());
    let payment = api.get_by_payment_no(&payment_no).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.provider_trade_no.as_deref(), Some("TRADE1"));
}

#[tokio::test]
async fn settling_an_unknown_payment_changes_nothing() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);
    let settled = api.mark_paid(&PaymentNo("PAY-unknown".to_string()), "TRADE1").await.unwrap();
    assert!(!settled);
}

#[tokio::test]
async fn notification_flow_verifies_then_settles() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);
    let payment_no = open_payment(&api).await;

    let mut params = HashMap::new();
    params.insert("payment_no".to_string(), payment_no.to_string());
    params.insert("trade_no".to_string(), "GW-778899".to_string());

    assert!(api.process_gateway_notification("ALIPAY", &params).await.unwrap());
    // Replayed notification: verified, but the transition already happened.
    assert!(!api.process_gateway_notification("ALIPAY", &params).await.unwrap());

    let payment = api.get_by_payment_no(&payment_no).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.provider_trade_no.as_deref(), Some("GW-778899"));
}

#[tokio::test]
async fn unverified_notifications_are_refused() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, false);
    let payment_no = open_payment(&api).await;

    let mut params = HashMap::new();
    params.insert("payment_no".to_string(), payment_no.to_string());
    params.insert("trade_no".to_string(), "FORGED".to_string());

    let err = api.process_gateway_notification("ALIPAY", &params).await.unwrap_err();
    assert!(matches!(err, PaymentApiError::InvalidSignature));

    // Nothing moved: still pending, no trade number recorded.
    let payment = api.get_by_payment_no(&payment_no).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(payment.provider_trade_no.is_none());
}

#[tokio::test]
async fn notification_for_unknown_payment_is_an_error() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);

    let mut params = HashMap::new();
    params.insert("payment_no".to_string(), "PAY-unknown".to_string());
    params.insert("trade_no".to_string(), "GW-1".to_string());

    let err = api.process_gateway_notification("ALIPAY", &params).await.unwrap_err();
    assert!(matches!(err, PaymentApiError::PaymentNotFound(_)));
}

#[tokio::test]
async fn notification_missing_parameters_is_rejected() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);

    let mut params = HashMap::new();
    params.insert("trade_no".to_string(), "GW-1".to_string());
    let err = api.process_gateway_notification("ALIPAY", &params).await.unwrap_err();
    assert!(matches!(err, PaymentApiError::InvalidArgument(_)));
}

#[tokio::test]
async fn failed_payments_are_terminal() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);
    let payment_no = open_payment(&api).await;

    assert!(api.mark_failed(&payment_no).await.unwrap());
    assert!(!api.mark_failed(&payment_no).await.unwrap());
    // A failed payment can never become paid.
    assert!(!api.mark_paid(&payment_no, "TRADE-LATE").await.unwrap());

    let payment = api.get_by_payment_no(&payment_no).await.unwrap().unwrap();
    assert_eq!(payment.status, PaymentStatus::Failed);
    assert!(payment.provider_trade_no.is_none());
}

#[tokio::test]
async fn invalid_payment_requests_are_rejected() {
    let db = prepare_test_env().await;
    let api = payment_api(&db, true);
    let err = api.create_payment(NewPayment::new(0, Money::from(10), "ALIPAY")).await.unwrap_err();
    assert!(matches!(err, PaymentApiError::InvalidArgument(_)));
    let err = api.create_payment(NewPayment::new(1, Money::from(-5), "ALIPAY")).await.unwrap_err();
    assert!(matches!(err, PaymentApiError::InvalidArgument(_)));
}
