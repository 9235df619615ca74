use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use sfe_common::Money;
use storefront_engine::{
    db_types::{NewPayment, OrderItem},
    events::{EventHandlers, EventHooks},
    OrderFlowApi,
    PaymentFlowApi,
    SignatureVerifier,
    SqliteDatabase,
};

use crate::support::prepare_env::{prepare_test_env, seed_product};

mod support;

#[derive(Clone)]
struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    async fn verify(&self, _provider: &str, _params: &HashMap<String, String>) -> bool {
        true
    }
}

#[tokio::test]
async fn hooks_fire_once_per_committed_transition() {
    let db: SqliteDatabase = prepare_test_env().await;
    let product = seed_product(&db, "Hook widget", "5.00", 10).await;

    let placed = Arc::new(AtomicUsize::new(0));
    let settled = Arc::new(AtomicUsize::new(0));

    let mut hooks = EventHooks::default();
    let counter = placed.clone();
    hooks.on_order_placed(move |_event| {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let counter = settled.clone();
    hooks.on_payment_settled(move |_event| {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });

    let handlers = EventHandlers::new(16, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let order_api = OrderFlowApi::new(db.clone(), producers.clone());
    order_api.place_batch(1, &[OrderItem::new(product.id, 1), OrderItem::new(product.id, 2)]).await.unwrap();

    let payment_api = PaymentFlowApi::new(db.clone(), AcceptAll, producers);
    let payment = payment_api.create_payment(NewPayment::new(1, Money::from(15), "WECHAT")).await.unwrap();
    assert!(payment_api.mark_paid(&payment.payment_no, "T1").await.unwrap());
    // The duplicate settle must not re-emit.
    assert!(!payment_api.mark_paid(&payment.payment_no, "T1").await.unwrap());

    // Drop the producers so the handlers drain and shut down, then give them a moment.
    drop(order_api);
    drop(payment_api);
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(placed.load(Ordering::SeqCst), 2);
    assert_eq!(settled.load(Ordering::SeqCst), 1);
}
