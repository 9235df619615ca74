use crate::db_types::{Order, Payment};

/// Emitted once per order created by a successful placement, after the transaction has committed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlacedEvent {
    pub order: Order,
}

impl OrderPlacedEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

/// Emitted when a payment actually transitions to `Paid`. Duplicate notifications do not re-emit.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSettledEvent {
    pub payment: Payment,
}

impl PaymentSettledEvent {
    pub fn new(payment: Payment) -> Self {
        Self { payment }
    }
}
