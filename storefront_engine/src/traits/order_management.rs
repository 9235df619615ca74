use thiserror::Error;

use crate::{
    db_types::{Order, OrderItem},
    helpers::is_lock_contention,
};

/// Order placement and query contract.
///
/// `process_order_placement` is *the* atomic unit of the engine: stock verification, authoritative pricing,
/// the conditional stock decrement and the order insert for every item in the request happen inside one
/// transaction, which commits once or not at all.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Places every item in `items` for `user_id` as a single all-or-nothing unit.
    ///
    /// For each item, in input order: lock the product row, check stock, compute the total price from the
    /// stored unit price, conditionally decrement stock, insert the order row. The first failing item
    /// aborts and rolls back the entire batch, including items that had already succeeded.
    ///
    /// Locks on the distinct product rows are acquired in ascending product-id order before any item is
    /// processed, so two concurrent batches can never wait on each other in a cycle.
    ///
    /// Returns the created orders in input order.
    async fn process_order_placement(
        &self,
        user_id: i64,
        items: &[OrderItem],
    ) -> Result<Vec<Order>, OrderPlacementError>;

    /// Returns all orders belonging to `user_id`, in store-natural order. Unknown users yield an empty
    /// vector, not an error.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderPlacementError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderPlacementError {
    /// Malformed caller input. Never worth retrying.
    #[error("Invalid order request: {0}")]
    InvalidArgument(String),
    #[error("Product {0} does not exist")]
    ProductNotFound(i64),
    /// Business-rule rejection. Carries the product context so callers can show an actionable message.
    #[error("Product [{name}] has insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { name: String, requested: i64, available: i64 },
    /// Transient. The whole operation is safe to retry; the engine never retries internally.
    #[error("The system is busy. Please retry the order.")]
    ConcurrencyConflict,
    #[error("Internal storage error: {0}")]
    PersistenceFailure(String),
}

impl From<sqlx::Error> for OrderPlacementError {
    fn from(e: sqlx::Error) -> Self {
        if is_lock_contention(&e) {
            OrderPlacementError::ConcurrencyConflict
        } else {
            OrderPlacementError::PersistenceFailure(e.to_string())
        }
    }
}
