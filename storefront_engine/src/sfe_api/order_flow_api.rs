use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderItem},
    events::{EventProducers, OrderPlacedEvent},
    traits::{OrderManagement, OrderPlacementError},
};

/// `OrderFlowApi` is the primary API for placing orders against the shared inventory.
///
/// It validates caller input, delegates the atomic lock/check/price/decrement/insert unit to the backend,
/// and publishes an [`OrderPlacedEvent`] for every order that committed.
pub struct OrderFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Places a single purchase of `quantity` units of `product_id` for `user_id`.
    ///
    /// Fails with [`OrderPlacementError::InvalidArgument`] before touching the store if any identifier or
    /// the quantity is non-positive. Otherwise the backend performs the placement as one atomic unit; see
    /// [`OrderManagement::process_order_placement`] for the failure taxonomy.
    pub async fn place_single(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<Order, OrderPlacementError> {
        let items = [OrderItem::new(product_id, quantity)];
        let mut orders = self.place_batch(user_id, &items).await?;
        orders.pop().ok_or_else(|| {
            OrderPlacementError::PersistenceFailure("placement committed but returned no order".to_string())
        })
    }

    /// Places every item of the batch as one all-or-nothing unit.
    ///
    /// The first failing item aborts and rolls back the whole batch, even if earlier items individually
    /// succeeded. On success the created orders are returned in input order.
    pub async fn place_batch(
        &self,
        user_id: i64,
        items: &[OrderItem],
    ) -> Result<Vec<Order>, OrderPlacementError> {
        validate_placement(user_id, items)?;
        debug!("🔄️📦️ Placing batch of {} item(s) for user {user_id}", items.len());
        let orders = self.db.process_order_placement(user_id, items).await?;
        self.call_order_placed_hook(&orders).await;
        debug!("🔄️📦️ Batch for user {user_id} committed. {} order(s) created", orders.len());
        Ok(orders)
    }

    /// Returns all orders for `user_id`. Non-positive or unknown user ids yield an empty vector, never an
    /// error.
    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderPlacementError> {
        if user_id <= 0 {
            warn!("🔄️📦️ Order query for invalid user id {user_id}");
            return Ok(Vec::new());
        }
        self.db.fetch_orders_for_user(user_id).await
    }

    async fn call_order_placed_hook(&self, orders: &[Order]) {
        for producer in &self.producers.order_placed_producer {
            for order in orders {
                producer.publish_event(OrderPlacedEvent::new(order.clone())).await;
            }
        }
    }
}

fn validate_placement(user_id: i64, items: &[OrderItem]) -> Result<(), OrderPlacementError> {
    if user_id <= 0 {
        return Err(OrderPlacementError::InvalidArgument(format!("user id must be positive, got {user_id}")));
    }
    if items.is_empty() {
        return Err(OrderPlacementError::InvalidArgument("the item list must not be empty".to_string()));
    }
    for item in items {
        if item.product_id <= 0 {
            return Err(OrderPlacementError::InvalidArgument(format!(
                "product id must be positive, got {}",
                item.product_id
            )));
        }
        if item.quantity <= 0 {
            return Err(OrderPlacementError::InvalidArgument(format!(
                "quantity must be positive, got {} for product {}",
                item.quantity, item.product_id
            )));
        }
    }
    Ok(())
}
