//! `SqliteDatabase` is the concrete SQLite backend of the storefront engine.
//!
//! Each mutating trait method is one atomic unit of work: it opens a transaction on the pool, composes
//! the free query functions from [`super::db`], and commits once. Any early return (`?`) drops the
//! transaction, and sqlx rolls it back — no partial stock decrement or orphan order ever becomes visible.

use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{db_url, new_pool, orders, payments, products};
use crate::{
    db_types::{NewOrder, NewPayment, NewProduct, Order, OrderItem, Payment, PaymentNo, Product},
    traits::{
        CatalogError,
        InventoryManagement,
        OrderManagement,
        OrderPlacementError,
        PaymentApiError,
        PaymentManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object against the configured URL.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl OrderManagement for SqliteDatabase {
    async fn process_order_placement(
        &self,
        user_id: i64,
        items: &[OrderItem],
    ) -> Result<Vec<Order>, OrderPlacementError> {
        let mut tx = self.pool.begin().await?;
        // Lock the distinct product rows in ascending id order so that two concurrent batches can never
        // hold locks in conflicting order, whatever order their items arrived in.
        let mut product_ids: Vec<i64> = items.iter().map(|item| item.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        for product_id in product_ids {
            products::lock_for_update(product_id, &mut tx)
                .await?
                .ok_or(OrderPlacementError::ProductNotFound(product_id))?;
        }
        let mut placed = Vec::with_capacity(items.len());
        for item in items {
            let order = process_item(user_id, item, &mut tx).await?;
            placed.push(order);
        }
        tx.commit().await?;
        debug!("🗃️ Placement for user {user_id} committed: {} order(s)", placed.len());
        Ok(placed)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderPlacementError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }
}

/// One item of the placement flow, inside the enclosing transaction:
/// stock check → authoritative pricing → conditional decrement → order insert.
///
/// The rows are already locked, so the read here cannot go stale; the conditional decrement is the
/// independent second layer that holds even if the locking discipline is ever broken.
async fn process_item(
    user_id: i64,
    item: &OrderItem,
    tx: &mut sqlx::SqliteConnection,
) -> Result<Order, OrderPlacementError> {
    let product = products::fetch_product(item.product_id, &mut *tx)
        .await?
        .ok_or(OrderPlacementError::ProductNotFound(item.product_id))?;
    if product.stock < item.quantity {
        debug!(
            "🗃️ Rejecting order for product {}: requested {}, available {}",
            product.id, item.quantity, product.stock
        );
        return Err(OrderPlacementError::InsufficientStock {
            name: product.product_name,
            requested: item.quantity,
            available: product.stock,
        });
    }
    let total_price = product.price * item.quantity;
    let affected = products::decrement_stock(item.product_id, item.quantity, &mut *tx).await?;
    if affected == 0 {
        // The row is locked and the stock check just passed, so this means the locking discipline has a
        // gap somewhere. The conditional write caught it; fail the placement as a retryable conflict.
        error!("🗃️ Conditional stock decrement lost a race on product {}", item.product_id);
        return Err(OrderPlacementError::ConcurrencyConflict);
    }
    let order =
        orders::insert_order(NewOrder::new(user_id, item.product_id, item.quantity, total_price), &mut *tx).await?;
    trace!("🗃️ Order {} staged: product {} x{} = {}", order.id, order.product_id, order.quantity, order.total_price);
    Ok(order)
}

impl InventoryManagement for SqliteDatabase {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_all_products(&mut conn).await?;
        Ok(products)
    }

    async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::insert_product(product, &mut conn).await?;
        debug!("🗃️ Product [{}] saved with id {}", product.product_name, product.id);
        Ok(product)
    }
}

impl PaymentManagement for SqliteDatabase {
    async fn insert_payment(&self, payment_no: PaymentNo, payment: NewPayment) -> Result<Payment, PaymentApiError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::insert_payment(payment_no, payment, &mut conn).await?;
        debug!("🗃️ Payment {} saved with id {}", payment.payment_no, payment.id);
        Ok(payment)
    }

    async fn fetch_payment_by_no(&self, payment_no: &PaymentNo) -> Result<Option<Payment>, PaymentApiError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::fetch_by_payment_no(payment_no, &mut conn).await?;
        Ok(payment)
    }

    async fn settle_payment(
        &self,
        payment_no: &PaymentNo,
        provider_trade_no: &str,
    ) -> Result<bool, PaymentApiError> {
        let mut conn = self.pool.acquire().await?;
        let settled = payments::settle(payment_no, provider_trade_no, &mut conn).await?;
        if settled {
            debug!("🗃️ Payment {payment_no} transitioned to Paid");
        }
        Ok(settled)
    }

    async fn fail_payment(&self, payment_no: &PaymentNo) -> Result<bool, PaymentApiError> {
        let mut conn = self.pool.acquire().await?;
        let failed = payments::mark_failed(payment_no, &mut conn).await?;
        if failed {
            debug!("🗃️ Payment {payment_no} transitioned to Failed");
        }
        Ok(failed)
    }
}
