use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewOrder, Order};

/// Inserts a new order row. Not atomic on its own: the placement flow embeds this call in the same
/// transaction as the stock decrement, so an order row can never exist without its decrement.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, product_id, quantity, total_price, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(order.product_id)
    .bind(order.quantity)
    .bind(order.total_price)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order {} inserted for user {} (product {}, qty {})", order.id, order.user_id, order.product_id, order.quantity);
    Ok(order)
}

pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1").bind(user_id).fetch_all(conn).await?;
    Ok(orders)
}
