use chrono::Utc;
use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewProduct, Product};

/// Locked read of a product row: the row stays exclusively held until the enclosing transaction commits
/// or rolls back.
///
/// SQLite has no `SELECT ... FOR UPDATE`. A no-op write on the row takes the transaction's write lock
/// before the read, so no competing transaction can observe-then-overwrite this row's stock until we
/// finish. Waits are bounded by the connection's busy timeout. Coarser than a true row lock, but the
/// guarantee the callers rely on is the same.
pub async fn lock_for_update(
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query("UPDATE products SET updated_at = updated_at WHERE id = $1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    trace!("🗃️ Holding write lock for product {product_id}");
    fetch_product(product_id, conn).await
}

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

pub async fn fetch_all_products(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
    let products = sqlx::query_as("SELECT * FROM products ORDER BY id").fetch_all(conn).await?;
    Ok(products)
}

pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let now = Utc::now();
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (product_name, price, stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(product.product_name)
    .bind(product.price)
    .bind(product.stock)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

/// The conditional stock decrement: takes effect only while `stock >= quantity` still holds, and reports
/// the affected-row count. 0 means the race was lost or stock is short — the caller must treat the
/// enclosing placement as failed.
///
/// This is deliberately independent of [`lock_for_update`]; either layer alone prevents overselling.
pub async fn decrement_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE products SET stock = stock - $1, updated_at = $2
            WHERE id = $3 AND stock >= $1
        "#,
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(product_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
