use thiserror::Error;

use crate::db_types::{NewProduct, Product};

/// Product catalog contract.
///
/// Products are created out of band (catalog management) and never deleted. Stock is *not* mutable through
/// this trait; the only writer of stock is the conditional decrement inside the placement transaction.
#[allow(async_fn_in_trait)]
pub trait InventoryManagement: Clone {
    /// Fetches a product by id. Plain read; takes no lock.
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, CatalogError>;

    /// Fetches every product, in id order.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Inserts a new product and returns the persisted record with its assigned id.
    async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Internal storage error: {0}")]
    PersistenceFailure(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::PersistenceFailure(e.to_string())
    }
}
