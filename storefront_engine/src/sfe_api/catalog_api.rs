use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewProduct, Product},
    traits::{CatalogError, InventoryManagement},
};

/// Read-mostly product surface. Catalog HTTP endpoints are out of scope; this is the engine side those
/// wrappers call, plus the out-of-band product creation path used to seed inventory.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B>
where B: InventoryManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.db.fetch_all_products().await
    }

    /// `None` for non-positive ids as well as unknown ones.
    pub async fn product_by_id(&self, product_id: i64) -> Result<Option<Product>, CatalogError> {
        if product_id <= 0 {
            warn!("🗂️ Product lookup with invalid id {product_id}");
            return Ok(None);
        }
        self.db.fetch_product(product_id).await
    }

    pub async fn add_product(&self, product: NewProduct) -> Result<Product, CatalogError> {
        if product.product_name.trim().is_empty() {
            return Err(CatalogError::InvalidProduct("product name must not be empty".to_string()));
        }
        if product.price.is_negative() {
            return Err(CatalogError::InvalidProduct(format!("price must not be negative, got {}", product.price)));
        }
        if product.stock < 0 {
            return Err(CatalogError::InvalidProduct(format!("stock must not be negative, got {}", product.stock)));
        }
        let product = self.db.add_product(product).await?;
        info!("🗂️ Product [{}] added with id {} and stock {}", product.product_name, product.id, product.stock);
        Ok(product)
    }
}
