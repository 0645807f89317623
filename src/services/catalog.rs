use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::product::{seed_products, Product, ProductId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Product {0} not found")]
    NotFound(ProductId),
}

/// In-memory product table. Stock only ever goes down while the process runs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|product| (product.id, product))
            .collect();
        Self { products }
    }

    pub fn seeded() -> Self {
        let catalog = Self::new(seed_products());
        info!("Catalog loaded with {} products", catalog.len());
        catalog
    }

    pub fn lookup(&self, product_id: ProductId) -> Result<&Product, CatalogError> {
        debug!("Looking up product {}", product_id);
        self.products
            .get(&product_id)
            .ok_or(CatalogError::NotFound(product_id))
    }

    /// Removes `quantity` units from the product's stock and returns what is left.
    ///
    /// The caller must already have checked `quantity` against the available stock;
    /// asking for more than is available is a contract violation and panics.
    pub fn decrement_stock(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u32, CatalogError> {
        let product = self
            .products
            .get_mut(&product_id)
            .ok_or(CatalogError::NotFound(product_id))?;

        product.available_quantity -= quantity;

        info!(
            "Stock for product {} ({}) decremented by {}, {} left",
            product.id, product.name, quantity, product.available_quantity
        );
        if product.is_sold_out() {
            warn!("Product {} ({}) is sold out", product.id, product.name);
        }
        Ok(product.available_quantity)
    }

    /// Products in id order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
