use tracing::{debug, info};

use crate::models::product::Product;

/// Products entered during the current session.
///
/// Stored newest first; [`CatalogService::sorted`] gives the display order.
#[derive(Debug, Default)]
pub struct CatalogService {
    products: Vec<Product>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        debug!(
            "Catalog: adding '{}' at {:.6} per {}",
            product.product_name(),
            product.price_unit_measure(),
            product.unit_measure().base_unit_label()
        );
        self.products.insert(0, product);
    }

    /// Empties the list and returns how many products were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.products.len();
        self.products.clear();
        info!("Catalog cleared ({} products removed)", removed);
        removed
    }

    /// Cheapest unit price first. Equal prices keep their stored order.
    pub fn sorted(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.iter().collect();
        products.sort_by(|a, b| a.price_unit_measure().total_cmp(&b.price_unit_measure()));
        products
    }

    pub fn stored(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
