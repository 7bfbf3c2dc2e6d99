use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::product::Product;
use crate::storage::repositories::{CartRepository, CartRepositoryError};

#[derive(Error, Debug)]
pub enum CartServiceError {
    #[error("Persistence error: {0}")]
    PersistenceError(#[from] CartRepositoryError),
}

/// Products chosen for buying, newest first, mirrored to storage.
pub struct CartService {
    cart_repository: Arc<dyn CartRepository>,
    products: Vec<Product>,
}

impl CartService {
    pub fn new(cart_repository: Arc<dyn CartRepository>) -> Self {
        Self {
            cart_repository,
            products: Vec::new(),
        }
    }

    /// Replaces the in-memory list with the stored one.
    ///
    /// On failure the cart is left empty.
    pub async fn load(&mut self) -> Result<usize, CartServiceError> {
        self.products.clear();

        match self.cart_repository.load().await {
            Ok(Some(products)) => {
                self.products = products;
                info!("Cart loaded with {} products", self.products.len());
                Ok(self.products.len())
            }
            Ok(None) => {
                info!("No stored cart, starting empty");
                Ok(0)
            }
            Err(e) => {
                warn!("Failed to load stored cart: {}", e);
                Err(CartServiceError::PersistenceError(e))
            }
        }
    }

    /// Prepends `product` and writes the whole list back.
    ///
    /// The product stays in the in-memory cart even when the write fails.
    pub async fn add(&mut self, product: Product) -> Result<(), CartServiceError> {
        info!("Adding '{}' to cart", product.product_name());
        self.products.insert(0, product);

        self.cart_repository.save(&self.products).await.map_err(|e| {
            error!("Failed to persist cart: {}", e);
            CartServiceError::PersistenceError(e)
        })
    }

    pub fn items(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
