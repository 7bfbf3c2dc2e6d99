use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::product::Product;
use crate::storage::local_storage::{KeyValueStore, StorageError};

/// Storage key the cart list lives under.
pub const CART_STORAGE_KEY: &str = "productsToBuyList";

#[derive(Error, Debug)]
pub enum CartRepositoryError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Stored cart could not be decoded: {0}")]
    DecodeError(#[source] serde_json::Error),

    #[error("Cart could not be encoded: {0}")]
    EncodeError(#[source] serde_json::Error),
}

/// Cart repository trait for data access operations
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<Vec<Product>>, CartRepositoryError>;
    /// Overwrites whatever was stored with the full list.
    async fn save(&self, products: &[Product]) -> Result<(), CartRepositoryError>;
}

/// Keeps the cart as one JSON array string under [`CART_STORAGE_KEY`].
pub struct LocalStorageCartRepository {
    storage: Arc<dyn KeyValueStore>,
}

impl LocalStorageCartRepository {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CartRepository for LocalStorageCartRepository {
    async fn load(&self) -> Result<Option<Vec<Product>>, CartRepositoryError> {
        let Some(json_data) = self.storage.get_item(CART_STORAGE_KEY).await? else {
            debug!("No stored cart under '{}'", CART_STORAGE_KEY);
            return Ok(None);
        };

        let products: Vec<Product> =
            serde_json::from_str(&json_data).map_err(CartRepositoryError::DecodeError)?;
        debug!("Loaded {} stored cart products", products.len());
        Ok(Some(products))
    }

    async fn save(&self, products: &[Product]) -> Result<(), CartRepositoryError> {
        let json_data = serde_json::to_string(products).map_err(CartRepositoryError::EncodeError)?;
        self.storage.set_item(CART_STORAGE_KEY, &json_data).await?;
        debug!("Saved {} cart products", products.len());
        Ok(())
    }
}
