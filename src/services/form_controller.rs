use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::ValidationErrors;

use crate::{
    models::{
        product::{Product, ProductError, ProductForm},
        store::Store,
        unit_measure::{NormalizeError, UnitMeasure},
    },
    services::{CartService, CartServiceError, CatalogService},
    storage::repositories::CartRepository,
};

#[derive(Error, Debug)]
pub enum FormControllerError {
    #[error("Validation error: {0}")]
    ValidationError(ValidationErrors),

    #[error(transparent)]
    InvalidQuantity(NormalizeError),

    #[error(transparent)]
    PersistenceError(#[from] CartServiceError),
}

impl From<ProductError> for FormControllerError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::ValidationError(errors) => FormControllerError::ValidationError(errors),
            ProductError::InvalidQuantity(e) => FormControllerError::InvalidQuantity(e),
        }
    }
}

/// Last submitted name and unit, used to prefill the next form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastEntry {
    pub product_name: Option<String>,
    pub unit_measure: Option<UnitMeasure>,
}

#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    Idle,
    /// The last submit was refused; the values are kept for another try.
    Rejected { form: ProductForm, reason: String },
}

/// Owns everything the page shows: the form, both lists and the prefill memory.
pub struct FormController {
    catalog: CatalogService,
    cart: CartService,
    last_entry: LastEntry,
    state: FormState,
}

impl FormController {
    pub fn new(cart_repository: Arc<dyn CartRepository>) -> Self {
        Self {
            catalog: CatalogService::new(),
            cart: CartService::new(cart_repository),
            last_entry: LastEntry::default(),
            state: FormState::Idle,
        }
    }

    pub async fn load_cart(&mut self) -> Result<usize, FormControllerError> {
        Ok(self.cart.load().await?)
    }

    /// A fresh form, prefilled from the last accepted entry.
    pub fn form_defaults(&self) -> ProductForm {
        ProductForm {
            product_name: self.last_entry.product_name.clone().unwrap_or_default(),
            store_name: Store::default(),
            product_url: String::new(),
            price: None,
            quantity: None,
            unit_measure: self.last_entry.unit_measure.unwrap_or_default(),
        }
    }

    pub fn submit(&mut self, form: ProductForm) -> Result<Product, FormControllerError> {
        debug!("Validating submitted product '{}'", form.product_name);

        let product = match Product::new(form.clone()) {
            Ok(product) => product,
            Err(e) => {
                let error = FormControllerError::from(e);
                warn!("Product rejected: {}", error);
                self.state = FormState::Rejected {
                    form,
                    reason: error.to_string(),
                };
                return Err(error);
            }
        };

        self.last_entry = LastEntry {
            product_name: Some(product.product_name().to_string()),
            unit_measure: Some(product.unit_measure()),
        };
        self.catalog.add(product.clone());
        self.state = FormState::Idle;

        info!(
            "Product '{}' added at {:.4} per {}",
            product.product_name(),
            product.price_unit_measure(),
            product.unit_measure().base_unit_label()
        );
        Ok(product)
    }

    /// Empties the catalog and forgets the prefill values.
    pub fn clear(&mut self) -> usize {
        self.last_entry = LastEntry::default();
        self.state = FormState::Idle;
        self.catalog.clear()
    }

    /// Copies a catalog product into the cart.
    ///
    /// The product stays in the catalog. A failed write still leaves it in
    /// the in-memory cart.
    pub async fn move_to_cart(&mut self, product: Product) -> Result<Product, FormControllerError> {
        self.cart.add(product.clone()).await?;
        Ok(product)
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn cart(&self) -> &CartService {
        &self.cart
    }

    pub fn last_entry(&self) -> &LastEntry {
        &self.last_entry
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }
}
