use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::store::Store;
use crate::models::unit_measure::{normalized_price, normalized_quantity, NormalizeError, UnitMeasure};

/// A product as entered by the user, with its unit price worked out.
///
/// The derived fields are only ever computed by [`Product::new`]; a product
/// read back from storage goes through the same constructor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", try_from = "ProductRecord")]
pub struct Product {
    product_name: String,
    store_name: Store,
    product_url: String,
    price: f64,
    quantity: f64,
    unit_measure: UnitMeasure,
    quantity_converted: f64,
    price_unit_measure: f64,
}

/// Typed form input. `None` numbers were left empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductForm {
    pub product_name: String,
    pub store_name: Store,
    pub product_url: String,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub unit_measure: UnitMeasure,
}

// persisted shape; derived fields are accepted but recomputed
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    product_name: String,
    store_name: Store,
    #[serde(default)]
    product_url: String,
    price: f64,
    quantity: f64,
    unit_measure: UnitMeasure,
    #[serde(default)]
    #[allow(dead_code)]
    quantity_converted: Option<f64>,
    #[serde(default)]
    #[allow(dead_code)]
    price_unit_measure: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error(transparent)]
    InvalidQuantity(#[from] NormalizeError),
}

pub const REQUIRED: &str = "Required";
pub const NOT_A_NUMBER: &str = "Must be a finite number";

fn required() -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some(REQUIRED.into());
    error
}

fn not_a_number() -> ValidationError {
    let mut error = ValidationError::new("not_a_number");
    error.message = Some(NOT_A_NUMBER.into());
    error
}

fn is_present(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && !v.is_nan())
}

impl Validate for ProductForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.product_name.trim().is_empty() {
            errors.add("product_name", required());
        }
        match self.price {
            price if !is_present(price) => errors.add("price", required()),
            // infinity would be written to storage as null
            Some(price) if !price.is_finite() => errors.add("price", not_a_number()),
            _ => {}
        }
        if !is_present(self.quantity) {
            errors.add("quantity", required());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl ProductForm {
    pub fn new(product_name: impl Into<String>, price: f64, quantity: f64, unit_measure: UnitMeasure) -> Self {
        Self {
            product_name: product_name.into(),
            price: Some(price),
            quantity: Some(quantity),
            unit_measure,
            ..Default::default()
        }
    }

    pub fn with_store(mut self, store: Store) -> Self {
        self.store_name = store;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.product_url = url.into();
        self
    }
}

impl Product {
    pub fn new(form: ProductForm) -> Result<Self, ProductError> {
        form.validate()?;

        let (price, quantity) = match (form.price, form.quantity) {
            (Some(price), Some(quantity)) => (price, quantity),
            // validate() already rejected missing numbers
            _ => return Err(ProductError::ValidationError(ValidationErrors::new())),
        };

        let quantity_converted = normalized_quantity(form.unit_measure, quantity)?;
        let price_unit_measure = normalized_price(form.unit_measure, quantity, price)?;

        Ok(Self {
            product_name: form.product_name,
            store_name: form.store_name,
            product_url: form.product_url,
            price,
            quantity,
            unit_measure: form.unit_measure,
            quantity_converted,
            price_unit_measure,
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn store_name(&self) -> Store {
        self.store_name
    }

    pub fn product_url(&self) -> &str {
        &self.product_url
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn unit_measure(&self) -> UnitMeasure {
        self.unit_measure
    }

    pub fn quantity_converted(&self) -> f64 {
        self.quantity_converted
    }

    pub fn price_unit_measure(&self) -> f64 {
        self.price_unit_measure
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ProductError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Product::new(ProductForm {
            product_name: record.product_name,
            store_name: record.store_name,
            product_url: record.product_url,
            price: Some(record.price),
            quantity: Some(record.quantity),
            unit_measure: record.unit_measure,
        })
    }
}
