pub mod product;
pub mod store;
pub mod unit_measure;
