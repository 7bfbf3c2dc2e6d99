pub mod catalog_service;
pub mod cart_service;
pub mod form_controller;

pub use catalog_service::*;
pub use cart_service::*;
pub use form_controller::*;
