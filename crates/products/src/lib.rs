//! Products domain module.
//!
//! Defines what a valid product is and how it converts to and from its wire
//! representation. Pure domain logic (no IO, no HTTP, no storage).

pub mod price;
pub mod product;
pub mod wire;

pub use catalog_core::{Entity, ProductId, ValidationError, ValidationResult};
pub use price::{PRICE_PRECISION, PRICE_SCALE, Price};
pub use product::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN, Product};
