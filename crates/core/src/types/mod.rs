//! Core types for Threadline.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod size;

pub use id::{ProductId, ProductIdError};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use size::{Size, SizeParseError};
