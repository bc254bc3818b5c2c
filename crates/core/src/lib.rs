//! Threadline Core - Shared types and cart state.
//!
//! This crate provides the domain used by the storefront:
//! - `types` - Product ids, prices, sizes, and catalog products
//! - `cart` - The per-visitor `CartStore` and its snapshots
//!
//! # Architecture
//!
//! The core crate contains only types and state transitions - no I/O, no HTTP,
//! no sessions. This keeps it lightweight and easy to test.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
