//! Shopfront storefront library.
//!
//! Catalog access with offline fallback, dashboard querying, persisted
//! per-user carts, and the session that ties them together. The `shopfront`
//! CLI is a thin layer over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod session;
pub mod state;
pub mod storage;
