//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all Shopfront components:
//! - `storefront` - Catalog client, cart store and session state
//! - `cli` - Terminal front-end for browsing and ordering
//!
//! # Architecture
//!
//! The core crate contains only types and their arithmetic - no I/O, no
//! storage, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, products, carts, users and query state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
