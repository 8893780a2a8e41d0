//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod query;
pub mod user;

pub use cart::{Cart, CartCollection, CartLine};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use query::{
    DEFAULT_PAGE_SIZE, DashboardFilters, PaginationModel, ParseSortFieldError, QueryState,
    SortDirection, SortField, SortModel,
};
pub use user::User;
