//! CLI command implementations.

pub mod browse;
pub mod cart;
pub mod theme;
pub mod user;
