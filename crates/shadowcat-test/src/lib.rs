//! Shared test fixtures for shadowcat crates.
//!
//! This crate provides small, hand-checked pools and constraint tables.
//! It depends only on `shadowcat-core` so every other crate can use it as a
//! dev-dependency.
//!
//! - [`pool`] - item pool and passage pool tables with their column masks
//! - [`constraints`] - a constraint table exercising both filter kinds
//! - [`snapshots`] - per-step snapshots over the fixture pools
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! shadowcat-test = { workspace = true }
//! ```

pub mod constraints;
pub mod pool;
pub mod snapshots;

pub use constraints::constraint_table;
pub use pool::{item_pool, item_pool_mask, passage_pool, passage_pool_mask};
pub use snapshots::step_snapshots;
