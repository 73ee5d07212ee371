//! # shelfwise-core
//!
//! Core types shared across shelfwise.
//!
//! This crate provides:
//! - Error types
//! - YAML configuration
//! - Product, user, shelf and placement records

/// Configuration loading and validation.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Shared records.
pub mod model;

/// Re-export configuration types.
pub use config::{
    ApiConfig, ColumnNames, Config, GridConfig, StorageConfig, MAX_GRID_COLS, MAX_GRID_ROWS,
};
/// Re-export core error types.
pub use error::{ShelfError, ShelfResult};
/// Re-export shared records.
pub use model::{Product, Shelf, ShelfGridItem, ShelfPlacement, User};
