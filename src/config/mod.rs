//! Configuration module for sheetconv
//!
//! Provides types and parsing for `sheetconv.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::{default_config, load_config, ConfigError};
pub use schema::*;
