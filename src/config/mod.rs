//! Configuration module for the favorites downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument parsing and merging
//! - Configuration validation

pub mod convention;
pub mod loader;
pub mod validation;

pub use convention::NamingConvention;
pub use loader::{AccountConfig, CacheConfig, Config, OptionsConfig};
pub use validation::validate_config;
