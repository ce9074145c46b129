//! Parsing and validation of `murmur.toml` service configuration files.
//!
//! This crate reads the service configuration and produces a strongly-typed
//! [`ServiceConfig`] with built-in request defaults filled in and every request
//! option checked to be a scalar the speech backend can accept.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::resolve_service;
pub use types::*;
