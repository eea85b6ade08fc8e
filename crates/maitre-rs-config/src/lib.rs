//! Configuration models and loading for the ordering assistant.
//!
//! This crate owns the config schema, validation, and the JSON5 file
//! loader used by SDK callers.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// File-based config loading helpers.
pub use loader::{default_user_config_path, load_from_path, load_from_str, load_or_default};
/// Configuration schema models.
pub use model::*;
