//! # argforms-core
//!
//! Core types, settings, and error types for argforms.
//! This crate knows nothing about forms or argument parsing and provides the
//! foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The typed [`Value`] produced by field coercion
//! - [`utils`] - Utility types (`MultiValueDict`)
//! - [`settings`] - Runtime settings
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{FormError, FormResult, ValidationError};
pub use settings::Settings;
pub use value::Value;
