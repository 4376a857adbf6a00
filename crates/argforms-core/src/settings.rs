//! Runtime settings for argforms programs.
//!
//! [`Settings`] holds the knobs a form-driven command-line program exposes
//! outside of its own arguments: log verbosity and output styling. Use
//! [`settings_loader`](crate::settings_loader) to read them from a file and
//! the environment.

use serde::{Deserialize, Serialize};

/// Runtime settings.
///
/// # Examples
///
/// ```
/// use argforms_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.log_level, "warn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty, source-annotated logs).
    pub debug: bool,
    /// The log filter directive, e.g. `"info"` or `"argforms=debug"`.
    pub log_level: String,
    /// Whether `--help` output may use ANSI colors.
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "warn".to_string(),
            color: true,
        }
    }
}
