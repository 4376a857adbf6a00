//! # feedback
//!
//! Collects a piece of feedback from command-line arguments, validates it
//! with an argforms form, and prints the result as JSON.
//!
//! ```bash
//! feedback --name Ada --rating-score 5 --tags fast --tags friendly
//! ```
//!
//! On validation failure every error is printed to standard error and the
//! process exits with status 1. Logging is configured from an optional
//! settings file (`--settings`, TOML or JSON) and `ARGFORMS_*` environment
//! variables.

mod feedback;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argforms::{Form, Multidict};
use argforms_core::logging::setup_logging;
use argforms_core::{settings_loader, FormError, FormResult, Settings};
use clap::{Args, Command, FromArgMatches};

/// Options shared by every run, independent of the form.
#[derive(Debug, Args)]
struct GlobalOpts {
    /// Settings file (TOML, or JSON with a `.json` extension)
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run() -> FormResult<bool> {
    let mut form = feedback::feedback_form()?;
    let cmd = GlobalOpts::augment_args(
        Command::new("feedback").about("Record feedback about a visit"),
    );
    let matches = form.configure_parser(cmd)?.get_matches();
    let opts = GlobalOpts::from_arg_matches(&matches)
        .map_err(|e| FormError::ConfigurationError(e.to_string()))?;

    let mut settings = load_settings(opts.settings.as_deref())?;
    if opts.debug {
        settings.debug = true;
        settings.log_level = "debug".to_string();
    }
    setup_logging(&settings);
    tracing::debug!(?settings, "loaded settings");

    if !form.bind_and_validate(&Multidict::from_matches(&matches)) {
        eprintln!("error: validation error(s) in arguments");
        form.print_errors_stderr()?;
        return Ok(false);
    }

    let json = serde_json::to_string_pretty(form.data())
        .map_err(|e| FormError::ConfigurationError(format!("Failed to render JSON: {e}")))?;
    println!("{json}");
    Ok(true)
}

fn load_settings(path: Option<&Path>) -> FormResult<Settings> {
    let Some(path) = path else {
        return Ok(settings_loader::from_env());
    };
    if path.extension().is_some_and(|ext| ext == "json") {
        let mut settings = settings_loader::from_json_file(path)?;
        settings_loader::apply_env_overrides(&mut settings);
        Ok(settings)
    } else {
        settings_loader::from_toml_file_with_env(path)
    }
}
