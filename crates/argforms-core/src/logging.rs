//! Logging integration for argforms.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and a span helper for binding.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`. In debug mode a pretty,
/// source-annotated format is used; otherwise a compact one. Logs go to
/// standard error so they never mix with program output. Calling this
/// more than once is harmless: later calls leave the first subscriber in
/// place.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(settings.color)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(settings.color)
            .with_target(false)
            .compact()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one bind/validate pass over a form.
///
/// # Examples
///
/// ```
/// use argforms_core::logging::form_span;
///
/// let span = form_span("feedback");
/// let _guard = span.enter();
/// tracing::debug!("binding arguments");
/// ```
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::debug_span!("form", name = form_name)
}
