//! Logging setup.
//!
//! Logs go to stderr so stdout stays clean for answers and JSON output.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// `log_level` takes precedence over `RUST_LOG`; both accept full
/// `EnvFilter` directives such as `wikiqa_agent=debug,info`.
///
/// # Example
/// ```no_run
/// use wikiqa_core::logging::init_logging;
///
/// init_logging(Some("info"), false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: Option<&str>, no_color: bool) -> AppResult<()> {
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = build_filter(filter_str)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && std::env::var("NO_COLOR").is_err());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

fn build_filter(directives: &str) -> AppResult<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| AppError::Config(format!("Invalid log filter '{}': {}", directives, e)))
}
