//! Tracing subscriber set-up for binaries and tests embedding the crate.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Failures while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The fallback directive is not a valid filter.
    #[error("invalid log directive '{directive}': {source}")]
    InvalidDirective {
        /// Directive that failed to parse.
        directive: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },
    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `directive` (for example `"trackbridge=debug"`) when the variable is unset.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidDirective`] when `directive` cannot be
/// parsed and [`TelemetryError::AlreadyInstalled`] when called twice.
pub fn init_tracing(directive: &str) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive).map_err(|source| {
            TelemetryError::InvalidDirective {
                directive: directive.to_owned(),
                source,
            }
        })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|_| TelemetryError::AlreadyInstalled)
}
