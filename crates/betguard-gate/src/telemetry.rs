//! Tracing subscriber setup for hosts that embed the gate.

use betguard_types::{BetguardError, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "betguard_gate=info,betguard_types=info";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event with all fields.
    #[default]
    Full,
    /// Multi-line, human-oriented output.
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Fails with [`BetguardError::Configuration`] if a global subscriber is
/// already installed.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| BetguardError::Configuration(format!("tracing init failed: {e}")))
}
