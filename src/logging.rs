//! Logging setup for LedgerPulse
//!
//! Installs a `tracing_subscriber` fmt subscriber writing to stderr, so
//! command output on stdout stays machine-readable. `RUST_LOG` wins over the
//! configured level when set.

use tracing_subscriber::EnvFilter;

use crate::error::LedgerError;

/// Install the global subscriber with `level` as the default filter
///
/// Fails if `level` is not a valid filter directive or a global subscriber
/// is already installed.
pub fn init(level: &str) -> Result<(), LedgerError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env),
        _ => EnvFilter::try_new(format!("ledgerpulse={}", level)),
    }
    .map_err(|e| LedgerError::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LedgerError::Config(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        // The first call may succeed or lose to another test
        let _ = init("debug");
        assert!(init("debug").is_err());
    }
}
