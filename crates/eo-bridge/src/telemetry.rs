//! Logging setup for applications embedding the bridge.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{BridgeError, Result};

/// Install a global `tracing` subscriber.
///
/// Fails instead of panicking when a subscriber is already installed, so
/// hosts that configure their own logging can call this unconditionally.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| BridgeError::Config(format!("invalid log level '{}': {e}", config.level)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    installed.map_err(|e| BridgeError::Config(format!("logging already initialised: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let config = LoggingConfig::default();
        // The first call may race with other tests; only the second must fail.
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(BridgeError::Config(_))));
    }
}
