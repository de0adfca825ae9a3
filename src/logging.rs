use flexi_logger::{detailed_format, Logger, LoggerHandle};

use crate::config::LoggingConfig;
use crate::error::CatalogError;

/// Dependencies stay at `warn`; the crate itself logs at the configured level.
pub fn log_spec(config: &LoggingConfig) -> String {
    format!("warn, catalog={}", config.catalog)
}

/// Starts the process logger. `RUST_LOG`, when set, replaces the configured
/// spec. The returned handle must be kept alive for the life of the process.
pub fn setup_logging(config: &LoggingConfig) -> Result<LoggerHandle, CatalogError> {
    Logger::try_with_env_or_str(log_spec(config))
        .and_then(|logger| logger.format(detailed_format).start())
        .map_err(|e| CatalogError::Error(format!("Failed to start logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_spec_scopes_level_to_crate() {
        let config = LoggingConfig {
            catalog: "debug".to_string(),
        };
        assert_eq!(log_spec(&config), "warn, catalog=debug");
    }
}
