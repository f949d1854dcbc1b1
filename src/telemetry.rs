use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Filter from RUST_LOG, falling back to the configured level
pub fn env_filter(logging: &LoggingSettings) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|source| TelemetryError::EnvFilter {
            value: logging.level.clone(),
            source,
        }),
    }
}

/// Install the global fmt subscriber. `format = "pretty"` selects the
/// multi-line human format; anything else is compact.
pub fn init(logging: &LoggingSettings) -> Result<(), TelemetryError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(logging)?)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().try_init()
    } else {
        subscriber.compact().try_init()
    }
    .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let logging = LoggingSettings {
            level: "matri_health=verbose".to_string(),
            format: "compact".to_string(),
        };
        assert!(matches!(
            env_filter(&logging),
            Err(TelemetryError::EnvFilter { .. })
        ));
    }

    #[test]
    fn test_default_level_builds() {
        assert!(env_filter(&LoggingSettings::default()).is_ok());
    }
}
