//! Startup configuration from the environment.
//!
//! Read once at boot; nothing here is mutable at runtime.

use std::env;
use std::path::PathBuf;

use detection::DetectorConfig;
use thiserror::Error;

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    fn invalid(name: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (`HOST`, default 0.0.0.0).
    pub host: String,
    /// Bind port (`PORT`, default 8001).
    pub port: u16,
    /// Detector parameters (`WINDOW_SIZE`, `THRESHOLD_MULTIPLIER`).
    pub detector: DetectorConfig,
    /// Anomaly log path (`ANOMALY_LOG_FILE`, default anomalies.log).
    pub anomaly_log_file: PathBuf,
}

impl ServerConfig {
    /// Load from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 8001u16)?;
        let window_size = parse_var("WINDOW_SIZE", 20usize)?;
        let threshold_multiplier = parse_var("THRESHOLD_MULTIPLIER", 2.0f64)?;
        let anomaly_log_file = PathBuf::from(
            env::var("ANOMALY_LOG_FILE").unwrap_or_else(|_| "anomalies.log".to_string()),
        );

        let detector = DetectorConfig::new(window_size, threshold_multiplier)
            .map_err(|err| ConfigError::invalid("detector configuration", err))?;

        Ok(Self {
            host,
            port,
            detector,
            anomaly_log_file,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|err| ConfigError::invalid(name, format!("{} ({})", err, raw))),
        Err(_) => Ok(default),
    }
}
