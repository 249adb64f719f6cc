//! Serializable logger configuration

use super::buffer_pool::{DEFAULT_BUFFER_SIZE, DEFAULT_LARGE_FACTOR, DEFAULT_MAX_POOLED};
use super::error::{LoggerError, Result};
use super::hook::DEFAULT_MAX_HOOKS;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use super::worker_pool::{DEFAULT_QUEUE_FACTOR, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};

/// Settings a [`Logger`](crate::Logger) is built from
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes.
///
/// # Example
///
/// ```
/// use loggo::{LoggerConfig, LogLevel};
///
/// let config = LoggerConfig::from_json(r#"{ "level": "DEBUG", "workers": 2 }"#).unwrap();
/// assert_eq!(config.level, LogLevel::Debug);
/// assert_eq!(config.max_hooks, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub time_format: TimestampFormat,
    pub max_hooks: usize,
    pub buffer_size: usize,
    pub large_buffer_factor: usize,
    pub max_pooled_buffers: usize,
    pub workers: usize,
    pub queue_factor: usize,
    pub colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            time_format: TimestampFormat::Standard,
            max_hooks: DEFAULT_MAX_HOOKS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            large_buffer_factor: DEFAULT_LARGE_FACTOR,
            max_pooled_buffers: DEFAULT_MAX_POOLED,
            workers: DEFAULT_WORKERS,
            queue_factor: DEFAULT_QUEUE_FACTOR,
            colors: true,
        }
    }
}

impl LoggerConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(LoggerError::config("workers", "at least one worker is required"));
        }
        if self.queue_factor == 0 {
            return Err(LoggerError::config("queue_factor", "must be greater than zero"));
        }
        if self.buffer_size == 0 {
            return Err(LoggerError::config("buffer_size", "must be greater than zero"));
        }
        if self.large_buffer_factor == 0 {
            return Err(LoggerError::config(
                "large_buffer_factor",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.time_format, TimestampFormat::Standard);
        assert_eq!(config.max_hooks, 100);
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.large_buffer_factor, 4);
        assert_eq!(config.workers, 10);
        assert!(config.colors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LoggerConfig::from_json(
            r#"{ "level": "WARN", "time_format": { "Custom": "%H:%M" }, "colors": false }"#,
        )
        .expect("valid config");

        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.time_format, TimestampFormat::Custom("%H:%M".to_string()));
        assert!(!config.colors);
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = LoggerConfig {
            level: LogLevel::Critical,
            workers: 3,
            ..LoggerConfig::default()
        };
        let json = config.to_json().expect("serialize");
        assert_eq!(LoggerConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn test_invalid_json() {
        let err = LoggerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_validation_rejects_zero_values() {
        for json in [
            r#"{ "workers": 0 }"#,
            r#"{ "queue_factor": 0 }"#,
            r#"{ "buffer_size": 0 }"#,
            r#"{ "large_buffer_factor": 0 }"#,
        ] {
            let err = LoggerConfig::from_json(json).unwrap_err();
            assert!(
                matches!(err, LoggerError::InvalidConfiguration { .. }),
                "{} should be rejected",
                json
            );
        }
    }
}
