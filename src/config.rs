//! Configuration
//!
//! The query core itself is not configurable: matching, ordering and
//! canonicalization are fixed. Only observability output can be tuned.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for this schema
    #[error("Invalid observability config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Whether structured logs are written at all (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Records below this severity are dropped (default: INFO)
    #[serde(default = "default_min_severity")]
    pub min_severity: Severity,
}

fn default_enabled() -> bool {
    true
}

fn default_min_severity() -> Severity {
    Severity::Info
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            min_severity: default_min_severity(),
        }
    }
}

impl ObservabilityConfig {
    /// Config that writes every record, including per-query trace events.
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            min_severity: Severity::Trace,
        }
    }

    /// Config that writes nothing.
    pub fn silent() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document; missing fields take defaults.
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ObservabilityConfig::default();
        assert!(config.enabled);
        assert_eq!(config.min_severity, Severity::Info);
    }

    #[test]
    fn test_empty_document_takes_defaults() {
        let config = ObservabilityConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ObservabilityConfig::default());
    }

    #[test]
    fn test_parse_severity() {
        let config =
            ObservabilityConfig::from_json_str(r#"{"min_severity": "TRACE"}"#).unwrap();
        assert_eq!(config, ObservabilityConfig::verbose());
    }

    #[test]
    fn test_parse_disabled() {
        let config = ObservabilityConfig::from_json_str(r#"{"enabled": false}"#).unwrap();
        assert_eq!(config, ObservabilityConfig::silent());
    }

    #[test]
    fn test_invalid_severity_rejected() {
        let result = ObservabilityConfig::from_json_str(r#"{"min_severity": "LOUD"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
