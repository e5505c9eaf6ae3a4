//! Configuration for the Pipeline Supervisor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the supervisor's retry behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum attempts per stage for transient failures
    pub max_retries: u32,

    /// Maximum Auditing→Writing regeneration rounds; a separate budget
    /// from transient retries
    pub max_regeneration_retries: u32,

    /// Base backoff between transient retries (milliseconds); doubles
    /// per attempt
    pub retry_backoff_ms: u64,
}

impl PipelineConfig {
    /// Backoff before the given attempt (1-based) is retried
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(6);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.max_regeneration_retries == 0 {
            return Err("max_regeneration_retries must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            max_regeneration_retries: 3,
            retry_backoff_ms: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_retries_invalid() {
        let config = PipelineConfig {
            max_retries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_doubles() {
        let config = PipelineConfig::default();
        assert_eq!(config.backoff(1), Duration::from_millis(200));
        assert_eq!(config.backoff(2), Duration::from_millis(400));
        assert_eq!(config.backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = PipelineConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_retries, parsed.max_retries);
        assert_eq!(config.max_regeneration_retries, parsed.max_regeneration_retries);
    }
}
