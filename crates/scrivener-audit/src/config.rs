//! Audit configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the aggregator, gate, and audit worker pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Minimum effective confidence for a claim to be accepted
    pub confidence_floor: f64,

    /// How close (in trust) a contradicting method must be to the best
    /// match before it counts as a conflict
    pub conflict_margin: f64,

    /// Maximum tolerated hallucination ratio per run
    pub threshold: f64,

    /// Maximum claims evaluated concurrently
    pub max_concurrent_claims: usize,

    /// Per-adapter check timeout (milliseconds)
    pub adapter_timeout_ms: u64,
}

impl AuditConfig {
    /// Get the adapter timeout as a Duration
    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_millis(self.adapter_timeout_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(format!(
                "confidence_floor {} is outside [0.0, 1.0]",
                self.confidence_floor
            ));
        }
        if !(0.0..=1.0).contains(&self.conflict_margin) {
            return Err(format!(
                "conflict_margin {} is outside [0.0, 1.0]",
                self.conflict_margin
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} is outside [0.0, 1.0]", self.threshold));
        }
        if self.max_concurrent_claims == 0 {
            return Err("max_concurrent_claims must be greater than 0".to_string());
        }
        if self.adapter_timeout_ms == 0 {
            return Err("adapter_timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Strict preset: tighter threshold, smaller conflict window
    pub fn strict() -> Self {
        Self {
            confidence_floor: 0.90,
            conflict_margin: 0.10,
            threshold: 0.01,
            max_concurrent_claims: 8,
            adapter_timeout_ms: 5_000,
        }
    }

    /// Permissive preset: for exploratory runs where rejection noise
    /// matters more than rigor
    pub fn permissive() -> Self {
        Self {
            confidence_floor: 0.70,
            conflict_margin: 0.05,
            threshold: 0.10,
            max_concurrent_claims: 16,
            adapter_timeout_ms: 30_000,
        }
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

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            confidence_floor: 0.85,
            conflict_margin: 0.05,
            threshold: 0.02,
            max_concurrent_claims: 8,
            adapter_timeout_ms: 10_000,
        }
    }
}
