//! Coordinator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{CoordinatorError, Result};

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Admission ceiling for concurrently active sessions
    #[serde(default = "default_max_concurrent", rename = "max-concurrent-coordinations")]
    pub max_concurrent_coordinations: usize,

    /// Per-session deadline in milliseconds
    #[serde(default = "default_coordination_timeout_ms", rename = "coordination-timeout-ms")]
    pub coordination_timeout_ms: u64,

    /// Overall balance at or above which optimization is skipped
    #[serde(default = "default_balance_threshold", rename = "balance-threshold")]
    pub balance_threshold: f64,

    /// Reserved for synergy catalysts
    #[serde(default = "default_synergy_threshold", rename = "synergy-threshold")]
    pub synergy_threshold: f64,

    /// Background optimization tick in milliseconds
    #[serde(default = "default_optimization_interval_ms", rename = "optimization-interval-ms")]
    pub optimization_interval_ms: u64,

    #[serde(default = "default_true", rename = "enable-auto-balance")]
    pub enable_auto_balance: bool,

    #[serde(default = "default_true", rename = "enable-synergy-catalysis")]
    pub enable_synergy_catalysis: bool,

    #[serde(default = "default_true", rename = "enable-history-tracking")]
    pub enable_history_tracking: bool,

    /// History ring buffer capacity
    #[serde(default = "default_max_history_records", rename = "max-history-records")]
    pub max_history_records: usize,

    /// Progress below this marks a session as stalled
    #[serde(default = "default_quality_threshold", rename = "quality-threshold")]
    pub quality_threshold: f64,

    /// Reserved for collaborator optimization loops
    #[serde(default = "default_convergence_threshold", rename = "convergence-threshold")]
    pub convergence_threshold: f64,

    /// Reserved for collaborator optimization loops
    #[serde(default = "default_max_iterations", rename = "max-iterations")]
    pub max_iterations: u32,
}

fn default_max_concurrent() -> usize {
    10
}

fn default_coordination_timeout_ms() -> u64 {
    30 * 60 * 1000
}

fn default_balance_threshold() -> f64 {
    0.7
}

fn default_synergy_threshold() -> f64 {
    0.6
}

fn default_optimization_interval_ms() -> u64 {
    5 * 60 * 1000
}

fn default_true() -> bool {
    true
}

fn default_max_history_records() -> usize {
    1000
}

fn default_quality_threshold() -> f64 {
    0.8
}

fn default_convergence_threshold() -> f64 {
    0.95
}

fn default_max_iterations() -> u32 {
    100
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        debug!("CoordinatorConfig::default: called");
        Self {
            max_concurrent_coordinations: default_max_concurrent(),
            coordination_timeout_ms: default_coordination_timeout_ms(),
            balance_threshold: default_balance_threshold(),
            synergy_threshold: default_synergy_threshold(),
            optimization_interval_ms: default_optimization_interval_ms(),
            enable_auto_balance: true,
            enable_synergy_catalysis: true,
            enable_history_tracking: true,
            max_history_records: default_max_history_records(),
            quality_threshold: default_quality_threshold(),
            convergence_threshold: default_convergence_threshold(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl CoordinatorConfig {
    /// Per-session deadline as a Duration
    pub fn coordination_timeout(&self) -> Duration {
        Duration::from_millis(self.coordination_timeout_ms)
    }

    /// Background tick period as a Duration
    pub fn optimization_interval(&self) -> Duration {
        Duration::from_millis(self.optimization_interval_ms)
    }

    /// Reject values the coordinator cannot run with
    pub fn validate(&self) -> Result<()> {
        debug!("CoordinatorConfig::validate: called");
        if self.max_concurrent_coordinations == 0 {
            return Err(CoordinatorError::Configuration(
                "max-concurrent-coordinations must be at least 1".to_string(),
            ));
        }
        if self.coordination_timeout_ms == 0 {
            return Err(CoordinatorError::Configuration(
                "coordination-timeout-ms must be greater than 0".to_string(),
            ));
        }
        if self.enable_auto_balance && self.optimization_interval_ms == 0 {
            return Err(CoordinatorError::Configuration(
                "optimization-interval-ms must be greater than 0 when auto balance is enabled".to_string(),
            ));
        }
        for (name, value) in [
            ("balance-threshold", self.balance_threshold),
            ("synergy-threshold", self.synergy_threshold),
            ("quality-threshold", self.quality_threshold),
            ("convergence-threshold", self.convergence_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoordinatorError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
