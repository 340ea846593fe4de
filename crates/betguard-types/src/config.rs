//! Configuration types for the action gate.

use serde::{Deserialize, Serialize};

use crate::{BetguardError, Result, constants};

/// Top-level gate configuration. Every section defaults independently, so a
/// JSON document only needs the fields it overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub rate_limit: RateLimitConfig,
    pub nonces: NonceConfig,
    pub session: SessionConfig,
    pub anomaly: AnomalyConfig,
}

impl GateConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would disable a check or make it unreachable.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.max_attempts == 0 {
            return Err(BetguardError::Configuration(
                "rate_limit.max_attempts must be > 0".into(),
            ));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(BetguardError::Configuration(
                "rate_limit.window_ms must be > 0".into(),
            ));
        }
        if self.nonces.max_nonces == 0 {
            return Err(BetguardError::Configuration(
                "nonces.max_nonces must be > 0".into(),
            ));
        }
        if self.session.duration_ms == 0 {
            return Err(BetguardError::Configuration(
                "session.duration_ms must be > 0".into(),
            ));
        }
        if self.anomaly.history_capacity <= self.anomaly.min_samples {
            return Err(BetguardError::Configuration(format!(
                "anomaly.history_capacity ({}) must exceed anomaly.min_samples ({})",
                self.anomaly.history_capacity, self.anomaly.min_samples
            )));
        }
        Ok(())
    }
}

/// Per-identity sliding-window limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Accepted actions allowed inside one window.
    pub max_attempts: usize,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_RATE_LIMIT_MAX_ATTEMPTS,
            window_ms: constants::DEFAULT_RATE_LIMIT_WINDOW_MS,
        }
    }
}

/// Replay registry bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonceConfig {
    /// Nonces retained before the oldest is evicted.
    pub max_nonces: usize,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            max_nonces: constants::MAX_NONCES,
        }
    }
}

/// Session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sliding expiry measured from the last successful validation.
    pub duration_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_ms: constants::SESSION_DURATION_MS,
        }
    }
}

/// Cadence heuristic thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Cadence is only evaluated with strictly more samples than this.
    pub min_samples: usize,
    /// Mean inter-arrival (ms) below which the cadence is "fast".
    pub max_mean_interval_ms: u64,
    /// Per-delta deviation (ms) below which the cadence is "uniform".
    pub max_deviation_ms: u64,
    /// Capacity callers should give their [`ActionHistory`](crate::ActionHistory).
    pub history_capacity: usize,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_samples: constants::CADENCE_MIN_SAMPLES,
            max_mean_interval_ms: constants::CADENCE_MAX_MEAN_INTERVAL_MS,
            max_deviation_ms: constants::CADENCE_MAX_DEVIATION_MS,
            history_capacity: constants::DEFAULT_HISTORY_CAPACITY,
        }
    }
}
