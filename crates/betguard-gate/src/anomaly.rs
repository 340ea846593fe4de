//! Heuristic bot / out-of-policy classifier.
//!
//! Two independent checks, evaluated in order and short-circuiting:
//!
//! 1. **Amount policy**: the amount must be an exact [`BetAmount`].
//! 2. **Cadence**: with more than `min_samples` timestamps, flag the history
//!    when the mean inter-arrival time is below `max_mean_interval_ms` *and*
//!    every delta sits within `max_deviation_ms` of that mean. Fast alone or
//!    uniform alone is not enough.
//!
//! # Accepted weakness
//!
//! This is a soft deterrent. A very fast human can trip it and a slow,
//! uniform bot will not.

use betguard_types::{AnomalyConfig, AnomalyReason, BetAmount, Identity};

/// Classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyVerdict {
    pub suspicious: bool,
    pub reason: Option<AnomalyReason>,
}

impl AnomalyVerdict {
    #[must_use]
    pub fn clean() -> Self {
        Self {
            suspicious: false,
            reason: None,
        }
    }

    #[must_use]
    pub fn flagged(reason: AnomalyReason) -> Self {
        Self {
            suspicious: true,
            reason: Some(reason),
        }
    }
}

/// Stateless classifier; history is always supplied by the caller.
#[derive(Debug, Clone)]
pub struct AnomalyClassifier {
    min_samples: usize,
    max_mean_interval_ms: f64,
    max_deviation_ms: f64,
}

impl AnomalyClassifier {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(cfg: &AnomalyConfig) -> Self {
        Self {
            min_samples: cfg.min_samples,
            max_mean_interval_ms: cfg.max_mean_interval_ms as f64,
            max_deviation_ms: cfg.max_deviation_ms as f64,
        }
    }

    /// Classify one attempt.
    pub fn classify(&self, identity: &Identity, amount: u64, recent: &[u64]) -> AnomalyVerdict {
        if BetAmount::from_base_units(amount).is_none() {
            tracing::warn!(identity = %identity.short(), amount, "Amount outside allowed bet set");
            return AnomalyVerdict::flagged(AnomalyReason::InvalidAmount);
        }

        if self.is_bot_like_cadence(recent) {
            tracing::warn!(
                identity = %identity.short(),
                samples = recent.len(),
                "Bot-like cadence detected"
            );
            return AnomalyVerdict::flagged(AnomalyReason::BotLikeCadence);
        }

        AnomalyVerdict::clean()
    }

    #[allow(clippy::cast_precision_loss)]
    fn is_bot_like_cadence(&self, recent: &[u64]) -> bool {
        if recent.len() <= self.min_samples {
            return false;
        }

        let deltas: Vec<f64> = recent
            .windows(2)
            .map(|w| w[1] as f64 - w[0] as f64)
            .collect();
        let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;

        mean < self.max_mean_interval_ms
            && deltas
                .iter()
                .all(|d| (d - mean).abs() < self.max_deviation_ms)
    }
}

impl Default for AnomalyClassifier {
    fn default() -> Self {
        Self::new(&AnomalyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    const VALID: u64 = 10_000_000;

    fn spaced(count: usize, step: u64) -> Vec<u64> {
        (0..count as u64).map(|i| 1_000_000 + i * step).collect()
    }

    #[test]
    fn valid_amount_short_history_is_clean() {
        let c = AnomalyClassifier::default();
        let v = c.classify(&Identity::dummy(1), VALID, &spaced(5, 100));
        assert_eq!(v, AnomalyVerdict::clean());
    }

    #[test]
    fn invalid_amount_flagged() {
        let c = AnomalyClassifier::default();
        let v = c.classify(&Identity::dummy(1), 99, &[]);
        assert!(v.suspicious);
        assert_eq!(v.reason, Some(AnomalyReason::InvalidAmount));
    }

    #[test]
    fn amount_check_runs_before_cadence() {
        let c = AnomalyClassifier::default();
        let v = c.classify(&Identity::dummy(1), 15_000_000, &spaced(21, 1000));
        assert_eq!(v.reason, Some(AnomalyReason::InvalidAmount));
    }

    #[test]
    fn uniform_fast_cadence_flagged() {
        let c = AnomalyClassifier::default();
        let v = c.classify(&Identity::dummy(1), VALID, &spaced(21, 1000));
        assert!(v.suspicious);
        assert_eq!(v.reason, Some(AnomalyReason::BotLikeCadence));
    }

    #[test]
    fn twenty_samples_never_evaluated() {
        let c = AnomalyClassifier::default();
        let v = c.classify(&Identity::dummy(1), VALID, &spaced(20, 1000));
        assert!(!v.suspicious);
    }

    #[test]
    fn uniform_but_slow_cadence_clean() {
        let c = AnomalyClassifier::default();
        let v = c.classify(&Identity::dummy(1), VALID, &spaced(21, 2000));
        assert!(!v.suspicious, "mean of exactly 2000ms is not below threshold");
    }

    #[test]
    fn fast_but_irregular_cadence_clean() {
        let c = AnomalyClassifier::default();
        // Alternating 200ms / 1800ms: mean 1000ms, every delta 800ms off.
        let mut ts = vec![0u64];
        for i in 0..20 {
            let step = if i % 2 == 0 { 200 } else { 1800 };
            ts.push(ts[i] + step);
        }
        let v = c.classify(&Identity::dummy(1), VALID, &ts);
        assert!(!v.suspicious);
    }

    #[test]
    fn random_high_variance_cadence_clean() {
        let c = AnomalyClassifier::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut ts = vec![0u64];
        for i in 0..20 {
            // Force at least one short and one long gap so the spread is wide.
            let step = match i {
                0 => 500,
                1 => 5000,
                _ => rng.gen_range(500..=5000),
            };
            ts.push(ts[i] + step);
        }
        let v = c.classify(&Identity::dummy(1), VALID, &ts);
        assert!(!v.suspicious);
    }

    #[test]
    fn small_jitter_still_flagged() {
        let c = AnomalyClassifier::default();
        let mut ts = vec![0u64];
        for i in 0..20 {
            let step = if i % 2 == 0 { 900 } else { 1100 };
            ts.push(ts[i] + step);
        }
        let v = c.classify(&Identity::dummy(1), VALID, &ts);
        assert_eq!(v.reason, Some(AnomalyReason::BotLikeCadence));
    }
}
