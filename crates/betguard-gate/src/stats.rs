//! Decision counters.

use std::sync::atomic::{AtomicU64, Ordering};

use betguard_types::DenialReason;
use serde::{Deserialize, Serialize};

/// Lock-free counters shared by every context of one gate.
#[derive(Debug, Default)]
pub struct GateStats {
    evaluated: AtomicU64,
    approved: AtomicU64,
    bot_suspected: AtomicU64,
    rate_limited: AtomicU64,
    suspicious_activity: AtomicU64,
    replay_detected: AtomicU64,
    invalid_amount: AtomicU64,
    sessions_healed: AtomicU64,
}

/// Point-in-time copy of [`GateStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStatsSnapshot {
    pub evaluated: u64,
    pub approved: u64,
    pub bot_suspected: u64,
    pub rate_limited: u64,
    pub suspicious_activity: u64,
    pub replay_detected: u64,
    pub invalid_amount: u64,
    pub sessions_healed: u64,
}

impl GateStatsSnapshot {
    #[must_use]
    pub fn denied(&self) -> u64 {
        self.bot_suspected
            + self.rate_limited
            + self.suspicious_activity
            + self.replay_detected
            + self.invalid_amount
    }
}

impl GateStats {
    pub(crate) fn record_evaluated(&self) {
        self.evaluated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_approved(&self) {
        self.approved.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_session_healed(&self) {
        self.sessions_healed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_denial(&self, reason: DenialReason) {
        let counter = match reason {
            DenialReason::BotSuspected => &self.bot_suspected,
            DenialReason::RateLimited => &self.rate_limited,
            DenialReason::SuspiciousActivity { .. } => &self.suspicious_activity,
            DenialReason::ReplayDetected => &self.replay_detected,
            DenialReason::InvalidAmount => &self.invalid_amount,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> GateStatsSnapshot {
        GateStatsSnapshot {
            evaluated: self.evaluated.load(Ordering::Relaxed),
            approved: self.approved.load(Ordering::Relaxed),
            bot_suspected: self.bot_suspected.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            suspicious_activity: self.suspicious_activity.load(Ordering::Relaxed),
            replay_detected: self.replay_detected.load(Ordering::Relaxed),
            invalid_amount: self.invalid_amount.load(Ordering::Relaxed),
            sessions_healed: self.sessions_healed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use betguard_types::AnomalyReason;

    use super::*;

    #[test]
    fn denials_counted_per_reason() {
        let stats = GateStats::default();
        stats.record_evaluated();
        stats.record_evaluated();
        stats.record_denial(DenialReason::RateLimited);
        stats.record_denial(DenialReason::SuspiciousActivity {
            reason: AnomalyReason::BotLikeCadence,
        });
        let snap = stats.snapshot();
        assert_eq!(snap.evaluated, 2);
        assert_eq!(snap.rate_limited, 1);
        assert_eq!(snap.suspicious_activity, 1);
        assert_eq!(snap.denied(), 2);
        assert_eq!(snap.approved, 0);
    }
}
