//! Per-identity sliding-window rate limiter.
//!
//! Each identity owns a queue of accepted-action timestamps. On every check
//! the queue is pruned to the trailing window, and the action is recorded
//! only if the pruned count is below the limit. Purge is the authority,
//! not storage size: stale entries may linger until the identity's next
//! check. Every [`SWEEP_INTERVAL`] checks the limiter also drops identities
//! whose whole window has expired, so the key set tracks recently active
//! identities rather than every identity ever seen.
//!
//! # Atomicity
//!
//! Prune, check and record all run while holding the identity's
//! `DashMap` entry. Two concurrent checks for the same identity are
//! serialized; checks for different identities only contend when they
//! hash to the same shard.

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicU64, Ordering},
};

use betguard_types::{Identity, RateLimitConfig};
use dashmap::DashMap;

/// Checks between two sweeps of idle identities.
pub const SWEEP_INTERVAL: u64 = 1024;

/// Sliding-window limiter keyed by [`Identity`]. No global cap.
#[derive(Debug)]
pub struct RateLimiter {
    /// `Identity → accepted timestamps` (monotonically non-decreasing).
    windows: DashMap<Identity, VecDeque<u64>>,
    /// Window length in milliseconds.
    window_ms: u64,
    /// Accepted actions allowed inside one window.
    max_attempts: usize,
    /// Checks performed, drives the idle sweep.
    checks: AtomicU64,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_attempts: usize, window_ms: u64) -> Self {
        Self {
            windows: DashMap::new(),
            window_ms,
            max_attempts,
            checks: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self::new(cfg.max_attempts, cfg.window_ms)
    }

    /// Check whether `identity` may act at `now_ms`, recording the action if so.
    ///
    /// A denied check records nothing.
    pub fn is_allowed(&self, identity: &Identity, now_ms: u64) -> bool {
        let allowed = self.check_and_record(identity, now_ms);
        // The entry guard is released here; sweeping takes shard locks.
        if self.checks.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.purge_idle(now_ms);
        }
        allowed
    }

    fn check_and_record(&self, identity: &Identity, now_ms: u64) -> bool {
        let mut window = self.windows.entry(identity.clone()).or_default();

        // An entry counts while `now - t < window_ms`.
        let before = window.len();
        self.prune(&mut window, now_ms);
        let pruned = before - window.len();
        if pruned > 0 {
            tracing::debug!(identity = %identity.short(), pruned, "Rate window pruned");
        }

        if window.len() >= self.max_attempts {
            tracing::warn!(
                identity = %identity.short(),
                count = window.len(),
                window_ms = self.window_ms,
                limit = self.max_attempts,
                "Rate limit exceeded"
            );
            return false;
        }

        window.push_back(now_ms);
        true
    }

    fn prune(&self, window: &mut VecDeque<u64>, now_ms: u64) {
        while let Some(&front) = window.front() {
            if now_ms.saturating_sub(front) >= self.window_ms {
                window.pop_front();
            } else {
                break;
            }
        }
    }

    /// Drop every identity with nothing left in its window at `now_ms`.
    /// Returns how many identities were removed.
    pub fn purge_idle(&self, now_ms: u64) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| {
            self.prune(window, now_ms);
            !window.is_empty()
        });
        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.windows.len(), "Idle rate windows purged");
        }
        removed
    }

    /// Forget every timestamp stored for `identity`.
    pub fn reset(&self, identity: &Identity) {
        self.windows.remove(identity);
    }

    /// Actions currently counted for `identity` at `now_ms`, without recording.
    #[must_use]
    pub fn recent_count(&self, identity: &Identity, now_ms: u64) -> usize {
        self.windows.get(identity).map_or(0, |w| {
            w.iter()
                .filter(|&&t| now_ms.saturating_sub(t) < self.window_ms)
                .count()
        })
    }

    /// Number of identities with stored state.
    #[must_use]
    pub fn tracked_identities(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
