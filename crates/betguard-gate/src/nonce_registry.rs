//! Bounded replay detector for one-time action nonces.
//!
//! Membership is an `O(1)` `HashSet` lookup; a parallel `VecDeque` records
//! insertion order so the oldest-inserted nonce can be evicted in `O(1)`
//! once the registry exceeds its capacity. Eviction is strict FIFO, not LRU:
//! a rejected replay does not refresh its entry.
//!
//! # Accepted weakness
//!
//! A nonce that has been evicted is no longer tracked and would be accepted
//! again. Settlement guarantees live on-chain; this registry only keeps a
//! browsing context from double-submitting the same attempt.

use std::collections::{HashSet, VecDeque};

use betguard_types::{Nonce, NonceConfig};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct Inner {
    used: HashSet<Nonce>,
    /// Insertion order (front = oldest).
    order: VecDeque<Nonce>,
}

/// Process-wide set of used nonces, shared across identities.
#[derive(Debug)]
pub struct NonceRegistry {
    inner: Mutex<Inner>,
    max_nonces: usize,
}

impl NonceRegistry {
    /// Create a registry that retains at most `max_nonces` entries.
    ///
    /// # Panics
    /// Panics if `max_nonces` is zero.
    #[must_use]
    pub fn new(max_nonces: usize) -> Self {
        assert!(max_nonces > 0, "NonceRegistry max_nonces must be > 0");
        Self {
            inner: Mutex::new(Inner {
                used: HashSet::with_capacity(max_nonces + 1),
                order: VecDeque::with_capacity(max_nonces + 1),
            }),
            max_nonces,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &NonceConfig) -> Self {
        Self::new(cfg.max_nonces)
    }

    /// Fresh nonce for an attempt starting at `now_ms`.
    #[must_use]
    pub fn generate(now_ms: u64) -> Nonce {
        Nonce::generate(now_ms)
    }

    /// Register `nonce`. Returns `false` (and changes nothing) on replay.
    ///
    /// Insert and evict happen under one lock.
    pub fn validate(&self, nonce: &Nonce) -> bool {
        let mut inner = self.inner.lock();
        if inner.used.contains(nonce) {
            tracing::warn!(nonce = %nonce, "Nonce replay detected");
            return false;
        }

        inner.used.insert(nonce.clone());
        inner.order.push_back(nonce.clone());

        if inner.used.len() > self.max_nonces {
            if let Some(oldest) = inner.order.pop_front() {
                inner.used.remove(&oldest);
                tracing::debug!(evicted = %oldest, "Nonce registry full, evicted oldest");
            }
        }
        true
    }

    /// Whether `nonce` is currently tracked.
    #[must_use]
    pub fn contains(&self, nonce: &Nonce) -> bool {
        self.inner.lock().used.contains(nonce)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().used.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().used.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_nonces
    }
}

impl Default for NonceRegistry {
    fn default() -> Self {
        Self::from_config(&NonceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: usize) -> Nonce {
        Nonce::from_raw(format!("nonce-{i}")).unwrap()
    }

    #[test]
    fn first_use_accepted_second_rejected() {
        let reg = NonceRegistry::new(10);
        let nonce = NonceRegistry::generate(1_000);
        assert!(reg.validate(&nonce));
        assert!(!reg.validate(&nonce));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn evicts_oldest_inserted() {
        let reg = NonceRegistry::new(3);
        for i in 0..3 {
            assert!(reg.validate(&n(i)));
        }
        assert_eq!(reg.len(), 3);

        assert!(reg.validate(&n(3)));
        assert_eq!(reg.len(), 3);
        assert!(!reg.contains(&n(0)), "n0 should have been evicted");
        assert!(reg.contains(&n(1)));
        assert!(reg.contains(&n(2)));
        assert!(reg.contains(&n(3)));
    }

    #[test]
    fn replay_does_not_refresh_position() {
        let reg = NonceRegistry::new(2);
        assert!(reg.validate(&n(0)));
        assert!(reg.validate(&n(1)));
        // Replaying n0 is rejected and must not move it to the back.
        assert!(!reg.validate(&n(0)));
        assert!(reg.validate(&n(2)));
        assert!(!reg.contains(&n(0)));
        assert!(reg.contains(&n(1)));
    }

    #[test]
    fn evicted_nonce_is_accepted_again() {
        let reg = NonceRegistry::new(2);
        assert!(reg.validate(&n(0)));
        assert!(reg.validate(&n(1)));
        assert!(reg.validate(&n(2)));
        assert!(reg.validate(&n(0)), "evicted nonce is no longer tracked");
    }

    #[test]
    fn default_capacity_is_one_thousand() {
        let reg = NonceRegistry::default();
        assert_eq!(reg.capacity(), 1000);
        assert!(reg.is_empty());
    }

    #[test]
    #[should_panic(expected = "max_nonces must be > 0")]
    fn zero_capacity_panics() {
        let _ = NonceRegistry::new(0);
    }
}
