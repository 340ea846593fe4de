//! Action requests and the caller-side history that feeds them.
//!
//! ```text
//! UI click
//!   → ActionHistory.record(now)
//!   → ActionRequest::from_history(identity, amount, &history)
//!   → ActionGate.evaluate(&request)
//! ```
//!
//! The gate never owns history; the caller keeps a bounded ring buffer and
//! hands a snapshot in with each request.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{BetguardError, Identity, Result, constants};

/// Fixed-capacity ring buffer of the caller's recent action timestamps (ms).
///
/// Oldest entries are dropped once `capacity` is reached. Timestamps must be
/// non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionHistory {
    timestamps: VecDeque<u64>,
    capacity: usize,
}

impl ActionHistory {
    /// Create an empty history.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ActionHistory capacity must be > 0");
        Self {
            timestamps: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a history from stored parts, with the same guarantees
    /// [`new`](Self::new) and [`record`](Self::record) give.
    pub fn from_parts(capacity: usize, timestamps: Vec<u64>) -> Result<Self> {
        if capacity == 0 {
            return Err(BetguardError::InvalidHistory {
                reason: "capacity must be > 0".into(),
            });
        }
        if timestamps.len() > capacity {
            return Err(BetguardError::InvalidHistory {
                reason: format!("{} entries exceed capacity {capacity}", timestamps.len()),
            });
        }
        check_monotonic(&timestamps)?;
        Ok(Self {
            timestamps: timestamps.into(),
            capacity,
        })
    }

    /// Append a timestamp, dropping the oldest entry when full.
    pub fn record(&mut self, timestamp_ms: u64) -> Result<()> {
        if let Some(&last) = self.timestamps.back() {
            if timestamp_ms < last {
                return Err(BetguardError::NonMonotonicHistory {
                    previous: last,
                    next: timestamp_ms,
                });
            }
        }
        if self.timestamps.len() == self.capacity {
            self.timestamps.pop_front();
        }
        self.timestamps.push_back(timestamp_ms);
        Ok(())
    }

    /// Timestamps oldest-first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u64> {
        self.timestamps.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.timestamps.clear();
    }
}

#[derive(Deserialize)]
struct StoredHistory {
    timestamps: Vec<u64>,
    capacity: usize,
}

impl<'de> Deserialize<'de> for ActionHistory {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let stored = StoredHistory::deserialize(d)?;
        Self::from_parts(stored.capacity, stored.timestamps).map_err(de::Error::custom)
    }
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new(constants::DEFAULT_HISTORY_CAPACITY)
    }
}

/// One attempt at a sensitive action. Constructed fresh per attempt and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    /// Who is acting.
    pub identity: Identity,
    /// Requested stake in base units. Not yet validated against the bet set.
    pub amount: u64,
    /// Recent action timestamps, oldest first.
    pub recent_action_timestamps: Vec<u64>,
}

impl ActionRequest {
    /// Build a request from a raw timestamp list.
    ///
    /// Rejects a history that goes backwards; that can only come from a
    /// broken caller.
    pub fn new(identity: Identity, amount: u64, recent_action_timestamps: Vec<u64>) -> Result<Self> {
        check_monotonic(&recent_action_timestamps)?;
        Ok(Self {
            identity,
            amount,
            recent_action_timestamps,
        })
    }

    /// Build a request from the caller's ring buffer.
    #[must_use]
    pub fn from_history(identity: Identity, amount: u64, history: &ActionHistory) -> Self {
        Self {
            identity,
            amount,
            recent_action_timestamps: history.snapshot(),
        }
    }
}

#[derive(Deserialize)]
struct WireRequest {
    identity: Identity,
    amount: u64,
    #[serde(default)]
    recent_action_timestamps: Vec<u64>,
}

impl<'de> Deserialize<'de> for ActionRequest {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let wire = WireRequest::deserialize(d)?;
        Self::new(wire.identity, wire.amount, wire.recent_action_timestamps)
            .map_err(de::Error::custom)
    }
}

fn check_monotonic(timestamps: &[u64]) -> Result<()> {
    match timestamps.windows(2).find(|w| w[1] < w[0]) {
        Some(pair) => Err(BetguardError::NonMonotonicHistory {
            previous: pair[0],
            next: pair[1],
        }),
        None => Ok(()),
    }
}
