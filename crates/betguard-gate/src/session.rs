//! Single-slot session store for one browsing context.
//!
//! ```text
//!   NONE ──create──▶ ACTIVE ──idle > duration──▶ EXPIRED ──▶ NONE
//!                      │
//!                      └──create (any identity)──▶ REPLACED ──▶ ACTIVE
//! ```
//!
//! Exactly one session is live per store. Creating a session for a different
//! identity silently overwrites the current one, because a context only ever
//! represents one connected wallet. Services that need several concurrent
//! identities give each connection its own store (see
//! [`ActionGate::new_context`](crate::ActionGate::new_context)).
//!
//! Expiry slides: every successful validation moves `last_activity` to now.

use betguard_types::{Identity, SessionConfig, SessionId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub identity: Identity,
    pub created_at_ms: u64,
    pub last_activity_ms: u64,
}

/// Outcome of a session validation. Failures are never surfaced as denials;
/// the gate heals by creating a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Valid(SessionId),
    Missing,
    Expired,
    IdentityMismatch,
}

/// One session slot.
#[derive(Debug)]
pub struct SessionStore {
    slot: Mutex<Option<Session>>,
    duration_ms: u64,
}

impl SessionStore {
    #[must_use]
    pub fn new(duration_ms: u64) -> Self {
        Self {
            slot: Mutex::new(None),
            duration_ms,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &SessionConfig) -> Self {
        Self::new(cfg.duration_ms)
    }

    /// Start a session for `identity`, replacing whatever was in the slot.
    pub fn create_session(&self, identity: &Identity, now_ms: u64) -> SessionId {
        Self::fill(&mut self.slot.lock(), identity, now_ms)
    }

    /// Validate the slot for `identity` at `now_ms`. Convenience wrapper
    /// over [`check_session`](Self::check_session).
    pub fn validate_session(&self, identity: &Identity, now_ms: u64) -> bool {
        matches!(self.check_session(identity, now_ms), SessionCheck::Valid(_))
    }

    /// Validate and, on success, slide `last_activity` to `now_ms`.
    ///
    /// An expired session is cleared as a side effect. A mismatched identity
    /// leaves the slot untouched.
    pub fn check_session(&self, identity: &Identity, now_ms: u64) -> SessionCheck {
        self.check(&mut self.slot.lock(), identity, now_ms)
    }

    /// Validate, and re-create the session if validation fails, under one
    /// lock. Returns the live session id and the outcome of the validation.
    pub fn validate_or_create(
        &self,
        identity: &Identity,
        now_ms: u64,
    ) -> (SessionId, SessionCheck) {
        let mut slot = self.slot.lock();
        match self.check(&mut slot, identity, now_ms) {
            SessionCheck::Valid(id) => (id.clone(), SessionCheck::Valid(id)),
            failed => (Self::fill(&mut slot, identity, now_ms), failed),
        }
    }

    fn check(
        &self,
        slot: &mut Option<Session>,
        identity: &Identity,
        now_ms: u64,
    ) -> SessionCheck {
        let Some(session) = slot.as_mut() else {
            return SessionCheck::Missing;
        };

        let idle = now_ms.saturating_sub(session.last_activity_ms);
        if idle > self.duration_ms {
            tracing::warn!(
                identity = %session.identity.short(),
                idle_ms = idle,
                "Session expired"
            );
            *slot = None;
            return SessionCheck::Expired;
        }

        if session.identity != *identity {
            return SessionCheck::IdentityMismatch;
        }

        session.last_activity_ms = now_ms;
        SessionCheck::Valid(session.session_id.clone())
    }

    fn fill(slot: &mut Option<Session>, identity: &Identity, now_ms: u64) -> SessionId {
        let session = Session {
            session_id: SessionId::generate(),
            identity: identity.clone(),
            created_at_ms: now_ms,
            last_activity_ms: now_ms,
        };
        let session_id = session.session_id.clone();

        match slot.replace(session) {
            Some(old) if old.identity != *identity => tracing::info!(
                identity = %identity.short(),
                previous = %old.identity.short(),
                session = %session_id,
                "Session replaced for different identity"
            ),
            _ => tracing::info!(
                identity = %identity.short(),
                session = %session_id,
                "Session created"
            ),
        }
        session_id
    }

    /// Empty the slot unconditionally.
    pub fn clear_session(&self) {
        if let Some(old) = self.slot.lock().take() {
            tracing::info!(identity = %old.identity.short(), "Session cleared");
        }
    }

    /// Copy of the current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.slot.lock().clone()
    }

    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}
