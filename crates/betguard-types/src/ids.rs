//! Identifiers used throughout BetGuard.
//!
//! `Identity` is the caller-supplied actor key (a wallet address). `Nonce`
//! and `SessionId` are generated here from `rand`; `ContextId` uses UUIDv7
//! so browsing contexts sort by creation time in logs.

use std::fmt;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BetguardError, Result, constants};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable, opaque actor key (wallet address). Partitions all per-actor state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Wrap a wallet address.
    ///
    /// A missing or malformed identity is a caller bug, so this fails loudly
    /// instead of letting the gate deny it later.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(BetguardError::EmptyIdentity);
        }
        if let Some(c) = raw
            .chars()
            .find(|c| constants::MARKUP_CHARS.contains(c) || c.is_control())
        {
            return Err(BetguardError::InvalidIdentity {
                reason: format!("contains forbidden character {c:?}"),
            });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines (`0x1234…cdef`).
    #[must_use]
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 12 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}…{tail}")
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Identity {
    type Error = BetguardError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for Identity {
    type Error = BetguardError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// Nonce
// ---------------------------------------------------------------------------

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One-time action token: `"{now_ms}-{base36 suffix}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nonce(String);

impl Nonce {
    /// Generate a fresh nonce. Unique with overwhelming probability: the
    /// millisecond prefix separates time slots and the random suffix carries
    /// ~46 bits within a slot.
    #[must_use]
    pub fn generate(now_ms: u64) -> Self {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..constants::NONCE_SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("{now_ms}-{suffix}"))
    }

    /// Wrap a caller-supplied nonce (e.g. one echoed back by a client).
    pub fn from_raw(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(BetguardError::EmptyNonce);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Millisecond prefix of a generated nonce, if present.
    #[must_use]
    pub fn issued_at_ms(&self) -> Option<u64> {
        self.0.split_once('-').and_then(|(ts, _)| ts.parse().ok())
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Nonce {
    type Error = BetguardError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_raw(value)
    }
}

impl From<Nonce> for String {
    fn from(nonce: Nonce) -> Self {
        nonce.0
    }
}

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Random session token (32 bytes, lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a token received back from a client. Must be exactly what
    /// [`generate`](Self::generate) produces.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let expected = constants::SESSION_ID_BYTES * 2;
        if raw.len() != expected {
            return Err(BetguardError::InvalidSessionId {
                reason: format!("expected {expected} hex chars, got {} bytes", raw.len()),
            });
        }
        if !raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(BetguardError::InvalidSessionId {
                reason: "not lowercase hex".into(),
            });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; constants::SESSION_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sessions are bearer tokens; only the prefix goes to logs.
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "session:{prefix}")
    }
}

impl TryFrom<String> for SessionId {
    type Error = BetguardError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// ContextId
// ---------------------------------------------------------------------------

/// Identifier for one browsing context (one session slot, one bot-trap latch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ContextId(pub Uuid);

impl ContextId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx:{}", self.0)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Identity {
    /// Deterministic wallet-like identity for tests: `0x` + 40 hex chars.
    #[must_use]
    pub fn dummy(seed: u8) -> Self {
        Self(format!("0x{}", hex::encode([seed; 20])))
    }
}
