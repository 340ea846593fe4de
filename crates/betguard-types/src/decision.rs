//! Gate decisions: an [`Approval`] or a typed [`DenialReason`].
//!
//! # Decision Flow
//!
//! ```text
//! ActionRequest
//!   → bot trap            → BOT_SUSPECTED
//!   → rate limiter        → RATE_LIMITED
//!   → session (self-heal, never denies)
//!   → anomaly classifier  → INVALID_AMOUNT | SUSPICIOUS_ACTIVITY
//!   → nonce registry      → REPLAY_DETECTED
//!   → Approval → downstream executor
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BetAmount, ContextId, Identity, Nonce, SessionId};

/// Why the anomaly classifier flagged an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyReason {
    /// Amount is not a member of the allowed bet set.
    InvalidAmount,
    /// Inter-arrival times are both fast and suspiciously uniform.
    BotLikeCadence,
}

impl fmt::Display for AnomalyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount => write!(f, "invalid amount"),
            Self::BotLikeCadence => write!(f, "bot-like betting pattern detected"),
        }
    }
}

/// Closed set of reasons an action is turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialReason {
    /// The browsing context tripped the honeypot.
    BotSuspected,
    /// Too many actions inside the sliding window.
    RateLimited,
    /// The classifier flagged the cadence.
    SuspiciousActivity { reason: AnomalyReason },
    /// The nonce was already registered.
    ReplayDetected,
    /// The amount is not one of the allowed bets.
    InvalidAmount,
}

impl DenialReason {
    /// Stable wire code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BotSuspected => "BOT_SUSPECTED",
            Self::RateLimited => "RATE_LIMITED",
            Self::SuspiciousActivity { .. } => "SUSPICIOUS_ACTIVITY",
            Self::ReplayDetected => "REPLAY_DETECTED",
            Self::InvalidAmount => "INVALID_AMOUNT",
        }
    }

    /// Message shown to the player.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BotSuspected => {
                "Suspicious activity detected. Please refresh the page.".to_string()
            }
            Self::RateLimited => {
                "Too many bets. Please wait a moment before trying again.".to_string()
            }
            Self::SuspiciousActivity { reason } => format!("Security alert: {reason}"),
            Self::ReplayDetected => "Duplicate transaction detected.".to_string(),
            Self::InvalidAmount => "Invalid bet amount detected.".to_string(),
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuspiciousActivity { reason } => write!(f, "{}: {reason}", self.code()),
            _ => f.write_str(self.code()),
        }
    }
}

impl From<AnomalyReason> for DenialReason {
    fn from(reason: AnomalyReason) -> Self {
        match reason {
            AnomalyReason::InvalidAmount => Self::InvalidAmount,
            AnomalyReason::BotLikeCadence => Self::SuspiciousActivity { reason },
        }
    }
}

/// Proof that an action passed every check. The only thing the downstream
/// executor accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub identity: Identity,
    pub amount: BetAmount,
    pub nonce: Nonce,
    pub session_id: SessionId,
    pub context: ContextId,
    /// The single "now" read at the start of the evaluation.
    pub approved_at_ms: u64,
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    Approved(Approval),
    Denied(DenialReason),
}

impl GateDecision {
    #[must_use]
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved(_))
    }

    #[must_use]
    pub fn approval(&self) -> Option<&Approval> {
        match self {
            Self::Approved(a) => Some(a),
            Self::Denied(_) => None,
        }
    }

    #[must_use]
    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            Self::Approved(_) => None,
            Self::Denied(r) => Some(*r),
        }
    }

    /// Convert into a `Result` so callers can use `?`.
    pub fn into_result(self) -> std::result::Result<Approval, DenialReason> {
        match self {
            Self::Approved(a) => Ok(a),
            Self::Denied(r) => Err(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_codes_are_fixed() {
        let codes: Vec<&str> = [
            DenialReason::BotSuspected,
            DenialReason::RateLimited,
            DenialReason::SuspiciousActivity {
                reason: AnomalyReason::BotLikeCadence,
            },
            DenialReason::ReplayDetected,
            DenialReason::InvalidAmount,
        ]
        .iter()
        .map(DenialReason::code)
        .collect();
        assert_eq!(
            codes,
            vec![
                "BOT_SUSPECTED",
                "RATE_LIMITED",
                "SUSPICIOUS_ACTIVITY",
                "REPLAY_DETECTED",
                "INVALID_AMOUNT"
            ]
        );
    }

    #[test]
    fn suspicious_activity_propagates_reason() {
        let denial = DenialReason::from(AnomalyReason::BotLikeCadence);
        assert_eq!(
            denial.to_string(),
            "SUSPICIOUS_ACTIVITY: bot-like betting pattern detected"
        );
        assert!(denial.user_message().starts_with("Security alert:"));
    }

    #[test]
    fn invalid_amount_anomaly_maps_to_invalid_amount() {
        assert_eq!(
            DenialReason::from(AnomalyReason::InvalidAmount),
            DenialReason::InvalidAmount
        );
    }

    #[test]
    fn denial_serializes_with_code_tag() {
        let json = serde_json::to_string(&DenialReason::RateLimited).unwrap();
        assert_eq!(json, r#"{"code":"RATE_LIMITED"}"#);
        let json = serde_json::to_string(&DenialReason::SuspiciousActivity {
            reason: AnomalyReason::BotLikeCadence,
        })
        .unwrap();
        assert!(json.contains("SUSPICIOUS_ACTIVITY"));
        assert!(json.contains("BotLikeCadence"));
    }

    #[test]
    fn decision_accessors() {
        let denied = GateDecision::Denied(DenialReason::ReplayDetected);
        assert!(!denied.is_approved());
        assert!(denied.approval().is_none());
        assert_eq!(denied.denial(), Some(DenialReason::ReplayDetected));
        assert_eq!(
            denied.into_result().unwrap_err(),
            DenialReason::ReplayDetected
        );
    }
}
