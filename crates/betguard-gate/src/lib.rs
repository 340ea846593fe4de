//! # betguard-gate
//!
//! Abuse-prevention gate for the **BetGuard** betting front end.
//!
//! Every attempted bet passes through an [`ActionGate`] before anything is
//! signed or sent to the chain. The gate combines four guards:
//!
//! - [`RateLimiter`]: sliding-window attempt limit per identity
//! - [`SessionStore`]: single-slot session with sliding expiry
//! - [`AnomalyClassifier`]: amount policy and bot-like cadence detection
//! - [`NonceRegistry`]: bounded FIFO replay detection
//!
//! plus a [`BotSignal`] (by default a [`HoneypotLatch`]) that short-circuits
//! everything once tripped.
//!
//! ## Decision Flow
//!
//! ```text
//! ActionRequest
//!      │
//!      ▼
//! ┌──────────┐  tripped   ┌───────────────┐
//! │ bot trap │──────────▶ │ BOT_SUSPECTED │
//! └────┬─────┘            └───────────────┘
//!      ▼
//! ┌──────────┐  full      ┌──────────────┐
//! │   rate   │──────────▶ │ RATE_LIMITED │
//! └────┬─────┘            └──────────────┘
//!      ▼
//! ┌──────────┐  invalid → re-create, continue
//! │ session  │
//! └────┬─────┘
//!      ▼
//! ┌──────────┐  amount    ┌────────────────┐
//! │ anomaly  │──────────▶ │ INVALID_AMOUNT │
//! │          │  cadence   ┌─────────────────────┐
//! │          │──────────▶ │ SUSPICIOUS_ACTIVITY │
//! └────┬─────┘            └─────────────────────┘
//!      ▼
//! ┌──────────┐  seen      ┌─────────────────┐
//! │  nonce   │──────────▶ │ REPLAY_DETECTED │
//! └────┬─────┘            └─────────────────┘
//!      ▼
//!   Approval
//! ```
//!
//! Time comes from a [`Clock`]; tests drive a [`ManualClock`].

pub mod anomaly;
pub mod bot_trap;
pub mod clock;
pub mod gate;
pub mod nonce_registry;
pub mod rate_limiter;
pub mod sanitize;
pub mod session;
pub mod stats;
pub mod telemetry;

pub use anomaly::{AnomalyClassifier, AnomalyVerdict};
pub use bot_trap::{BotSignal, HoneypotLatch};
pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{ActionExecutor, ActionGate};
pub use nonce_registry::NonceRegistry;
pub use rate_limiter::RateLimiter;
pub use session::{Session, SessionCheck, SessionStore};
pub use stats::{GateStats, GateStatsSnapshot};
pub use telemetry::{LogFormat, init_tracing};
