//! # betguard-types
//!
//! Shared types, errors, and configuration for the **BetGuard** action gate.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Identity`], [`Nonce`], [`SessionId`], [`ContextId`]
//! - **Amount model**: [`BetAmount`]
//! - **Request model**: [`ActionRequest`], [`ActionHistory`]
//! - **Decision model**: [`GateDecision`], [`Approval`], [`DenialReason`], [`AnomalyReason`]
//! - **Configuration**: [`GateConfig`], [`RateLimitConfig`], [`NonceConfig`],
//!   [`SessionConfig`], [`AnomalyConfig`]
//! - **Errors**: [`BetguardError`] with `BG_ERR_` prefix codes
//! - **Constants**: default limits and the allowed bet set

pub mod action;
pub mod amount;
pub mod config;
pub mod constants;
pub mod decision;
pub mod error;
pub mod ids;

// Re-export all primary types at crate root for ergonomic imports:
//   use betguard_types::{Identity, ActionRequest, GateDecision, ...};

pub use action::*;
pub use amount::*;
pub use config::*;
pub use decision::*;
pub use error::*;
pub use ids::*;

// Constants are accessed via `betguard_types::constants::FOO`
// (not re-exported to avoid name collisions).
