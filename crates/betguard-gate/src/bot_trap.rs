//! Bot-trap signal.
//!
//! The UI hides a honeypot field that a human never touches. Whatever wires
//! that field up reports through [`BotSignal`]; the gate only reads a
//! boolean.

use std::sync::atomic::{AtomicBool, Ordering};

/// Has this browsing context tripped the honeypot?
pub trait BotSignal: Send + Sync {
    fn tripped(&self) -> bool;
}

/// Sticky per-context latch. Once tripped it stays tripped for the life of
/// the context.
#[derive(Debug, Default)]
pub struct HoneypotLatch {
    tripped: AtomicBool,
}

impl HoneypotLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an interaction with the hidden field.
    pub fn trip(&self) {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            tracing::warn!("Honeypot field touched, context flagged as bot");
        }
    }
}

impl BotSignal for HoneypotLatch {
    fn tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }
}
