//! The action gate: one allow/deny decision per attempted bet.
//!
//! ## Evaluation Order
//!
//! ```text
//! 1. bot trap          → BOT_SUSPECTED
//! 2. rate limiter      → RATE_LIMITED           (records on pass)
//! 3. session           → never denies; re-creates an invalid session
//! 4. anomaly classifier→ INVALID_AMOUNT | SUSPICIOUS_ACTIVITY
//! 5. nonce registry    → REPLAY_DETECTED         (records on pass)
//! ```
//!
//! First failure wins and nothing after it runs. Side effects of steps that
//! already passed are **not** rolled back: a denial at step 4 still consumes
//! the rate-limit slot taken at step 2, so repeated out-of-policy attempts
//! still run into the rate limit.
//!
//! "Now" is read once at the start of an evaluation and reused by every step.

use std::{fmt, sync::Arc};

use betguard_types::{
    ActionHistory, ActionRequest, Approval, BetAmount, BetguardError, ContextId, DenialReason,
    GateConfig, GateDecision, Identity, Nonce, Result, SessionId,
};

use crate::{
    AnomalyClassifier, BotSignal, Clock, HoneypotLatch, NonceRegistry, RateLimiter, SessionCheck,
    SessionStore, SystemClock,
    stats::{GateStats, GateStatsSnapshot},
};

/// Downstream collaborator that turns an [`Approval`] into a chain
/// transaction. Only ever called with an approval.
pub trait ActionExecutor {
    type Output;

    fn execute(&mut self, approval: Approval) -> Self::Output;
}

/// Orchestrates the four guards for one browsing context.
///
/// The rate limiter and nonce registry are process-wide and shared with
/// every context created through [`new_context`](Self::new_context); the
/// session slot and honeypot latch belong to this context alone. An external
/// [`BotSignal`] installed with [`with_bot_signal`](Self::with_bot_signal) is
/// inherited by derived contexts and checked alongside the latch.
pub struct ActionGate {
    context: ContextId,
    config: GateConfig,
    clock: Arc<dyn Clock>,
    rate_limiter: Arc<RateLimiter>,
    nonces: Arc<NonceRegistry>,
    sessions: SessionStore,
    classifier: AnomalyClassifier,
    honeypot: HoneypotLatch,
    external_signal: Option<Arc<dyn BotSignal>>,
    stats: Arc<GateStats>,
}

impl ActionGate {
    /// Gate with default policy on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::build(GateConfig::default(), Arc::new(SystemClock))
    }

    /// Gate with a validated custom policy and clock.
    pub fn try_new(config: GateConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    /// Gate from a JSON policy document on the system clock.
    pub fn from_json_config(json: &str) -> Result<Self> {
        let config = GateConfig::from_json_str(json)?;
        Ok(Self::build(config, Arc::new(SystemClock)))
    }

    fn build(config: GateConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            context: ContextId::new(),
            rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            nonces: Arc::new(NonceRegistry::from_config(&config.nonces)),
            sessions: SessionStore::from_config(&config.session),
            classifier: AnomalyClassifier::new(&config.anomaly),
            honeypot: HoneypotLatch::new(),
            external_signal: None,
            stats: Arc::new(GateStats::default()),
            clock,
            config,
        }
    }

    /// Add an external bot-trap source. The gate denies when either it or
    /// this context's [`HoneypotLatch`] is tripped.
    #[must_use]
    pub fn with_bot_signal(mut self, signal: Arc<dyn BotSignal>) -> Self {
        self.external_signal = Some(signal);
        self
    }

    /// A gate for another browsing context. Shares the clock, rate limiter,
    /// nonce registry, counters and external bot signal; gets its own session
    /// slot and honeypot.
    #[must_use]
    pub fn new_context(&self) -> Self {
        let gate = Self {
            context: ContextId::new(),
            config: self.config.clone(),
            clock: Arc::clone(&self.clock),
            rate_limiter: Arc::clone(&self.rate_limiter),
            nonces: Arc::clone(&self.nonces),
            sessions: SessionStore::from_config(&self.config.session),
            classifier: self.classifier.clone(),
            honeypot: HoneypotLatch::new(),
            external_signal: self.external_signal.clone(),
            stats: Arc::clone(&self.stats),
        };
        tracing::debug!(parent = %self.context, context = %gate.context, "Context opened");
        gate
    }

    /// Evaluate a request with a freshly generated nonce.
    pub fn evaluate(&self, request: &ActionRequest) -> GateDecision {
        self.evaluate_inner(request, None)
    }

    /// Evaluate a request whose nonce the caller generated just before
    /// submitting. A nonce already seen is denied with `REPLAY_DETECTED`.
    pub fn evaluate_with_nonce(&self, request: &ActionRequest, nonce: Nonce) -> GateDecision {
        self.evaluate_inner(request, Some(nonce))
    }

    /// Evaluate and, only on approval, hand the approval to `executor`.
    pub fn submit<E: ActionExecutor>(
        &self,
        request: &ActionRequest,
        executor: &mut E,
    ) -> std::result::Result<E::Output, DenialReason> {
        let approval = self.evaluate(request).into_result()?;
        Ok(executor.execute(approval))
    }

    fn evaluate_inner(&self, request: &ActionRequest, nonce: Option<Nonce>) -> GateDecision {
        let now_ms = self.clock.now_ms();
        self.stats.record_evaluated();

        match self.run_checks(request, nonce, now_ms) {
            Ok(approval) => {
                self.stats.record_approved();
                tracing::debug!(
                    context = %self.context,
                    identity = %request.identity.short(),
                    amount = %approval.amount,
                    nonce = %approval.nonce,
                    "Action approved"
                );
                GateDecision::Approved(approval)
            }
            Err(reason) => {
                self.stats.record_denial(reason);
                tracing::warn!(
                    context = %self.context,
                    identity = %request.identity.short(),
                    amount = request.amount,
                    reason = %reason,
                    "Action denied"
                );
                GateDecision::Denied(reason)
            }
        }
    }

    fn run_checks(
        &self,
        request: &ActionRequest,
        nonce: Option<Nonce>,
        now_ms: u64,
    ) -> std::result::Result<Approval, DenialReason> {
        let identity = &request.identity;

        // 1. Honeypot
        if self.bot_suspected() {
            return Err(DenialReason::BotSuspected);
        }

        // 2. Rate limit (records on pass, never rolled back)
        if !self.rate_limiter.is_allowed(identity, now_ms) {
            return Err(DenialReason::RateLimited);
        }

        // 3. Session (self-healing)
        let session_id = self.ensure_session(identity, now_ms);

        // 4. Amount policy + cadence
        let verdict =
            self.classifier
                .classify(identity, request.amount, &request.recent_action_timestamps);
        if let Some(reason) = verdict.reason {
            return Err(reason.into());
        }
        let amount =
            BetAmount::from_base_units(request.amount).ok_or(DenialReason::InvalidAmount)?;

        // 5. Replay
        let nonce = nonce.unwrap_or_else(|| NonceRegistry::generate(now_ms));
        if !self.nonces.validate(&nonce) {
            return Err(DenialReason::ReplayDetected);
        }

        Ok(Approval {
            identity: identity.clone(),
            amount,
            nonce,
            session_id,
            context: self.context,
            approved_at_ms: now_ms,
        })
    }

    fn bot_suspected(&self) -> bool {
        self.honeypot.tripped() || self.external_signal.as_ref().is_some_and(|s| s.tripped())
    }

    fn ensure_session(&self, identity: &Identity, now_ms: u64) -> SessionId {
        let (session_id, check) = self.sessions.validate_or_create(identity, now_ms);
        if !matches!(check, SessionCheck::Valid(_)) {
            tracing::debug!(
                identity = %identity.short(),
                ?check,
                "Session invalid, created a new one"
            );
            self.stats.record_session_healed();
        }
        session_id
    }

    /// Wallet connected: start a session for `identity`.
    pub fn connect(&self, identity: &Identity) -> SessionId {
        self.sessions.create_session(identity, self.clock.now_ms())
    }

    /// Wallet disconnected or view torn down: forget the identity's rate
    /// window and drop the session.
    pub fn teardown(&self, identity: &Identity) {
        self.rate_limiter.reset(identity);
        self.sessions.clear_session();
        tracing::info!(context = %self.context, identity = %identity.short(), "Context torn down");
    }

    /// Empty history sized for this gate's cadence check.
    #[must_use]
    pub fn new_history(&self) -> ActionHistory {
        ActionHistory::new(self.config.anomaly.history_capacity)
    }

    /// Record `now` into `history` and build a request from it, the way a
    /// UI does right before calling [`evaluate`](Self::evaluate).
    pub fn prepare_request(
        &self,
        identity: Identity,
        amount: u64,
        history: &mut ActionHistory,
    ) -> Result<ActionRequest> {
        if history.capacity() <= self.config.anomaly.min_samples {
            return Err(BetguardError::Configuration(format!(
                "history capacity {} cannot exceed cadence threshold {}",
                history.capacity(),
                self.config.anomaly.min_samples
            )));
        }
        history.record(self.clock.now_ms())?;
        Ok(ActionRequest::from_history(identity, amount, history))
    }

    #[must_use]
    pub fn context(&self) -> ContextId {
        self.context
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> GateStatsSnapshot {
        self.stats.snapshot()
    }

    /// The honeypot latch the UI should trip.
    #[must_use]
    pub fn honeypot(&self) -> &HoneypotLatch {
        &self.honeypot
    }

    #[must_use]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    #[must_use]
    pub fn nonces(&self) -> &NonceRegistry {
        &self.nonces
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

impl Default for ActionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionGate")
            .field("context", &self.context)
            .field("config", &self.config)
            .field("bot_trap", &self.bot_suspected())
            .finish_non_exhaustive()
    }
}
