//! System-wide constants for the BetGuard action gate.

/// Default number of accepted actions per identity inside one rate window.
pub const DEFAULT_RATE_LIMIT_MAX_ATTEMPTS: usize = 10;

/// Default rate-limit window in milliseconds.
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Maximum nonces retained by the replay registry before FIFO eviction.
pub const MAX_NONCES: usize = 1000;

/// Sliding session lifetime in milliseconds (1 hour).
pub const SESSION_DURATION_MS: u64 = 3_600_000;

/// The cadence heuristic only runs when the history holds strictly more
/// than this many timestamps.
pub const CADENCE_MIN_SAMPLES: usize = 20;

/// Mean inter-arrival time (ms) below which a cadence counts as fast.
pub const CADENCE_MAX_MEAN_INTERVAL_MS: u64 = 2000;

/// Every delta must sit within this many ms of the mean for a cadence to
/// count as uniform.
pub const CADENCE_MAX_DEVIATION_MS: u64 = 500;

/// Default capacity of the caller-side action history ring buffer.
/// Must exceed [`CADENCE_MIN_SAMPLES`] for the cadence check to ever run.
pub const DEFAULT_HISTORY_CAPACITY: usize = CADENCE_MIN_SAMPLES + 1;

/// Decimal places of the native coin (1 OCT = 10^9 base units).
pub const OCT_DECIMALS: u32 = 9;

/// Smallest allowed bet in base units (0.01 OCT).
pub const MIN_BET: u64 = 10_000_000;

/// Largest allowed bet in base units (0.05 OCT).
pub const MAX_BET: u64 = 50_000_000;

/// Length of the random base36 suffix of a generated nonce.
pub const NONCE_SUFFIX_LEN: usize = 9;

/// Random bytes in a session identifier (rendered as hex).
pub const SESSION_ID_BYTES: usize = 32;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gate name.
pub const GATE_NAME: &str = "BetGuard";

/// Characters stripped from free-form input and never allowed in an identity.
pub const MARKUP_CHARS: [char; 4] = ['<', '>', '"', '\''];
