//! Shared types used across the randstream library.

use crate::sink::SinkError;
use std::error;
use std::fmt;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Size of one emission buffer in bytes (1 MiB).
///
/// Two buffers of this size are in flight per worker, bounding memory to
/// `2 * BUFFER_BYTES` per pipeline regardless of how far the sink lags.
pub const BUFFER_BYTES: usize = 1024 * 1024;

/// Number of 64-bit words that fit in one emission buffer.
pub const BUFFER_WORDS: usize = BUFFER_BYTES / 8;

// =============================================================================
// ALGORITHM SELECTION
// =============================================================================

/// Generator algorithm, chosen once per process.
///
/// `Zero` and `Const` are degenerate constant sources; the engine detects
/// them and replays a single filled buffer instead of regenerating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Marsaglia xorshift with three words of state (default).
    XorShift96,
    /// Single-word xorshift64* with a finalizing multiply.
    XorShift64,
    /// Always emits the zero word, ignoring the seed.
    Zero,
    /// Always emits the seed word unchanged.
    Const,
}

// =============================================================================
// RUN CONFIGURATION
// =============================================================================

/// Immutable configuration snapshot for one run.
///
/// Constructed once before any worker starts; read-only thereafter.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Generator algorithm for every worker.
    pub algorithm: Algorithm,
    /// Base seed; worker `i` seeds its generator with `seed + i` so that
    /// distinct workers do not reproduce identical sub-streams.
    pub seed: u64,
    /// Total bytes to emit; `0` means unbounded.
    pub count: u64,
    /// Restrict output to printable ASCII `[32, 126]` via rejection sampling.
    pub ascii: bool,
    /// Parallelism degree for the unbounded generated mode (minimum 1).
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::XorShift96,
            seed: 123456789,
            count: 0,
            ascii: false,
            workers: 1,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Error for a configuration that can never produce output.
///
/// Surfaced at startup, before any worker is spawned; fatal, with no
/// partial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    /// Create a new `ConfigError` with the given description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl error::Error for ConfigError {}

/// Any terminal failure of a run.
///
/// There are no recoverable error classes: a sink failure is permanent for
/// the remainder of the run, and a configuration error aborts before any
/// byte is produced.
#[derive(Debug)]
pub enum RunError {
    /// The configuration was rejected before any worker started.
    Config(ConfigError),
    /// The sink rejected or could not complete an emission.
    Sink(SinkError),
}

impl RunError {
    /// The sink error, if this run ended because the sink failed.
    #[must_use]
    pub const fn as_sink_error(&self) -> Option<&SinkError> {
        match self {
            Self::Sink(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => err.fmt(f),
            Self::Sink(err) => err.fmt(f),
        }
    }
}

impl error::Error for RunError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Sink(err) => Some(err),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<SinkError> for RunError {
    fn from(err: SinkError) -> Self {
        Self::Sink(err)
    }
}
