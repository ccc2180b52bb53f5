//! Output sinks.
//!
//! The engine treats the sink as an opaque consumer of byte slices: each
//! `emit` either accepts the whole slice or fails, and a failure is terminal
//! for the run. Sinks are invoked concurrently by multiple workers, one
//! complete buffer per call.

use std::error;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

// =============================================================================
// ERROR TYPE
// =============================================================================

/// A sink rejected or could not complete an emission.
///
/// Never retried; the first one observed ends the run.
#[derive(Debug)]
pub struct SinkError {
    source: io::Error,
}

impl SinkError {
    /// The kind of the underlying I/O failure.
    ///
    /// A `BrokenPipe` here is the ordinary way an unbounded run ends.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sink write failed: {}", self.source)
    }
}

impl error::Error for SinkError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<io::Error> for SinkError {
    fn from(source: io::Error) -> Self {
        Self { source }
    }
}

// =============================================================================
// SINK TRAIT
// =============================================================================

/// Consumer of emitted byte slices.
///
/// Must be safe under concurrent invocation: each call is a complete,
/// non-interleaved transfer of one buffer's bytes, but distinct workers may
/// call at any time and their buffers interleave in any order.
pub trait Sink: Sync {
    /// Accept the whole slice or fail.
    ///
    /// # Errors
    /// Returns a [`SinkError`] when the slice could not be written in full.
    /// The caller treats this as permanent and raises the shared stop flag.
    fn emit(&self, bytes: &[u8]) -> Result<(), SinkError>;
}

// =============================================================================
// WRITE ADAPTER
// =============================================================================

/// Adapts any [`std::io::Write`] into a [`Sink`].
///
/// A mutex serializes writers that are not already atomic per call, keeping
/// each emitted buffer contiguous in the output.
#[derive(Debug)]
pub struct WriteSink<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriteSink<W> {
    /// Wrap a writer.
    pub const fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Consume the sink, returning the writer.
    ///
    /// Recovers the writer even if a worker panicked while holding the lock.
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for WriteSink<W> {
    fn emit(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut writer = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        writer.write_all(bytes)?;
        Ok(())
    }
}
