//! Execution engine.
//!
//! Selects one of three run modes and drives it to completion:
//! 1. Bounded count — single buffer on the caller's thread, final slice
//!    truncated so the cumulative byte count matches exactly.
//! 2. Unbounded constant — one buffer filled once, replayed until the sink
//!    fails (the generator reports itself constant, so refilling is wasted
//!    work).
//! 3. Unbounded generated — one double-buffered pipeline per worker, all
//!    sharing a stop flag and the sink.

mod pipeline;

use crate::ascii::AsciiFilter;
use crate::generator::Generator;
use crate::sink::{Sink, SinkError};
use crate::types::{ConfigError, RunConfig, RunError, BUFFER_BYTES};

// =============================================================================
// WORD SOURCE
// =============================================================================

/// One worker's byte supply: a raw generator, or the same generator behind
/// the printable-ASCII rejection sampler.
#[derive(Debug)]
pub(crate) enum Source {
    /// Raw words in native byte order.
    Raw(Generator),
    /// Rejection-sampled printable bytes.
    Ascii(AsciiFilter),
}

impl Source {
    pub(crate) fn new(generator: Generator, ascii: bool) -> Self {
        if ascii {
            Self::Ascii(AsciiFilter::new(generator))
        } else {
            Self::Raw(generator)
        }
    }

    pub(crate) fn fill(&mut self, out: &mut [u8]) {
        match self {
            Self::Raw(generator) => generator.fill_bytes(out),
            Self::Ascii(filter) => filter.fill(out),
        }
    }
}

// =============================================================================
// RUN
// =============================================================================

/// Execute one run to completion.
///
/// Bounded runs (`count > 0`) return `Ok(())` once exactly `count` bytes have
/// been emitted. Unbounded runs only return when the sink fails; the first
/// failure observed comes back as [`RunError::Sink`].
///
/// # Errors
/// [`RunError::Config`] if the configuration can never produce output;
/// [`RunError::Sink`] when the sink rejected an emission.
pub fn run<S>(config: &RunConfig, sink: &S) -> Result<(), RunError>
where
    S: Sink + ?Sized,
{
    validate(config)?;

    let generator = Generator::new(config.algorithm, config.seed);
    let result = if config.count > 0 {
        run_bounded(config, generator, sink)
    } else if generator.is_constant() {
        run_constant(config, generator, sink)
    } else {
        pipeline::run_generated(config, sink)
    };

    result.map_err(RunError::from)
}

/// Reject configurations that could never emit a byte, before any worker
/// is spawned.
fn validate(config: &RunConfig) -> Result<(), ConfigError> {
    if config.ascii {
        let generator = Generator::new(config.algorithm, config.seed);
        if let Some(word) = generator.constant_word() {
            if !AsciiFilter::word_has_printable(word) {
                return Err(ConfigError::new(format!(
                    "constant word {word:#018x} has no printable ASCII byte; \
                     rejection sampling would never accept"
                )));
            }
        }
    }
    Ok(())
}

// =============================================================================
// SINGLE-THREADED MODES
// =============================================================================

/// Emit exactly `config.count` bytes, refilling one buffer per cycle and
/// truncating the final slice.
fn run_bounded<S>(config: &RunConfig, generator: Generator, sink: &S) -> Result<(), SinkError>
where
    S: Sink + ?Sized,
{
    let mut source = Source::new(generator, config.ascii);
    let mut buffer = vec![0u8; BUFFER_BYTES];
    let mut remaining = config.count;

    while remaining > 0 {
        let take = remaining.min(BUFFER_BYTES as u64);
        #[allow(clippy::cast_possible_truncation)]
        let len = take as usize;
        source.fill(&mut buffer[..len]);
        sink.emit(&buffer[..len])?;
        remaining -= take;
    }
    Ok(())
}

/// Fill one buffer once and replay it until the sink fails.
fn run_constant<S>(config: &RunConfig, generator: Generator, sink: &S) -> Result<(), SinkError>
where
    S: Sink + ?Sized,
{
    let mut source = Source::new(generator, config.ascii);
    let mut buffer = vec![0u8; BUFFER_BYTES];
    source.fill(&mut buffer);

    loop {
        sink.emit(&buffer)?;
    }
}
