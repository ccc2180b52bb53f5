//! # Randstream
//!
//! High-throughput stream of pseudo-random 64-bit words, emitted as raw bytes.
//! One double-buffered pipeline per core keeps the sink saturated.

//! # Usage
//! ```rust
//! use randstream::{Algorithm, Generator, RunConfig, WriteSink};
//!
//! // 1. Deterministic word stream
//! let mut gen = Generator::new(Algorithm::XorShift64, 123456789);
//! let word = gen.next_u64();
//! assert_ne!(word, 0);
//!
//! // 2. Bounded run into any `std::io::Write` sink
//! let sink = WriteSink::new(Vec::new());
//! let config = RunConfig {
//!     count: 64,
//!     ..RunConfig::default()
//! };
//! randstream::run(&config, &sink)?;
//! assert_eq!(sink.into_inner().len(), 64);
//! # Ok::<(), randstream::RunError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod ascii;
mod engine;
mod generator;
mod sink;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

pub use ascii::AsciiFilter;
pub use engine::run;
pub use generator::Generator;
pub use sink::{Sink, SinkError, WriteSink};
pub use types::{Algorithm, ConfigError, RunConfig, RunError, BUFFER_BYTES, BUFFER_WORDS};
