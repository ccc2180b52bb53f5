//! Engine run-mode tests.
//!
//! Covers exact byte accounting in bounded mode, the fill-once-replay
//! constant path, and cooperative shutdown of the parallel generated mode
//! when the sink fails.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used)]

use randstream::{
    Algorithm, Generator, RunConfig, RunError, Sink, SinkError, WriteSink, BUFFER_BYTES,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// =============================================================================
// TEST SINKS
// =============================================================================

/// Accepts the first `limit` emissions, then fails every call with a broken
/// pipe. Records each accepted buffer and the total number of calls.
struct FailAfter {
    limit: usize,
    calls: AtomicUsize,
    chunks: Mutex<Vec<Vec<u8>>>,
}

impl FailAfter {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            calls: AtomicUsize::new(0),
            chunks: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn chunks(self) -> Vec<Vec<u8>> {
        self.chunks.into_inner().unwrap()
    }
}

impl Sink for FailAfter {
    fn emit(&self, bytes: &[u8]) -> Result<(), SinkError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.limit {
            self.chunks.lock().unwrap().push(bytes.to_vec());
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed").into())
        }
    }
}

fn config(algorithm: Algorithm) -> RunConfig {
    RunConfig {
        algorithm,
        seed: 123456789,
        count: 0,
        ascii: false,
        workers: 1,
    }
}

// =============================================================================
// BOUNDED COUNT MODE
// =============================================================================

#[test]
fn bounded_emits_exactly_seventeen_bytes() {
    let sink = WriteSink::new(Vec::new());
    let cfg = RunConfig {
        count: 17,
        ..config(Algorithm::XorShift96)
    };

    randstream::run(&cfg, &sink).unwrap();
    assert_eq!(sink.into_inner().len(), 17, "final slice must be truncated");
}

#[test]
fn bounded_handles_counts_beyond_one_buffer() {
    let sink = WriteSink::new(Vec::new());
    let cfg = RunConfig {
        count: BUFFER_BYTES as u64 * 2 + 5,
        ..config(Algorithm::XorShift64)
    };

    randstream::run(&cfg, &sink).unwrap();
    assert_eq!(sink.into_inner().len(), BUFFER_BYTES * 2 + 5);
}

#[test]
fn bounded_output_matches_the_raw_generator_stream() {
    let sink = WriteSink::new(Vec::new());
    let cfg = RunConfig {
        count: 32,
        ..config(Algorithm::XorShift64)
    };
    randstream::run(&cfg, &sink).unwrap();

    let mut expected = [0u8; 32];
    Generator::new(Algorithm::XorShift64, 123456789).fill_bytes(&mut expected);
    assert_eq!(sink.into_inner().as_slice(), expected.as_slice());
}

#[test]
fn bounded_respects_the_ascii_flag() {
    let sink = WriteSink::new(Vec::new());
    let cfg = RunConfig {
        count: 1000,
        ascii: true,
        ..config(Algorithm::XorShift96)
    };

    randstream::run(&cfg, &sink).unwrap();
    let out = sink.into_inner();
    assert_eq!(out.len(), 1000);
    assert!(out.iter().all(|&b| (32..=126).contains(&b)));
}

#[test]
fn bounded_propagates_a_sink_failure() {
    let sink = FailAfter::new(1);
    let cfg = RunConfig {
        count: BUFFER_BYTES as u64 * 3,
        ..config(Algorithm::XorShift96)
    };

    let err = randstream::run(&cfg, &sink).unwrap_err();
    assert!(matches!(err, RunError::Sink(_)));
    assert_eq!(sink.calls(), 2, "no further emission after the failure");
}

// =============================================================================
// UNBOUNDED CONSTANT MODE
// =============================================================================

#[test]
fn constant_mode_replays_one_zero_buffer() {
    let sink = FailAfter::new(3);
    let cfg = config(Algorithm::Zero);

    let err = randstream::run(&cfg, &sink).unwrap_err();
    assert!(matches!(err, RunError::Sink(_)));

    let chunks = sink.chunks();
    assert_eq!(chunks.len(), 3);
    for chunk in &chunks {
        assert_eq!(chunk.len(), BUFFER_BYTES);
        assert!(chunk.iter().all(|&b| b == 0));
    }
}

#[test]
fn constant_mode_honors_ascii() {
    let sink = FailAfter::new(2);
    let cfg = RunConfig {
        ascii: true,
        seed: 0x41,
        ..config(Algorithm::Const)
    };

    randstream::run(&cfg, &sink).unwrap_err();
    for chunk in sink.chunks() {
        assert!(chunk.iter().all(|&b| b == b'A'));
    }
}

#[test]
fn unprintable_constant_under_ascii_is_a_config_error() {
    let sink = WriteSink::new(Vec::new());
    let cfg = RunConfig {
        ascii: true,
        ..config(Algorithm::Zero)
    };

    let err = randstream::run(&cfg, &sink).unwrap_err();
    assert!(
        matches!(err, RunError::Config(_)),
        "zero source under --ascii can never be sampled, must fail up front"
    );
    assert!(sink.into_inner().is_empty(), "no partial output on config error");
}

// =============================================================================
// UNBOUNDED GENERATED MODE
// =============================================================================

#[test]
fn generated_mode_stops_all_workers_after_a_sink_failure() {
    let workers = 4;
    let sink = FailAfter::new(3);
    let cfg = RunConfig {
        workers,
        ..config(Algorithm::XorShift64)
    };

    // `run` only returns once every producer and consumer thread has joined.
    let err = randstream::run(&cfg, &sink).unwrap_err();
    assert!(matches!(err, RunError::Sink(_)));

    // Cooperative shutdown: each worker may attempt at most a short tail of
    // emissions after the first failure.
    let calls = sink.calls();
    assert!(
        calls <= 3 + 2 * workers,
        "drain tail too long: {calls} total sink calls"
    );

    let chunks = sink.chunks();
    assert_eq!(chunks.len(), 3, "exactly the successful emissions are kept");
    for chunk in &chunks {
        assert_eq!(chunk.len(), BUFFER_BYTES, "workers emit whole buffers only");
    }
}

#[test]
fn generated_workers_produce_distinct_buffers() {
    let sink = FailAfter::new(3);
    let cfg = RunConfig {
        workers: 2,
        ..config(Algorithm::XorShift64)
    };

    randstream::run(&cfg, &sink).unwrap_err();
    let chunks = sink.chunks();
    for i in 0..chunks.len() {
        for j in (i + 1)..chunks.len() {
            assert_ne!(
                chunks[i], chunks[j],
                "buffers {i} and {j} are identical; worker streams must diverge"
            );
        }
    }
}

#[test]
fn generated_mode_honors_ascii() {
    let sink = FailAfter::new(2);
    let cfg = RunConfig {
        workers: 2,
        ascii: true,
        ..config(Algorithm::XorShift96)
    };

    randstream::run(&cfg, &sink).unwrap_err();
    for chunk in sink.chunks() {
        assert!(chunk.iter().all(|&b| (32..=126).contains(&b)));
    }
}

#[test]
fn zero_workers_clamps_to_one() {
    let sink = FailAfter::new(1);
    let cfg = RunConfig {
        workers: 0,
        ..config(Algorithm::XorShift96)
    };

    // Must still make progress (and terminate) with the minimum of one worker.
    randstream::run(&cfg, &sink).unwrap_err();
    assert_eq!(sink.chunks().len(), 1);
}
