//! Double-buffered producer/consumer pipelines.
//!
//! Each worker owns two 1 MiB buffers that trade the "being filled" and
//! "being drained" roles every cycle through a single-slot rendezvous
//! (mutex + condvar). The producer can compute at most one buffer ahead of
//! the sink, bounding memory to two buffers per worker. The only state
//! shared between workers is the stop flag: write-once false->true, raised
//! on the first sink failure and observed by every loop within one cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use super::Source;
use crate::generator::Generator;
use crate::sink::{Sink, SinkError};
use crate::types::{RunConfig, BUFFER_BYTES};

// =============================================================================
// SINGLE-SLOT RENDEZVOUS
// =============================================================================

/// Buffer slots exchanged between one pipeline's two halves.
#[derive(Debug)]
struct Slots {
    /// Filled buffer travelling producer -> consumer.
    full: Option<Vec<u8>>,
    /// Drained buffer travelling consumer -> producer.
    empty: Option<Vec<u8>>,
    /// Set by whichever half exits first; wakes and releases the other.
    closed: bool,
}

/// Per-pipeline handoff cell.
///
/// Capacity is intentionally exactly one buffer in each direction; the flag
/// alternates strictly full -> empty -> full, so at most one half holds
/// write access to a given buffer at any instant.
#[derive(Debug)]
struct Handoff {
    slots: Mutex<Slots>,
    cond: Condvar,
}

impl Handoff {
    /// New handoff with the spare buffer already resting in the empty slot.
    fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                full: None,
                empty: Some(vec![0u8; BUFFER_BYTES]),
                closed: false,
            }),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Producer side: park the filled buffer, then wait for the drained one.
    ///
    /// Returns `None` once the consumer has closed the handoff; the filled
    /// buffer is abandoned, never emitted.
    fn exchange(&self, filled: Vec<u8>) -> Option<Vec<u8>> {
        let mut slots = self.lock();
        while slots.full.is_some() && !slots.closed {
            slots = self
                .cond
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if slots.closed {
            return None;
        }
        slots.full = Some(filled);
        self.cond.notify_all();

        while slots.empty.is_none() && !slots.closed {
            slots = self
                .cond
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if slots.closed {
            return None;
        }
        slots.empty.take()
    }

    /// Consumer side: wait for the next filled buffer.
    ///
    /// Returns `None` once the producer has closed the handoff and no filled
    /// buffer remains.
    fn take_full(&self) -> Option<Vec<u8>> {
        let mut slots = self.lock();
        while slots.full.is_none() && !slots.closed {
            slots = self
                .cond
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
        slots.full.take()
    }

    /// Consumer side: return a drained buffer to the producer.
    fn put_empty(&self, drained: Vec<u8>) {
        let mut slots = self.lock();
        slots.empty = Some(drained);
        self.cond.notify_all();
    }

    /// Release whichever half is still blocked; idempotent.
    fn close(&self) {
        let mut slots = self.lock();
        slots.closed = true;
        self.cond.notify_all();
    }
}

// =============================================================================
// PIPELINE HALVES
// =============================================================================

/// Filling half: compute a full buffer, swap it for the drained one.
fn producer_loop(mut source: Source, handoff: &Handoff, stop: &AtomicBool) {
    let mut buffer = vec![0u8; BUFFER_BYTES];
    while !stop.load(Ordering::Acquire) {
        source.fill(&mut buffer);
        match handoff.exchange(buffer) {
            Some(drained) => buffer = drained,
            None => return,
        }
    }
    handoff.close();
}

/// Draining half: emit each filled buffer whole; on failure raise the stop
/// flag and close the handoff so the producer cannot deadlock.
fn consumer_loop<S>(
    handoff: &Handoff,
    sink: &S,
    stop: &AtomicBool,
    failure: &Mutex<Option<SinkError>>,
) where
    S: Sink + ?Sized,
{
    while let Some(buffer) = handoff.take_full() {
        match sink.emit(&buffer) {
            Ok(()) => {
                handoff.put_empty(buffer);
                if stop.load(Ordering::Acquire) {
                    break;
                }
            }
            Err(err) => {
                stop.store(true, Ordering::Release);
                record_failure(failure, err);
                break;
            }
        }
    }
    handoff.close();
}

/// Keep only the first failure; later ones are echoes of the same shutdown.
fn record_failure(failure: &Mutex<Option<SinkError>>, err: SinkError) {
    let mut slot = failure.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(err);
    }
}

// =============================================================================
// FAN-OUT
// =============================================================================

/// Unbounded generated mode: one pipeline (producer + consumer thread) per
/// worker, generators seeded `seed + index` so the sub-streams diverge.
///
/// Only returns once every thread has terminated; the result is the first
/// sink failure observed.
pub(crate) fn run_generated<S>(config: &RunConfig, sink: &S) -> Result<(), SinkError>
where
    S: Sink + ?Sized,
{
    let workers = config.workers.max(1);
    let stop = AtomicBool::new(false);
    let failure: Mutex<Option<SinkError>> = Mutex::new(None);
    let handoffs: Vec<Handoff> = (0..workers).map(|_| Handoff::new()).collect();

    thread::scope(|scope| {
        for (index, handoff) in (0u64..).zip(handoffs.iter()) {
            let generator = Generator::new(config.algorithm, config.seed.wrapping_add(index));
            let source = Source::new(generator, config.ascii);
            let stop = &stop;
            let failure = &failure;

            scope.spawn(move || producer_loop(source, handoff, stop));
            scope.spawn(move || consumer_loop(handoff, sink, stop, failure));
        }
    });

    match failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
