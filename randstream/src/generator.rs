//! Pseudo-random word generators.
//!
//! A closed enum over the algorithm variants, dispatched once per worker at
//! construction time. The fill loops are specialized per variant so the hot
//! per-word path carries no indirection.

use crate::types::Algorithm;

// =============================================================================
// GENERATOR
// =============================================================================

/// Stateful source of successive 64-bit pseudo-random or constant words.
///
/// Deterministic given seed and call index; one instance is owned exclusively
/// by the worker that created it and is never shared.
#[derive(Debug, Clone)]
pub enum Generator {
    /// Marsaglia xorshift with 192 bits of state.
    XorShift96 {
        /// Seeded word, rotated through `y` and `z` each step.
        x: u64,
        /// Second state word, initially 362436069.
        y: u64,
        /// Third state word, initially 521288629; each output is the new `z`.
        z: u64,
    },
    /// xorshift64* with a finalizing multiply.
    XorShift64 {
        /// The single state word, seeded directly.
        x: u64,
    },
    /// Degenerate source that repeats one word forever (`Zero` / `Const`).
    Constant {
        /// The word returned by every call.
        word: u64,
    },
}

impl Generator {
    /// Construct a generator of the given kind from a seed.
    ///
    /// `Zero` ignores the seed entirely; `Const` repeats it verbatim.
    #[must_use]
    pub const fn new(algorithm: Algorithm, seed: u64) -> Self {
        match algorithm {
            Algorithm::XorShift96 => Self::XorShift96 {
                x: seed,
                y: 362_436_069,
                z: 521_288_629,
            },
            Algorithm::XorShift64 => Self::XorShift64 { x: seed },
            Algorithm::Zero => Self::Constant { word: 0 },
            Algorithm::Const => Self::Constant { word: seed },
        }
    }

    /// Produce the next 64-bit word.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        match self {
            Self::XorShift96 { x, y, z } => step96(x, y, z),
            Self::XorShift64 { x } => step64(x),
            Self::Constant { word } => *word,
        }
    }

    /// Whether every call returns the same word.
    ///
    /// Lets the engine fill one buffer once and replay it instead of
    /// regenerating identical contents on every cycle.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant { .. })
    }

    /// The repeated word of a constant generator, if this is one.
    #[must_use]
    pub const fn constant_word(&self) -> Option<u64> {
        match self {
            Self::Constant { word } => Some(*word),
            _ => None,
        }
    }

    /// Fill `out` with successive words in native byte order.
    ///
    /// A trailing chunk shorter than 8 bytes takes the leading bytes of one
    /// final word. The variant is matched once, outside the hot loop.
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        match self {
            Self::XorShift96 { x, y, z } => fill_words(out, || step96(x, y, z)),
            Self::XorShift64 { x } => fill_words(out, || step64(x)),
            Self::Constant { word } => fill_words(out, || *word),
        }
    }
}

// =============================================================================
// STEP FUNCTIONS
// =============================================================================

/// One step of xorshift96. The shifted-xor transform is a bijection on the
/// non-zero state space, so a non-zero seed never collapses to all zeros.
#[inline]
fn step96(x: &mut u64, y: &mut u64, z: &mut u64) -> u64 {
    *x ^= *x << 16;
    *x ^= *x >> 5;
    *x ^= *x << 1;

    let t = *x;
    *x = *y;
    *y = *z;
    *z = t ^ *x ^ *y;

    *z
}

/// One step of xorshift64*.
#[inline]
fn step64(x: &mut u64) -> u64 {
    *x ^= *x >> 12;
    *x ^= *x << 25;
    *x ^= *x >> 27;

    x.wrapping_mul(2_685_821_657_736_338_717)
}

/// Write successive words into a byte slice, 8 bytes at a time.
#[inline]
fn fill_words(out: &mut [u8], mut next: impl FnMut() -> u64) {
    let mut chunks = out.chunks_exact_mut(8);
    for chunk in &mut chunks {
        chunk.copy_from_slice(&next().to_ne_bytes());
    }
    let tail = chunks.into_remainder();
    if !tail.is_empty() {
        let bytes = next().to_ne_bytes();
        tail.copy_from_slice(&bytes[..tail.len()]);
    }
}
