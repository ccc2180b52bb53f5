//! Printable-ASCII rejection sampler.
//!
//! Draws words from a generator, masks each constituent byte to 7 bits and
//! keeps only those landing in the printable range `[32, 126]`. Rejection
//! keeps the accepted distribution unbiased; the filter's sole state is the
//! underlying generator, so partial fills across calls stay lossless.

use crate::generator::Generator;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Lowest accepted byte (space).
pub const ASCII_MIN: u8 = 32;

/// Highest accepted byte (tilde).
pub const ASCII_MAX: u8 = 126;

// =============================================================================
// ASCII FILTER
// =============================================================================

/// Restricts a generator's output to printable ASCII via rejection sampling.
///
/// For a constant generator whose word contains no printable candidate byte
/// the loop would never accept anything; the engine rejects that
/// configuration up front (see [`crate::RunConfig`]).
#[derive(Debug, Clone)]
pub struct AsciiFilter {
    inner: Generator,
}

impl AsciiFilter {
    /// Wrap a generator.
    #[must_use]
    pub const fn new(inner: Generator) -> Self {
        Self { inner }
    }

    /// Produce the next accepted byte, always in `[32, 126]`.
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        loop {
            let word = self.inner.next_u64();
            for byte in word.to_ne_bytes() {
                let candidate = byte & 0x7f;
                if (ASCII_MIN..=ASCII_MAX).contains(&candidate) {
                    return candidate;
                }
            }
        }
    }

    /// Fill `out` entirely with accepted bytes.
    ///
    /// Requesting `n` bytes yields exactly `n` bytes. Candidate bytes left
    /// over in the final drawn word are discarded, not carried to the next
    /// call.
    pub fn fill(&mut self, out: &mut [u8]) {
        let mut filled = 0;
        while filled < out.len() {
            let word = self.inner.next_u64();
            for byte in word.to_ne_bytes() {
                let candidate = byte & 0x7f;
                if (ASCII_MIN..=ASCII_MAX).contains(&candidate) {
                    out[filled] = candidate;
                    filled += 1;
                    if filled == out.len() {
                        return;
                    }
                }
            }
        }
    }

    /// Does the masked word contain at least one printable candidate byte?
    ///
    /// Used to refuse constant sources that rejection sampling could never
    /// accept from.
    #[must_use]
    pub fn word_has_printable(word: u64) -> bool {
        word.to_ne_bytes()
            .into_iter()
            .any(|byte| (ASCII_MIN..=ASCII_MAX).contains(&(byte & 0x7f)))
    }

    /// Consume the filter, returning the underlying generator.
    #[must_use]
    pub fn into_inner(self) -> Generator {
        self.inner
    }
}
