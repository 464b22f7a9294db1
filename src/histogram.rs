//! Digit-histogram pre-pass (spec §4.2, component C2).
//!
//! One linear read over the input builds, for every digit position, a
//! 256-entry frequency table. The per-pass tables are cache-line aligned
//! (via [`cuneiform`], the same crate the teacher implementation uses for
//! its radix counts) so the inner accumulation loops over independent
//! cache lines and can vectorize per spec's "each inner accumulation must
//! be independent" contract.

use crate::key::RadixKey;
use cuneiform::cuneiform;

#[cuneiform]
struct CountsBlock {
    data: [u64; 256],
}

/// Digit histogram `H` from spec §3: one 256-entry counter block per pass.
pub(crate) struct Histogram {
    width: usize,
    blocks: Vec<CountsBlock>,
    len: usize,
}

impl Histogram {
    /// Counters for digit pass `p`.
    pub(crate) fn counts(&self, pass: usize) -> &[u64; 256] {
        &self.blocks[pass].data
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// A pass is trivial (spec §4.3 step 1) when a single bucket holds
    /// every element — the permutation induced by that pass is the
    /// identity, so it can be elided entirely.
    pub(crate) fn is_trivial(&self, pass: usize) -> bool {
        self.len != 0 && self.counts(pass).iter().any(|&c| c as usize == self.len)
    }
}

/// Builds the digit histogram for `input` (spec §4.2 `build_histograms`).
///
/// Edge policy: `N = 0` yields a zero-width-effective histogram (every
/// pass trivially skipped by the planner); the caller is responsible for
/// short-circuiting before this is even invoked (spec §4.2 edge policy),
/// but calling it with an empty slice is itself well defined and cheap.
pub(crate) fn build_histograms<K: RadixKey>(input: &[K]) -> Histogram {
    let width = K::WIDTH;
    let mut blocks: Vec<CountsBlock> = (0..width)
        .map(|_| CountsBlock { data: [0u64; 256] })
        .collect();

    for item in input {
        for (pass, block) in blocks.iter_mut().enumerate() {
            let d = item.digit_byte(pass) as usize;
            block.data[d] += 1;
        }
    }

    Histogram {
        width,
        blocks,
        len: input.len(),
    }
}
