//! Seeded pseudo-random numbers for pattern generation.
//!
//! Generation must be a pure function of its parameters, so every random
//! choice comes from this generator seeded with `GenerateParams::seed`.
//! The sequence is part of the output contract: changing the constants
//! changes every generated pattern.

/// A small, deterministic pseudo-random number generator.
///
/// 64-bit LCG with Knuth's MMIX multiplier/increment; the high bits feed
/// the float and index helpers.
///
/// # Example
/// ```
/// use kolam::rng::Rng;
///
/// let mut rng = Rng::new(12345);
/// let value = rng.next_f64(); // in [0, 1)
/// assert!(value < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a generator. The same seed always yields the same sequence.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    #[inline]
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Pick one element, or `None` from an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.next_index(items.len()))
        }
    }
}
