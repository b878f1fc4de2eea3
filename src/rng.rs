//! The shared generation contract.
//!
//! Every generator family implements [`Rng`] by supplying one forward step
//! ([`Rng::next_u64`]); everything else (32-bit output, bounded integers,
//! floating-point values, booleans, bytes) is derived from that step by the
//! provided methods here, so every family shares one set of
//! precisely-documented transformation semantics.
//!
//! # Bound semantics
//!
//! All two-argument integer forms follow one rule: the first argument is
//! always inclusive, the second is the excluded end for exclusive variants,
//! and the arguments may be given in either order; the result always lies
//! between them. Equal bounds return that value without consuming a step.
//! Bounded draws use one full-width word and a widening multiply, never a
//! rejection loop: the cost is a per-value deviation from exact uniformity
//! bounded by 2^-64 (2^-32 for the 32-bit forms), the gain is a fixed
//! instruction count per draw.
//!
//! # Usage
//!
//! ```rust
//! use fortress_rand::{BastionRandom, Rng, SeedableRng, random};
//!
//! // Global random (thread-local)
//! let value: u32 = random();
//!
//! // Seeded RNG for deterministic behavior
//! let mut rng = BastionRandom::seed_from_u64(12345);
//! let roll = rng.next_i32_range(1, 7);
//! assert!((1..7).contains(&roll));
//! ```

use std::cell::RefCell;

/// Seed-based construction, shared by every computing family.
///
/// A fixed seed reproduces the same run; an entropy seed gives a fresh one.
pub trait SeedableRng: Sized {
    /// Builds a generator whose sequence is fully determined by `seed`.
    ///
    /// Different seeds produce different (statistically independent)
    /// sequences; the same seed always reproduces the same infinite sequence.
    #[must_use]
    fn seed_from_u64(seed: u64) -> Self;

    /// Creates a new RNG with a random seed derived from system timing.
    ///
    /// This uses timing information and thread identity for entropy, which is
    /// sufficient for simulation PRNGs but NOT cryptographically secure. For
    /// deterministic behavior, always use [`seed_from_u64`] with a fixed seed
    /// instead.
    ///
    /// [`seed_from_u64`]: SeedableRng::seed_from_u64
    #[must_use]
    fn from_entropy() -> Self {
        Self::seed_from_u64(timing_entropy_seed())
    }
}

/// Trait for random number generation.
///
/// Requires one forward step, [`next_u64`]; every other draw is a provided
/// method derived from it. No method here fails or panics for any input:
/// crossed and equal bounds are defined inputs (see the module docs), not
/// errors. The one intentional exception in this crate is
/// [`KnownSeriesRandom`], which overrides these methods to replay scripted
/// values and fails loudly when a replayed value does not fit the requested
/// bounds.
///
/// [`next_u64`]: Rng::next_u64
/// [`KnownSeriesRandom`]: crate::families::known_series::KnownSeriesRandom
pub trait Rng {
    /// Returns the next 64-bit random value, advancing the state one step.
    fn next_u64(&mut self) -> u64;

    /// Returns the next 32-bit random value.
    ///
    /// For 64-bit-native families this is the top half of one [`next_u64`]
    /// step, never an independent draw. 32-bit-native families override it
    /// with one native step and define [`next_u64`] as two steps combined
    /// high word first.
    ///
    /// [`next_u64`]: Rng::next_u64
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Returns the sign bit of one 64-bit step as a boolean.
    fn next_bool(&mut self) -> bool {
        (self.next_u64() >> 63) == 1
    }

    /// Returns `true` with the given probability.
    ///
    /// `probability` is interpreted in `[0.0, 1.0]`; values at or beyond the
    /// ends behave as certainty (NaN behaves as 0). Exactly one word is
    /// consumed regardless of the probability, so replays stay aligned.
    fn next_bool_prob(&mut self, probability: f64) -> bool {
        let word = self.next_u64();
        if probability >= 1.0 {
            return true;
        }
        if probability <= 0.0 {
            return false;
        }
        let threshold = (probability * (u64::MAX as f64)) as u64;
        word < threshold
    }

    /// Returns a value in `[0, outer)`. `outer == 0` returns 0 without
    /// consuming a step.
    fn next_u32_bound(&mut self, outer: u32) -> u32 {
        if outer == 0 {
            return 0;
        }
        ((u64::from(self.next_u32()) * u64::from(outer)) >> 32) as u32
    }

    /// Returns a value in `[0, outer)`. `outer == 0` returns 0 without
    /// consuming a step.
    fn next_u64_bound(&mut self, outer: u64) -> u64 {
        if outer == 0 {
            return 0;
        }
        ((u128::from(self.next_u64()) * u128::from(outer)) >> 64) as u64
    }

    /// Returns a value between `inner` (inclusive) and `outer` (exclusive),
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. Crossed
    /// bounds (`inner > outer`) select from `[outer + 1, inner]`: the first
    /// argument stays attainable and the second stays excluded.
    fn next_u32_range(&mut self, inner: u32, outer: u32) -> u32 {
        if inner == outer {
            return inner;
        }
        let (low, span) = if inner < outer {
            (inner, outer - inner)
        } else {
            (outer.wrapping_add(1), inner - outer)
        };
        let offset = ((u64::from(self.next_u32()) * u64::from(span)) >> 32) as u32;
        low.wrapping_add(offset)
    }

    /// Returns a value between `inner` (inclusive) and `outer` (exclusive),
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. Crossed
    /// bounds (`inner > outer`) select from `[outer + 1, inner]`.
    fn next_u64_range(&mut self, inner: u64, outer: u64) -> u64 {
        if inner == outer {
            return inner;
        }
        let (low, span) = if inner < outer {
            (inner, outer - inner)
        } else {
            (outer.wrapping_add(1), inner - outer)
        };
        let offset = ((u128::from(self.next_u64()) * u128::from(span)) >> 64) as u64;
        low.wrapping_add(offset)
    }

    /// Returns a value between `inner` and `outer` with both ends inclusive,
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The full
    /// domain `[0, u32::MAX]` degenerates to a raw 32-bit draw.
    fn next_u32_inclusive(&mut self, inner: u32, outer: u32) -> u32 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (inner, outer)
        } else {
            (outer, inner)
        };
        let span = high.wrapping_sub(low).wrapping_add(1);
        if span == 0 {
            return self.next_u32();
        }
        let offset = ((u64::from(self.next_u32()) * u64::from(span)) >> 32) as u32;
        low.wrapping_add(offset)
    }

    /// Returns a value between `inner` and `outer` with both ends inclusive,
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The full
    /// domain `[0, u64::MAX]` degenerates to a raw 64-bit draw.
    fn next_u64_inclusive(&mut self, inner: u64, outer: u64) -> u64 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (inner, outer)
        } else {
            (outer, inner)
        };
        let span = high.wrapping_sub(low).wrapping_add(1);
        if span == 0 {
            return self.next_u64();
        }
        let offset = ((u128::from(self.next_u64()) * u128::from(span)) >> 64) as u64;
        low.wrapping_add(offset)
    }

    /// Returns a value between `inner` (inclusive) and `outer` (exclusive),
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. Crossed
    /// bounds (`inner > outer`) select from `[outer + 1, inner]`, so
    /// `next_i32_range(100, -101)` covers exactly `[-100, 100]`, the same
    /// closed interval as `next_i32_range(-100, 101)`.
    fn next_i32_range(&mut self, inner: i32, outer: i32) -> i32 {
        if inner == outer {
            return inner;
        }
        // The wrapping difference of the signed bounds is the true span as
        // an unsigned value, even when the subtraction overflows i32.
        let (low, span) = if inner < outer {
            (inner, outer.wrapping_sub(inner) as u32)
        } else {
            (outer.wrapping_add(1), inner.wrapping_sub(outer) as u32)
        };
        let offset = ((u64::from(self.next_u32()) * u64::from(span)) >> 32) as u32;
        // The offset can exceed i32::MAX; the modular add still lands
        // between the bounds.
        low.wrapping_add(offset as i32)
    }

    /// Returns a value between `inner` (inclusive) and `outer` (exclusive),
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. Crossed
    /// bounds (`inner > outer`) select from `[outer + 1, inner]`.
    fn next_i64_range(&mut self, inner: i64, outer: i64) -> i64 {
        if inner == outer {
            return inner;
        }
        let (low, span) = if inner < outer {
            (inner, outer.wrapping_sub(inner) as u64)
        } else {
            (outer.wrapping_add(1), inner.wrapping_sub(outer) as u64)
        };
        let offset = ((u128::from(self.next_u64()) * u128::from(span)) >> 64) as u64;
        low.wrapping_add(offset as i64)
    }

    /// Returns a value between `inner` and `outer` with both ends inclusive,
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The full
    /// domain `[i32::MIN, i32::MAX]` degenerates to a raw draw.
    fn next_i32_inclusive(&mut self, inner: i32, outer: i32) -> i32 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (inner, outer)
        } else {
            (outer, inner)
        };
        let span = (high.wrapping_sub(low) as u32).wrapping_add(1);
        if span == 0 {
            return self.next_u32() as i32;
        }
        let offset = ((u64::from(self.next_u32()) * u64::from(span)) >> 32) as u32;
        low.wrapping_add(offset as i32)
    }

    /// Returns a value between `inner` and `outer` with both ends inclusive,
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The full
    /// domain `[i64::MIN, i64::MAX]` degenerates to a raw draw.
    fn next_i64_inclusive(&mut self, inner: i64, outer: i64) -> i64 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (inner, outer)
        } else {
            (outer, inner)
        };
        let span = (high.wrapping_sub(low) as u64).wrapping_add(1);
        if span == 0 {
            return self.next_u64() as i64;
        }
        let offset = ((u128::from(self.next_u64()) * u128::from(span)) >> 64) as u64;
        low.wrapping_add(offset as i64)
    }

    /// Returns a value in `[0.0, 1.0)` with full 23-bit mantissa coverage.
    ///
    /// The top 23 bits of one 32-bit draw are placed directly as the
    /// mantissa of a value in `[1.0, 2.0)`, then 1 is subtracted.
    fn next_f32(&mut self) -> f32 {
        f32::from_bits(0x3f80_0000 | (self.next_u32() >> 9)) - 1.0
    }

    /// Returns a value in `[0.0, 1.0)` with full 52-bit mantissa coverage.
    ///
    /// The top 52 bits of one 64-bit draw are placed directly as the
    /// mantissa of a value in `[1.0, 2.0)`, then 1 is subtracted.
    fn next_f64(&mut self) -> f64 {
        f64::from_bits(0x3ff0_0000_0000_0000 | (self.next_u64() >> 12)) - 1.0
    }

    /// Returns a value between `inner` (attainable) and `outer` (excluded),
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The result
    /// is `inner + (outer - inner) * unit` with `unit` in `[0.0, 1.0)`;
    /// extreme spans can round onto the excluded end.
    fn next_f32_range(&mut self, inner: f32, outer: f32) -> f32 {
        if inner == outer {
            return inner;
        }
        inner + (outer - inner) * self.next_f32()
    }

    /// Returns a value between `inner` (attainable) and `outer` (excluded),
    /// accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The result
    /// is `inner + (outer - inner) * unit` with `unit` in `[0.0, 1.0)`;
    /// extreme spans can round onto the excluded end.
    fn next_f64_range(&mut self, inner: f64, outer: f64) -> f64 {
        if inner == outer {
            return inner;
        }
        inner + (outer - inner) * self.next_f64()
    }

    /// Returns a value between `inner` and `outer` with both ends
    /// attainable (up to rounding), accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step.
    fn next_f32_inclusive(&mut self, inner: f32, outer: f32) -> f32 {
        if inner == outer {
            return inner;
        }
        let unit = self.next_u32_inclusive(0, 1 << 24) as f32 / (1u32 << 24) as f32;
        inner + (outer - inner) * unit
    }

    /// Returns a value between `inner` and `outer` with both ends
    /// attainable (up to rounding), accepting the bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step.
    fn next_f64_inclusive(&mut self, inner: f64, outer: f64) -> f64 {
        if inner == outer {
            return inner;
        }
        let unit = self.next_u64_inclusive(0, 1 << 53) as f64 / (1u64 << 53) as f64;
        inner + (outer - inner) * unit
    }

    /// Returns a value in the open interval `(0.0, 1.0)`: never 0.0 and
    /// never 1.0.
    ///
    /// The trailing-zero count of one 32-bit draw selects the binary
    /// exponent (halving the probability of each smaller octave) and the
    /// top bits fill the mantissa, so values near zero stay reachable
    /// without ever producing zero itself. The all-zero word maps to 2^-33.
    fn next_exclusive_f32(&mut self) -> f32 {
        let bits = self.next_u32();
        let exponent = 126 - bits.trailing_zeros();
        f32::from_bits((exponent << 23) | (bits >> 9))
    }

    /// Returns a value in the open interval `(0.0, 1.0)`: never 0.0 and
    /// never 1.0.
    ///
    /// The trailing-zero count of one 64-bit draw selects the binary
    /// exponent and the top bits fill the mantissa. The all-zero word maps
    /// to 2^-65.
    fn next_exclusive_f64(&mut self) -> f64 {
        let bits = self.next_u64();
        let exponent = 1022 - u64::from(bits.trailing_zeros());
        f64::from_bits((exponent << 52) | (bits >> 12))
    }

    /// Returns a value strictly between `inner` and `outer`, accepting the
    /// bounds in either order.
    ///
    /// Equal bounds return that value without consuming a step. The open
    /// unit interval of [`next_exclusive_f64`] is rescaled linearly, so
    /// both ends are excluded up to rounding.
    ///
    /// [`next_exclusive_f64`]: Rng::next_exclusive_f64
    fn next_exclusive_f64_range(&mut self, inner: f64, outer: f64) -> f64 {
        if inner == outer {
            return inner;
        }
        inner + (outer - inner) * self.next_exclusive_f64()
    }

    /// Fills the given slice with random bytes, 8 little-endian bytes per
    /// step.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut chunks = dest.chunks_exact_mut(8);
        for chunk in chunks.by_ref() {
            let val = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&val);
        }
        // A short tail still consumes one full word.
        let remainder = chunks.into_remainder();
        if !remainder.is_empty() {
            let val = self.next_u64().to_le_bytes();
            if let Some(val_slice) = val.get(..remainder.len()) {
                remainder.copy_from_slice(val_slice);
            }
        }
    }

    /// Generates a random value of type `T`.
    fn gen<T: RandomValue>(&mut self) -> T
    where
        Self: Sized,
    {
        T::random(self)
    }

    /// Shuffles a slice in place (Fisher-Yates, one bounded draw per swap).
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for index in (1..items.len()).rev() {
            let other = self.next_u64_bound(index as u64 + 1) as usize;
            items.swap(index, other);
        }
    }

    /// Returns a uniformly chosen element, or `None` for an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_u64_bound(items.len() as u64) as usize)
    }
}

/// Types [`Rng::gen`] can draw directly.
pub trait RandomValue {
    /// Draws one value of this type from `rng`.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

impl RandomValue for u8 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u32() as Self
    }
}

impl RandomValue for u16 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u32() as Self
    }
}

impl RandomValue for u32 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u32()
    }
}

impl RandomValue for u64 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u64()
    }
}

impl RandomValue for i8 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u32() as Self
    }
}

impl RandomValue for i16 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u32() as Self
    }
}

impl RandomValue for i32 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u32() as Self
    }
}

impl RandomValue for i64 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_u64() as Self
    }
}

impl RandomValue for u128 {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let high = Self::from(rng.next_u64());
        let low = Self::from(rng.next_u64());
        (high << 64) | low
    }
}

impl RandomValue for f32 {
    /// Uniform on `[0.0, 1.0)`, one [`Rng::next_f32`] draw.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_f32()
    }
}

impl RandomValue for f64 {
    /// Uniform on `[0.0, 1.0)`, one [`Rng::next_f64`] draw.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_f64()
    }
}

impl RandomValue for bool {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.next_bool()
    }
}

// Thread-local RNG for convenient random() function

thread_local! {
    static THREAD_RNG: RefCell<crate::families::xoshiro::Xoshiro256Random> =
        RefCell::new(crate::families::xoshiro::Xoshiro256Random::from_entropy());
}

/// Generates a random value using the thread-local RNG.
///
/// This is the simplest way to get a random value:
///
/// ```rust
/// use fortress_rand::random;
///
/// let roll: u32 = random();
/// let heads: bool = random();
/// ```
#[must_use]
pub fn random<T: RandomValue>() -> T {
    THREAD_RNG.with(|rng| {
        let mut rng = rng.borrow_mut();
        T::random(&mut *rng)
    })
}

/// Returns a handle to the thread-local RNG.
///
/// Useful when you need to call multiple RNG methods without repeated
/// thread-local lookups.
#[must_use]
pub fn thread_rng() -> ThreadRng {
    ThreadRng { _private: () }
}

/// A handle to the thread-local random number generator.
///
/// This is lightweight (zero-sized) and just provides access to the
/// thread-local RNG, which is seeded from entropy once per thread.
#[derive(Debug)]
pub struct ThreadRng {
    _private: (),
}

impl Rng for ThreadRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        THREAD_RNG.with(|rng| rng.borrow_mut().next_u32())
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        THREAD_RNG.with(|rng| rng.borrow_mut().next_u64())
    }
}

/// FNV-1a with the fixed offset basis. Entropy mixing must hash identically
/// on every platform, which rules out `DefaultHasher` and its randomized
/// keys.
struct EntropyHasher {
    state: u64,
}

impl EntropyHasher {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    const fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl std::hash::Hasher for EntropyHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Gets a timing-based seed for RNG initialization.
///
/// Combines high-precision timing via `web_time::Instant` with thread
/// identity. Intentionally non-deterministic and NOT cryptographically
/// secure; for reproducible behavior always construct generators through
/// [`SeedableRng::seed_from_u64`] with a fixed seed.
fn timing_entropy_seed() -> u64 {
    use std::hash::{Hash, Hasher};
    use web_time::Instant;

    let now = Instant::now();

    // Mix in thread ID so threads seeded in the same tick diverge
    let thread_hash = {
        let mut hasher = EntropyHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    };

    let timing_hash = {
        let mut hasher = EntropyHasher::new();
        now.elapsed().as_nanos().hash(&mut hasher);
        hasher.finish()
    };

    thread_hash
        .wrapping_mul(timing_hash)
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::families::bastion::BastionRandom;

    /// Replays a fixed script of words so transformation arithmetic can be
    /// checked against hand-computed results.
    struct ScriptedRng {
        words: Vec<u64>,
        cursor: usize,
    }

    impl ScriptedRng {
        fn new(words: Vec<u64>) -> Self {
            Self { words, cursor: 0 }
        }
    }

    impl Rng for ScriptedRng {
        fn next_u64(&mut self) -> u64 {
            let word = self.words[self.cursor % self.words.len()];
            self.cursor += 1;
            word
        }
    }

    #[test]
    fn test_bound_extremes_u64() {
        // The zero word selects the low end, the all-ones word the high end.
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_u64_bound(100), 0);
        assert_eq!(low.next_u64_range(10, 20), 10);
        assert_eq!(low.next_u64_inclusive(10, 20), 10);

        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_u64_bound(100), 99);
        assert_eq!(high.next_u64_range(10, 20), 19);
        assert_eq!(high.next_u64_inclusive(10, 20), 20);
    }

    #[test]
    fn test_bound_extremes_u32() {
        // next_u32 takes the top half of the scripted word.
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_u32_bound(100), 0);
        assert_eq!(low.next_u32_range(10, 20), 10);

        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_u32_bound(100), 99);
        assert_eq!(high.next_u32_range(10, 20), 19);
        assert_eq!(high.next_u32_inclusive(10, 20), 20);
    }

    #[test]
    fn test_crossed_bounds_select_between_arguments() {
        // Crossed unsigned bounds: (20, 10) covers [11, 20].
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_u64_range(20, 10), 11);
        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_u64_range(20, 10), 20);
    }

    #[test]
    fn test_crossed_signed_bounds_match_mirrored_call() {
        // (100, -101) and (-100, 101) describe the same closed interval
        // [-100, 100].
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_i32_range(100, -101), -100);
        assert_eq!(low.next_i32_range(-100, 101), -100);

        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_i32_range(100, -101), 100);
        assert_eq!(high.next_i32_range(-100, 101), 100);
    }

    #[test]
    fn test_equal_bounds_consume_nothing() {
        let mut rng = ScriptedRng::new(vec![7]);
        assert_eq!(rng.next_u64_range(5, 5), 5);
        assert_eq!(rng.next_i64_range(-3, -3), -3);
        assert_eq!(rng.next_u32_inclusive(9, 9), 9);
        assert_eq!(rng.next_f64_range(5.0, 5.0), 5.0);
        assert_eq!(rng.next_u64_bound(0), 0);
        assert_eq!(rng.cursor, 0, "degenerate bounds must not draw");
    }

    #[test]
    fn test_full_domain_inclusive_is_raw_draw() {
        let mut rng = ScriptedRng::new(vec![0xdead_beef_cafe_f00d]);
        assert_eq!(rng.next_u64_inclusive(0, u64::MAX), 0xdead_beef_cafe_f00d);

        let mut rng = ScriptedRng::new(vec![0xdead_beef_0000_0000]);
        assert_eq!(rng.next_u32_inclusive(0, u32::MAX), 0xdead_beef);

        let mut rng = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(rng.next_i64_inclusive(i64::MIN, i64::MAX), -1);
    }

    #[test]
    fn test_signed_full_width_span() {
        // Span i64::MIN..i64::MAX is 2^64 - 1; the wrapping-difference trick
        // must not truncate it.
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_i64_range(i64::MIN, i64::MAX), i64::MIN);

        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_i64_range(i64::MIN, i64::MAX), i64::MAX - 1);
    }

    #[test]
    fn test_unit_float_extremes() {
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_f64(), 0.0);
        assert_eq!(low.next_f32(), 0.0);

        let mut high = ScriptedRng::new(vec![u64::MAX]);
        let top64 = high.next_f64();
        assert!(top64 < 1.0);
        assert!(top64 > 0.9999);
        let top32 = high.next_f32();
        assert!(top32 < 1.0);
        assert!(top32 > 0.9999);
    }

    #[test]
    fn test_inclusive_float_hits_both_ends() {
        let mut low = ScriptedRng::new(vec![0]);
        assert_eq!(low.next_f64_inclusive(2.0, 8.0), 2.0);

        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_f64_inclusive(2.0, 8.0), 8.0);
        let mut high = ScriptedRng::new(vec![u64::MAX]);
        assert_eq!(high.next_f32_inclusive(2.0, 8.0), 8.0);
    }

    #[test]
    fn test_exclusive_unit_edge_words() {
        // All-zero word takes the deepest exponent instead of producing 0.0.
        let mut zero = ScriptedRng::new(vec![0]);
        assert_eq!(zero.next_exclusive_f64(), (2.0f64).powi(-65));

        let mut ones = ScriptedRng::new(vec![u64::MAX]);
        let top = ones.next_exclusive_f64();
        assert!(top > 0.5 && top < 1.0);

        // 63 trailing zeros: exponent slot 959, mantissa 2^51.
        let mut half = ScriptedRng::new(vec![1u64 << 63]);
        assert_eq!(half.next_exclusive_f64(), 1.5 * (2.0f64).powi(-64));
    }

    #[test]
    fn test_bool_uses_sign_bit() {
        let mut rng = ScriptedRng::new(vec![1u64 << 63, (1u64 << 63) - 1]);
        assert!(rng.next_bool());
        assert!(!rng.next_bool());
    }

    #[test]
    fn test_bool_prob_certainty() {
        let mut rng = BastionRandom::seed_from_u64(42);
        for _ in 0..100 {
            assert!(!rng.next_bool_prob(0.0));
            assert!(rng.next_bool_prob(1.0));
        }
    }

    #[test]
    fn test_bool_prob_ratio() {
        let mut rng = BastionRandom::seed_from_u64(42);
        let mut true_count = 0;
        for _ in 0..10000 {
            if rng.next_bool_prob(0.5) {
                true_count += 1;
            }
        }
        assert!(true_count > 4500, "Too few trues: {true_count}");
        assert!(true_count < 5500, "Too many trues: {true_count}");
    }

    #[test]
    fn test_fill_bytes_layout() {
        let mut rng = ScriptedRng::new(vec![0x0807_0605_0403_0201, 0x1817_1615_1413_1211]);
        let mut buf = [0u8; 11];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8, 0x11, 0x12, 0x13]);
    }

    #[test]
    fn test_fill_bytes_lengths() {
        let mut rng = BastionRandom::seed_from_u64(42);
        for len in [0, 1, 2, 3, 7, 8, 9, 15, 16, 17, 64] {
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            if len >= 8 {
                assert!(
                    buf.iter().any(|&byte| byte != 0),
                    "fill_bytes produced all zeros for len={len}"
                );
            }
        }
    }

    #[test]
    fn test_endpoints_observed() {
        let mut rng = BastionRandom::seed_from_u64(7);
        let mut saw_low = false;
        let mut saw_high = false;
        for _ in 0..10000 {
            let val = rng.next_u32_range(100, 301);
            assert!((100..301).contains(&val));
            saw_low |= val == 100;
            saw_high |= val == 300;
        }
        assert!(saw_low, "inclusive end 100 never observed");
        assert!(saw_high, "top value 300 never observed");
    }

    #[test]
    fn test_exclusive_f64_never_hits_the_ends() {
        let mut rng = BastionRandom::seed_from_u64(123);
        for _ in 0..10000 {
            let val = rng.next_exclusive_f64();
            assert!(val > 0.0, "exclusive draw produced 0.0");
            assert!(val < 1.0, "exclusive draw produced {val}");
        }
    }

    #[test]
    fn test_exclusive_f32_never_hits_the_ends() {
        let mut rng = BastionRandom::seed_from_u64(123);
        for _ in 0..10000 {
            let val = rng.next_exclusive_f32();
            assert!(val > 0.0, "exclusive draw produced 0.0");
            assert!(val < 1.0, "exclusive draw produced {val}");
        }
    }

    #[test]
    fn test_random_types() {
        let mut rng = BastionRandom::seed_from_u64(42);

        let _: u8 = rng.gen();
        let _: u16 = rng.gen();
        let _: u32 = rng.gen();
        let _: u64 = rng.gen();
        let _: u128 = rng.gen();
        let _: i8 = rng.gen();
        let _: i16 = rng.gen();
        let _: i32 = rng.gen();
        let _: i64 = rng.gen();
        let _: bool = rng.gen();

        for _ in 0..1000 {
            let f: f32 = rng.gen();
            assert!(f >= 0.0);
            assert!(f < 1.0);

            let d: f64 = rng.gen();
            assert!(d >= 0.0);
            assert!(d < 1.0);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = BastionRandom::seed_from_u64(9);
        let mut items: Vec<u32> = (0..64).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..64).collect::<Vec<_>>());
    }

    #[test]
    fn test_choose() {
        let mut rng = BastionRandom::seed_from_u64(9);
        let empty: [u32; 0] = [];
        assert_eq!(rng.choose(&empty), None);

        let items = [10u32, 20, 30];
        for _ in 0..100 {
            let picked = *rng.choose(&items).unwrap();
            assert!(items.contains(&picked));
        }
    }

    #[test]
    fn test_thread_rng() {
        let val1: u64 = random();
        let val2: u64 = random();
        assert_ne!(val1, val2, "Two random calls returned same value");

        let mut handle = thread_rng();
        let _ = handle.next_u32();
        let _ = handle.next_u64();
    }

    #[test]
    fn test_seedable_from_entropy() {
        // Just verify it doesn't panic
        let _rng = BastionRandom::from_entropy();
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use crate::families::bastion::BastionRandom;
    use proptest::prelude::*;

    proptest! {
        /// Property: bounded draws stay between the arguments in either order.
        #[test]
        fn prop_range_between_arguments(
            seed in any::<u64>(),
            first in any::<i64>(),
            second in any::<i64>(),
        ) {
            let mut rng = BastionRandom::seed_from_u64(seed);
            let low = first.min(second);
            let high = first.max(second);

            for _ in 0..50 {
                let val = rng.next_i64_range(first, second);
                prop_assert!(val >= low, "{} fell below {}", val, low);
                prop_assert!(val <= high, "{} rose above {}", val, high);
            }
        }

        /// Property: the excluded end is never returned, in either argument
        /// order.
        #[test]
        fn prop_outer_bound_excluded(
            seed in any::<u64>(),
            inner in -10000i64..10000,
            span in 2i64..1000,
        ) {
            let mut rng = BastionRandom::seed_from_u64(seed);
            let outer = inner + span;
            for _ in 0..50 {
                prop_assert_ne!(rng.next_i64_range(inner, outer), outer);
                prop_assert_ne!(rng.next_i64_range(outer, inner), inner);
            }
        }

        /// Property: inclusive forms reach the outer end exclusive forms
        /// withhold.
        #[test]
        fn prop_inclusive_reaches_outer(
            seed in any::<u64>(),
            inner in 0u32..1000,
            span in 1u32..50,
        ) {
            let mut rng = BastionRandom::seed_from_u64(seed);
            let outer = inner + span;
            let mut saw_outer = false;
            for _ in 0..2000 {
                let val = rng.next_u32_inclusive(inner, outer);
                prop_assert!(val >= inner && val <= outer);
                saw_outer |= val == outer;
            }
            // With span <= 50 and 2000 draws, missing the outer end has
            // probability under (50/51)^2000, about 1e-17.
            prop_assert!(saw_outer, "outer end {} never drawn", outer);
        }

        /// Property: unit floats stay in [0, 1).
        #[test]
        fn prop_unit_floats_in_range(seed in any::<u64>()) {
            let mut rng = BastionRandom::seed_from_u64(seed);
            for _ in 0..100 {
                let double = rng.next_f64();
                prop_assert!((0.0..1.0).contains(&double));
                let single = rng.next_f32();
                prop_assert!((0.0f32..1.0).contains(&single));
            }
        }

        /// Property: float ranges accept crossed bounds.
        #[test]
        fn prop_float_range_crossed(
            seed in any::<u64>(),
            first in -1000.0f64..1000.0,
            second in -1000.0f64..1000.0,
        ) {
            let mut rng = BastionRandom::seed_from_u64(seed);
            let low = first.min(second);
            let high = first.max(second);
            for _ in 0..50 {
                let val = rng.next_f64_range(first, second);
                prop_assert!(val >= low && val <= high, "{} outside [{}, {}]", val, low, high);
            }
        }

        /// Property: fill_bytes is deterministic for the same seed.
        #[test]
        fn prop_fill_bytes_deterministic(
            seed in any::<u64>(),
            len in 0usize..256,
        ) {
            let mut rng1 = BastionRandom::seed_from_u64(seed);
            let mut rng2 = BastionRandom::seed_from_u64(seed);

            let mut buf1 = vec![0u8; len];
            let mut buf2 = vec![0u8; len];

            rng1.fill_bytes(&mut buf1);
            rng2.fill_bytes(&mut buf2);

            prop_assert_eq!(buf1, buf2, "same seed, same bytes");
        }

        /// Property: typed draws are deterministic across equal seeds.
        #[test]
        fn prop_random_value_deterministic(seed in any::<u64>()) {
            let mut rng1 = BastionRandom::seed_from_u64(seed);
            let mut rng2 = BastionRandom::seed_from_u64(seed);

            prop_assert_eq!(rng1.gen::<u8>(), rng2.gen::<u8>());
            prop_assert_eq!(rng1.gen::<u16>(), rng2.gen::<u16>());
            prop_assert_eq!(rng1.gen::<u32>(), rng2.gen::<u32>());
            prop_assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
            prop_assert_eq!(rng1.gen::<u128>(), rng2.gen::<u128>());
            prop_assert_eq!(rng1.gen::<i32>(), rng2.gen::<i32>());
            prop_assert_eq!(rng1.gen::<i64>(), rng2.gen::<i64>());
            prop_assert_eq!(rng1.gen::<bool>(), rng2.gen::<bool>());
        }

        /// Property: the width rule holds for 64-bit-native families.
        #[test]
        fn prop_next_u32_is_top_half(seed in any::<u64>()) {
            let mut wide = BastionRandom::seed_from_u64(seed);
            let mut narrow = BastionRandom::seed_from_u64(seed);
            for _ in 0..50 {
                let word = wide.next_u64();
                prop_assert_eq!(narrow.next_u32(), (word >> 32) as u32);
            }
        }
    }
}
