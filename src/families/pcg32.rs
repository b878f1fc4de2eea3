//! PCG-XSH-RR: 64-bit LCG state permuted down to 32-bit output.


use crate::error::RandError;
use crate::reverse::{lcg_jump, mul_inverse_u64, ReversibleRng};
use crate::rng::{Rng, SeedableRng};
use crate::serialize::{decode_words, PortableRng, RandomFamily};

/// LCG multiplier, shared with the Rampart family.
const MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// Modular inverse of [`MULTIPLIER`], for backward steps.
const MULTIPLIER_INVERSE: u64 = mul_inverse_u64(MULTIPLIER);

/// Stream id used by [`SeedableRng::seed_from_u64`].
const DEFAULT_STREAM: u64 = 1_442_695_040_888_963_407;

/// XSH-RR output permutation: xorshift the high bits down, then rotate by
/// the top five bits of the state.
#[inline]
#[must_use]
const fn output(state: u64) -> u32 {
    let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
    let rot = (state >> 59) as u32;
    xorshifted.rotate_right(rot)
}

/// PCG32 generator: 64 bits of LCG state, 32 bits of output per step.
///
/// The one 32-bit-native family. [`Rng::next_u32`] is a single native step;
/// [`Rng::next_u64`] splices two native words together, high half first, and
/// [`ReversibleRng::previous_u64`] unsplices them in the opposite order, so
/// forward and backward walks agree at both widths.
///
/// Like [`RampartRandom`](crate::families::rampart::RampartRandom), each odd
/// increment selects an independent stream over the same state space.
///
/// Not cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pcg32Random {
    state: u64,
    inc: u64,
}

impl Pcg32Random {
    /// Creates a generator on the given stream.
    ///
    /// The stream id is forced odd by shifting left and setting the low
    /// bit, so its top bit is discarded; ids that differ only there share a
    /// sequence.
    #[must_use]
    pub const fn new(seed: u64, stream: u64) -> Self {
        let inc = (stream << 1) | 1;
        let mut rng = Self { state: 0, inc };
        // The inherent step is not callable in const context, so the two
        // seeding steps are written out.
        rng.state = rng.state.wrapping_mul(MULTIPLIER).wrapping_add(rng.inc);
        rng.state = rng.state.wrapping_add(seed);
        rng.state = rng.state.wrapping_mul(MULTIPLIER).wrapping_add(rng.inc);
        rng
    }

    /// The stream id this generator draws from.
    #[must_use]
    pub const fn stream(&self) -> u64 {
        self.inc >> 1
    }

    /// Generates the next 32-bit random value with one native step.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(MULTIPLIER).wrapping_add(self.inc);
        output(old_state)
    }

    /// Generates the next 64-bit random value from two native steps, high
    /// half first.
    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    /// Returns the word the most recent native step produced and undoes
    /// that step.
    ///
    /// Walking back past the construction-time seed is not guarded.
    #[inline]
    #[must_use]
    pub fn previous_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_sub(self.inc)
            .wrapping_mul(MULTIPLIER_INVERSE);
        output(self.state)
    }

    /// Undoes one [`next_u64`] call: two backward native steps, reassembled
    /// in the order the forward call consumed them.
    ///
    /// [`next_u64`]: Pcg32Random::next_u64
    #[inline]
    #[must_use]
    pub fn previous_u64(&mut self) -> u64 {
        let low = u64::from(self.previous_u32());
        let high = u64::from(self.previous_u32());
        (high << 32) | low
    }

    /// Moves `delta` native 32-bit draws forward in O(log delta) time.
    ///
    /// Positions count native steps, so `skip(2)` lands where one
    /// [`next_u64`] call would. The jump arithmetic wraps, so
    /// `skip(u64::MAX)` is one native step backward.
    ///
    /// [`next_u64`]: Pcg32Random::next_u64
    pub fn skip(&mut self, delta: u64) {
        self.state = lcg_jump(self.state, delta, MULTIPLIER, self.inc);
    }
}

impl SeedableRng for Pcg32Random {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed, DEFAULT_STREAM)
    }
}

impl Rng for Pcg32Random {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

impl ReversibleRng for Pcg32Random {
    #[inline]
    fn previous_u32(&mut self) -> u32 {
        Self::previous_u32(self)
    }

    #[inline]
    fn previous_u64(&mut self) -> u64 {
        Self::previous_u64(self)
    }
}

impl PortableRng for Pcg32Random {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn state_count(&self) -> usize {
        2
    }

    fn state_word(&self, index: usize) -> u64 {
        match index {
            0 => self.state,
            1 => self.inc,
            _ => 0,
        }
    }

    fn set_state_word(&mut self, index: usize, word: u64) {
        match index {
            0 => self.state = word,
            1 => self.inc = word,
            _ => {}
        }
    }

    /// Re-seeds on the current stream.
    fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed, self.inc >> 1);
    }

    fn supports_previous(&self) -> bool {
        true
    }

    fn as_reversible(&mut self) -> Option<&mut dyn ReversibleRng> {
        Some(self)
    }
}

impl RandomFamily for Pcg32Random {
    const TAG: &'static str = "Pcg3";

    fn decode_payload(payload: &str) -> Result<Self, RandError> {
        let words = decode_words(Self::TAG, payload, 2)?;
        Ok(Self {
            state: words[0],
            inc: words[1],
        })
    }
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

    #[test]
    fn test_deterministic() {
        let mut rng1 = Pcg32Random::seed_from_u64(12345);
        let mut rng2 = Pcg32Random::seed_from_u64(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    /// First outputs from seed 0, checked against the reference
    /// implementation of PCG-XSH-RR 64/32.
    #[test]
    fn test_reference_sequence() {
        let mut rng = Pcg32Random::seed_from_u64(0);
        let expected = [
            0x348a_463f_u32,
            0x4f20_5a1b,
            0x2946_c488,
            0x805e_36de,
            0x79f9_94a9,
        ];
        for word in expected {
            assert_eq!(rng.next_u32(), word);
        }
    }

    #[test]
    fn test_next_u64_splices_two_native_words() {
        let mut wide = Pcg32Random::seed_from_u64(42);
        let mut narrow = wide.clone();
        let high = u64::from(narrow.next_u32());
        let low = u64::from(narrow.next_u32());
        assert_eq!(wide.next_u64(), (high << 32) | low);
        assert_eq!(wide, narrow);
    }

    #[test]
    fn test_streams_diverge() {
        let mut stream0 = Pcg32Random::new(1, 0);
        let mut stream1 = Pcg32Random::new(1, 1);
        let first: Vec<u32> = (0..10).map(|_| stream0.next_u32()).collect();
        let second: Vec<u32> = (0..10).map(|_| stream1.next_u32()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_previous_replays_native_steps_in_reverse() {
        let mut rng = Pcg32Random::seed_from_u64(777);
        let forward: Vec<u32> = (0..50).map(|_| rng.next_u32()).collect();
        let backward: Vec<u32> = (0..50).map(|_| rng.previous_u32()).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(backward, reversed);
    }

    #[test]
    fn test_previous_u64_replays_wide_draws_in_reverse() {
        let mut rng = Pcg32Random::seed_from_u64(31337);
        let forward: Vec<u64> = (0..25).map(|_| rng.next_u64()).collect();
        let backward: Vec<u64> = (0..25).map(|_| rng.previous_u64()).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(backward, reversed);
    }

    #[test]
    fn test_mixed_width_walk_reverses() {
        let mut rng = Pcg32Random::seed_from_u64(5);
        let start = rng.clone();
        let a = rng.next_u32();
        let b = rng.next_u64();
        let c = rng.next_u32();
        assert_eq!(rng.previous_u32(), c);
        assert_eq!(rng.previous_u64(), b);
        assert_eq!(rng.previous_u32(), a);
        assert_eq!(rng, start);
    }

    #[test]
    fn test_previous_restores_state() {
        let mut rng = Pcg32Random::new(42, 13);
        let before = rng.clone();
        let word = rng.next_u32();
        assert_eq!(rng.previous_u32(), word);
        assert_eq!(rng, before);
    }

    #[test]
    fn test_skip_counts_native_steps() {
        for delta in [0u64, 1, 2, 17, 1000] {
            let mut skipped = Pcg32Random::seed_from_u64(9);
            let mut walked = Pcg32Random::seed_from_u64(9);
            skipped.skip(delta);
            for _ in 0..delta {
                walked.next_u32();
            }
            assert_eq!(skipped, walked, "delta {delta}");
        }

        let mut skipped = Pcg32Random::seed_from_u64(6);
        let mut walked = Pcg32Random::seed_from_u64(6);
        skipped.skip(2);
        walked.next_u64();
        assert_eq!(skipped, walked);
    }

    #[test]
    fn test_skip_max_is_one_native_step_back() {
        let mut skipped = Pcg32Random::seed_from_u64(31337);
        let mut reversed = skipped.clone();
        skipped.skip(u64::MAX);
        let _ = reversed.previous_u32();
        assert_eq!(skipped, reversed);
    }

    #[test]
    fn test_reseed_keeps_stream() {
        let mut rng = Pcg32Random::new(3, 77);
        for _ in 0..10 {
            rng.next_u32();
        }
        rng.reseed(10);
        assert_eq!(rng, Pcg32Random::new(10, 77));
    }

    #[test]
    fn test_serialize_round_trip() {
        let rng = Pcg32Random::new(0xfeed_f00d, 21);
        let text = rng.serialize();
        assert!(text.starts_with("Pcg3`"));
        assert!(text.ends_with('`'));

        let payload = &text["Pcg3`".len()..text.len() - 1];
        let decoded = Pcg32Random::decode_payload(payload).unwrap();
        assert_eq!(decoded, rng);
    }

    #[test]
    fn test_decode_payload_rejects_wrong_field_count() {
        assert!(Pcg32Random::decode_payload("0000000000000000").is_err());
    }

    #[test]
    fn test_state_words() {
        let mut rng = Pcg32Random::new(10, 20);
        assert_eq!(rng.state_word(0), rng.state);
        assert_eq!(rng.state_word(1), rng.inc);
        assert_eq!(rng.state_word(2), 0);
        rng.set_state_word(0, 99);
        assert_eq!(rng.state, 99);
        rng.set_state_word(2, 7);
        assert_eq!(rng.state_word(2), 0);
    }

    #[test]
    fn test_capability_flags() {
        let mut rng = Pcg32Random::seed_from_u64(0);
        assert_eq!(rng.tag(), "Pcg3");
        assert_eq!(rng.state_count(), 2);
        assert!(rng.supports_previous());
        assert!(rng.as_reversible().is_some());
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a native forward walk of any length walks back
        /// exactly, on any stream.
        #[test]
        fn prop_forward_backward_round_trip(
            seed in any::<u64>(),
            stream in any::<u64>(),
            steps in 1usize..64,
        ) {
            let mut rng = Pcg32Random::new(seed, stream);
            let start = rng.clone();
            let forward: Vec<u32> = (0..steps).map(|_| rng.next_u32()).collect();
            for expected in forward.into_iter().rev() {
                prop_assert_eq!(rng.previous_u32(), expected);
            }
            prop_assert_eq!(rng, start);
        }

        /// Property: wide draws walk back exactly too.
        #[test]
        fn prop_wide_walk_reverses(seed in any::<u64>(), steps in 1usize..32) {
            let mut rng = Pcg32Random::seed_from_u64(seed);
            let start = rng.clone();
            let forward: Vec<u64> = (0..steps).map(|_| rng.next_u64()).collect();
            for expected in forward.into_iter().rev() {
                prop_assert_eq!(rng.previous_u64(), expected);
            }
            prop_assert_eq!(rng, start);
        }

        /// Property: two jumps compose into one modular jump.
        #[test]
        fn prop_skip_composes(seed in any::<u64>(), first in any::<u64>(), second in any::<u64>()) {
            let mut split = Pcg32Random::seed_from_u64(seed);
            split.skip(first);
            split.skip(second);

            let mut joined = Pcg32Random::seed_from_u64(seed);
            joined.skip(first.wrapping_add(second));

            prop_assert_eq!(split, joined);
        }

        /// Property: serialized text decodes to an equal generator.
        #[test]
        fn prop_serialize_round_trip(seed in any::<u64>(), stream in any::<u64>()) {
            let rng = Pcg32Random::new(seed, stream);
            let text = rng.serialize();
            let payload = text
                .strip_prefix("Pcg3`")
                .and_then(|rest| rest.strip_suffix('`'))
                .expect("framing is fixed");
            let decoded = Pcg32Random::decode_payload(payload).expect("payload is well-formed");
            prop_assert_eq!(decoded, rng);
        }
    }
}
