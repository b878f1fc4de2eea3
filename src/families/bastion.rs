//! Weyl counter with a SplitMix64 finalizer.


use crate::error::RandError;
use crate::reverse::ReversibleRng;
use crate::rng::{Rng, SeedableRng};
use crate::serialize::{decode_words, PortableRng, RandomFamily};

/// Odd counter step: 2^64 divided by the golden ratio.
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// SplitMix64 finalizer (Steele, Lea, and Flood). Bijective, so the raw
/// counter never leaks through the output.
#[inline]
#[must_use]
const fn mix(mut word: u64) -> u64 {
    word = (word ^ (word >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    word = (word ^ (word >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    word ^ (word >> 31)
}

/// SplitMix64 random number generator.
///
/// The state is a single counter advanced by a fixed odd step; each output
/// is the fresh counter value pushed through an avalanching finalizer. One
/// add, two multiplies, and three xor-shifts per draw make this the cheapest
/// family in the crate, and the counter shape makes [`skip`] a single
/// wrapping multiply. The other multi-word families use it to expand one
/// seed word into their state vectors.
///
/// Statistically solid for games and simulations, but NOT cryptographically
/// secure.
///
/// [`skip`]: BastionRandom::skip
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BastionRandom {
    state: u64,
}

impl BastionRandom {
    /// Creates a generator whose counter starts at `seed`.
    ///
    /// Nearby seeds are fine: the finalizer decorrelates consecutive
    /// counters, so seeds 1, 2, 3 still yield unrelated streams.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generates the next 64-bit random value.
    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix(self.state)
    }

    /// Returns the word the most recent forward step produced and steps the
    /// counter back over it.
    ///
    /// Walking back past the construction-time seed is not guarded.
    #[inline]
    #[must_use]
    pub fn previous_u64(&mut self) -> u64 {
        let word = mix(self.state);
        self.state = self.state.wrapping_sub(GOLDEN_GAMMA);
        word
    }

    /// Moves `delta` draws forward in constant time.
    ///
    /// `skip(1)` lands exactly where one [`next_u64`] call would, and the
    /// counter arithmetic wraps, so `skip(u64::MAX)` is one step backward.
    ///
    /// [`next_u64`]: BastionRandom::next_u64
    #[inline]
    pub fn skip(&mut self, delta: u64) {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA.wrapping_mul(delta));
    }
}

impl SeedableRng for BastionRandom {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl Rng for BastionRandom {
    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

impl ReversibleRng for BastionRandom {
    #[inline]
    fn previous_u64(&mut self) -> u64 {
        Self::previous_u64(self)
    }
}

impl PortableRng for BastionRandom {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn state_count(&self) -> usize {
        1
    }

    fn state_word(&self, index: usize) -> u64 {
        if index == 0 {
            self.state
        } else {
            0
        }
    }

    fn set_state_word(&mut self, index: usize, word: u64) {
        if index == 0 {
            self.state = word;
        }
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    fn supports_previous(&self) -> bool {
        true
    }

    fn as_reversible(&mut self) -> Option<&mut dyn ReversibleRng> {
        Some(self)
    }
}

impl RandomFamily for BastionRandom {
    const TAG: &'static str = "BstR";

    fn decode_payload(payload: &str) -> Result<Self, RandError> {
        let words = decode_words(Self::TAG, payload, 1)?;
        Ok(Self { state: words[0] })
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
        let mut rng1 = BastionRandom::seed_from_u64(12345);
        let mut rng2 = BastionRandom::seed_from_u64(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    /// Reference outputs for a zero seed, from the published SplitMix64
    /// test vectors.
    #[test]
    fn test_golden_sequence() {
        let mut rng = BastionRandom::seed_from_u64(0);
        let expected = [
            0xe220_a839_7b1d_cdaf_u64,
            0x6e78_9e6a_a1b9_65f4,
            0x06c4_5d18_8009_454f,
            0xf88b_b8a8_724c_81ec,
            0x1b39_896a_51a8_749b,
        ];
        for value in expected {
            assert_eq!(rng.next_u64(), value);
        }
    }

    #[test]
    fn test_previous_replays_forward_outputs_in_reverse() {
        let mut rng = BastionRandom::seed_from_u64(777);
        let forward: Vec<u64> = (0..50).map(|_| rng.next_u64()).collect();
        let backward: Vec<u64> = (0..50).map(|_| rng.previous_u64()).collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(backward, reversed);
    }

    #[test]
    fn test_previous_restores_state() {
        let mut rng = BastionRandom::seed_from_u64(42);
        let before = rng.clone();
        let word = rng.next_u64();
        assert_eq!(rng.previous_u64(), word);
        assert_eq!(rng, before);
    }

    #[test]
    fn test_skip_matches_sequential_draws() {
        for delta in [0u64, 1, 2, 17, 1000] {
            let mut skipped = BastionRandom::seed_from_u64(9);
            let mut walked = BastionRandom::seed_from_u64(9);
            skipped.skip(delta);
            for _ in 0..delta {
                walked.next_u64();
            }
            assert_eq!(skipped, walked, "delta {delta}");
            assert_eq!(skipped.next_u64(), walked.next_u64());
        }
    }

    #[test]
    fn test_skip_max_is_one_step_back() {
        let mut skipped = BastionRandom::seed_from_u64(31337);
        let mut reversed = skipped.clone();
        skipped.skip(u64::MAX);
        let _ = reversed.previous_u64();
        assert_eq!(skipped, reversed);
    }

    #[test]
    fn test_serialize_exact_text() {
        let rng = BastionRandom::new(0xdead_beef);
        assert_eq!(rng.serialize(), "BstR`00000000deadbeef`");
    }

    #[test]
    fn test_decode_payload_round_trip() {
        let rng = BastionRandom::new(0x0123_4567_89ab_cdef);
        let decoded = BastionRandom::decode_payload("0123456789abcdef").unwrap();
        assert_eq!(decoded, rng);
    }

    #[test]
    fn test_decode_payload_rejects_wrong_field_count() {
        assert!(BastionRandom::decode_payload("").is_err());
        assert!(BastionRandom::decode_payload("00000000deadbeef00000000deadbeef").is_err());
    }

    #[test]
    fn test_reseed_matches_new() {
        let mut rng = BastionRandom::seed_from_u64(1);
        for _ in 0..10 {
            rng.next_u64();
        }
        rng.reseed(55);
        assert_eq!(rng, BastionRandom::new(55));
    }

    #[test]
    fn test_state_word_out_of_range() {
        let mut rng = BastionRandom::new(7);
        assert_eq!(rng.state_word(0), 7);
        assert_eq!(rng.state_word(1), 0);
        rng.set_state_word(1, 99);
        assert_eq!(rng, BastionRandom::new(7));
        rng.set_state_word(0, 99);
        assert_eq!(rng, BastionRandom::new(99));
    }

    #[test]
    fn test_capability_flags() {
        let mut rng = BastionRandom::new(0);
        assert_eq!(rng.tag(), "BstR");
        assert_eq!(rng.state_count(), 1);
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
        /// Property: a forward walk of any length walks back exactly.
        #[test]
        fn prop_forward_backward_round_trip(seed in any::<u64>(), steps in 1usize..64) {
            let mut rng = BastionRandom::seed_from_u64(seed);
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
            let mut split = BastionRandom::seed_from_u64(seed);
            split.skip(first);
            split.skip(second);

            let mut joined = BastionRandom::seed_from_u64(seed);
            joined.skip(first.wrapping_add(second));

            prop_assert_eq!(split, joined);
        }

        /// Property: serialized text decodes to an equal generator.
        #[test]
        fn prop_serialize_round_trip(seed in any::<u64>()) {
            let rng = BastionRandom::new(seed);
            let text = rng.serialize();
            let payload = text
                .strip_prefix("BstR`")
                .and_then(|rest| rest.strip_suffix('`'))
                .expect("framing is fixed");
            let decoded = BastionRandom::decode_payload(payload).expect("payload is well-formed");
            prop_assert_eq!(decoded, rng);
        }
    }
}
