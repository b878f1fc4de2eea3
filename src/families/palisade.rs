//! Middle-square generator driven by a Weyl sequence.


use crate::error::RandError;
use crate::families::bastion::BastionRandom;
use crate::rng::{Rng, SeedableRng};
use crate::serialize::{decode_words, PortableRng, RandomFamily};

/// Weyl increment (Widynski). Odd, so the sequence visits every 64-bit
/// value before repeating.
const WEYL_STEP: u64 = 0xb5ad_4ece_da1c_e2a9;

/// Middle-square generator with Weyl-sequence reconditioning.
///
/// Each step squares the working value, folds in the next Weyl word, and
/// rotates the halves so the well-mixed middle bits land in the output
/// position. The Weyl stream keeps the squaring from collapsing into the
/// short cycles plain middle-square suffers from.
///
/// The other 32-bit-native family besides
/// [`Pcg32Random`](crate::families::pcg32::Pcg32Random), with the same
/// width rule: [`Rng::next_u64`] splices two native words, high half first.
/// Squaring throws bits away, so this is the one built-in family with no
/// backward stepping at any width.
///
/// Not cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PalisadeRandom {
    value: u64,
    weyl: u64,
}

impl PalisadeRandom {
    /// Creates a generator from a raw working value and Weyl counter.
    ///
    /// Any values are valid; the Weyl stream pulls even the all-zero state
    /// into circulation on the first step. For one-word seeding use
    /// [`SeedableRng::seed_from_u64`].
    #[must_use]
    pub const fn new(value: u64, weyl: u64) -> Self {
        Self { value, weyl }
    }

    /// Generates the next 32-bit random value with one native step.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        self.value = self.value.wrapping_mul(self.value);
        self.weyl = self.weyl.wrapping_add(WEYL_STEP);
        self.value = self.value.wrapping_add(self.weyl);
        self.value = self.value.rotate_left(32);
        self.value as u32
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
}

impl SeedableRng for PalisadeRandom {
    /// Expands one seed word into the working value and Weyl counter with
    /// [`BastionRandom`].
    fn seed_from_u64(seed: u64) -> Self {
        let mut expander = BastionRandom::new(seed);
        Self {
            value: expander.next_u64(),
            weyl: expander.next_u64(),
        }
    }
}

impl Rng for PalisadeRandom {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

impl PortableRng for PalisadeRandom {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    fn state_count(&self) -> usize {
        2
    }

    fn state_word(&self, index: usize) -> u64 {
        match index {
            0 => self.value,
            1 => self.weyl,
            _ => 0,
        }
    }

    fn set_state_word(&mut self, index: usize, word: u64) {
        match index {
            0 => self.value = word,
            1 => self.weyl = word,
            _ => {}
        }
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::seed_from_u64(seed);
    }

    fn supports_previous(&self) -> bool {
        false
    }
}

impl RandomFamily for PalisadeRandom {
    const TAG: &'static str = "PlsR";

    fn decode_payload(payload: &str) -> Result<Self, RandError> {
        let words = decode_words(Self::TAG, payload, 2)?;
        Ok(Self {
            value: words[0],
            weyl: words[1],
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
        let mut rng1 = PalisadeRandom::seed_from_u64(12345);
        let mut rng2 = PalisadeRandom::seed_from_u64(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    /// The all-zero state squares to zero, so the first output is pure
    /// Weyl increment: `rotate_left(WEYL_STEP, 32) as u32`, which is the
    /// increment's own high half. Hand-computed.
    #[test]
    fn test_zero_state_escapes() {
        let mut rng = PalisadeRandom::new(0, 0);
        assert_eq!(rng.next_u32(), 0xb5ad_4ece);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_outputs_vary_from_zero_state() {
        let mut rng = PalisadeRandom::new(0, 0);
        let words: Vec<u32> = (0..100).map(|_| rng.next_u32()).collect();
        let first = words[0];
        assert!(words.iter().any(|&word| word != first));
    }

    #[test]
    fn test_next_u64_splices_two_native_words() {
        let mut wide = PalisadeRandom::seed_from_u64(42);
        let mut narrow = wide.clone();
        let high = u64::from(narrow.next_u32());
        let low = u64::from(narrow.next_u32());
        assert_eq!(wide.next_u64(), (high << 32) | low);
        assert_eq!(wide, narrow);
    }

    #[test]
    fn test_no_backward_capability() {
        let mut rng = PalisadeRandom::seed_from_u64(0);
        assert!(!rng.supports_previous());
        assert!(rng.as_reversible().is_none());
    }

    #[test]
    fn test_reseed_matches_seed_from_u64() {
        let mut rng = PalisadeRandom::seed_from_u64(1);
        for _ in 0..10 {
            rng.next_u32();
        }
        rng.reseed(55);
        assert_eq!(rng, PalisadeRandom::seed_from_u64(55));
    }

    #[test]
    fn test_serialize_round_trip() {
        let rng = PalisadeRandom::new(0xdead_beef, 3);
        let text = rng.serialize();
        assert!(text.starts_with("PlsR`"));

        let payload = text
            .strip_prefix("PlsR`")
            .and_then(|rest| rest.strip_suffix('`'))
            .unwrap();
        assert_eq!(payload.len(), 32);
        let decoded = PalisadeRandom::decode_payload(payload).unwrap();
        assert_eq!(decoded, rng);
    }

    #[test]
    fn test_decode_payload_rejects_wrong_field_count() {
        assert!(PalisadeRandom::decode_payload("0000000000000000").is_err());
    }

    #[test]
    fn test_state_words() {
        let mut rng = PalisadeRandom::new(10, 20);
        assert_eq!(rng.state_word(0), 10);
        assert_eq!(rng.state_word(1), 20);
        assert_eq!(rng.state_word(2), 0);
        rng.set_state_word(1, 99);
        rng.set_state_word(2, 7);
        assert_eq!(rng, PalisadeRandom::new(10, 99));
    }

    #[test]
    fn test_capability_flags() {
        let rng = PalisadeRandom::seed_from_u64(0);
        assert_eq!(rng.tag(), "PlsR");
        assert_eq!(rng.state_count(), 2);
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
        /// Property: the wide draw is exactly two native draws, from any
        /// raw state.
        #[test]
        fn prop_wide_draw_splices(value in any::<u64>(), weyl in any::<u64>()) {
            let mut wide = PalisadeRandom::new(value, weyl);
            let mut narrow = wide.clone();
            let high = u64::from(narrow.next_u32());
            let low = u64::from(narrow.next_u32());
            prop_assert_eq!(wide.next_u64(), (high << 32) | low);
            prop_assert_eq!(wide, narrow);
        }

        /// Property: serialized text decodes to an equal generator.
        #[test]
        fn prop_serialize_round_trip(value in any::<u64>(), weyl in any::<u64>()) {
            let rng = PalisadeRandom::new(value, weyl);
            let text = rng.serialize();
            let payload = text
                .strip_prefix("PlsR`")
                .and_then(|rest| rest.strip_suffix('`'))
                .expect("framing is fixed");
            let decoded = PalisadeRandom::decode_payload(payload).expect("payload is well-formed");
            prop_assert_eq!(decoded, rng);
        }
    }
}
