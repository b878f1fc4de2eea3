//! Backward stepping for generators whose state transition is a bijection.
//!
//! A reversible generator can walk its output sequence in both directions.
//! [`ReversibleRng::previous_u64`] returns the word the most recent forward
//! step emitted and restores the state that preceded that step, so a forward
//! step followed by a backward step is a perfect no-op on both the state and
//! the observed sequence.
//!
//! Families whose stepping discards information (for example middle-square
//! constructions) do not implement this trait at all. Callers holding an
//! erased generator can discover the capability through
//! [`PortableRng::as_reversible`](crate::serialize::PortableRng::as_reversible)
//! instead of guessing.

use crate::rng::Rng;

/// A generator that can step backward through its own output sequence.
///
/// Walking backward past the state the generator was constructed with is not
/// guarded: the arithmetic continues to be well defined, but the words it
/// yields were never part of the forward sequence.
///
/// # Example
///
/// ```rust
/// use fortress_rand::{BastionRandom, ReversibleRng, Rng, SeedableRng};
///
/// let mut rng = BastionRandom::seed_from_u64(7);
/// let first = rng.next_u64();
/// let second = rng.next_u64();
/// assert_eq!(rng.previous_u64(), second);
/// assert_eq!(rng.previous_u64(), first);
/// ```
pub trait ReversibleRng: Rng {
    /// Undoes the most recent forward step and returns the 64-bit word that
    /// step emitted.
    fn previous_u64(&mut self) -> u64;

    /// Undoes the most recent 32-bit step and returns the word it emitted.
    ///
    /// Mirrors the width rule of [`Rng::next_u32`]: for 64-bit-native
    /// families this is the top half of one backward step. 32-bit-native
    /// families override it with one native backward step.
    fn previous_u32(&mut self) -> u32 {
        (self.previous_u64() >> 32) as u32
    }
}

/// Multiplicative inverse of `value` modulo 2^64.
///
/// `value` must be odd; even values have no inverse in this ring. Computed by
/// Hensel-lifting Newton iteration: the seed guess is correct to 3 bits
/// (odd * odd = 1 mod 8) and every round doubles the correct bit count, so
/// five rounds cover all 64 bits.
pub(crate) const fn mul_inverse_u64(value: u64) -> u64 {
    debug_assert!(value & 1 == 1, "even multipliers are not invertible mod 2^64");
    let mut inverse = value;
    let mut round = 0;
    while round < 5 {
        inverse = inverse.wrapping_mul(2u64.wrapping_sub(value.wrapping_mul(inverse)));
        round += 1;
    }
    inverse
}

/// Undoes `value ^= value << shift` for `shift` in `1..64`.
///
/// The forward operation is linear over GF(2), and its inverse is the
/// geometric series of the shift operator. Doubling the distance each round
/// folds the whole series in at most six steps.
pub(crate) const fn undo_left_xorshift(value: u64, shift: u32) -> u64 {
    let mut result = value;
    let mut distance = shift;
    while distance < 64 {
        result ^= result << distance;
        distance <<= 1;
    }
    result
}

/// Jumps a linear congruential state `delta` steps forward in O(log delta).
///
/// Computes `multiplier^delta * state + increment * (multiplier^delta - 1) /
/// (multiplier - 1)` modulo 2^64 by square-and-multiply, without dividing.
/// `delta` is interpreted modulo the 2^64 period, so `u64::MAX` walks one
/// step backward.
pub(crate) const fn lcg_jump(state: u64, delta: u64, multiplier: u64, increment: u64) -> u64 {
    let mut acc_mult: u64 = 1;
    let mut acc_incr: u64 = 0;
    let mut cur_mult = multiplier;
    let mut cur_incr = increment;
    let mut remaining = delta;
    while remaining > 0 {
        if remaining & 1 == 1 {
            acc_mult = acc_mult.wrapping_mul(cur_mult);
            acc_incr = acc_incr.wrapping_mul(cur_mult).wrapping_add(cur_incr);
        }
        cur_incr = cur_mult.wrapping_add(1).wrapping_mul(cur_incr);
        cur_mult = cur_mult.wrapping_mul(cur_mult);
        remaining >>= 1;
    }
    acc_mult.wrapping_mul(state).wrapping_add(acc_incr)
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
    fn test_mul_inverse_round_trips() {
        let multipliers = [
            1u64,
            3,
            6364136223846793005,
            0xd1342543de82ef95,
            0xaef17502108ef2d9,
            u64::MAX,
        ];
        for multiplier in multipliers {
            let inverse = mul_inverse_u64(multiplier);
            assert_eq!(
                multiplier.wrapping_mul(inverse),
                1,
                "inverse of {multiplier:#x} failed"
            );
        }
    }

    #[test]
    fn test_mul_inverse_is_const_evaluable() {
        const INVERSE: u64 = mul_inverse_u64(6364136223846793005);
        assert_eq!(6364136223846793005u64.wrapping_mul(INVERSE), 1);
    }

    #[test]
    fn test_undo_left_xorshift() {
        for shift in [1u32, 7, 13, 17, 23, 31, 45, 63] {
            for value in [0u64, 1, 0xdead_beef_cafe_f00d, u64::MAX, 0x8000_0000_0000_0001] {
                let forward = value ^ (value << shift);
                assert_eq!(
                    undo_left_xorshift(forward, shift),
                    value,
                    "shift {shift} value {value:#x}"
                );
            }
        }
    }

    #[test]
    fn test_lcg_jump_matches_single_steps() {
        let multiplier = 6364136223846793005u64;
        let increment = 1442695040888963407u64;
        let start = 0x0123_4567_89ab_cdefu64;

        let mut walked = start;
        for steps in 0..=257u64 {
            assert_eq!(
                lcg_jump(start, steps, multiplier, increment),
                walked,
                "jump of {steps} diverged from stepping"
            );
            walked = walked.wrapping_mul(multiplier).wrapping_add(increment);
        }
    }

    #[test]
    fn test_lcg_jump_full_period_wrap_is_one_step_back() {
        let multiplier = 6364136223846793005u64;
        let increment = 1442695040888963407u64;
        let start = 42u64;

        let forward = start.wrapping_mul(multiplier).wrapping_add(increment);
        assert_eq!(lcg_jump(forward, u64::MAX, multiplier, increment), start);
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
        /// Property: every odd multiplier has a two-sided inverse.
        #[test]
        fn prop_mul_inverse(multiplier in any::<u64>()) {
            let odd = multiplier | 1;
            let inverse = mul_inverse_u64(odd);
            prop_assert_eq!(odd.wrapping_mul(inverse), 1);
            prop_assert_eq!(inverse.wrapping_mul(odd), 1);
        }

        /// Property: xorshift undo is a true inverse for every shift amount.
        #[test]
        fn prop_xorshift_round_trip(value in any::<u64>(), shift in 1u32..64) {
            let forward = value ^ (value << shift);
            prop_assert_eq!(undo_left_xorshift(forward, shift), value);
        }

        /// Property: jumping forward then backward restores the state.
        #[test]
        fn prop_lcg_jump_round_trip(
            state in any::<u64>(),
            delta in any::<u64>(),
            stream in any::<u64>(),
        ) {
            let multiplier = 6364136223846793005u64;
            let increment = stream | 1;
            let there = lcg_jump(state, delta, multiplier, increment);
            let back = lcg_jump(there, delta.wrapping_neg(), multiplier, increment);
            prop_assert_eq!(back, state);
        }
    }
}
