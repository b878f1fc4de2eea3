//! Strict replay of recorded draw series, for tests that need exact
//! control over every random decision.
//!
//! ```rust
//! use fortress_rand::{KnownSeriesRandom, Rng};
//!
//! let mut rng = KnownSeriesRandom::new(vec![3, 7], vec![], vec![]);
//! assert_eq!(rng.next_i32_range(0, 10), 3);
//! assert_eq!(rng.next_i32_range(0, 10), 7);
//! assert_eq!(rng.next_i32_range(0, 10), 3);
//! ```

// Replay mismatches panic; failing the caller loudly is this family's
// whole job.
#![allow(clippy::panic)]


use crate::error::{MalformedReason, RandError};
use crate::rng::Rng;
use crate::serialize::{
    parse_hex_word, push_hex_word, PortableRng, RandomFamily, TAG_DELIMITER, TERMINATOR,
    WORD_DIGITS,
};

/// Separates the three series sections inside the serialized payload.
const SERIES_SEPARATOR: char = '~';

/// A generator that replays three recorded series instead of computing
/// anything.
///
/// Integer draws replay the integer series, floating-point draws replay the
/// double series, and boolean draws replay the boolean series. Each series
/// has its own cursor and wraps around when exhausted, so a short script can
/// drive an arbitrarily long run.
///
/// Every bounded draw checks the replayed value against the exact interval
/// the equivalent computing generator would have drawn from and panics on
/// a value outside it, naming the draw and both ends. Drawing from an empty
/// series panics too. A replay that diverges from its script fails at the
/// first wrong draw instead of corrupting everything downstream.
///
/// The bound conventions match the computing families: equal bounds return
/// the value without consuming anything, a zero exclusive bound returns
/// zero without consuming anything, and crossed bounds keep the first
/// argument attainable and exclude the second.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KnownSeriesRandom {
    integers: Vec<i64>,
    doubles: Vec<f64>,
    booleans: Vec<bool>,
    integer_cursor: usize,
    double_cursor: usize,
    boolean_cursor: usize,
}

impl KnownSeriesRandom {
    /// Creates a replay generator over the given series, all cursors at the
    /// start.
    ///
    /// Any series may be empty; only draws that touch an empty series
    /// panic.
    #[must_use]
    pub fn new(integers: Vec<i64>, doubles: Vec<f64>, booleans: Vec<bool>) -> Self {
        Self {
            integers,
            doubles,
            booleans,
            integer_cursor: 0,
            double_cursor: 0,
            boolean_cursor: 0,
        }
    }

    fn replay_integer(&mut self, label: &str) -> i64 {
        assert!(
            !self.integers.is_empty(),
            "{label}: the integer series is empty"
        );
        let value = self.integers[self.integer_cursor];
        self.integer_cursor = (self.integer_cursor + 1) % self.integers.len();
        value
    }

    fn replay_double(&mut self, label: &str) -> f64 {
        assert!(
            !self.doubles.is_empty(),
            "{label}: the double series is empty"
        );
        let value = self.doubles[self.double_cursor];
        self.double_cursor = (self.double_cursor + 1) % self.doubles.len();
        value
    }

    fn replay_boolean(&mut self, label: &str) -> bool {
        assert!(
            !self.booleans.is_empty(),
            "{label}: the boolean series is empty"
        );
        let value = self.booleans[self.boolean_cursor];
        self.boolean_cursor = (self.boolean_cursor + 1) % self.booleans.len();
        value
    }

    fn replay_i64_between(&mut self, label: &str, low: i64, high: i64) -> i64 {
        let value = self.replay_integer(label);
        if value < low {
            panic!("{label}: replayed value {value} is below the inclusive minimum {low}");
        }
        if value > high {
            panic!("{label}: replayed value {value} is above the inclusive maximum {high}");
        }
        value
    }

    fn replay_u64_between(&mut self, label: &str, low: u64, high: u64) -> u64 {
        let value = self.replay_integer(label) as u64;
        if value < low {
            panic!("{label}: replayed value {value} is below the inclusive minimum {low}");
        }
        if value > high {
            panic!("{label}: replayed value {value} is above the inclusive maximum {high}");
        }
        value
    }

    fn check_low_inclusive(label: &str, value: f64, low: f64) {
        if value < low {
            panic!("{label}: replayed value {value} is below the inclusive minimum {low}");
        }
    }

    fn check_high_inclusive(label: &str, value: f64, high: f64) {
        if value > high {
            panic!("{label}: replayed value {value} is above the inclusive maximum {high}");
        }
    }

    fn check_low_exclusive(label: &str, value: f64, low: f64) {
        if value <= low {
            panic!("{label}: replayed value {value} is not above the exclusive minimum {low}");
        }
    }

    fn check_high_exclusive(label: &str, value: f64, high: f64) {
        if value >= high {
            panic!("{label}: replayed value {value} is not below the exclusive maximum {high}");
        }
    }
}

impl Rng for KnownSeriesRandom {
    /// Replays the next integer reinterpreted as a raw 64-bit word. Any
    /// bit pattern is valid here, so nothing is checked.
    fn next_u64(&mut self) -> u64 {
        self.replay_integer("next_u64") as u64
    }

    fn next_u32(&mut self) -> u32 {
        self.replay_i64_between("next_u32", 0, i64::from(u32::MAX)) as u32
    }

    fn next_bool(&mut self) -> bool {
        self.replay_boolean("next_bool")
    }

    /// Replays the next boolean, still consuming exactly one entry. A
    /// replayed value that a certain probability could never produce is a
    /// divergence and panics.
    fn next_bool_prob(&mut self, probability: f64) -> bool {
        let value = self.replay_boolean("next_bool_prob");
        if probability >= 1.0 && !value {
            panic!("next_bool_prob: replayed value false cannot occur at probability {probability}");
        }
        if (probability <= 0.0 || probability.is_nan()) && value {
            panic!("next_bool_prob: replayed value true cannot occur at probability {probability}");
        }
        value
    }

    fn next_u32_bound(&mut self, outer: u32) -> u32 {
        if outer == 0 {
            return 0;
        }
        self.replay_i64_between("next_u32_bound", 0, i64::from(outer) - 1) as u32
    }

    fn next_u64_bound(&mut self, outer: u64) -> u64 {
        if outer == 0 {
            return 0;
        }
        self.replay_u64_between("next_u64_bound", 0, outer - 1)
    }

    fn next_u32_range(&mut self, inner: u32, outer: u32) -> u32 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (i64::from(inner), i64::from(outer) - 1)
        } else {
            (i64::from(outer) + 1, i64::from(inner))
        };
        self.replay_i64_between("next_u32_range", low, high) as u32
    }

    fn next_u64_range(&mut self, inner: u64, outer: u64) -> u64 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (inner, outer - 1)
        } else {
            (outer + 1, inner)
        };
        self.replay_u64_between("next_u64_range", low, high)
    }

    fn next_u32_inclusive(&mut self, inner: u32, outer: u32) -> u32 {
        if inner == outer {
            return inner;
        }
        let low = i64::from(inner.min(outer));
        let high = i64::from(inner.max(outer));
        self.replay_i64_between("next_u32_inclusive", low, high) as u32
    }

    fn next_u64_inclusive(&mut self, inner: u64, outer: u64) -> u64 {
        if inner == outer {
            return inner;
        }
        self.replay_u64_between("next_u64_inclusive", inner.min(outer), inner.max(outer))
    }

    fn next_i32_range(&mut self, inner: i32, outer: i32) -> i32 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (i64::from(inner), i64::from(outer) - 1)
        } else {
            (i64::from(outer) + 1, i64::from(inner))
        };
        self.replay_i64_between("next_i32_range", low, high) as i32
    }

    fn next_i64_range(&mut self, inner: i64, outer: i64) -> i64 {
        if inner == outer {
            return inner;
        }
        let (low, high) = if inner < outer {
            (inner, outer - 1)
        } else {
            (outer + 1, inner)
        };
        self.replay_i64_between("next_i64_range", low, high)
    }

    fn next_i32_inclusive(&mut self, inner: i32, outer: i32) -> i32 {
        if inner == outer {
            return inner;
        }
        let low = i64::from(inner.min(outer));
        let high = i64::from(inner.max(outer));
        self.replay_i64_between("next_i32_inclusive", low, high) as i32
    }

    fn next_i64_inclusive(&mut self, inner: i64, outer: i64) -> i64 {
        if inner == outer {
            return inner;
        }
        self.replay_i64_between("next_i64_inclusive", inner.min(outer), inner.max(outer))
    }

    fn next_f32(&mut self) -> f32 {
        let value = self.replay_double("next_f32") as f32;
        Self::check_low_inclusive("next_f32", f64::from(value), 0.0);
        Self::check_high_exclusive("next_f32", f64::from(value), 1.0);
        value
    }

    fn next_f64(&mut self) -> f64 {
        let value = self.replay_double("next_f64");
        Self::check_low_inclusive("next_f64", value, 0.0);
        Self::check_high_exclusive("next_f64", value, 1.0);
        value
    }

    fn next_f32_range(&mut self, inner: f32, outer: f32) -> f32 {
        if inner == outer {
            return inner;
        }
        let value = self.replay_double("next_f32_range") as f32;
        if inner < outer {
            Self::check_low_inclusive("next_f32_range", f64::from(value), f64::from(inner));
            Self::check_high_exclusive("next_f32_range", f64::from(value), f64::from(outer));
        } else {
            Self::check_low_exclusive("next_f32_range", f64::from(value), f64::from(outer));
            Self::check_high_inclusive("next_f32_range", f64::from(value), f64::from(inner));
        }
        value
    }

    fn next_f64_range(&mut self, inner: f64, outer: f64) -> f64 {
        if inner == outer {
            return inner;
        }
        let value = self.replay_double("next_f64_range");
        if inner < outer {
            Self::check_low_inclusive("next_f64_range", value, inner);
            Self::check_high_exclusive("next_f64_range", value, outer);
        } else {
            Self::check_low_exclusive("next_f64_range", value, outer);
            Self::check_high_inclusive("next_f64_range", value, inner);
        }
        value
    }

    fn next_f32_inclusive(&mut self, inner: f32, outer: f32) -> f32 {
        if inner == outer {
            return inner;
        }
        let value = self.replay_double("next_f32_inclusive") as f32;
        let low = f64::from(inner.min(outer));
        let high = f64::from(inner.max(outer));
        Self::check_low_inclusive("next_f32_inclusive", f64::from(value), low);
        Self::check_high_inclusive("next_f32_inclusive", f64::from(value), high);
        value
    }

    fn next_f64_inclusive(&mut self, inner: f64, outer: f64) -> f64 {
        if inner == outer {
            return inner;
        }
        let value = self.replay_double("next_f64_inclusive");
        Self::check_low_inclusive("next_f64_inclusive", value, inner.min(outer));
        Self::check_high_inclusive("next_f64_inclusive", value, inner.max(outer));
        value
    }

    fn next_exclusive_f32(&mut self) -> f32 {
        let value = self.replay_double("next_exclusive_f32") as f32;
        Self::check_low_exclusive("next_exclusive_f32", f64::from(value), 0.0);
        Self::check_high_exclusive("next_exclusive_f32", f64::from(value), 1.0);
        value
    }

    fn next_exclusive_f64(&mut self) -> f64 {
        let value = self.replay_double("next_exclusive_f64");
        Self::check_low_exclusive("next_exclusive_f64", value, 0.0);
        Self::check_high_exclusive("next_exclusive_f64", value, 1.0);
        value
    }

    fn next_exclusive_f64_range(&mut self, inner: f64, outer: f64) -> f64 {
        if inner == outer {
            return inner;
        }
        let value = self.replay_double("next_exclusive_f64_range");
        Self::check_low_exclusive("next_exclusive_f64_range", value, inner.min(outer));
        Self::check_high_exclusive("next_exclusive_f64_range", value, inner.max(outer));
        value
    }
}

impl PortableRng for KnownSeriesRandom {
    fn tag(&self) -> &'static str {
        Self::TAG
    }

    /// The series are not exposed as state words; capture them through
    /// [`PortableRng::serialize`] instead.
    fn state_count(&self) -> usize {
        0
    }

    fn state_word(&self, _index: usize) -> u64 {
        0
    }

    fn set_state_word(&mut self, _index: usize, _word: u64) {}

    /// Rewinds all three cursors to the start of their series. The seed
    /// has no meaning for a replay and is ignored.
    fn reseed(&mut self, _seed: u64) {
        self.integer_cursor = 0;
        self.double_cursor = 0;
        self.boolean_cursor = 0;
    }

    fn supports_previous(&self) -> bool {
        false
    }

    /// Serializes the three series with their cursors.
    ///
    /// The payload is three sections separated by `~`, in integer, double,
    /// boolean order. Each section is its cursor as a fixed-width hex word
    /// followed by the series items: integers and double bit patterns as
    /// fixed-width hex words, booleans as one `0` or `1` per item.
    fn serialize(&self) -> String {
        let mut out = String::with_capacity(
            self.tag().len()
                + 4
                + WORD_DIGITS * (3 + self.integers.len() + self.doubles.len())
                + self.booleans.len(),
        );
        out.push_str(self.tag());
        out.push(TAG_DELIMITER);
        push_hex_word(&mut out, self.integer_cursor as u64);
        for &value in &self.integers {
            push_hex_word(&mut out, value as u64);
        }
        out.push(SERIES_SEPARATOR);
        push_hex_word(&mut out, self.double_cursor as u64);
        for &value in &self.doubles {
            push_hex_word(&mut out, value.to_bits());
        }
        out.push(SERIES_SEPARATOR);
        push_hex_word(&mut out, self.boolean_cursor as u64);
        for &value in &self.booleans {
            out.push(if value { '1' } else { '0' });
        }
        out.push(TERMINATOR);
        out
    }
}

fn decode_cursor(cursor_word: u64, item_count: usize, series: usize) -> Result<usize, RandError> {
    usize::try_from(cursor_word)
        .ok()
        .filter(|&cursor| {
            if item_count == 0 {
                cursor == 0
            } else {
                cursor < item_count
            }
        })
        .ok_or(RandError::MalformedState {
            tag: KnownSeriesRandom::TAG.to_owned(),
            reason: MalformedReason::CursorOutOfRange { series },
        })
}

fn decode_word_series(section: &str, series: usize) -> Result<(usize, Vec<u64>), RandError> {
    let bytes = section.as_bytes();
    let truncated = RandError::MalformedState {
        tag: KnownSeriesRandom::TAG.to_owned(),
        reason: MalformedReason::TruncatedField { field: series },
    };
    if bytes.len() < WORD_DIGITS || bytes.len() % WORD_DIGITS != 0 {
        return Err(truncated);
    }
    let mut fields = bytes.chunks_exact(WORD_DIGITS);
    let cursor_digits = fields.next().ok_or(truncated)?;
    let cursor_word = parse_hex_word(KnownSeriesRandom::TAG, series, cursor_digits)?;
    let items = fields
        .map(|digits| parse_hex_word(KnownSeriesRandom::TAG, series, digits))
        .collect::<Result<Vec<u64>, RandError>>()?;
    let cursor = decode_cursor(cursor_word, items.len(), series)?;
    Ok((cursor, items))
}

fn decode_bool_series(section: &str, series: usize) -> Result<(usize, Vec<bool>), RandError> {
    let bytes = section.as_bytes();
    if bytes.len() < WORD_DIGITS {
        return Err(RandError::MalformedState {
            tag: KnownSeriesRandom::TAG.to_owned(),
            reason: MalformedReason::TruncatedField { field: series },
        });
    }
    let (cursor_digits, item_digits) = bytes.split_at(WORD_DIGITS);
    let cursor_word = parse_hex_word(KnownSeriesRandom::TAG, series, cursor_digits)?;
    let items = item_digits
        .iter()
        .map(|&byte| match byte {
            b'0' => Ok(false),
            b'1' => Ok(true),
            _ => Err(RandError::MalformedState {
                tag: KnownSeriesRandom::TAG.to_owned(),
                reason: MalformedReason::InvalidDigit { field: series },
            }),
        })
        .collect::<Result<Vec<bool>, RandError>>()?;
    let cursor = decode_cursor(cursor_word, items.len(), series)?;
    Ok((cursor, items))
}

impl RandomFamily for KnownSeriesRandom {
    const TAG: &'static str = "KnsR";

    fn decode_payload(payload: &str) -> Result<Self, RandError> {
        let sections: Vec<&str> = payload.split(SERIES_SEPARATOR).collect();
        let [integer_section, double_section, boolean_section] = sections[..] else {
            return Err(RandError::MalformedState {
                tag: Self::TAG.to_owned(),
                reason: MalformedReason::SeriesCount {
                    expected: 3,
                    found: sections.len(),
                },
            });
        };

        let (integer_cursor, integer_words) = decode_word_series(integer_section, 0)?;
        let (double_cursor, double_words) = decode_word_series(double_section, 1)?;
        let (boolean_cursor, booleans) = decode_bool_series(boolean_section, 2)?;

        Ok(Self {
            integers: integer_words.into_iter().map(|word| word as i64).collect(),
            doubles: double_words.into_iter().map(f64::from_bits).collect(),
            booleans,
            integer_cursor,
            double_cursor,
            boolean_cursor,
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
    fn test_replays_integers_cyclically() {
        let mut rng = KnownSeriesRandom::new(vec![1, 2, 3], vec![], vec![]);
        let drawn: Vec<u64> = (0..7).map(|_| rng.next_u64()).collect();
        assert_eq!(drawn, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_next_u64_accepts_any_bit_pattern() {
        let mut rng = KnownSeriesRandom::new(vec![-1], vec![], vec![]);
        assert_eq!(rng.next_u64(), u64::MAX);
    }

    #[test]
    #[should_panic(expected = "next_u64: the integer series is empty")]
    fn test_empty_integer_series_panics() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![], vec![]);
        let _ = rng.next_u64();
    }

    #[test]
    fn test_next_u32_accepts_full_u32_domain() {
        let mut rng = KnownSeriesRandom::new(vec![0, i64::from(u32::MAX)], vec![], vec![]);
        assert_eq!(rng.next_u32(), 0);
        assert_eq!(rng.next_u32(), u32::MAX);
    }

    #[test]
    #[should_panic(expected = "next_u32: replayed value -1 is below the inclusive minimum 0")]
    fn test_next_u32_rejects_negative() {
        let mut rng = KnownSeriesRandom::new(vec![-1], vec![], vec![]);
        let _ = rng.next_u32();
    }

    #[test]
    fn test_bounded_draw_accepts_interval() {
        let mut rng = KnownSeriesRandom::new(vec![10, 19], vec![], vec![]);
        assert_eq!(rng.next_i64_range(10, 20), 10);
        assert_eq!(rng.next_i64_range(10, 20), 19);
    }

    #[test]
    #[should_panic(
        expected = "next_i64_range: replayed value 20 is above the inclusive maximum 19"
    )]
    fn test_bounded_draw_rejects_excluded_end() {
        let mut rng = KnownSeriesRandom::new(vec![20], vec![], vec![]);
        let _ = rng.next_i64_range(10, 20);
    }

    #[test]
    fn test_crossed_bounds_accept_symmetric_interval() {
        let mut rng = KnownSeriesRandom::new(vec![-100, 100], vec![], vec![]);
        assert_eq!(rng.next_i64_range(100, -101), -100);
        assert_eq!(rng.next_i64_range(100, -101), 100);
    }

    #[test]
    #[should_panic(
        expected = "next_i64_range: replayed value -101 is below the inclusive minimum -100"
    )]
    fn test_crossed_bounds_reject_excluded_end() {
        let mut rng = KnownSeriesRandom::new(vec![-101], vec![], vec![]);
        let _ = rng.next_i64_range(100, -101);
    }

    #[test]
    fn test_u64_bounds_compare_unsigned() {
        let mut rng = KnownSeriesRandom::new(vec![-1], vec![], vec![]);
        assert_eq!(
            rng.next_u64_inclusive(u64::MAX - 10, u64::MAX),
            u64::MAX
        );
    }

    #[test]
    fn test_equal_bounds_do_not_touch_the_series() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![], vec![]);
        assert_eq!(rng.next_i64_range(7, 7), 7);
        assert_eq!(rng.next_u64_inclusive(9, 9), 9);
        assert_eq!(rng.next_f64_range(2.5, 2.5), 2.5);
    }

    #[test]
    fn test_zero_bound_does_not_touch_the_series() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![], vec![]);
        assert_eq!(rng.next_u32_bound(0), 0);
        assert_eq!(rng.next_u64_bound(0), 0);
    }

    #[test]
    fn test_bool_prob_still_consumes_one_entry() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![], vec![true, false]);
        assert!(rng.next_bool_prob(0.5));
        assert!(!rng.next_bool());
    }

    #[test]
    #[should_panic(expected = "cannot occur at probability 1")]
    fn test_bool_prob_certain_true_rejects_false() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![], vec![false]);
        let _ = rng.next_bool_prob(1.0);
    }

    #[test]
    #[should_panic(expected = "cannot occur at probability 0")]
    fn test_bool_prob_certain_false_rejects_true() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![], vec![true]);
        let _ = rng.next_bool_prob(0.0);
    }

    #[test]
    fn test_unit_float_accepts_zero() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![0.0, 0.25], vec![]);
        assert_eq!(rng.next_f64(), 0.0);
        assert_eq!(rng.next_f64(), 0.25);
    }

    #[test]
    #[should_panic(expected = "next_f64: replayed value 1 is not below the exclusive maximum 1")]
    fn test_unit_float_rejects_one() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![1.0], vec![]);
        let _ = rng.next_f64();
    }

    #[test]
    fn test_inclusive_float_accepts_both_ends() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![0.0, 1.0], vec![]);
        assert_eq!(rng.next_f64_inclusive(0.0, 1.0), 0.0);
        assert_eq!(rng.next_f64_inclusive(0.0, 1.0), 1.0);
    }

    #[test]
    #[should_panic(
        expected = "next_exclusive_f64: replayed value 0 is not above the exclusive minimum 0"
    )]
    fn test_exclusive_unit_rejects_zero() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![0.0], vec![]);
        let _ = rng.next_exclusive_f64();
    }

    #[test]
    fn test_crossed_float_range_keeps_first_bound_attainable() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![5.0, 1.5], vec![]);
        assert_eq!(rng.next_f64_range(5.0, 1.0), 5.0);
        assert_eq!(rng.next_f64_range(5.0, 1.0), 1.5);
    }

    #[test]
    #[should_panic(
        expected = "next_f64_range: replayed value 1 is not above the exclusive minimum 1"
    )]
    fn test_crossed_float_range_rejects_excluded_end() {
        let mut rng = KnownSeriesRandom::new(vec![], vec![1.0], vec![]);
        let _ = rng.next_f64_range(5.0, 1.0);
    }

    #[test]
    fn test_shuffle_consumes_validated_bounded_draws() {
        // Fisher-Yates over 3 items draws bounds 3 then 2; scripted picks
        // keep the slice unchanged.
        let mut rng = KnownSeriesRandom::new(vec![2, 1], vec![], vec![]);
        let mut items = [10, 20, 30];
        rng.shuffle(&mut items);
        assert_eq!(items, [10, 20, 30]);
    }

    #[test]
    fn test_serialize_exact_text() {
        let mut rng = KnownSeriesRandom::new(vec![1], vec![0.5], vec![true, false]);
        let _ = rng.next_bool();
        assert_eq!(
            rng.serialize(),
            "KnsR`00000000000000000000000000000001~00000000000000003fe0000000000000~000000000000000110`"
        );
    }

    #[test]
    fn test_serialize_round_trip_preserves_cursors() {
        let mut rng = KnownSeriesRandom::new(vec![4, 5, 6], vec![0.125, 0.875], vec![true, true]);
        let _ = rng.next_u64();
        let _ = rng.next_f64();
        let _ = rng.next_bool();

        let text = rng.serialize();
        let payload = text
            .strip_prefix("KnsR`")
            .and_then(|rest| rest.strip_suffix('`'))
            .unwrap();
        let mut decoded = KnownSeriesRandom::decode_payload(payload).unwrap();
        assert_eq!(decoded, rng);
        assert_eq!(decoded.next_u64(), rng.next_u64());
        assert_eq!(decoded.next_f64(), rng.next_f64());
        assert_eq!(decoded.next_bool(), rng.next_bool());
    }

    #[test]
    fn test_empty_series_serialize_round_trip() {
        let rng = KnownSeriesRandom::new(vec![], vec![], vec![]);
        assert_eq!(
            rng.serialize(),
            "KnsR`0000000000000000~0000000000000000~0000000000000000`"
        );
        let decoded = KnownSeriesRandom::decode_payload(
            "0000000000000000~0000000000000000~0000000000000000",
        )
        .unwrap();
        assert_eq!(decoded, rng);
    }

    #[test]
    fn test_decode_rejects_wrong_section_count() {
        let error =
            KnownSeriesRandom::decode_payload("0000000000000000~0000000000000000").unwrap_err();
        assert_eq!(
            error,
            RandError::MalformedState {
                tag: "KnsR".to_owned(),
                reason: MalformedReason::SeriesCount {
                    expected: 3,
                    found: 2,
                },
            }
        );
    }

    #[test]
    fn test_decode_rejects_ragged_word_section() {
        let error = KnownSeriesRandom::decode_payload(
            "0000000000000000123~0000000000000000~0000000000000000",
        )
        .unwrap_err();
        assert_eq!(
            error,
            RandError::MalformedState {
                tag: "KnsR".to_owned(),
                reason: MalformedReason::TruncatedField { field: 0 },
            }
        );
    }

    #[test]
    fn test_decode_rejects_invalid_digit() {
        let error = KnownSeriesRandom::decode_payload(
            "0000000000000000~00000000000000XY~0000000000000000",
        )
        .unwrap_err();
        assert_eq!(
            error,
            RandError::MalformedState {
                tag: "KnsR".to_owned(),
                reason: MalformedReason::InvalidDigit { field: 1 },
            }
        );
    }

    #[test]
    fn test_decode_rejects_bad_boolean_item() {
        let error = KnownSeriesRandom::decode_payload(
            "0000000000000000~0000000000000000~000000000000000012",
        )
        .unwrap_err();
        assert_eq!(
            error,
            RandError::MalformedState {
                tag: "KnsR".to_owned(),
                reason: MalformedReason::InvalidDigit { field: 2 },
            }
        );
    }

    #[test]
    fn test_decode_rejects_cursor_past_series() {
        let error = KnownSeriesRandom::decode_payload(
            "00000000000000010000000000000007~0000000000000000~0000000000000000",
        )
        .unwrap_err();
        assert_eq!(
            error,
            RandError::MalformedState {
                tag: "KnsR".to_owned(),
                reason: MalformedReason::CursorOutOfRange { series: 0 },
            }
        );
    }

    #[test]
    fn test_decode_rejects_nonzero_cursor_on_empty_series() {
        let error = KnownSeriesRandom::decode_payload(
            "0000000000000000~0000000000000000~0000000000000001",
        )
        .unwrap_err();
        assert_eq!(
            error,
            RandError::MalformedState {
                tag: "KnsR".to_owned(),
                reason: MalformedReason::CursorOutOfRange { series: 2 },
            }
        );
    }

    #[test]
    fn test_reseed_rewinds_cursors() {
        let mut rng = KnownSeriesRandom::new(vec![8, 9], vec![0.5], vec![true]);
        let _ = rng.next_u64();
        rng.reseed(12345);
        assert_eq!(rng, KnownSeriesRandom::new(vec![8, 9], vec![0.5], vec![true]));
    }

    #[test]
    fn test_capability_flags() {
        let mut rng = KnownSeriesRandom::new(vec![1], vec![], vec![]);
        assert_eq!(rng.tag(), "KnsR");
        assert_eq!(rng.state_count(), 0);
        assert_eq!(rng.state_word(0), 0);
        rng.set_state_word(0, 5);
        assert!(!rng.supports_previous());
        assert!(rng.as_reversible().is_none());
        assert_eq!(rng, KnownSeriesRandom::new(vec![1], vec![], vec![]));
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
        /// Property: serialize, decode, serialize is the identity on the
        /// text, including NaN double bit patterns and advanced cursors.
        #[test]
        fn prop_serialize_decode_serialize_is_identity(
            integers in proptest::collection::vec(any::<i64>(), 0..6),
            double_bits in proptest::collection::vec(any::<u64>(), 0..6),
            booleans in proptest::collection::vec(any::<bool>(), 0..6),
            advance in 0usize..8,
        ) {
            let doubles: Vec<f64> = double_bits.into_iter().map(f64::from_bits).collect();
            let mut rng = KnownSeriesRandom::new(integers.clone(), doubles, booleans.clone());
            if !integers.is_empty() {
                for _ in 0..advance {
                    let _ = rng.next_u64();
                }
            }
            if !booleans.is_empty() {
                for _ in 0..advance {
                    let _ = rng.next_bool();
                }
            }

            let text = rng.serialize();
            let payload = text
                .strip_prefix("KnsR`")
                .and_then(|rest| rest.strip_suffix('`'))
                .expect("framing is fixed");
            let decoded = KnownSeriesRandom::decode_payload(payload).expect("payload is well-formed");
            prop_assert_eq!(decoded.serialize(), text);
        }

        /// Property: a replayed value inside the requested interval comes
        /// back verbatim.
        #[test]
        fn prop_in_range_values_replay_verbatim(low in -1000i64..0, high in 1i64..1000) {
            let mut rng = KnownSeriesRandom::new(vec![low, 0, high], vec![], vec![]);
            prop_assert_eq!(rng.next_i64_inclusive(low, high), low);
            prop_assert_eq!(rng.next_i64_inclusive(low, high), 0);
            prop_assert_eq!(rng.next_i64_inclusive(low, high), high);
        }
    }
}
