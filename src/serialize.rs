//! Text serialization of generator state.
//!
//! Every portable generator serializes to a short self-describing string:
//!
//! ```text
//! tag ` state words as fixed-width lowercase hex `
//! ```
//!
//! The tag identifies the family, the backtick separates it from the payload
//! and closes the whole form, and each state word is exactly
//! [`WORD_DIGITS`] lowercase hex digits, most significant digit first, in
//! family field order. The payload alphabet never contains the backtick, so
//! the terminator is unambiguous.
//!
//! Decoding is all-or-nothing: a wrong field count, a short field, a stray
//! byte, or trailing garbage fails the whole decode with a structured
//! [`RandError`] and constructs nothing.
//!
//! # Example
//!
//! ```rust
//! use fortress_rand::{BastionRandom, PortableRng, SeedableRng};
//!
//! let rng = BastionRandom::seed_from_u64(99);
//! let text = rng.serialize();
//! assert!(text.starts_with("BstR`"));
//! assert!(text.ends_with('`'));
//! ```

use crate::error::{MalformedReason, RandError};
use crate::reverse::ReversibleRng;
use crate::rng::Rng;
use smallvec::SmallVec;

/// Separates the tag from the state payload.
pub const TAG_DELIMITER: char = '`';

/// Closes a serialized form. Shares the delimiter character; the payload
/// alphabet cannot produce it, so the first occurrence after the payload is
/// always the terminator.
pub const TERMINATOR: char = '`';

/// Fixed width of one encoded state word, in hex digits.
pub const WORD_DIGITS: usize = 16;

/// Decoded state words. Stack-allocated for every built-in family.
pub type StateWords = SmallVec<[u64; 4]>;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// The serialization-facing contract every portable generator implements.
///
/// The trait is object-safe; the registry deals in `Box<dyn PortableRng>`.
/// State words are the exact fields that stepping and reversal mutate, in a
/// fixed per-family order, so capturing them captures the generator.
pub trait PortableRng: Rng + std::fmt::Debug {
    /// The short tag identifying this family's algorithm and encoding.
    fn tag(&self) -> &'static str;

    /// How many state words this generator carries.
    fn state_count(&self) -> usize;

    /// Reads one state word. Indexes at or past [`state_count`] address no
    /// word and read as 0; they never panic.
    ///
    /// [`state_count`]: PortableRng::state_count
    fn state_word(&self, index: usize) -> u64;

    /// Overwrites one state word. The word is taken as-is, with no
    /// normalization. Indexes at or past [`state_count`] are ignored.
    ///
    /// [`state_count`]: PortableRng::state_count
    fn set_state_word(&mut self, index: usize, word: u64);

    /// Resets the generator to the deterministic state the given seed
    /// produces, as if it had been freshly constructed from it.
    fn reseed(&mut self, seed: u64);

    /// Whether this generator implements [`ReversibleRng`].
    fn supports_previous(&self) -> bool;

    /// Dynamic access to backward stepping, for callers holding an erased
    /// generator. Families without an inverse return `None`.
    fn as_reversible(&mut self) -> Option<&mut dyn ReversibleRng> {
        None
    }

    /// Serializes this generator into the tag + hex-words form described in
    /// the module docs. Families with non-scalar state override this.
    fn serialize(&self) -> String {
        let mut out =
            String::with_capacity(self.tag().len() + 2 + WORD_DIGITS * self.state_count());
        out.push_str(self.tag());
        out.push(TAG_DELIMITER);
        for index in 0..self.state_count() {
            push_hex_word(&mut out, self.state_word(index));
        }
        out.push(TERMINATOR);
        out
    }
}

/// Static identity of a serializable family: its tag plus the decoding
/// routine the registry dispatches to.
pub trait RandomFamily: PortableRng + Sized + 'static {
    /// Tag under which this family registers and serializes.
    const TAG: &'static str;

    /// Rebuilds an instance from the text between the delimiter and the
    /// terminator. The payload must be consumed exactly.
    fn decode_payload(payload: &str) -> Result<Self, RandError>;
}

/// Appends one state word as exactly [`WORD_DIGITS`] lowercase hex digits.
pub fn push_hex_word(out: &mut String, word: u64) {
    let mut shift = WORD_DIGITS * 4;
    while shift > 0 {
        shift -= 4;
        let nibble = ((word >> shift) & 0xF) as usize;
        out.push(HEX_DIGITS[nibble] as char);
    }
}

/// Parses one fixed-width state field. Accepts only lowercase hex; `field`
/// is the zero-based index reported on failure.
pub fn parse_hex_word(tag: &str, field: usize, digits: &[u8]) -> Result<u64, RandError> {
    let mut word = 0u64;
    for &byte in digits {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            _ => {
                return Err(RandError::MalformedState {
                    tag: tag.to_owned(),
                    reason: MalformedReason::InvalidDigit { field },
                })
            }
        };
        word = (word << 4) | u64::from(digit);
    }
    Ok(word)
}

/// Decodes a scalar-family payload into exactly `expected` state words.
///
/// Fails without constructing anything if the payload is ragged, has the
/// wrong field count, or contains a byte outside the hex alphabet.
pub fn decode_words(tag: &str, payload: &str, expected: usize) -> Result<StateWords, RandError> {
    let bytes = payload.as_bytes();
    if bytes.len() != expected * WORD_DIGITS {
        let reason = if bytes.len() % WORD_DIGITS == 0 {
            MalformedReason::FieldCount {
                expected,
                found: bytes.len() / WORD_DIGITS,
            }
        } else {
            MalformedReason::TruncatedField {
                field: bytes.len() / WORD_DIGITS,
            }
        };
        return Err(RandError::MalformedState {
            tag: tag.to_owned(),
            reason,
        });
    }

    let mut words = StateWords::new();
    for (field, chunk) in bytes.chunks_exact(WORD_DIGITS).enumerate() {
        words.push(parse_hex_word(tag, field, chunk)?);
    }
    Ok(words)
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
    fn test_push_hex_word_fixed_width() {
        let mut out = String::new();
        push_hex_word(&mut out, 0);
        assert_eq!(out, "0000000000000000");

        out.clear();
        push_hex_word(&mut out, u64::MAX);
        assert_eq!(out, "ffffffffffffffff");

        out.clear();
        push_hex_word(&mut out, 0x0123_4567_89ab_cdef);
        assert_eq!(out, "0123456789abcdef");
    }

    #[test]
    fn test_parse_hex_word_round_trips() {
        for word in [0u64, 1, 0xdead_beef, u64::MAX, 0x8000_0000_0000_0000] {
            let mut text = String::new();
            push_hex_word(&mut text, word);
            let parsed = parse_hex_word("TsTs", 0, text.as_bytes()).unwrap();
            assert_eq!(parsed, word);
        }
    }

    #[test]
    fn test_parse_hex_word_rejects_uppercase() {
        let result = parse_hex_word("TsTs", 3, b"00000000DEADBEEF");
        assert_eq!(
            result,
            Err(RandError::MalformedState {
                tag: "TsTs".to_owned(),
                reason: MalformedReason::InvalidDigit { field: 3 },
            })
        );
    }

    #[test]
    fn test_decode_words_happy_path() {
        let mut payload = String::new();
        push_hex_word(&mut payload, 7);
        push_hex_word(&mut payload, u64::MAX);
        let words = decode_words("TsTs", &payload, 2).unwrap();
        assert_eq!(words.as_slice(), &[7, u64::MAX]);
    }

    #[test]
    fn test_decode_words_wrong_field_count() {
        let mut payload = String::new();
        push_hex_word(&mut payload, 7);
        let result = decode_words("TsTs", &payload, 2);
        assert_eq!(
            result,
            Err(RandError::MalformedState {
                tag: "TsTs".to_owned(),
                reason: MalformedReason::FieldCount {
                    expected: 2,
                    found: 1,
                },
            })
        );
    }

    #[test]
    fn test_decode_words_ragged_payload() {
        let result = decode_words("TsTs", "0123456789abcde", 1);
        assert_eq!(
            result,
            Err(RandError::MalformedState {
                tag: "TsTs".to_owned(),
                reason: MalformedReason::TruncatedField { field: 0 },
            })
        );
    }

    #[test]
    fn test_decode_words_flags_bad_digit_by_field() {
        let mut payload = String::new();
        push_hex_word(&mut payload, 1);
        payload.push_str("00000000000000g0");
        let result = decode_words("TsTs", &payload, 2);
        assert_eq!(
            result,
            Err(RandError::MalformedState {
                tag: "TsTs".to_owned(),
                reason: MalformedReason::InvalidDigit { field: 1 },
            })
        );
    }

    #[test]
    fn test_decode_words_empty_payload_zero_fields() {
        let words = decode_words("TsTs", "", 0).unwrap();
        assert!(words.is_empty());
    }
}
