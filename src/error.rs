//! The error types returned by fallible operations in this crate.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error messages this library can return. Fallible API
/// functions generally return a [`Result<T, RandError>`].
///
/// [`Result<T, RandError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum RandError {
    /// A serialized generator carried a tag that no registered family claims.
    UnknownTag {
        /// The tag parsed from the serialized text.
        tag: String,
    },
    /// A strict registration tried to bind a tag that a different family
    /// already owns. The existing binding is left untouched.
    TagCollision {
        /// The contested tag.
        tag: &'static str,
        /// The family currently bound to the tag.
        existing: &'static str,
        /// The family whose registration was rejected.
        attempted: &'static str,
    },
    /// A serialized generator failed to decode. Decoding is all-or-nothing:
    /// after this error no partially-applied state is observable anywhere.
    MalformedState {
        /// The tag of the generator that failed to decode. Empty when the
        /// input was too malformed to carry one.
        tag: String,
        /// Further specifies what was wrong with the serialized text.
        reason: MalformedReason,
    },
}

/// Specifies why a serialized generator failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedReason {
    /// No delimiter separates the tag from the state payload.
    MissingDelimiter,
    /// The state payload is not closed by the terminator character.
    MissingTerminator,
    /// The payload holds a different number of state fields than the family
    /// encodes.
    FieldCount {
        /// How many state fields the family encodes.
        expected: usize,
        /// How many complete fields the payload actually holds.
        found: usize,
    },
    /// A state field stopped short of its fixed width.
    TruncatedField {
        /// Zero-based index of the short field.
        field: usize,
    },
    /// A state field contains a byte outside the lowercase hex alphabet.
    InvalidDigit {
        /// Zero-based index of the offending field.
        field: usize,
    },
    /// A replay payload holds a different number of series sections than the
    /// family encodes.
    SeriesCount {
        /// How many series sections the family encodes.
        expected: usize,
        /// How many sections the payload actually holds.
        found: usize,
    },
    /// A replay series cursor points past the end of its series.
    CursorOutOfRange {
        /// Zero-based index of the series with the bad cursor.
        series: usize,
    },
}

impl Display for RandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RandError::UnknownTag { tag } => {
                write!(f, "Unknown serialization tag '{}': no random family is registered for it", tag)
            }
            RandError::TagCollision {
                tag,
                existing,
                attempted,
            } => {
                write!(
                    f,
                    "Serialization tag '{}' is already bound to {}; refusing to rebind it to {}",
                    tag, existing, attempted
                )
            }
            RandError::MalformedState { tag, reason } => {
                write!(f, "Malformed serialized state for tag '{}': {}", tag, reason)
            }
        }
    }
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingDelimiter => {
                write!(f, "missing the delimiter between tag and state payload")
            }
            MalformedReason::MissingTerminator => {
                write!(f, "missing the closing terminator")
            }
            MalformedReason::FieldCount { expected, found } => {
                write!(f, "expected {} state fields, found {}", expected, found)
            }
            MalformedReason::TruncatedField { field } => {
                write!(f, "state field {} is shorter than its fixed width", field)
            }
            MalformedReason::InvalidDigit { field } => {
                write!(f, "state field {} contains a non-hex digit", field)
            }
            MalformedReason::SeriesCount { expected, found } => {
                write!(f, "expected {} replay series, found {}", expected, found)
            }
            MalformedReason::CursorOutOfRange { series } => {
                write!(f, "cursor of replay series {} points outside the series", series)
            }
        }
    }
}

impl Error for RandError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_tag() {
        let error = RandError::UnknownTag {
            tag: "ZzZz".to_owned(),
        };
        let text = error.to_string();
        assert!(text.contains("ZzZz"), "message should name the tag: {text}");
    }

    #[test]
    fn test_display_collision_names_both_families() {
        let error = RandError::TagCollision {
            tag: "BstR",
            existing: "bastion::BastionRandom",
            attempted: "impostor::Impostor",
        };
        let text = error.to_string();
        assert!(text.contains("bastion::BastionRandom"));
        assert!(text.contains("impostor::Impostor"));
    }

    #[test]
    fn test_display_malformed_includes_reason() {
        let error = RandError::MalformedState {
            tag: "Pcg3".to_owned(),
            reason: MalformedReason::FieldCount {
                expected: 2,
                found: 1,
            },
        };
        let text = error.to_string();
        assert!(text.contains("Pcg3"));
        assert!(text.contains("expected 2 state fields, found 1"));
    }
}
