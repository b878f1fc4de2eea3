//! Process-wide registry mapping serialization tags to decode functions.
//!
//! [`PortableRng::serialize`] produces a string that opens with the family
//! tag. Reconstructing a generator from that string requires knowing which
//! family owns the tag; this module holds that mapping. Nothing registers
//! itself: hosts call [`register_defaults`] (or [`register`] for custom
//! families) during startup and treat the registry as read-only afterwards.
//!
//! Strict registration never displaces an existing binding, so load order
//! cannot silently change what a tag decodes to. [`force_register`] is the
//! explicit escape hatch and logs every rebinding.
//!
//! # Example
//!
//! ```rust
//! use fortress_rand::{registry, BastionRandom, PortableRng, Rng, SeedableRng};
//!
//! assert!(registry::register_defaults());
//!
//! let mut original = BastionRandom::seed_from_u64(77);
//! let snapshot = original.serialize();
//!
//! let mut restored = registry::deserialize(&snapshot).expect("tag is registered");
//! assert_eq!(restored.next_u64(), original.next_u64());
//! ```

use std::{
    any::{type_name, TypeId},
    collections::BTreeMap,
};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    error::{MalformedReason, RandError},
    families::{
        BastionRandom, CitadelRandom, KnownSeriesRandom, PalisadeRandom, Pcg32Random,
        RampartRandom, Xoshiro256Random,
    },
    serialize::{PortableRng, RandomFamily, TAG_DELIMITER, TERMINATOR},
};

/// Rebuilds a boxed generator from the payload between the delimiter and the
/// terminator.
type DecodeFn = fn(&str) -> Result<Box<dyn PortableRng>, RandError>;

struct RegistryEntry {
    /// Rust type name of the bound family, for collision diagnostics.
    family: &'static str,
    /// Identity used to tell re-registration apart from collision.
    type_id: TypeId,
    decode: DecodeFn,
}

/// Tag to decoder map. A `BTreeMap` keeps [`registered_tags`] and diagnostics
/// in a stable order.
static REGISTRY: RwLock<BTreeMap<&'static str, RegistryEntry>> = RwLock::new(BTreeMap::new());

fn entry_for<F: RandomFamily>() -> RegistryEntry {
    RegistryEntry {
        family: type_name::<F>(),
        type_id: TypeId::of::<F>(),
        decode: |payload| {
            F::decode_payload(payload).map(|rng| Box::new(rng) as Box<dyn PortableRng>)
        },
    }
}

/// Binds `F`'s tag to `F`'s decode function.
///
/// Registering the same family twice is idempotent success. Registering a
/// different family under an already-bound tag fails with
/// [`RandError::TagCollision`] and leaves the existing binding untouched.
///
/// # Errors
///
/// [`RandError::TagCollision`] when the tag is bound to a different family.
pub fn register<F: RandomFamily>() -> Result<(), RandError> {
    let mut registry = REGISTRY.write();
    if let Some(existing) = registry.get(F::TAG) {
        if existing.type_id == TypeId::of::<F>() {
            return Ok(());
        }
        return Err(RandError::TagCollision {
            tag: F::TAG,
            existing: existing.family,
            attempted: type_name::<F>(),
        });
    }
    registry.insert(F::TAG, entry_for::<F>());
    debug!("Registered serialization tag '{}' for {}", F::TAG, type_name::<F>());
    Ok(())
}

/// Non-erroring variant of [`register`]: `true` when `F` owns its tag after
/// the call, `false` when a different family already holds it.
#[must_use]
pub fn try_register<F: RandomFamily>() -> bool {
    register::<F>().is_ok()
}

/// Unconditionally binds `F`'s tag to `F`, replacing any existing binding.
///
/// Replacing a different family is logged at `warn` level so forced
/// rebindings stay auditable.
pub fn force_register<F: RandomFamily>() {
    let mut registry = REGISTRY.write();
    if let Some(previous) = registry.insert(F::TAG, entry_for::<F>()) {
        if previous.type_id != TypeId::of::<F>() {
            warn!(
                "Serialization tag '{}' rebound from {} to {}",
                F::TAG,
                previous.family,
                type_name::<F>()
            );
        }
    }
}

/// Strictly registers every built-in family.
///
/// Returns `true` when all built-in tags are bound to their families after
/// the call. A collision on one tag does not stop the remaining families
/// from registering.
#[must_use]
pub fn register_defaults() -> bool {
    let mut complete = true;
    complete &= register::<BastionRandom>().is_ok();
    complete &= register::<RampartRandom>().is_ok();
    complete &= register::<CitadelRandom>().is_ok();
    complete &= register::<Xoshiro256Random>().is_ok();
    complete &= register::<Pcg32Random>().is_ok();
    complete &= register::<PalisadeRandom>().is_ok();
    complete &= register::<KnownSeriesRandom>().is_ok();
    complete
}

/// Tags currently bound, in lexicographic order.
#[must_use]
pub fn registered_tags() -> Vec<&'static str> {
    REGISTRY.read().keys().copied().collect()
}

/// Rebuilds a boxed generator from [`PortableRng::serialize`] output.
///
/// Decoding is all-or-nothing: an unknown tag, broken framing, or a payload
/// the family rejects each fail the whole call, and no partially-applied
/// state is observable anywhere.
///
/// # Errors
///
/// - [`RandError::MalformedState`] when the framing or the payload is
///   malformed.
/// - [`RandError::UnknownTag`] when no family is registered for the tag.
pub fn deserialize(serialized: &str) -> Result<Box<dyn PortableRng>, RandError> {
    let Some((tag, rest)) = serialized.split_once(TAG_DELIMITER) else {
        return Err(RandError::MalformedState {
            tag: serialized.to_owned(),
            reason: MalformedReason::MissingDelimiter,
        });
    };
    let Some(payload) = rest.strip_suffix(TERMINATOR) else {
        return Err(RandError::MalformedState {
            tag: tag.to_owned(),
            reason: MalformedReason::MissingTerminator,
        });
    };

    // Copy the decode fn out so the lock is not held while it runs.
    let decode = {
        let registry = REGISTRY.read();
        let Some(entry) = registry.get(tag) else {
            return Err(RandError::UnknownTag {
                tag: tag.to_owned(),
            });
        };
        entry.decode
    };

    let result = decode(payload);
    if let Err(error) = &result {
        debug!("Rejected serialized state for tag '{}': {}", tag, error);
    }
    result
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
    use crate::rng::{Rng, SeedableRng};
    use crate::serialize::decode_words;

    /// Claims `BastionRandom`'s tag without being `BastionRandom`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TagSquatter {
        state: u64,
    }

    impl Rng for TagSquatter {
        fn next_u64(&mut self) -> u64 {
            self.state = self.state.wrapping_add(1);
            self.state
        }
    }

    impl PortableRng for TagSquatter {
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
            self.state = seed;
        }

        fn supports_previous(&self) -> bool {
            false
        }
    }

    impl RandomFamily for TagSquatter {
        const TAG: &'static str = "BstR";

        fn decode_payload(payload: &str) -> Result<Self, RandError> {
            let words = decode_words(Self::TAG, payload, 1)?;
            Ok(Self { state: words[0] })
        }
    }

    #[test]
    fn test_register_same_family_is_idempotent() {
        assert!(register::<BastionRandom>().is_ok());
        assert!(register::<BastionRandom>().is_ok());
        assert!(try_register::<BastionRandom>());
    }

    #[test]
    fn test_register_rejects_tag_collision() {
        assert!(register::<BastionRandom>().is_ok());
        let error = register::<TagSquatter>().unwrap_err();
        match error {
            RandError::TagCollision {
                tag,
                existing,
                attempted,
            } => {
                assert_eq!(tag, "BstR");
                assert!(existing.contains("BastionRandom"), "existing: {existing}");
                assert!(attempted.contains("TagSquatter"), "attempted: {attempted}");
            }
            other => panic!("expected TagCollision, got {other:?}"),
        }
        assert!(!try_register::<TagSquatter>());

        // The original binding still decodes.
        let snapshot = BastionRandom::seed_from_u64(5).serialize();
        let restored = deserialize(&snapshot).unwrap();
        assert_eq!(restored.tag(), "BstR");
    }

    #[test]
    fn test_register_defaults_binds_every_family() {
        assert!(register_defaults());
        let tags = registered_tags();
        for tag in ["BstR", "RmpR", "CtdR", "XsSS", "Pcg3", "PlsR", "KnsR"] {
            assert!(tags.contains(&tag), "missing tag {tag} in {tags:?}");
        }
        // Registering a second time changes nothing.
        assert!(register_defaults());
    }

    #[test]
    fn test_registered_tags_sorted() {
        assert!(register_defaults());
        let tags = registered_tags();
        assert!(tags.windows(2).all(|pair| pair[0] < pair[1]), "{tags:?}");
    }

    #[test]
    fn test_deserialize_round_trip() {
        assert!(register::<RampartRandom>().is_ok());
        let mut original = RampartRandom::seed_from_u64(0x00c0_ffee);
        for _ in 0..10 {
            original.next_u64();
        }

        let snapshot = original.serialize();
        let mut restored = deserialize(&snapshot).unwrap();
        assert_eq!(restored.tag(), "RmpR");
        assert!(restored.supports_previous());
        for _ in 0..100 {
            assert_eq!(restored.next_u64(), original.next_u64());
        }
    }

    #[test]
    fn test_deserialize_unknown_tag() {
        let result = deserialize("ZzZz`0000000000000000`");
        assert_eq!(
            result.unwrap_err(),
            RandError::UnknownTag {
                tag: "ZzZz".to_owned(),
            }
        );
    }

    #[test]
    fn test_deserialize_missing_delimiter() {
        let result = deserialize("BstR0000000000000000");
        assert_eq!(
            result.unwrap_err(),
            RandError::MalformedState {
                tag: "BstR0000000000000000".to_owned(),
                reason: MalformedReason::MissingDelimiter,
            }
        );
    }

    #[test]
    fn test_deserialize_missing_terminator() {
        let result = deserialize("BstR`0000000000000000");
        assert_eq!(
            result.unwrap_err(),
            RandError::MalformedState {
                tag: "BstR".to_owned(),
                reason: MalformedReason::MissingTerminator,
            }
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_payload_without_side_effects() {
        assert!(register::<BastionRandom>().is_ok());
        let result = deserialize("BstR`123`");
        assert_eq!(
            result.unwrap_err(),
            RandError::MalformedState {
                tag: "BstR".to_owned(),
                reason: MalformedReason::TruncatedField { field: 0 },
            }
        );

        // A well-formed snapshot still decodes afterwards.
        let snapshot = BastionRandom::seed_from_u64(11).serialize();
        assert!(deserialize(&snapshot).is_ok());
    }

    #[test]
    fn test_deserialize_empty_input() {
        let result = deserialize("");
        assert_eq!(
            result.unwrap_err(),
            RandError::MalformedState {
                tag: String::new(),
                reason: MalformedReason::MissingDelimiter,
            }
        );
    }
}
