//! Text and serde round trips for every generator family.
//!
//! The portable text form is the save-file contract: a tagged, fixed-width
//! hex encoding that any registered process can rebuild mid-stream. These
//! tests pin the framing shape, the continuation behavior after a round
//! trip, and the rejection of malformed input.

use fortress_rand::{
    registry, BastionRandom, CitadelRandom, KnownSeriesRandom, MalformedReason, PalisadeRandom,
    Pcg32Random, PortableRng, RampartRandom, RandError, RandomFamily, Rng, SeedableRng,
    Xoshiro256Random,
};
use pastey::paste;

macro_rules! serialization_contract_tests {
    ($($family:ident),+ $(,)?) => {
        $(
            paste! {
                /// A serialized mid-stream state continues exactly where
                /// the original left off.
                #[test]
                fn [<test_ $family:snake _text_round_trip_continues_the_stream>]() {
                    assert!(registry::register_defaults());
                    let mut original = $family::seed_from_u64(0xce5a);
                    for _ in 0..17 {
                        original.next_u64();
                    }

                    let serialized = original.serialize();
                    let mut restored = registry::deserialize(&serialized).unwrap();
                    assert_eq!(restored.tag(), $family::TAG);
                    assert_eq!(restored.state_count(), original.state_count());
                    assert_eq!(restored.supports_previous(), original.supports_previous());
                    for _ in 0..100 {
                        assert_eq!(restored.next_u64(), original.next_u64());
                    }
                }

                /// The serialized text is the four-character tag, a backtick,
                /// sixteen lowercase hex digits per state word, and a closing
                /// backtick.
                #[test]
                fn [<test_ $family:snake _serialized_shape>]() {
                    let rng = $family::seed_from_u64(1);
                    assert_eq!($family::TAG.len(), 4);
                    let serialized = rng.serialize();
                    let payload = serialized
                        .strip_prefix($family::TAG)
                        .unwrap()
                        .strip_prefix('`')
                        .unwrap()
                        .strip_suffix('`')
                        .unwrap();
                    assert_eq!(payload.len(), 16 * rng.state_count());
                    assert!(payload
                        .bytes()
                        .all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
                }

                /// The serde representation survives a JSON round trip with
                /// the stream position intact.
                #[test]
                fn [<test_ $family:snake _serde_json_round_trip>]() {
                    let mut original = $family::seed_from_u64(0x15e1);
                    for _ in 0..5 {
                        original.next_u64();
                    }

                    let json = serde_json::to_string(&original).unwrap();
                    let mut restored: $family = serde_json::from_str(&json).unwrap();
                    assert_eq!(restored, original);
                    assert_eq!(restored.next_u64(), original.next_u64());
                }

                /// Copying every state word onto another instance transplants
                /// the full state; out-of-range words read as zero and
                /// out-of-range writes are dropped.
                #[test]
                fn [<test_ $family:snake _state_words_transplant>]() {
                    let mut donor = $family::seed_from_u64(0xfeed);
                    for _ in 0..9 {
                        donor.next_u64();
                    }

                    let mut blank = $family::seed_from_u64(0);
                    for index in 0..donor.state_count() {
                        blank.set_state_word(index, donor.state_word(index));
                    }
                    assert_eq!(blank, donor);

                    assert_eq!(donor.state_word(donor.state_count()), 0);
                    let before = donor.clone();
                    donor.set_state_word(donor.state_count(), 0xbad);
                    assert_eq!(donor, before);
                }
            }
        )+
    };
}

serialization_contract_tests!(
    BastionRandom,
    RampartRandom,
    CitadelRandom,
    Xoshiro256Random,
    Pcg32Random,
    PalisadeRandom,
);

/// Test that the replay family round-trips its three series and cursor
/// positions through the registry.
#[test]
fn test_known_series_text_round_trip() {
    assert!(registry::register_defaults());
    let mut original =
        KnownSeriesRandom::new(vec![5, -9, 42], vec![0.25, 0.75], vec![true, false]);
    original.next_i64_inclusive(-100, 100);
    original.next_f64();
    original.next_bool();

    let serialized = original.serialize();
    let mut restored = registry::deserialize(&serialized).unwrap();
    assert_eq!(restored.tag(), "KnsR");
    assert!(!restored.supports_previous());
    for _ in 0..7 {
        assert_eq!(
            restored.next_i64_inclusive(-100, 100),
            original.next_i64_inclusive(-100, 100)
        );
        assert_eq!(restored.next_f64().to_bits(), original.next_f64().to_bits());
        assert_eq!(restored.next_bool(), original.next_bool());
    }
}

/// Deserializing and reserializing reproduces the text byte for byte, for
/// every family.
#[test]
fn test_reserialization_is_identity() {
    assert!(registry::register_defaults());
    for serialized in [
        BastionRandom::seed_from_u64(11).serialize(),
        RampartRandom::seed_from_u64(12).serialize(),
        CitadelRandom::seed_from_u64(13).serialize(),
        Xoshiro256Random::seed_from_u64(14).serialize(),
        Pcg32Random::seed_from_u64(15).serialize(),
        PalisadeRandom::seed_from_u64(16).serialize(),
        KnownSeriesRandom::new(vec![1, 2], vec![2.5], vec![false]).serialize(),
    ] {
        let restored = registry::deserialize(&serialized).unwrap();
        assert_eq!(restored.serialize(), serialized);
    }
}

/// Broken framing is rejected before any family decoder runs.
#[test]
fn test_deserialize_rejects_broken_framing() {
    assert!(registry::register_defaults());
    assert_eq!(
        registry::deserialize("BstR0000000000000000").unwrap_err(),
        RandError::MalformedState {
            tag: "BstR0000000000000000".to_owned(),
            reason: MalformedReason::MissingDelimiter,
        }
    );
    assert_eq!(
        registry::deserialize("BstR`0000000000000000").unwrap_err(),
        RandError::MalformedState {
            tag: "BstR".to_owned(),
            reason: MalformedReason::MissingTerminator,
        }
    );
    assert_eq!(
        registry::deserialize("ZzZz`0000000000000000`").unwrap_err(),
        RandError::UnknownTag {
            tag: "ZzZz".to_owned(),
        }
    );
}

/// Payloads with the wrong width or alphabet fail with a field-precise
/// reason.
#[test]
fn test_deserialize_rejects_bad_payloads() {
    assert!(registry::register_defaults());
    assert_eq!(
        registry::deserialize("BstR`00`").unwrap_err(),
        RandError::MalformedState {
            tag: "BstR".to_owned(),
            reason: MalformedReason::TruncatedField { field: 0 },
        }
    );
    assert_eq!(
        registry::deserialize("BstR`00000000000000000000000000000000`").unwrap_err(),
        RandError::MalformedState {
            tag: "BstR".to_owned(),
            reason: MalformedReason::FieldCount {
                expected: 1,
                found: 2,
            },
        }
    );
    assert_eq!(
        registry::deserialize("BstR`00000000DEADBEEF`").unwrap_err(),
        RandError::MalformedState {
            tag: "BstR".to_owned(),
            reason: MalformedReason::InvalidDigit { field: 0 },
        }
    );
}

/// A restored generator keeps its backward-stepping capability.
#[test]
fn test_restored_generator_still_steps_backward() {
    assert!(registry::register_defaults());
    let mut original = CitadelRandom::seed_from_u64(0x0c17);
    let forward: Vec<u64> = (0..32).map(|_| original.next_u64()).collect();

    let mut restored = registry::deserialize(&original.serialize()).unwrap();
    let reversible = restored.as_reversible().unwrap();
    for expected in forward.into_iter().rev() {
        assert_eq!(reversible.previous_u64(), expected);
    }
    assert_eq!(restored.serialize(), CitadelRandom::seed_from_u64(0x0c17).serialize());
}

/// Reseeding through the erased trait object matches fresh construction.
#[test]
fn test_erased_reseed_matches_fresh_construction() {
    let mut erased: Box<dyn PortableRng> = Box::new(Xoshiro256Random::seed_from_u64(0));
    for _ in 0..13 {
        erased.next_u64();
    }
    erased.reseed(0x7ab1e);

    let mut fresh = Xoshiro256Random::seed_from_u64(0x7ab1e);
    for _ in 0..50 {
        assert_eq!(erased.next_u64(), fresh.next_u64());
    }
}
