//! Registry binding behavior, including forced rebinding of a live tag.
//!
//! Every test here mutates or observes the process-global tag table, so
//! they are all serialized with `#[serial]`, and each rebinding test
//! restores the built-in binding before it returns.

use fortress_rand::serialize::decode_words;
use fortress_rand::{
    registry, BastionRandom, PortableRng, RandError, RandomFamily, Rng, SeedableRng,
};
use serial_test::serial;

fn init_tracing() {
    // Surfaces the registry's debug/warn lines when running with --nocapture.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Free-standing counter family under a tag no built-in uses.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AuditStandIn {
    state: u64,
}

impl Rng for AuditStandIn {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(3).wrapping_add(1);
        self.state
    }
}

impl PortableRng for AuditStandIn {
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

impl RandomFamily for AuditStandIn {
    const TAG: &'static str = "AudT";

    fn decode_payload(payload: &str) -> Result<Self, RandError> {
        let words = decode_words(Self::TAG, payload, 1)?;
        Ok(Self { state: words[0] })
    }
}

/// Counter family that claims `BastionRandom`'s tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BastionImposter {
    state: u64,
}

impl Rng for BastionImposter {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(1);
        self.state
    }
}

impl PortableRng for BastionImposter {
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

impl RandomFamily for BastionImposter {
    const TAG: &'static str = "BstR";

    fn decode_payload(payload: &str) -> Result<Self, RandError> {
        let words = decode_words(Self::TAG, payload, 1)?;
        Ok(Self { state: words[0] })
    }
}

/// Registering the built-ins is idempotent no matter how often it runs.
#[test]
#[serial]
fn test_register_defaults_is_idempotent() {
    init_tracing();
    registry::force_register::<BastionRandom>();
    assert!(registry::register_defaults());
    assert!(registry::register_defaults());
}

/// Every built-in tag shows up in the listing, which stays sorted.
#[test]
#[serial]
fn test_registered_tags_cover_the_builtins_in_order() {
    init_tracing();
    registry::force_register::<BastionRandom>();
    assert!(registry::register_defaults());

    let tags = registry::registered_tags();
    for expected in ["BstR", "CtdR", "KnsR", "Pcg3", "PlsR", "RmpR", "XsSS"] {
        assert!(tags.contains(&expected), "missing tag {expected}");
    }
    let mut sorted = tags.clone();
    sorted.sort_unstable();
    assert_eq!(tags, sorted);
}

/// A downstream family registers under its own tag and the registry
/// dispatches serialized text to it.
#[test]
#[serial]
fn test_custom_family_registers_and_dispatches() {
    init_tracing();
    registry::register::<AuditStandIn>().unwrap();

    let mut original = AuditStandIn { state: 41 };
    let serialized = original.serialize();
    let mut restored = registry::deserialize(&serialized).unwrap();
    assert_eq!(restored.tag(), "AudT");
    for _ in 0..10 {
        assert_eq!(restored.next_u64(), original.next_u64());
    }
}

/// A strict registration against a taken tag fails, names both families,
/// and leaves the winner's binding untouched.
#[test]
#[serial]
fn test_collision_reports_both_families() {
    init_tracing();
    registry::force_register::<BastionRandom>();

    let error = registry::register::<BastionImposter>().unwrap_err();
    let RandError::TagCollision {
        tag,
        existing,
        attempted,
    } = error
    else {
        panic!("expected a tag collision, got {error:?}");
    };
    assert_eq!(tag, "BstR");
    assert!(existing.ends_with("BastionRandom"));
    assert!(attempted.ends_with("BastionImposter"));
    assert!(!registry::try_register::<BastionImposter>());

    let serialized = BastionRandom::seed_from_u64(3).serialize();
    let restored = registry::deserialize(&serialized).unwrap();
    assert_eq!(restored.state_word(0), BastionRandom::seed_from_u64(3).state_word(0));
}

/// Forced registration hands a live tag to another family and back.
#[test]
#[serial]
fn test_force_register_rebinds_a_live_tag() {
    init_tracing();
    registry::force_register::<BastionRandom>();
    let serialized = BastionRandom::seed_from_u64(9).serialize();

    registry::force_register::<BastionImposter>();
    let mut hijacked = registry::deserialize(&serialized).unwrap();
    let seed_word = BastionRandom::seed_from_u64(9).state_word(0);
    assert_eq!(hijacked.next_u64(), seed_word.wrapping_add(1));

    registry::force_register::<BastionRandom>();
    let mut recovered = registry::deserialize(&serialized).unwrap();
    let mut expected = BastionRandom::seed_from_u64(9);
    assert_eq!(recovered.next_u64(), expected.next_u64());
}

/// Re-forcing the family that already owns a tag changes nothing.
#[test]
#[serial]
fn test_force_register_same_family_keeps_working() {
    init_tracing();
    registry::force_register::<BastionRandom>();
    registry::force_register::<BastionRandom>();
    let restored = registry::deserialize(&BastionRandom::seed_from_u64(1).serialize());
    assert!(restored.is_ok());
}
