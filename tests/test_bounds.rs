//! Bounded-draw contracts shared by every computing generator family.
//!
//! The macro grid below runs the same contract tests against all six
//! algorithmic families, so a regression in one family's word stream or in
//! the shared range mapping shows up under that family's name.
//! `KnownSeriesRandom` validates bounds by panicking on replay mismatches
//! and is covered by its own unit tests instead.

use fortress_rand::{
    random, thread_rng, BastionRandom, CitadelRandom, PalisadeRandom, Pcg32Random, RampartRandom,
    Rng, SeedableRng, Xoshiro256Random,
};
use pastey::paste;
use std::collections::BTreeSet;

macro_rules! bound_contract_tests {
    ($($family:ident),+ $(,)?) => {
        $(
            paste! {
                /// Every bounded draw lands inside its requested interval.
                #[test]
                fn [<test_ $family:snake _draws_stay_in_bounds>]() {
                    let mut rng = $family::seed_from_u64(0x0b0b_5eed);
                    for _ in 0..1000 {
                        assert!(rng.next_u32_bound(10) < 10);
                        assert!(rng.next_u64_bound(1_000_003) < 1_000_003);
                        let signed = rng.next_i32_range(-50, 50);
                        assert!((-50..50).contains(&signed));
                        let closed = rng.next_i64_inclusive(-3, 3);
                        assert!((-3..=3).contains(&closed));
                        let unit = rng.next_f64();
                        assert!((0.0..1.0).contains(&unit));
                        let narrow = rng.next_f32();
                        assert!((0.0..1.0).contains(&narrow));
                        let open = rng.next_exclusive_f64();
                        assert!(open > 0.0 && open < 1.0);
                        let open_narrow = rng.next_exclusive_f32();
                        assert!(open_narrow > 0.0 && open_narrow < 1.0);
                        // Crossed float bounds keep the first argument
                        // attainable and exclude the second.
                        let flipped = rng.next_f64_range(1.0, 0.0);
                        assert!(flipped > 0.0 && flipped <= 1.0);
                        let measured = rng.next_f64_range(-2.0, 3.0);
                        assert!((-2.0..3.0).contains(&measured));
                        let end_to_end = rng.next_f64_inclusive(-1.0, 1.0);
                        assert!((-1.0..=1.0).contains(&end_to_end));
                        let strict = rng.next_exclusive_f64_range(5.0, 6.0);
                        assert!((5.0..=6.0).contains(&strict));
                    }
                }

                /// Small spans reach every representable value in a modest
                /// number of draws.
                #[test]
                fn [<test_ $family:snake _small_spans_cover_every_value>]() {
                    let mut rng = $family::seed_from_u64(0x5ca1e);
                    let mut bounded = BTreeSet::new();
                    let mut inclusive = BTreeSet::new();
                    let mut ranged = BTreeSet::new();
                    for _ in 0..512 {
                        bounded.insert(rng.next_u32_bound(4));
                        inclusive.insert(rng.next_i32_inclusive(-1, 1));
                        ranged.insert(rng.next_u64_range(10, 14));
                    }
                    assert_eq!(bounded.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
                    assert_eq!(inclusive.into_iter().collect::<Vec<_>>(), vec![-1, 0, 1]);
                    assert_eq!(ranged.into_iter().collect::<Vec<_>>(), vec![10, 11, 12, 13]);
                }

                /// Degenerate bounds answer immediately without consuming a
                /// word, leaving the generator byte-for-byte unchanged.
                #[test]
                fn [<test_ $family:snake _degenerate_bounds_consume_nothing>]() {
                    let mut rng = $family::seed_from_u64(0xd09);
                    let before = rng.clone();
                    assert_eq!(rng.next_u64_range(9, 9), 9);
                    assert_eq!(rng.next_u32_bound(0), 0);
                    assert_eq!(rng.next_u64_bound(0), 0);
                    assert_eq!(rng.next_i64_inclusive(-4, -4), -4);
                    assert_eq!(rng.next_f64_range(2.5, 2.5), 2.5);
                    assert_eq!(rng, before);

                    let mut twin = before;
                    assert_eq!(rng.next_u64(), twin.next_u64());
                }

                /// Crossed integer bounds cover the same closed interval as
                /// the reordered call, value for value.
                #[test]
                fn [<test_ $family:snake _crossed_bounds_cover_the_closed_interval>]() {
                    let mut crossed = $family::seed_from_u64(0xf1a6);
                    let mut reordered = crossed.clone();
                    for _ in 0..64 {
                        let value = crossed.next_i32_range(100, -101);
                        assert!((-100..=100).contains(&value));
                        assert_eq!(value, reordered.next_i32_range(-100, 101));
                    }

                    let mut wide = $family::seed_from_u64(0xf1a7);
                    let mut closed = wide.clone();
                    for _ in 0..64 {
                        assert_eq!(wide.next_u64_range(7, 3), closed.next_u64_inclusive(4, 7));
                    }
                }

                /// `fill_bytes` lays down whole little-endian words and cuts
                /// the final word down to the leftover length.
                #[test]
                fn [<test_ $family:snake _fill_bytes_writes_little_endian_words>]() {
                    let mut rng = $family::seed_from_u64(0xb17e5);
                    let mut twin = rng.clone();

                    let mut buffer = [0u8; 37];
                    rng.fill_bytes(&mut buffer);

                    let mut expected = Vec::with_capacity(40);
                    for _ in 0..5 {
                        expected.extend_from_slice(&twin.next_u64().to_le_bytes());
                    }
                    assert_eq!(&buffer[..], &expected[..37]);
                    // Both generators sit at the same stream position afterwards.
                    assert_eq!(rng.next_u64(), twin.next_u64());
                }

                /// Probability extremes short-circuit the comparison but
                /// still consume exactly one word each.
                #[test]
                fn [<test_ $family:snake _bool_prob_extremes_consume_one_word>]() {
                    let mut rng = $family::seed_from_u64(0x0b57);
                    let mut twin = rng.clone();
                    assert!(rng.next_bool_prob(2.0));
                    assert!(!rng.next_bool_prob(-3.0));
                    assert!(!rng.next_bool_prob(f64::NAN));
                    for _ in 0..3 {
                        twin.next_u64();
                    }
                    assert_eq!(rng, twin);
                }
            }
        )+
    };
}

bound_contract_tests!(
    BastionRandom,
    RampartRandom,
    CitadelRandom,
    Xoshiro256Random,
    Pcg32Random,
    PalisadeRandom,
);

/// Test that the full-domain inclusive ranges degenerate to raw draws
/// instead of wrapping the span to zero.
#[test]
fn test_full_domain_inclusive_degenerates_to_raw_draw() {
    let mut rng = BastionRandom::seed_from_u64(99);
    let mut raw = rng.clone();
    assert_eq!(rng.next_u64_inclusive(0, u64::MAX), raw.next_u64());
    assert_eq!(rng.next_u32_inclusive(0, u32::MAX), raw.next_u32());
    assert_eq!(rng.next_i64_inclusive(i64::MIN, i64::MAX), raw.next_u64() as i64);
    assert_eq!(rng.next_i32_inclusive(i32::MIN, i32::MAX), raw.next_u32() as i32);
}

/// Test that exclusive-style ranges keep the first argument attainable and
/// never produce the second, in both bound orders.
#[test]
fn test_range_first_argument_attainable_second_excluded() {
    let mut rng = RampartRandom::seed_from_u64(0x7717);
    let mut seen = BTreeSet::new();
    for _ in 0..2048 {
        seen.insert(rng.next_u32_range(5, 8));
    }
    assert_eq!(seen.into_iter().collect::<Vec<_>>(), vec![5, 6, 7]);

    let mut crossed = BTreeSet::new();
    for _ in 0..2048 {
        crossed.insert(rng.next_i32_range(3, 0));
    }
    assert_eq!(crossed.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

/// Shuffling rearranges a slice without losing or duplicating elements.
#[test]
fn test_shuffle_preserves_the_multiset() {
    let mut rng = CitadelRandom::seed_from_u64(0xdeca);
    let mut deck: Vec<u32> = (0..100).collect();
    rng.shuffle(&mut deck);
    assert_ne!(deck, (0..100).collect::<Vec<u32>>());

    let mut sorted = deck;
    sorted.sort_unstable();
    assert_eq!(sorted, (0..100).collect::<Vec<u32>>());
}

/// Equal seeds shuffle identically.
#[test]
fn test_shuffle_twins_agree() {
    let mut left = Xoshiro256Random::seed_from_u64(7);
    let mut right = Xoshiro256Random::seed_from_u64(7);
    let mut first: Vec<u8> = (0..=255).collect();
    let mut second = first.clone();
    left.shuffle(&mut first);
    right.shuffle(&mut second);
    assert_eq!(first, second);
}

/// `choose` picks members uniformly enough to hit every index, and returns
/// `None` for an empty slice without consuming a word.
#[test]
fn test_choose_spans_the_slice() {
    let mut rng = Pcg32Random::seed_from_u64(31);
    let before = rng.clone();
    let empty: [u8; 0] = [];
    assert_eq!(rng.choose(&empty), None);
    assert_eq!(rng, before);

    let menu = ["north", "south", "east", "west"];
    let mut seen = BTreeSet::new();
    for _ in 0..256 {
        let picked = rng.choose(&menu).unwrap();
        assert!(menu.contains(picked));
        seen.insert(*picked);
    }
    assert_eq!(seen.len(), menu.len());
}

/// `gen` produces a value for every supported primitive.
#[test]
fn test_gen_covers_every_random_value_type() {
    let mut rng = BastionRandom::seed_from_u64(0x6e6e);
    let _: u8 = rng.gen();
    let _: u16 = rng.gen();
    let _: u32 = rng.gen();
    let _: u64 = rng.gen();
    let _: i8 = rng.gen();
    let _: i16 = rng.gen();
    let _: i32 = rng.gen();
    let _: i64 = rng.gen();
    let unit: f32 = rng.gen();
    assert!((0.0..1.0).contains(&unit));
    let wide_unit: f64 = rng.gen();
    assert!((0.0..1.0).contains(&wide_unit));

    // A 128-bit value is two words, high half first.
    let mut twin = rng.clone();
    let wide: u128 = rng.gen();
    let high = u128::from(twin.next_u64());
    let low = u128::from(twin.next_u64());
    assert_eq!(wide, (high << 64) | low);

    let mut coin_faces = BTreeSet::new();
    for _ in 0..64 {
        coin_faces.insert(rng.gen::<bool>());
    }
    assert_eq!(coin_faces.len(), 2);
}

/// The thread-local generator and the free `random` function hand out
/// values without any setup.
#[test]
fn test_thread_rng_smoke() {
    let mut rng = thread_rng();
    let first = rng.next_u64();
    let second = rng.next_u64();
    assert_ne!(first, second);
    assert!(rng.next_u32_bound(10) < 10);

    let unit: f64 = random();
    assert!((0.0..1.0).contains(&unit));
    let _: bool = random();
}
