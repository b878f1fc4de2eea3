//! Forward/backward walk contracts for the reversible families.
//!
//! Each reversible generator must replay its own output in reverse order
//! and land back on the exact starting state, both through the concrete
//! type and through an erased `Box<dyn PortableRng>`.

use fortress_rand::{
    BastionRandom, CitadelRandom, PalisadeRandom, Pcg32Random, PortableRng, RampartRandom,
    ReversibleRng, Rng, SeedableRng, Xoshiro256Random,
};
use pastey::paste;

macro_rules! reversal_contract_tests {
    ($($family:ident),+ $(,)?) => {
        $(
            paste! {
                /// A long forward walk replays exactly in reverse order and
                /// lands back on the starting state.
                #[test]
                fn [<test_ $family:snake _long_walk_reverses>]() {
                    let mut rng = $family::seed_from_u64(0xac1d);
                    let origin = rng.clone();
                    let forward: Vec<u64> = (0..10_000).map(|_| rng.next_u64()).collect();
                    for expected in forward.into_iter().rev() {
                        assert_eq!(rng.previous_u64(), expected);
                    }
                    assert_eq!(rng, origin);
                }

                /// The 32-bit view reverses through the same word stream it
                /// reads from.
                #[test]
                fn [<test_ $family:snake _narrow_walk_reverses>]() {
                    let mut rng = $family::seed_from_u64(0x32b1);
                    let origin = rng.clone();
                    let forward: Vec<u32> = (0..1_000).map(|_| rng.next_u32()).collect();
                    for expected in forward.into_iter().rev() {
                        assert_eq!(rng.previous_u32(), expected);
                    }
                    assert_eq!(rng, origin);
                }

                /// Backward stepping stays reachable through the erased
                /// trait object.
                #[test]
                fn [<test_ $family:snake _erased_backward_steps>]() {
                    let mut erased: Box<dyn PortableRng> =
                        Box::new($family::seed_from_u64(0x0dd));
                    assert!(erased.supports_previous());
                    let forward: Vec<u64> = (0..64).map(|_| erased.next_u64()).collect();
                    let reversible = erased.as_reversible().unwrap();
                    for expected in forward.into_iter().rev() {
                        assert_eq!(reversible.previous_u64(), expected);
                    }
                }
            }
        )+
    };
}

reversal_contract_tests!(
    BastionRandom,
    RampartRandom,
    CitadelRandom,
    Xoshiro256Random,
    Pcg32Random,
);

/// Interleaved forward and backward steps stay consistent with a pure
/// forward replay of the words that were never taken back.
#[test]
fn test_interleaved_walk_matches_forward_replay() {
    let mut walker = RampartRandom::seed_from_u64(0x1eaf);
    let mut replay = walker.clone();

    let mut script = Vec::new();
    for round in 0..200 {
        for _ in 0..(round % 7 + 1) {
            script.push(walker.next_u64());
        }
        for _ in 0..(round % 3) {
            let expected = script.pop().unwrap();
            assert_eq!(walker.previous_u64(), expected);
        }
    }

    for word in script {
        assert_eq!(replay.next_u64(), word);
    }
    assert_eq!(walker, replay);
}

/// Bounded draws pull single words, so a word-level rewind restores the
/// exact pre-draw state.
#[test]
fn test_rewind_after_bounded_draws_restores_state() {
    let mut rng = CitadelRandom::seed_from_u64(0xb0b0);
    let origin = rng.clone();
    for _ in 0..100 {
        rng.next_u64_bound(12_345);
    }
    for _ in 0..100 {
        rng.previous_u64();
    }
    assert_eq!(rng, origin);

    // Degenerate bounds consumed nothing, so there is nothing to rewind.
    assert_eq!(rng.next_u64_range(3, 3), 3);
    assert_eq!(rng, origin);
}

/// The 64-bit view of the PCG stream splices two native words and reverses
/// cleanly even when call widths are mixed.
#[test]
fn test_pcg32_mixed_width_walk_reverses() {
    let mut rng = Pcg32Random::seed_from_u64(0xa5a5);
    let origin = rng.clone();

    let narrow_a = rng.next_u32();
    let wide = rng.next_u64();
    let narrow_b = rng.next_u32();

    assert_eq!(rng.previous_u32(), narrow_b);
    assert_eq!(rng.previous_u64(), wide);
    assert_eq!(rng.previous_u32(), narrow_a);
    assert_eq!(rng, origin);
}

/// `skip` lands on the same state as discarding that many draws.
#[test]
fn test_bastion_skip_matches_discarded_draws() {
    let mut jumper = BastionRandom::seed_from_u64(0x5454);
    let mut stepper = jumper.clone();
    jumper.skip(1_000);
    for _ in 0..1_000 {
        stepper.next_u64();
    }
    assert_eq!(jumper, stepper);
    assert_eq!(jumper.next_u64(), stepper.next_u64());
}

/// Skipping the full period minus one is a single step backwards.
#[test]
fn test_bastion_skip_wraps_to_previous() {
    let mut rng = BastionRandom::seed_from_u64(0x9e9e);
    let mut twin = rng.clone();
    let replayed = twin.previous_u64();
    rng.skip(u64::MAX);
    assert_eq!(rng, twin);
    assert_eq!(rng.next_u64(), replayed);
}

/// `skip` crosses the LCG stream exactly like discarded draws do.
#[test]
fn test_rampart_skip_matches_discarded_draws() {
    let mut jumper = RampartRandom::seed_from_u64(0x2727);
    let mut stepper = jumper.clone();
    jumper.skip(1_000);
    for _ in 0..1_000 {
        stepper.next_u64();
    }
    assert_eq!(jumper, stepper);

    let mut back = RampartRandom::seed_from_u64(0x2728);
    let mut previous = back.clone();
    let replayed = previous.previous_u64();
    back.skip(u64::MAX);
    assert_eq!(back, previous);
    assert_eq!(back.next_u64(), replayed);
}

/// PCG skips count native 32-bit steps, so two of them make one 64-bit
/// draw and the full-period wrap undoes one native word.
#[test]
fn test_pcg32_skip_counts_native_steps() {
    let mut jumper = Pcg32Random::seed_from_u64(0x3232);
    let mut stepper = jumper.clone();
    jumper.skip(500);
    for _ in 0..250 {
        stepper.next_u64();
    }
    assert_eq!(jumper, stepper);

    let mut back = Pcg32Random::seed_from_u64(0x3233);
    let mut previous = back.clone();
    let replayed = previous.previous_u32();
    back.skip(u64::MAX);
    assert_eq!(back, previous);
    assert_eq!(back.next_u32(), replayed);
}

/// The middle-square family reports no backward support and yields no
/// reversible view.
#[test]
fn test_palisade_has_no_backward_view() {
    let mut erased: Box<dyn PortableRng> = Box::new(PalisadeRandom::seed_from_u64(1));
    assert!(!erased.supports_previous());
    assert!(erased.as_reversible().is_none());
}
