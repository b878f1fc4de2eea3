//! Benchmarks for the generator families.
//!
//! Run with: cargo bench --bench generators
//!
//! Measures raw word throughput, buffer filling, the bounded-draw mapping,
//! backward stepping, stream jumps, and the serialization round trip.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fortress_rand::{
    registry, BastionRandom, CitadelRandom, PalisadeRandom, Pcg32Random, PortableRng,
    RampartRandom, ReversibleRng, Rng, SeedableRng, Xoshiro256Random,
};
use std::hint::black_box;

fn bench_raw_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("Raw 64-bit draws");
    group.throughput(Throughput::Bytes(8));

    let mut bastion = BastionRandom::seed_from_u64(1);
    group.bench_function("bastion", |b| b.iter(|| black_box(bastion.next_u64())));

    let mut rampart = RampartRandom::seed_from_u64(1);
    group.bench_function("rampart", |b| b.iter(|| black_box(rampart.next_u64())));

    let mut citadel = CitadelRandom::seed_from_u64(1);
    group.bench_function("citadel", |b| b.iter(|| black_box(citadel.next_u64())));

    let mut xoshiro = Xoshiro256Random::seed_from_u64(1);
    group.bench_function("xoshiro256", |b| b.iter(|| black_box(xoshiro.next_u64())));

    let mut pcg = Pcg32Random::seed_from_u64(1);
    group.bench_function("pcg32", |b| b.iter(|| black_box(pcg.next_u64())));

    let mut palisade = PalisadeRandom::seed_from_u64(1);
    group.bench_function("palisade", |b| b.iter(|| black_box(palisade.next_u64())));

    group.finish();
}

fn bench_fill_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Buffer fill");

    for size in [64usize, 1024, 16_384] {
        group.throughput(Throughput::Bytes(size as u64));

        let mut xoshiro = Xoshiro256Random::seed_from_u64(2);
        let mut buffer = vec![0u8; size];
        group.bench_function(BenchmarkId::new("xoshiro256", size), |b| {
            b.iter(|| xoshiro.fill_bytes(black_box(&mut buffer)));
        });

        let mut bastion = BastionRandom::seed_from_u64(2);
        let mut buffer = vec![0u8; size];
        group.bench_function(BenchmarkId::new("bastion", size), |b| {
            b.iter(|| bastion.fill_bytes(black_box(&mut buffer)));
        });

        // One 32-bit-native family for the half-width comparison.
        let mut pcg = Pcg32Random::seed_from_u64(2);
        let mut buffer = vec![0u8; size];
        group.bench_function(BenchmarkId::new("pcg32", size), |b| {
            b.iter(|| pcg.fill_bytes(black_box(&mut buffer)));
        });
    }

    group.finish();
}

fn bench_bounded_draws(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bounded draws");

    let mut rng = RampartRandom::seed_from_u64(3);
    group.bench_function("next_u64_bound_6", |b| {
        b.iter(|| black_box(rng.next_u64_bound(6)));
    });

    let mut dice = BastionRandom::seed_from_u64(4);
    group.bench_function("next_i64_inclusive_dice", |b| {
        b.iter(|| black_box(dice.next_i64_inclusive(1, 6)));
    });

    let mut unit = Xoshiro256Random::seed_from_u64(5);
    group.bench_function("next_f64", |b| b.iter(|| black_box(unit.next_f64())));

    let mut dealer = Pcg32Random::seed_from_u64(6);
    let mut deck: Vec<u8> = (0..52).collect();
    group.bench_function("shuffle_52", |b| {
        b.iter(|| dealer.shuffle(black_box(&mut deck)));
    });

    group.finish();
}

fn bench_backward_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("Backward steps");
    group.throughput(Throughput::Bytes(8));

    let mut bastion = BastionRandom::seed_from_u64(7);
    group.bench_function("bastion", |b| b.iter(|| black_box(bastion.previous_u64())));

    let mut rampart = RampartRandom::seed_from_u64(7);
    group.bench_function("rampart", |b| b.iter(|| black_box(rampart.previous_u64())));

    let mut citadel = CitadelRandom::seed_from_u64(7);
    group.bench_function("citadel", |b| b.iter(|| black_box(citadel.previous_u64())));

    let mut xoshiro = Xoshiro256Random::seed_from_u64(7);
    group.bench_function("xoshiro256", |b| b.iter(|| black_box(xoshiro.previous_u64())));

    let mut pcg = Pcg32Random::seed_from_u64(7);
    group.bench_function("pcg32", |b| b.iter(|| black_box(pcg.previous_u64())));

    group.finish();
}

fn bench_stream_jumps(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stream jumps");

    for delta in [1_000u64, 1_000_000] {
        let mut bastion = BastionRandom::seed_from_u64(8);
        group.bench_with_input(BenchmarkId::new("bastion_skip", delta), &delta, |b, &delta| {
            b.iter(|| bastion.skip(black_box(delta)));
        });

        let mut rampart = RampartRandom::seed_from_u64(8);
        group.bench_with_input(BenchmarkId::new("rampart_skip", delta), &delta, |b, &delta| {
            b.iter(|| rampart.skip(black_box(delta)));
        });

        let mut pcg = Pcg32Random::seed_from_u64(8);
        group.bench_with_input(BenchmarkId::new("pcg32_skip", delta), &delta, |b, &delta| {
            b.iter(|| pcg.skip(black_box(delta)));
        });
    }

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let _ = registry::register_defaults();
    let mut group = c.benchmark_group("State serialization");

    let citadel = CitadelRandom::seed_from_u64(9);
    group.bench_function("serialize_4_words", |b| {
        b.iter(|| black_box(citadel.serialize()));
    });

    let serialized = citadel.serialize();
    group.bench_function("deserialize_4_words", |b| {
        b.iter(|| registry::deserialize(black_box(&serialized)).unwrap());
    });

    let bastion = BastionRandom::seed_from_u64(9);
    let small = bastion.serialize();
    group.bench_function("deserialize_1_word", |b| {
        b.iter(|| registry::deserialize(black_box(&small)).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_raw_draws,
    bench_fill_bytes,
    bench_bounded_draws,
    bench_backward_steps,
    bench_stream_jumps,
    bench_serialization
);
criterion_main!(benches);
