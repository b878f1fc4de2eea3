//! # Fortress Rand
//!
//! <p align="center">
//!   <img src="https://raw.githubusercontent.com/wallstop/fortress-rand/main/assets/logo-banner.svg" alt="Fortress Rand" width="400">
//! </p>
//!
//! Fortress Rand is a fortified library of deterministic, reversible, serializable
//! pseudo-random number generators written in 100% safe Rust.
//! Every family produces an identical sequence for an identical seed on every
//! platform, most families can undo their own draws one step at a time, and every
//! family captures its exact mid-stream state as a short text form that rebuilds
//! the generator anywhere.
//!
//! Seven families ship in the box:
//!
//! - [`BastionRandom`]: one-word counter with a SplitMix64 finalizer and
//!   constant-time stream jumps
//! - [`RampartRandom`]: 64-bit LCG with an RXS-M-XS output permutation and
//!   selectable streams
//! - [`CitadelRandom`]: four interlocking wheels mixing multiply, add,
//!   rotate-subtract, and xor
//! - [`Xoshiro256Random`]: xoshiro256**, the best-distributed family here
//! - [`Pcg32Random`]: PCG-XSH-RR, 64 bits of state permuted to 32-bit output
//! - [`PalisadeRandom`]: middle-square with a Weyl sequence; fast, and the one
//!   family that cannot step backward
//! - [`KnownSeriesRandom`]: strict scripted replay that fails tests loudly when
//!   a draw diverges from its script
//!
//! None of these are cryptographically secure. They are built for games,
//! simulations, and tests, where replayability is worth more than secrecy.
//!
//! # Quick start
//!
//! ```rust
//! use fortress_rand::{registry, PortableRng, Rng, SeedableRng, Xoshiro256Random};
//!
//! let mut rng = Xoshiro256Random::seed_from_u64(7);
//! let roll = rng.next_i32_inclusive(1, 6);
//! assert!((1..=6).contains(&roll));
//!
//! // Capture the exact state mid-stream and rebuild it later, without
//! // knowing which family produced it.
//! assert!(registry::register_defaults());
//! let text = rng.serialize();
//! let mut replay = registry::deserialize(&text).unwrap();
//! assert_eq!(replay.next_u64(), rng.next_u64());
//! ```
//!
//! Backward stepping undoes draws exactly:
//!
//! ```rust
//! use fortress_rand::{RampartRandom, ReversibleRng, Rng, SeedableRng};
//!
//! let mut rng = RampartRandom::seed_from_u64(99);
//! let first = rng.next_u64();
//! let second = rng.next_u64();
//! assert_eq!(rng.previous_u64(), second);
//! assert_eq!(rng.previous_u64(), first);
//! ```

#![forbid(unsafe_code)] // let us try
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

pub use error::{MalformedReason, RandError};
pub use families::{
    BastionRandom, CitadelRandom, KnownSeriesRandom, PalisadeRandom, Pcg32Random, RampartRandom,
    Xoshiro256Random,
};
pub use reverse::ReversibleRng;
pub use rng::{random, thread_rng, RandomValue, Rng, SeedableRng, ThreadRng};
pub use serialize::{PortableRng, RandomFamily};

pub mod error;
pub mod families;
pub mod prelude;
pub mod registry;
pub mod reverse;
pub mod rng;
pub mod serialize;
