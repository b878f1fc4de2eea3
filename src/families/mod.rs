//! The built-in generator families.
//!
//! Every family implements the same contracts ([`Rng`], [`SeedableRng`],
//! [`PortableRng`], [`RandomFamily`]) and differs only in its state vector
//! and step function:
//!
//! - [`BastionRandom`]: one-word counter with a SplitMix64 finalizer. The
//!   cheapest family, with constant-time [`skip`](BastionRandom::skip).
//! - [`RampartRandom`]: two-word LCG with an RXS-M-XS output permutation
//!   and selectable streams.
//! - [`CitadelRandom`]: four interlocking wheels mixing multiply, add,
//!   rotate-subtract, and xor.
//! - [`Xoshiro256Random`]: xoshiro256** (Blackman and Vigna), the
//!   best-distributed family here.
//! - [`Pcg32Random`]: PCG-XSH-RR with 64-bit state and 32-bit output.
//! - [`PalisadeRandom`]: middle-square with a Weyl sequence. The one family
//!   whose step discards information, so it is the one family without
//!   backward stepping.
//! - [`KnownSeriesRandom`]: strict test replay; computes nothing and
//!   panics when a replayed value does not fit the requested bounds.
//!
//! All reversible families walk backward through [`ReversibleRng`]; all
//! families serialize through [`PortableRng`] and reconstruct through
//! [`crate::registry`].
//!
//! [`Rng`]: crate::rng::Rng
//! [`SeedableRng`]: crate::rng::SeedableRng
//! [`PortableRng`]: crate::serialize::PortableRng
//! [`RandomFamily`]: crate::serialize::RandomFamily
//! [`ReversibleRng`]: crate::reverse::ReversibleRng

pub mod bastion;
pub mod citadel;
pub mod known_series;
pub mod palisade;
pub mod pcg32;
pub mod rampart;
pub mod xoshiro;

pub use bastion::BastionRandom;
pub use citadel::CitadelRandom;
pub use known_series::KnownSeriesRandom;
pub use palisade::PalisadeRandom;
pub use pcg32::Pcg32Random;
pub use rampart::RampartRandom;
pub use xoshiro::Xoshiro256Random;
