//! Convenient re-exports for common usage.
//!
//! This module provides a "prelude" that re-exports the most commonly used types
//! from Fortress Rand, allowing you to import them all at once.
//!
//! # Usage
//!
//! ```rust
//! use fortress_rand::prelude::*;
//! ```
//!
//! # What's Included
//!
//! The prelude includes:
//!
//! - **Generator families**: [`BastionRandom`], [`RampartRandom`], [`CitadelRandom`],
//!   [`Xoshiro256Random`], [`Pcg32Random`], [`PalisadeRandom`], [`KnownSeriesRandom`]
//! - **Core traits**: [`Rng`], [`SeedableRng`], [`RandomValue`]
//! - **Backward stepping**: [`ReversibleRng`]
//! - **Serialization**: [`PortableRng`], [`RandomFamily`]
//! - **Thread-local convenience**: [`random`], [`thread_rng`], [`ThreadRng`]
//! - **Error handling**: [`RandError`], [`MalformedReason`]
//!
//! The [`registry`](crate::registry) functions are not re-exported; their names
//! are short and generic, so call them through the module path.
//!
//! # Example
//!
//! ```rust
//! use fortress_rand::prelude::*;
//!
//! let mut rng = RampartRandom::seed_from_u64(42);
//! let value = rng.next_u64_bound(100);
//! assert!(value < 100);
//!
//! // Undo the draw.
//! let _ = rng.previous_u64();
//! ```

// Generator families
pub use crate::families::{
    BastionRandom, CitadelRandom, KnownSeriesRandom, PalisadeRandom, Pcg32Random, RampartRandom,
    Xoshiro256Random,
};

// Core traits
pub use crate::rng::{RandomValue, Rng, SeedableRng};

// Backward stepping
pub use crate::reverse::ReversibleRng;

// Serialization contracts
pub use crate::serialize::{PortableRng, RandomFamily};

// Thread-local convenience
pub use crate::rng::{random, thread_rng, ThreadRng};

// Error handling
pub use crate::error::{MalformedReason, RandError};
