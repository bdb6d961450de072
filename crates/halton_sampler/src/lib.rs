//! # Halton Sampler (Quasi-Monte Carlo Kernel)
//!
//! Deterministic low-discrepancy sampling for Monte Carlo integration: given
//! a dimension and a sample index, [`HaltonSampler::sample`] returns a
//! well-distributed value in [0, 1).
//!
//! ## Design Rationale
//!
//! - **Digit permutations**: each dimension's radical inverse runs its digits
//!   through a Faure or randomised permutation to decorrelate dimensions
//! - **Digit packing**: several base-`b` digits are resolved per table lookup,
//!   with tables capped at 500 entries
//! - **Base-2 fast path**: dimension 0 reverses the index bits directly into
//!   a float mantissa
//! - **Immutable after initialisation**: tables are owned by the sampler
//!   instance and read concurrently without synchronisation
//!
//! ## British English Convention
//!
//! All documentation in this crate uses British English spelling conventions
//! ("initialise", "randomise", "behaviour").
//!
//! ## Module Structure
//!
//! - [`primes`]: compile-time prime table, one base per dimension
//! - [`permutation`]: Faure and randomised digit permutations
//! - [`tables`]: digit-packed lookup tables
//! - [`sampler`]: the radical-inverse evaluator
//! - [`sequence`]: point-wise [`LowDiscrepancySequence`] cursor
//! - [`integrate`]: sequential and rayon-parallel QMC integration
//! - [`config`]: configuration from TOML, environment or builder
//! - [`error`]: error types
//!
//! ## Usage Example
//!
//! ```rust
//! use halton_sampler::HaltonSampler;
//!
//! // Deterministic Faure permutations
//! let sampler = HaltonSampler::faure();
//! assert_eq!(sampler.sample(0, 1), 0.5);
//!
//! // Randomised permutations from a deterministic stub source
//! let mut source = |bound: u32| bound - 1;
//! let randomised = HaltonSampler::random(&mut source).unwrap();
//! assert!(randomised.sample(42, 1000) < 1.0);
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod integrate;
pub mod permutation;
pub mod primes;
pub mod sampler;
pub mod sequence;
pub mod tables;

// Public re-exports
pub use config::{SamplerConfig, SamplerConfigBuilder};
pub use error::{ConfigError, HaltonError};
pub use integrate::QmcIntegrator;
pub use permutation::{PermutationScheme, PermutationSet, RngShuffle, ShuffleSource};
pub use primes::{MAX_BASE, NUM_DIMENSIONS, PRIMES};
pub use sampler::HaltonSampler;
pub use sequence::{HaltonSequence, LowDiscrepancySequence};
