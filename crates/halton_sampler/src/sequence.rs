//! Point-wise iteration over the Halton sequence.
//!
//! [`LowDiscrepancySequence`] is the interface quasi-Monte Carlo consumers
//! draw points through. [`HaltonSequence`] implements it on top of a shared,
//! initialised [`HaltonSampler`]: point `k` holds
//! `sample(d, start_index + k)` for every dimension `d`.
//!
//! Sample indices are 32-bit and wrap modulo 2^32.

use std::sync::Arc;

use crate::config::SamplerConfig;
use crate::error::{ConfigError, HaltonError};
use crate::primes::NUM_DIMENSIONS;
use crate::sampler::HaltonSampler;

/// Trait for low-discrepancy sequences used in quasi-Monte Carlo methods.
///
/// Low-discrepancy sequences provide more uniform coverage of the unit
/// hypercube than pseudo-random sequences, often leading to faster
/// convergence in numerical integration problems.
pub trait LowDiscrepancySequence {
    /// Returns the dimensionality of the sequence.
    fn dimension(&self) -> usize;

    /// Advances the sequence and returns the next point.
    ///
    /// # Returns
    ///
    /// A slice of `dimension()` values, each in the interval [0, 1).
    fn next_point(&mut self) -> &[f64];

    /// Resets the sequence to its initial state.
    ///
    /// After calling this method, the sequence will produce the same
    /// points as a newly initialised instance.
    fn reset(&mut self);

    /// Skips ahead by `n` points in the sequence.
    ///
    /// This is useful for parallel computation where different workers
    /// need to process non-overlapping portions of the sequence.
    fn skip(&mut self, n: usize);
}

/// Halton sequence cursor over a shared sampler.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use halton_sampler::{HaltonSampler, HaltonSequence, LowDiscrepancySequence};
///
/// let sampler = Arc::new(HaltonSampler::faure());
/// let mut sequence = HaltonSequence::new(sampler, 2, 0).unwrap();
///
/// sequence.skip(1);
/// assert_eq!(sequence.next_point()[0], 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct HaltonSequence {
    sampler: Arc<HaltonSampler>,
    start_index: u32,
    index: u32,
    point: Vec<f64>,
}

impl HaltonSequence {
    /// Creates a sequence of `dimensions`-dimensional points starting at
    /// `start_index`.
    ///
    /// # Errors
    ///
    /// - [`HaltonError::Uninitialised`] if `sampler` has no tables
    /// - [`HaltonError::Config`] if `dimensions` is outside `[1, 256]`
    pub fn new(
        sampler: Arc<HaltonSampler>,
        dimensions: usize,
        start_index: u32,
    ) -> Result<Self, HaltonError> {
        if !sampler.is_initialised() {
            return Err(HaltonError::Uninitialised);
        }
        if dimensions == 0 || dimensions > NUM_DIMENSIONS {
            return Err(ConfigError::InvalidDimensions(dimensions).into());
        }

        Ok(Self {
            sampler,
            start_index,
            index: start_index,
            point: vec![0.0; dimensions],
        })
    }

    /// Builds a sampler and a sequence as described by `config`.
    pub fn from_config(config: &SamplerConfig) -> Result<Self, HaltonError> {
        let sampler = HaltonSampler::from_config(config)?;
        Self::new(Arc::new(sampler), config.dimensions, config.start_index)
    }

    /// Sample index of the next point.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The underlying sampler.
    #[inline]
    pub fn sampler(&self) -> &Arc<HaltonSampler> {
        &self.sampler
    }
}

impl LowDiscrepancySequence for HaltonSequence {
    #[inline]
    fn dimension(&self) -> usize {
        self.point.len()
    }

    fn next_point(&mut self) -> &[f64] {
        self.sampler.fill_point(self.index, &mut self.point);
        self.index = self.index.wrapping_add(1);
        &self.point
    }

    fn reset(&mut self) {
        self.index = self.start_index;
    }

    fn skip(&mut self, n: usize) {
        // Truncation is reduction modulo 2^32.
        self.index = self.index.wrapping_add(n as u32);
    }
}
