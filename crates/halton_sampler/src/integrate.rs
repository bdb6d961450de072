//! Quasi-Monte Carlo integration over the unit hypercube.
//!
//! [`QmcIntegrator`] estimates `∫_{[0,1)^d} f(x) dx` by averaging `f` over
//! the first `n` Halton points. The parallel variant fans index ranges out
//! over the rayon pool; all workers read the same sampler tables.
//!
//! Both variants sum fixed-size chunks first and then combine the chunk sums
//! in index order, so sequential and parallel estimates are bit-identical.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{ConfigError, HaltonError};
use crate::primes::NUM_DIMENSIONS;
use crate::sampler::HaltonSampler;

/// Number of consecutive sample indices summed by one task.
pub const CHUNK_SIZE: u32 = 4096;

/// Averages integrands over Halton points.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::{HaltonSampler, QmcIntegrator};
///
/// let sampler = HaltonSampler::faure();
/// let integrator = QmcIntegrator::new(&sampler, 2).unwrap();
///
/// // ∫∫ x * y dx dy = 1/4
/// let estimate = integrator.par_integrate(1 << 14, |x| x[0] * x[1]);
/// assert!((estimate - 0.25).abs() < 1e-3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct QmcIntegrator<'a> {
    sampler: &'a HaltonSampler,
    dimensions: usize,
}

impl<'a> QmcIntegrator<'a> {
    /// Creates an integrator over the first `dimensions` dimensions.
    ///
    /// # Errors
    ///
    /// - [`HaltonError::Uninitialised`] if `sampler` has no tables
    /// - [`HaltonError::Config`] if `dimensions` is outside `[1, 256]`
    pub fn new(sampler: &'a HaltonSampler, dimensions: usize) -> Result<Self, HaltonError> {
        if !sampler.is_initialised() {
            return Err(HaltonError::Uninitialised);
        }
        if dimensions == 0 || dimensions > NUM_DIMENSIONS {
            return Err(ConfigError::InvalidDimensions(dimensions).into());
        }
        Ok(Self {
            sampler,
            dimensions,
        })
    }

    /// Integration dimensionality.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Mean of `f` over points `0..n_points`, evaluated on the calling
    /// thread. Returns 0.0 when `n_points` is zero.
    pub fn integrate<F>(&self, n_points: u32, f: F) -> f64
    where
        F: Fn(&[f64]) -> f64,
    {
        debug!(n_points, dimensions = self.dimensions, "Sequential QMC integration");
        let mut point = vec![0.0; self.dimensions];
        let total: f64 = (0..chunk_count(n_points))
            .map(|chunk| self.chunk_sum(chunk, n_points, &f, &mut point))
            .sum();
        mean(total, n_points)
    }

    /// Mean of `f` over points `0..n_points`, evaluated on the rayon pool.
    /// Returns 0.0 when `n_points` is zero.
    pub fn par_integrate<F>(&self, n_points: u32, f: F) -> f64
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        debug!(n_points, dimensions = self.dimensions, "Parallel QMC integration");
        let chunk_sums: Vec<f64> = (0..chunk_count(n_points))
            .into_par_iter()
            .map_init(
                || vec![0.0; self.dimensions],
                |point, chunk| self.chunk_sum(chunk, n_points, &f, point),
            )
            .collect();
        mean(chunk_sums.iter().sum(), n_points)
    }

    fn chunk_sum<F>(&self, chunk: u32, n_points: u32, f: &F, point: &mut [f64]) -> f64
    where
        F: Fn(&[f64]) -> f64,
    {
        let start = chunk * CHUNK_SIZE;
        let end = start.saturating_add(CHUNK_SIZE).min(n_points);
        let mut sum = 0.0;
        for index in start..end {
            self.sampler.fill_point(index, point);
            sum += f(point);
        }
        sum
    }
}

#[inline]
fn chunk_count(n_points: u32) -> u32 {
    n_points.div_ceil(CHUNK_SIZE)
}

#[inline]
fn mean(total: f64, n_points: u32) -> f64 {
    if n_points == 0 {
        0.0
    } else {
        total / f64::from(n_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0), 0);
        assert_eq!(chunk_count(1), 1);
        assert_eq!(chunk_count(CHUNK_SIZE), 1);
        assert_eq!(chunk_count(CHUNK_SIZE + 1), 2);
        assert_eq!(chunk_count(u32::MAX), u32::MAX / CHUNK_SIZE + 1);
    }

    #[test]
    fn test_zero_points() {
        let sampler = HaltonSampler::faure();
        let integrator = QmcIntegrator::new(&sampler, 1).unwrap();
        assert_eq!(integrator.integrate(0, |x| x[0]), 0.0);
        assert_eq!(integrator.par_integrate(0, |x| x[0]), 0.0);
    }

    #[test]
    fn test_base2_mean_is_exact() {
        // The first 2^k base-2 points are exactly {i / 2^k}.
        let sampler = HaltonSampler::faure();
        let integrator = QmcIntegrator::new(&sampler, 1).unwrap();
        let n = 1u32 << 12;
        let expected = f64::from(n - 1) / f64::from(2 * n);
        assert_eq!(integrator.integrate(n, |x| x[0]), expected);
    }

    #[test]
    fn test_linear_integrand() {
        let sampler = HaltonSampler::faure();
        let integrator = QmcIntegrator::new(&sampler, 8).unwrap();
        let estimate = integrator.integrate(20_000, |x| x.iter().sum());
        assert_relative_eq!(estimate, 4.0, max_relative = 1e-2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sampler = HaltonSampler::seeded(5).unwrap();
        let integrator = QmcIntegrator::new(&sampler, 6).unwrap();
        let f = |x: &[f64]| x.iter().map(|v| v * v).product::<f64>();

        let sequential = integrator.integrate(3 * CHUNK_SIZE + 17, f);
        let parallel = integrator.par_integrate(3 * CHUNK_SIZE + 17, f);
        assert_eq!(sequential.to_bits(), parallel.to_bits());
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let uninitialised = HaltonSampler::new();
        assert!(matches!(
            QmcIntegrator::new(&uninitialised, 2),
            Err(HaltonError::Uninitialised)
        ));

        let sampler = HaltonSampler::faure();
        assert!(matches!(
            QmcIntegrator::new(&sampler, 0),
            Err(HaltonError::Config(ConfigError::InvalidDimensions(0)))
        ));
        assert_eq!(QmcIntegrator::new(&sampler, 256).map(|i| i.dimensions()), Ok(256));
    }
}
