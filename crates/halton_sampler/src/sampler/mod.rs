//! Halton sampler with digit-permuted radical inverses.
//!
//! [`HaltonSampler`] owns the packed lookup tables of every supported base.
//! It starts uninitialised; [`init_faure`](HaltonSampler::init_faure) or
//! [`init_random`](HaltonSampler::init_random) build the tables, after which
//! [`sample`](HaltonSampler::sample) is a pure function of
//! `(dimension, index)`.
//!
//! ## Contract Violations
//!
//! Sampling an out-of-range dimension or an uninitialised sampler is a
//! caller error. [`sample`](HaltonSampler::sample) panics with a
//! descriptive message; [`try_sample`](HaltonSampler::try_sample) reports
//! the same conditions as [`HaltonError`].
//!
//! ## Thread Safety
//!
//! Initialisation takes `&mut self` and sampling `&self`, so the borrow
//! checker keeps re-initialisation from overlapping reads. An initialised
//! sampler is `Send + Sync` and can be shared across threads by reference
//! or through an `Arc`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::SamplerConfig;
use crate::error::{ConfigError, HaltonError};
use crate::permutation::{PermutationScheme, PermutationSet, RngShuffle, ShuffleSource};
use crate::primes::{MAX_BASE, NUM_DIMENSIONS};
use crate::tables::{BaseTable, SamplerTables};

/// Bits of the `f32` exponent field encoding 1.0.
const ONE_BITS: u32 = 0x3f80_0000;

/// Radical inverse in base 2 by bit reversal.
///
/// The top 23 reversed bits become the mantissa of a float in [1, 2);
/// subtracting one maps it to [0, 1) without any division.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::sampler::radical_inverse_base2;
///
/// assert_eq!(radical_inverse_base2(0), 0.0);
/// assert_eq!(radical_inverse_base2(1), 0.5);
/// assert_eq!(radical_inverse_base2(2), 0.25);
/// assert_eq!(radical_inverse_base2(3), 0.75);
/// ```
#[inline]
pub fn radical_inverse_base2(index: u32) -> f32 {
    f32::from_bits(ONE_BITS | (index.reverse_bits() >> 9)) - 1.0
}

/// Halton sequence sampler over [`NUM_DIMENSIONS`] dimensions.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::HaltonSampler;
///
/// let sampler = HaltonSampler::faure();
/// assert_eq!(sampler.sample(0, 1), 0.5);
///
/// let x = sampler.sample(7, 12345);
/// assert!((0.0..1.0).contains(&x));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HaltonSampler {
    tables: Option<SamplerTables>,
    scheme: Option<PermutationScheme>,
}

impl HaltonSampler {
    /// Returns the number of supported dimensions.
    #[inline]
    pub const fn num_dimensions() -> u32 {
        NUM_DIMENSIONS as u32
    }

    /// Creates an uninitialised sampler.
    ///
    /// One of the `init_*` methods must be called before sampling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sampler initialised with Faure permutations.
    pub fn faure() -> Self {
        let mut sampler = Self::new();
        sampler.init_faure();
        sampler
    }

    /// Creates a sampler initialised with permutations shuffled by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`HaltonError::ShuffleOutOfRange`] if `source` misbehaves.
    pub fn random<S>(source: &mut S) -> Result<Self, HaltonError>
    where
        S: ShuffleSource + ?Sized,
    {
        let mut sampler = Self::new();
        sampler.init_random(source)?;
        Ok(sampler)
    }

    /// Creates a sampler initialised with permutations shuffled by a
    /// [`StdRng`] seeded from `seed`.
    pub fn seeded(seed: u64) -> Result<Self, HaltonError> {
        let mut sampler = Self::new();
        sampler.init_seeded(seed)?;
        Ok(sampler)
    }

    /// Creates a sampler as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HaltonError::Config`] if the configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use halton_sampler::{HaltonSampler, PermutationScheme, SamplerConfig};
    ///
    /// let config = SamplerConfig::builder()
    ///     .scheme(PermutationScheme::Random)
    ///     .seed(7)
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// let sampler = HaltonSampler::from_config(&config).unwrap();
    /// assert_eq!(sampler.permutation_scheme(), Some(PermutationScheme::Random));
    /// ```
    pub fn from_config(config: &SamplerConfig) -> Result<Self, HaltonError> {
        config.validate()?;
        match config.scheme {
            PermutationScheme::Faure => Ok(Self::faure()),
            PermutationScheme::Random => {
                let seed = config.seed.ok_or(ConfigError::MissingSeed)?;
                Self::seeded(seed)
            }
        }
    }

    /// Initialises the tables with Faure permutations.
    ///
    /// Replaces any previously built tables.
    pub fn init_faure(&mut self) {
        let perms = PermutationSet::faure(MAX_BASE);
        self.install(&perms, PermutationScheme::Faure);
    }

    /// Initialises the tables with permutations shuffled by `source`.
    ///
    /// Bases 1 to 3 keep the identity; every base from 4 up to the largest
    /// prime in use is shuffled in increasing order, drawing exactly
    /// `base - 1` values from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`HaltonError::ShuffleOutOfRange`] if `source` returns a
    /// value outside the requested bound. The sampler keeps its previous
    /// tables (or stays uninitialised) in that case.
    pub fn init_random<S>(&mut self, source: &mut S) -> Result<(), HaltonError>
    where
        S: ShuffleSource + ?Sized,
    {
        let perms = PermutationSet::random(MAX_BASE, source)?;
        self.install(&perms, PermutationScheme::Random);
        Ok(())
    }

    /// Initialises the tables with permutations shuffled by a [`StdRng`]
    /// seeded from `seed`.
    pub fn init_seeded(&mut self, seed: u64) -> Result<(), HaltonError> {
        debug!(seed, "Seeding randomised permutations");
        let mut source = RngShuffle::new(StdRng::seed_from_u64(seed));
        self.init_random(&mut source)
    }

    /// Builds the new tables in full before swapping them in.
    fn install(&mut self, perms: &PermutationSet, scheme: PermutationScheme) {
        let tables = SamplerTables::build(perms);
        debug!(
            scheme = %scheme,
            tables = tables.len(),
            entries = tables.total_entries(),
            reinitialised = self.tables.is_some(),
            "Initialised Halton sampler"
        );
        self.tables = Some(tables);
        self.scheme = Some(scheme);
    }

    /// Returns `true` once an `init_*` method has completed.
    #[inline]
    pub fn is_initialised(&self) -> bool {
        self.tables.is_some()
    }

    /// Returns the scheme of the current tables, if initialised.
    #[inline]
    pub fn permutation_scheme(&self) -> Option<PermutationScheme> {
        self.scheme
    }

    /// Returns the packed table serving `dimension` (1 or above).
    #[inline]
    pub fn base_table(&self, dimension: u32) -> Option<&BaseTable> {
        self.tables.as_ref().and_then(|tables| tables.get(dimension))
    }

    /// Returns the Halton sample for `dimension` and `index`, in [0, 1).
    ///
    /// # Panics
    ///
    /// Panics if the sampler is uninitialised or if
    /// `dimension >= num_dimensions()`.
    #[inline]
    pub fn sample(&self, dimension: u32, index: u32) -> f32 {
        match self.try_sample(dimension, index) {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }

    /// Returns the Halton sample for `dimension` and `index`, in [0, 1).
    ///
    /// # Errors
    ///
    /// - [`HaltonError::Uninitialised`] before any `init_*` call
    /// - [`HaltonError::DimensionOutOfRange`] if
    ///   `dimension >= num_dimensions()`
    #[inline]
    pub fn try_sample(&self, dimension: u32, index: u32) -> Result<f32, HaltonError> {
        let tables = self.tables.as_ref().ok_or(HaltonError::Uninitialised)?;
        if dimension == 0 {
            return Ok(radical_inverse_base2(index));
        }
        tables
            .get(dimension)
            .map(|table| table.radical_inverse(index))
            .ok_or(HaltonError::DimensionOutOfRange {
                dimension,
                max: Self::num_dimensions(),
            })
    }

    /// Writes the first `out.len()` coordinates of point `index` into `out`.
    ///
    /// # Panics
    ///
    /// Panics if the sampler is uninitialised or if `out` is longer than
    /// `num_dimensions()`.
    #[inline]
    pub fn fill_point<T>(&self, index: u32, out: &mut [T])
    where
        T: num_traits::Float + From<f32>,
    {
        for (dimension, slot) in out.iter_mut().enumerate() {
            *slot = self.sample(dimension as u32, index).into();
        }
    }
}
