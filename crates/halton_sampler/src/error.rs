//! Error types for the Halton sampler.
//!
//! - `HaltonError`: contract violations at sampling time and rejected shuffle
//!   draws during randomised initialisation
//! - `ConfigError`: invalid or unreadable sampler configuration

use thiserror::Error;

/// Errors raised by sampler initialisation and evaluation.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::HaltonError;
///
/// let err = HaltonError::DimensionOutOfRange { dimension: 300, max: 256 };
/// assert_eq!(
///     err.to_string(),
///     "Dimension 300 out of range: sampler supports dimensions [0, 256)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HaltonError {
    /// Requested dimension has no prime base.
    #[error("Dimension {dimension} out of range: sampler supports dimensions [0, {max})")]
    DimensionOutOfRange {
        /// Requested dimension.
        dimension: u32,
        /// Number of supported dimensions.
        max: u32,
    },

    /// Sampling was attempted before `init_faure` or `init_random`.
    #[error("Sampler used before initialisation: call init_faure or init_random first")]
    Uninitialised,

    /// The injected shuffle source returned a value outside `[0, bound)`.
    #[error("Shuffle source returned {value} while permuting base {base}, expected a value below {bound}")]
    ShuffleOutOfRange {
        /// Base whose permutation was being shuffled.
        base: u16,
        /// Exclusive upper bound passed to the source.
        bound: u32,
        /// Value the source returned.
        value: u32,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Dimension count outside `[1, 256]`.
    #[error("Invalid dimension count {0}: must be in range [1, 256]")]
    InvalidDimensions(usize),

    /// `scheme = random` without a seed.
    #[error("Random permutation scheme requires a seed")]
    MissingSeed,

    /// Unrecognised scheme name.
    #[error("Invalid permutation scheme: {0}. Must be one of: faure, random")]
    InvalidScheme(String),

    /// Unreadable or malformed TOML.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// Unparsable environment variable.
    #[error("Environment variable error: {0}")]
    EnvError(String),
}
