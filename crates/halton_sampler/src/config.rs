//! Sampler configuration management.
//!
//! Handles loading configuration from TOML, environment variables and a
//! fluent builder. Every source ends in [`SamplerConfig::validate`].
//!
//! ## Environment Variables
//!
//! - `HALTON_SCHEME`: `faure` or `random`
//! - `HALTON_SEED`: 64-bit seed for the random scheme
//! - `HALTON_DIMENSIONS`: point dimensionality for sequences
//! - `HALTON_START_INDEX`: first sample index of a sequence

use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::permutation::PermutationScheme;
use crate::primes::NUM_DIMENSIONS;

/// Default point dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 2;

const ENV_SCHEME: &str = "HALTON_SCHEME";
const ENV_SEED: &str = "HALTON_SEED";
const ENV_DIMENSIONS: &str = "HALTON_DIMENSIONS";
const ENV_START_INDEX: &str = "HALTON_START_INDEX";

/// Halton sampler configuration.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::{PermutationScheme, SamplerConfig};
///
/// let config = SamplerConfig::from_toml_str(
///     r#"
///     scheme = "random"
///     seed = 42
///     dimensions = 8
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.scheme, PermutationScheme::Random);
/// assert_eq!(config.seed, Some(42));
/// assert_eq!(config.dimensions, 8);
/// assert_eq!(config.start_index, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Digit permutation scheme
    #[serde(deserialize_with = "deserialize_scheme")]
    pub scheme: PermutationScheme,
    /// Seed for randomised permutations
    pub seed: Option<u64>,
    /// Number of coordinates per sequence point
    pub dimensions: usize,
    /// First sample index of a sequence
    pub start_index: u32,
}

fn deserialize_scheme<'de, D>(deserializer: D) -> Result<PermutationScheme, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    PermutationScheme::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            scheme: PermutationScheme::Faure,
            seed: None,
            dimensions: DEFAULT_DIMENSIONS,
            start_index: 0,
        }
    }
}

impl SamplerConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::default()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SamplerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Loads configuration from `HALTON_*` environment variables.
    ///
    /// Unset variables keep their default values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a `HALTON_*`
    /// variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(scheme) = lookup(ENV_SCHEME) {
            config.scheme = PermutationScheme::from_str(&scheme)?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            config.seed = Some(parse_var(ENV_SEED, &seed)?);
        }

        if let Some(dimensions) = lookup(ENV_DIMENSIONS) {
            config.dimensions = parse_var(ENV_DIMENSIONS, &dimensions)?;
        }

        if let Some(start_index) = lookup(ENV_START_INDEX) {
            config.start_index = parse_var(ENV_START_INDEX, &start_index)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `dimensions` is 0 or greater than 256
    /// - `scheme` is random and no seed is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions == 0 || self.dimensions > NUM_DIMENSIONS {
            return Err(ConfigError::InvalidDimensions(self.dimensions));
        }
        if self.scheme == PermutationScheme::Random && self.seed.is_none() {
            return Err(ConfigError::MissingSeed);
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} is not a valid number", name, value)))
}

/// Builder for [`SamplerConfig`].
///
/// # Examples
///
/// ```rust
/// use halton_sampler::SamplerConfig;
///
/// let config = SamplerConfig::builder()
///     .dimensions(16)
///     .start_index(1)
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.dimensions, 16);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SamplerConfigBuilder {
    scheme: PermutationScheme,
    seed: Option<u64>,
    dimensions: Option<usize>,
    start_index: u32,
}

impl SamplerConfigBuilder {
    /// Sets the permutation scheme.
    #[inline]
    pub fn scheme(mut self, scheme: PermutationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the seed for randomised permutations.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of coordinates per point, in `[1, 256]`.
    #[inline]
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Sets the first sample index of a sequence.
    #[inline]
    pub fn start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build(self) -> Result<SamplerConfig, ConfigError> {
        let config = SamplerConfig {
            scheme: self.scheme,
            seed: self.seed,
            dimensions: self.dimensions.unwrap_or(DEFAULT_DIMENSIONS),
            start_index: self.start_index,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = SamplerConfig::default();
        assert_eq!(config.scheme, PermutationScheme::Faure);
        assert_eq!(config.dimensions, DEFAULT_DIMENSIONS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_valid() {
        let config = SamplerConfig::builder()
            .scheme(PermutationScheme::Random)
            .seed(11)
            .dimensions(256)
            .start_index(100)
            .build()
            .unwrap();

        assert_eq!(config.seed, Some(11));
        assert_eq!(config.dimensions, 256);
        assert_eq!(config.start_index, 100);
    }

    #[test]
    fn test_builder_invalid_dimensions() {
        let result = SamplerConfig::builder().dimensions(0).build();
        assert_eq!(result, Err(ConfigError::InvalidDimensions(0)));

        let result = SamplerConfig::builder().dimensions(257).build();
        assert_eq!(result, Err(ConfigError::InvalidDimensions(257)));
    }

    #[test]
    fn test_builder_random_requires_seed() {
        let result = SamplerConfig::builder()
            .scheme(PermutationScheme::Random)
            .build();
        assert_eq!(result, Err(ConfigError::MissingSeed));
    }

    #[test]
    fn test_toml_defaults() {
        let config = SamplerConfig::from_toml_str("").unwrap();
        assert_eq!(config, SamplerConfig::default());
    }

    #[test]
    fn test_toml_scheme_is_case_insensitive() {
        let config = SamplerConfig::from_toml_str("scheme = \"FAURE\"").unwrap();
        assert_eq!(config.scheme, PermutationScheme::Faure);
    }

    #[test]
    fn test_toml_invalid_scheme() {
        let result = SamplerConfig::from_toml_str("scheme = \"sobol\"");
        match result {
            Err(ConfigError::FileError(message)) => assert!(message.contains("sobol")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_toml_validation_applies() {
        let result = SamplerConfig::from_toml_str("dimensions = 300");
        assert_eq!(result, Err(ConfigError::InvalidDimensions(300)));
    }

    #[test]
    fn test_missing_file() {
        let result = SamplerConfig::from_file("/nonexistent/halton.toml");
        assert!(matches!(result, Err(ConfigError::FileError(_))));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = SamplerConfig::from_lookup(lookup_from(&[
            ("HALTON_SCHEME", "random"),
            ("HALTON_SEED", "123"),
            ("HALTON_DIMENSIONS", " 5 "),
            ("HALTON_START_INDEX", "9"),
        ]))
        .unwrap();

        assert_eq!(config.scheme, PermutationScheme::Random);
        assert_eq!(config.seed, Some(123));
        assert_eq!(config.dimensions, 5);
        assert_eq!(config.start_index, 9);
    }

    #[test]
    fn test_lookup_empty_uses_defaults() {
        let config = SamplerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SamplerConfig::default());
    }

    #[test]
    fn test_lookup_invalid_number() {
        let result = SamplerConfig::from_lookup(lookup_from(&[("HALTON_DIMENSIONS", "many")]));
        match result {
            Err(ConfigError::EnvError(message)) => assert!(message.contains("HALTON_DIMENSIONS")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
