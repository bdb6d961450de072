//! End-to-end tests: configuration, sampler, sequences and integration.
//!
//! # Test Categories
//!
//! 1. **Configuration**: TOML and builder paths produce working samplers
//! 2. **Injection**: deterministic `rand` generators give reproducible tables
//! 3. **Convergence**: QMC estimates of known integrals
//! 4. **Logging**: initialisation under an installed tracing subscriber

use approx::assert_relative_eq;
use halton_sampler::{
    HaltonError, HaltonSampler, HaltonSequence, LowDiscrepancySequence, PermutationScheme,
    QmcIntegrator, RngShuffle, SamplerConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("halton_sampler=debug")
        .try_init();
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_toml_config_to_sequence() {
    init_tracing();
    let config = SamplerConfig::from_toml_str(
        r#"
        scheme = "random"
        seed = 314
        dimensions = 3
        start_index = 1
        "#,
    )
    .unwrap();

    let mut sequence = HaltonSequence::from_config(&config).unwrap();
    let direct = HaltonSampler::seeded(314).unwrap();

    assert_eq!(
        sequence.sampler().permutation_scheme(),
        Some(PermutationScheme::Random)
    );
    let point = sequence.next_point().to_vec();
    for (dimension, &value) in point.iter().enumerate() {
        assert_eq!(value, f64::from(direct.sample(dimension as u32, 1)));
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SamplerConfig {
        scheme: PermutationScheme::Random,
        ..SamplerConfig::default()
    };
    assert!(matches!(
        HaltonSampler::from_config(&config),
        Err(HaltonError::Config(_))
    ));
}

// ============================================================================
// Injection
// ============================================================================

#[test]
fn test_injected_rng_matches_seeded_constructor() {
    let mut source = RngShuffle::new(StdRng::seed_from_u64(2718));
    let injected = HaltonSampler::random(&mut source).unwrap();
    let seeded = HaltonSampler::seeded(2718).unwrap();

    for dimension in 0..HaltonSampler::num_dimensions() {
        for index in [0, 1, 99, 65_536, u32::MAX] {
            assert_eq!(
                injected.sample(dimension, index).to_bits(),
                seeded.sample(dimension, index).to_bits()
            );
        }
    }
}

#[test]
fn test_sequences_share_one_sampler() {
    let sampler = Arc::new(HaltonSampler::faure());
    let mut left = HaltonSequence::new(Arc::clone(&sampler), 4, 0).unwrap();
    let mut right = HaltonSequence::new(Arc::clone(&sampler), 4, 500).unwrap();

    left.skip(500);
    for _ in 0..100 {
        assert_eq!(left.next_point(), right.next_point());
    }
    assert_eq!(Arc::strong_count(&sampler), 3);
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_quadratic_integral() {
    let sampler = HaltonSampler::faure();
    let integrator = QmcIntegrator::new(&sampler, 2).unwrap();

    // ∫ x^2 dx = 1/3 on the ternary axis.
    let estimate = integrator.par_integrate(50_000, |x| x[1] * x[1]);
    assert_relative_eq!(estimate, 1.0 / 3.0, max_relative = 1e-3);
}

#[test]
fn test_qmc_beats_coarse_tolerance_in_higher_dimensions() {
    let sampler = HaltonSampler::faure();
    let integrator = QmcIntegrator::new(&sampler, 16).unwrap();

    // Mean of 16 uniforms has expectation 1/2.
    let estimate = integrator.par_integrate(1 << 16, |x| x.iter().sum::<f64>() / 16.0);
    assert_relative_eq!(estimate, 0.5, max_relative = 1e-3);
}
