//! Digit permutations for the radical inverse.
//!
//! A [`PermutationSet`] holds one bijection on `[0, base)` for every base up
//! to a maximum. Two constructions are provided:
//!
//! - **Faure**: the deterministic, recursive construction by parity
//! - **Random**: identity permutations shuffled by a caller-supplied
//!   [`ShuffleSource`]
//!
//! Bases 1, 2 and 3 always keep the identity permutation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::warn;

use crate::error::{ConfigError, HaltonError};

/// Bases up to and including this value keep the identity permutation.
const IDENTITY_BASES: usize = 3;

/// How the digit permutations of a sampler were constructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PermutationScheme {
    /// Deterministic Faure permutations.
    #[default]
    Faure,
    /// Permutations shuffled by an injected random source.
    Random,
}

impl PermutationScheme {
    /// Returns the lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermutationScheme::Faure => "faure",
            PermutationScheme::Random => "random",
        }
    }
}

impl FromStr for PermutationScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "faure" => Ok(PermutationScheme::Faure),
            "random" | "randomised" | "randomized" => Ok(PermutationScheme::Random),
            _ => Err(ConfigError::InvalidScheme(s.to_string())),
        }
    }
}

impl fmt::Display for PermutationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of uniformly distributed integers for shuffling permutations.
///
/// Given an exclusive upper bound `N`, an implementation returns a value in
/// `[0, N)`. Every `FnMut(u32) -> u32` closure is a source, which keeps
/// deterministic stubs trivial to write.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::ShuffleSource;
///
/// // Always picks the last slot, so shuffling is a no-op.
/// let mut last = |bound: u32| bound - 1;
/// assert_eq!(last.next_below(5), 4);
/// ```
pub trait ShuffleSource {
    /// Returns a value in `[0, bound)`. `bound` is always at least 2.
    fn next_below(&mut self, bound: u32) -> u32;
}

impl<F> ShuffleSource for F
where
    F: FnMut(u32) -> u32,
{
    #[inline]
    fn next_below(&mut self, bound: u32) -> u32 {
        self(bound)
    }
}

/// Adapts any [`rand::Rng`] into a [`ShuffleSource`].
///
/// # Examples
///
/// ```rust
/// use halton_sampler::{RngShuffle, ShuffleSource};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut source = RngShuffle::new(StdRng::seed_from_u64(42));
/// assert!(source.next_below(10) < 10);
/// ```
#[derive(Clone, Debug)]
pub struct RngShuffle<R> {
    rng: R,
}

impl<R: Rng> RngShuffle<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns the wrapped generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> ShuffleSource for RngShuffle<R> {
    #[inline]
    fn next_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

/// Digit permutations for every base in `1..=max_base`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermutationSet {
    /// `perms[base]` is the permutation of `[0, base)`; index 0 is empty.
    perms: Vec<Vec<u16>>,
}

impl PermutationSet {
    /// Builds the Faure permutations for all bases up to `max_base`.
    ///
    /// Even bases double the permutation of `base / 2`; odd bases insert the
    /// middle digit `base / 2` into the permutation of `base - 1`. Each base
    /// depends on a strictly smaller one, so bases are built in increasing
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use halton_sampler::PermutationSet;
    ///
    /// let perms = PermutationSet::faure(7);
    /// assert_eq!(perms.permutation(4), &[0, 2, 1, 3]);
    /// assert_eq!(perms.permutation(5), &[0, 3, 2, 1, 4]);
    /// ```
    pub fn faure(max_base: u16) -> Self {
        let mut perms = identity_prefix(max_base);

        for base in (IDENTITY_BASES + 1)..=usize::from(max_base) {
            let half = base / 2;
            let mut perm = vec![0u16; base];

            if base % 2 == 1 {
                for (i, &value) in perms[base - 1].iter().enumerate() {
                    let slot = i + usize::from(i >= half);
                    perm[slot] = value + u16::from(usize::from(value) >= half);
                }
                perm[half] = half as u16;
            } else {
                for (i, &value) in perms[half].iter().enumerate() {
                    perm[i] = 2 * value;
                    perm[half + i] = 2 * value + 1;
                }
            }

            perms.push(perm);
        }

        Self { perms }
    }

    /// Builds randomised permutations for all bases up to `max_base`.
    ///
    /// Every base from 4 upwards starts as the identity and is shuffled
    /// front to back: for each position `i >= 1`, `source.next_below(i + 1)`
    /// picks the slot to swap with. This draws exactly `base - 1` values per
    /// base, in increasing base order, so a deterministic source always
    /// yields the same permutations.
    ///
    /// # Errors
    ///
    /// Returns [`HaltonError::ShuffleOutOfRange`] if the source returns a
    /// value outside the requested bound. No permutations are returned in
    /// that case.
    pub fn random<S>(max_base: u16, source: &mut S) -> Result<Self, HaltonError>
    where
        S: ShuffleSource + ?Sized,
    {
        let mut perms = identity_prefix(max_base);

        for base in (IDENTITY_BASES + 1)..=usize::from(max_base) {
            let mut perm: Vec<u16> = (0..base as u16).collect();
            shuffle(&mut perm, source)?;
            perms.push(perm);
        }

        Ok(Self { perms })
    }

    /// Returns the largest base covered by this set.
    #[inline]
    pub fn max_base(&self) -> u16 {
        (self.perms.len() - 1) as u16
    }

    /// Returns the permutation of `base`, if covered.
    #[inline]
    pub fn get(&self, base: u16) -> Option<&[u16]> {
        match base {
            0 => None,
            _ => self.perms.get(usize::from(base)).map(Vec::as_slice),
        }
    }

    /// Returns the permutation of `base`.
    ///
    /// # Panics
    ///
    /// Panics if `base` is zero or greater than [`max_base`](Self::max_base).
    #[inline]
    pub fn permutation(&self, base: u16) -> &[u16] {
        match self.get(base) {
            Some(perm) => perm,
            None => panic!(
                "No permutation for base {}: set covers bases [1, {}]",
                base,
                self.max_base()
            ),
        }
    }
}

/// Identity permutations for bases `0..=min(max_base, 3)`.
fn identity_prefix(max_base: u16) -> Vec<Vec<u16>> {
    let mut perms = Vec::with_capacity(usize::from(max_base) + 1);
    perms.push(Vec::new());
    for base in 1..=usize::from(max_base).min(IDENTITY_BASES) {
        perms.push((0..base as u16).collect());
    }
    perms
}

fn shuffle<S>(perm: &mut [u16], source: &mut S) -> Result<(), HaltonError>
where
    S: ShuffleSource + ?Sized,
{
    for i in 1..perm.len() {
        let bound = (i + 1) as u32;
        let value = source.next_below(bound);
        if value >= bound {
            let base = perm.len() as u16;
            warn!(base, bound, value, "Shuffle source returned out-of-range value");
            return Err(HaltonError::ShuffleOutOfRange { base, bound, value });
        }
        perm.swap(i, value as usize);
    }
    Ok(())
}

/// Returns `true` if `perm` is a bijection on `[0, perm.len())`.
pub fn is_permutation(perm: &[u16]) -> bool {
    let mut seen = vec![false; perm.len()];
    for &value in perm {
        match seen.get_mut(usize::from(value)) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
