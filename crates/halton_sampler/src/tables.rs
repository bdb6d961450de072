//! Digit-packed radical-inverse lookup tables.
//!
//! Looking up one base-`b` digit at a time would need up to 20 table reads
//! per sample for base 3. Instead, each table covers `digits` base-`b` digits
//! at once, with `b^digits` kept at or below [`MAX_TABLE_SIZE`] entries. A
//! 32-bit index is then split into `groups` chunks of `digits` digits, and
//! the permuted, reversed value of every chunk is read from the same table.
//!
//! Bases above [`MAX_TABLE_SIZE`] fall back to one digit per lookup, so
//! their tables hold exactly `base` entries.

use crate::permutation::PermutationSet;
use crate::primes::{MAX_BASE, PRIMES};

/// Upper bound on the number of entries packed into a table.
pub const MAX_TABLE_SIZE: u32 = 500;

/// Number of distinct sample indices (32-bit precision).
const INDEX_RANGE: u64 = 1 << 32;

/// `0x1.fffffcp-1`, the second-largest `f32` below one. Scaling by it
/// keeps results strictly below 1.0 after `f32` rounding of the sum.
const ONE_MINUS_EPSILON: f64 = 16_777_214.0 / 16_777_216.0;

/// Applies `perm` to the lowest `digits` base-`base` digits of `index` and
/// reverses their order.
///
/// The least-significant digit of `index` becomes the most-significant
/// digit of the result.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::tables::invert;
///
/// // 5 = 12 in base 3, reversed over three digits: 210 = 21.
/// assert_eq!(invert(3, 3, 5, &[0, 1, 2]), 21);
/// ```
pub fn invert(base: u16, digits: u32, index: u32, perm: &[u16]) -> u16 {
    let base = u32::from(base);
    let mut index = index;
    let mut result = 0u32;
    for _ in 0..digits {
        result = result * base + u32::from(perm[(index % base) as usize]);
        index /= base;
    }
    result as u16
}

/// Returns `(digits, pow_base)`: the number of base-`base` digits packed
/// into one lookup and the resulting table length `base^digits`.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::tables::pack_size;
///
/// assert_eq!(pack_size(3), (5, 243));
/// assert_eq!(pack_size(23), (1, 23));
/// assert_eq!(pack_size(1619), (1, 1619));
/// ```
pub fn pack_size(base: u16) -> (u32, u32) {
    let base = u32::from(base);
    let mut digits = 1;
    let mut pow_base = base;
    while pow_base * base <= MAX_TABLE_SIZE {
        pow_base *= base;
        digits += 1;
    }
    (digits, pow_base)
}

/// Packed lookup table and evaluation constants for one base.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseTable {
    base: u16,
    digits: u32,
    pow_base: u32,
    /// `pow_base^groups`, the first power of `pow_base` whose product with
    /// `pow_base` reaches 2^32.
    max_power: u32,
    groups: u32,
    scale: f32,
    entries: Box<[u16]>,
}

impl BaseTable {
    /// Precomputes the table for `base` from its digit permutation.
    ///
    /// # Panics
    ///
    /// Panics if `base < 3` or if `perm.len() != base`.
    pub fn new(base: u16, perm: &[u16]) -> Self {
        assert!(base >= 3, "Base {} has no packed table", base);
        assert_eq!(
            perm.len(),
            usize::from(base),
            "Permutation length must equal the base"
        );

        let (digits, pow_base) = pack_size(base);

        let mut max_power = u64::from(pow_base);
        let mut groups = 1;
        while max_power * u64::from(pow_base) < INDEX_RANGE {
            max_power *= u64::from(pow_base);
            groups += 1;
        }

        let entries = (0..pow_base)
            .map(|t| invert(base, digits, t, perm))
            .collect();

        Self {
            base,
            digits,
            pow_base,
            max_power: max_power as u32,
            groups,
            scale: (ONE_MINUS_EPSILON / max_power as f64) as f32,
            entries,
        }
    }

    /// Evaluates the permuted radical inverse of `index` in [0, 1).
    ///
    /// Treats `index` as a number in base `pow_base`, maps each of its
    /// `groups` lowest digits through the table and mirrors them about the
    /// radix point. Digits above `groups` are ignored.
    #[inline]
    pub fn radical_inverse(&self, index: u32) -> f32 {
        let mut remaining = index;
        let mut sum = 0u32;
        for _ in 0..self.groups {
            let entry = self.entries[(remaining % self.pow_base) as usize];
            sum = sum * self.pow_base + u32::from(entry);
            remaining /= self.pow_base;
        }
        sum as f32 * self.scale
    }

    /// The radical-inverse base.
    #[inline]
    pub fn base(&self) -> u16 {
        self.base
    }

    /// Number of base digits consumed per lookup.
    #[inline]
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Table length, `base^digits`.
    #[inline]
    pub fn pow_base(&self) -> u32 {
        self.pow_base
    }

    /// `pow_base^groups`; sums are divided by this value.
    #[inline]
    pub fn max_power(&self) -> u32 {
        self.max_power
    }

    /// Number of lookups per sample.
    #[inline]
    pub fn groups(&self) -> u32 {
        self.groups
    }

    /// The table entries.
    #[inline]
    pub fn entries(&self) -> &[u16] {
        &self.entries
    }
}

/// Packed tables for every dimension except dimension 0 (base 2).
#[derive(Clone, Debug, PartialEq)]
pub struct SamplerTables {
    /// `tables[d - 1]` serves dimension `d`.
    tables: Vec<BaseTable>,
}

impl SamplerTables {
    /// Builds the tables for all supported dimensions.
    ///
    /// # Panics
    ///
    /// Panics if `perms` does not cover [`MAX_BASE`].
    pub fn build(perms: &PermutationSet) -> Self {
        assert!(
            perms.max_base() >= MAX_BASE,
            "Permutations cover bases up to {}, need {}",
            perms.max_base(),
            MAX_BASE
        );

        let tables = PRIMES[1..]
            .iter()
            .map(|&base| BaseTable::new(base, perms.permutation(base)))
            .collect();

        Self { tables }
    }

    /// Returns the table serving `dimension` (which must be at least 1).
    #[inline]
    pub fn get(&self, dimension: u32) -> Option<&BaseTable> {
        (dimension as usize)
            .checked_sub(1)
            .and_then(|slot| self.tables.get(slot))
    }

    /// Number of tables (one less than the number of dimensions).
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Always `false` once built.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of entries across all tables.
    pub fn total_entries(&self) -> usize {
        self.tables.iter().map(|t| t.entries.len()).sum()
    }
}
