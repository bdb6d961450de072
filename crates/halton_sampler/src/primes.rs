//! Prime table mapping each dimension to its radical-inverse base.
//!
//! Dimension `i` of the Halton sequence uses the `(i + 1)`-th prime as its
//! base. The table is evaluated at compile time by trial division.

/// Number of dimensions supported by the sampler.
pub const NUM_DIMENSIONS: usize = 256;

/// The first [`NUM_DIMENSIONS`] primes in increasing order.
pub const PRIMES: [u16; NUM_DIMENSIONS] = first_primes();

/// Largest base in use, i.e. the prime of the last supported dimension.
pub const MAX_BASE: u16 = PRIMES[NUM_DIMENSIONS - 1];

/// Returns `true` if `n` is prime.
///
/// Plain trial division; only used while building the table.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::primes::is_prime;
///
/// assert!(is_prime(2));
/// assert!(is_prime(1619));
/// assert!(!is_prime(1));
/// assert!(!is_prime(1617));
/// ```
pub const fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

const fn first_primes() -> [u16; NUM_DIMENSIONS] {
    let mut primes = [0u16; NUM_DIMENSIONS];
    let mut count = 0;
    let mut candidate: u32 = 1;
    while count < NUM_DIMENSIONS {
        candidate += 1;
        if is_prime(candidate) {
            primes[count] = candidate as u16;
            count += 1;
        }
    }
    primes
}

/// Returns the first `count` primes, or `None` if `count` exceeds
/// [`NUM_DIMENSIONS`].
#[inline]
pub fn primes(count: usize) -> Option<&'static [u16]> {
    PRIMES.get(..count)
}

/// Returns the radical-inverse base of `dimension`.
///
/// # Examples
///
/// ```rust
/// use halton_sampler::primes::prime_for_dimension;
///
/// assert_eq!(prime_for_dimension(0), Some(2));
/// assert_eq!(prime_for_dimension(1), Some(3));
/// assert_eq!(prime_for_dimension(256), None);
/// ```
#[inline]
pub fn prime_for_dimension(dimension: u32) -> Option<u16> {
    PRIMES.get(dimension as usize).copied()
}
