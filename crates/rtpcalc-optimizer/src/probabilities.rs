//! Probability vector operations for the genetic algorithm.
//!
//! A probability vector holds one entry per win-range tier. Every function
//! here that produces or perturbs a vector leaves it normalized (entries sum
//! to 1.0), which is the invariant [`genetic`](crate::genetic) relies on.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] draws independent uniform values
//! - **Crossover**: [`one_point_crossover`] splices two parents at a random point
//! - **Mutation**: [`mutate_one`] redraws a single tier
//! - **Normalization**: [`normalize`] rescales to sum to 1.0

use rand::Rng;

/// Absolute tolerance used when checking that a vector sums to 1.0.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Draws `len` independent values uniformly from `[0, 1)`.
///
/// The result is *not* normalized.
pub fn random<R>(rng: &mut R, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    (0..len).map(|_| rng.random::<f64>()).collect()
}

/// Rescales a vector in-place so its entries sum to 1.0.
///
/// A vector whose sum is zero (or not a positive finite number) has no
/// direction to preserve; it is replaced by the uniform distribution instead
/// of being divided by zero. An empty vector is left untouched.
///
/// ```
/// use rtpcalc_optimizer::probabilities;
///
/// let mut p = vec![1.0, 3.0];
/// probabilities::normalize(&mut p);
/// assert_eq!(p, vec![0.25, 0.75]);
///
/// let mut zeros = vec![0.0; 4];
/// probabilities::normalize(&mut zeros);
/// assert_eq!(zeros, vec![0.25; 4]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn normalize(probabilities: &mut [f64]) {
    if probabilities.is_empty() {
        return;
    }
    let sum: f64 = probabilities.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        for p in probabilities {
            *p /= sum;
        }
    } else {
        let uniform = 1.0 / probabilities.len() as f64;
        probabilities.fill(uniform);
    }
}

/// Returns `true` if all entries are non-negative and sum to 1.0 within
/// [`NORMALIZATION_TOLERANCE`].
#[must_use]
pub fn is_normalized(probabilities: &[f64]) -> bool {
    let sum: f64 = probabilities.iter().sum();
    probabilities.iter().all(|p| *p >= 0.0) && (sum - 1.0).abs() <= NORMALIZATION_TOLERANCE
}

/// One-point crossover between two parents.
///
/// Picks a point `k` uniformly in `[1, n - 1]` and returns
/// `(p1[..k] ++ p2[k..], p2[..k] ++ p1[k..])`, both normalized.
///
/// With a single tier there is no interior point, so the children are
/// normalized copies of the parents.
///
/// # Panics
///
/// Panics if parent vectors have different lengths.
pub fn one_point_crossover<R>(p1: &[f64], p2: &[f64], rng: &mut R) -> (Vec<f64>, Vec<f64>)
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    let n = p1.len();
    let (mut c1, mut c2) = if n < 2 {
        (p1.to_vec(), p2.to_vec())
    } else {
        let point = rng.random_range(1..n);
        (
            [&p1[..point], &p2[point..]].concat(),
            [&p2[..point], &p1[point..]].concat(),
        )
    };
    normalize(&mut c1);
    normalize(&mut c2);
    (c1, c2)
}

/// Replaces one uniformly chosen entry with a fresh `[0, 1)` draw and
/// renormalizes.
pub fn mutate_one<R>(probabilities: &mut [f64], rng: &mut R)
where
    R: Rng + ?Sized,
{
    if probabilities.is_empty() {
        return;
    }
    let index = rng.random_range(0..probabilities.len());
    probabilities[index] = rng.random::<f64>();
    normalize(probabilities);
}
