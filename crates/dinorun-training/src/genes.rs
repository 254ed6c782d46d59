//! Gene vector operations used by the genetic algorithm.
//!
//! Genes are network weights and biases. They are signed and bounded by a
//! symmetric gene range `[-range, range]`; every operator clamps its result
//! back into that range.
//!
//! - **Initialization**: [`random`] draws genes uniformly from the range
//! - **Crossover**: [`blx_alpha`] blends two parents
//! - **Mutation**: [`mutate`] adds Gaussian noise to some genes

use rand::Rng;
use rand_distr::Normal;

/// Builds a gene vector by applying `f` to each index.
///
/// # Examples
///
/// ```
/// use dinorun_training::genes;
///
/// let genes = genes::from_fn(|i| i as f32 - 1.0, 3);
/// assert_eq!(genes, vec![-1.0, 0.0, 1.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Draws `len` genes uniformly from `[-range, range]`.
pub fn random<R>(rng: &mut R, range: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-range..=range), len)
}

/// BLX-α crossover of two parents.
///
/// For each position, the child gene is drawn uniformly from the parents'
/// interval widened by `alpha` times its length on both sides, then clamped
/// to `[-range, range]`. With `alpha = 0.0` the child stays between the
/// parents.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, range: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(
        |i| {
            let min = f32::min(p1[i], p2[i]);
            let max = f32::max(p1[i], p2[i]);
            let d = max - min;
            rng.random_range((min - alpha * d)..=(max + alpha * d))
                .clamp(-range, range)
        },
        p1.len(),
    )
}

/// Gaussian mutation in place.
///
/// Each gene is perturbed with probability `rate` by a sample of
/// `N(0, sigma)`, then clamped to `[-range, range]`.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or `rate` is outside `[0, 1]`.
pub fn mutate<R>(genes: &mut [f32], sigma: f32, range: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for gene in genes {
        if rng.random_bool(rate.into()) {
            *gene = (*gene + rng.sample(normal)).clamp(-range, range);
        }
    }
}
