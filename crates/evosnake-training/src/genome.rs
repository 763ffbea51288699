//! Genome operations for the genetic algorithm.
//!
//! A genome is the flat `f32` parameter vector of one network (see
//! `evosnake_evaluator::model` for its layout). These functions are used by
//! [`genetic::PopulationEvolver`](crate::genetic::PopulationEvolver) for
//! initialization, crossover and mutation.
//!
//! # Operations
//!
//! - **Initialization**: [`random`] draws genes uniformly around zero
//! - **Crossover**: [`uniform`], [`single_point`] and [`blx_alpha`]
//! - **Mutation**: [`mutate`] adds Gaussian noise to a fraction of the genes
//!
//! Every operator keeps genes inside `[-limit, limit]`. Network weights are
//! signed, so the bound is symmetric around zero.
//!
//! # Crossover Choice
//!
//! - [`uniform`] picks each gene from either parent with equal probability.
//! - [`single_point`] keeps the prefix of one parent and the suffix of the
//!   other, which preserves runs of neighbouring weights (whole neuron rows).
//! - [`blx_alpha`] samples between and slightly beyond the parents, so it can
//!   reach values that neither parent holds.

use rand::Rng;
use rand_distr::Normal;

/// Creates a genome by applying a function to each index.
///
/// # Examples
///
/// ```
/// use evosnake_training::genome;
///
/// let genes = genome::from_fn(|i| if i % 2 == 0 { 1.0 } else { -1.0 }, 4);
/// assert_eq!(genes, vec![1.0, -1.0, 1.0, -1.0]);
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

/// Generates a genome with each gene uniform in `[-init_range, init_range]`.
pub fn random<R>(rng: &mut R, init_range: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-init_range..=init_range), len)
}

/// Takes each gene from `p1` or `p2` with equal probability.
///
/// # Panics
///
/// Panics if parent genomes have different lengths.
pub fn uniform<R>(p1: &[f32], p2: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(|i| if rng.random_bool(0.5) { p1[i] } else { p2[i] }, p1.len())
}

/// Joins a prefix of `p1` with the matching suffix of `p2` at a random cut.
///
/// The cut lies in `0..=len`, so either parent may be copied whole.
///
/// # Panics
///
/// Panics if parent genomes have different lengths.
pub fn single_point<R>(p1: &[f32], p2: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    let cut = rng.random_range(0..=p1.len());
    let mut child = Vec::with_capacity(p1.len());
    child.extend_from_slice(&p1[..cut]);
    child.extend_from_slice(&p2[cut..]);
    child
}

/// Performs BLX-α (Blend Crossover) between two parent genomes.
///
/// For parents `x1` and `x2` at position `i`:
///
/// 1. Compute `d = |x2 - x1|`
/// 2. Expand range: `[min - α·d, max + α·d]`
/// 3. Sample uniformly from the expanded range
/// 4. Clamp to `[-limit, limit]`
///
/// # Panics
///
/// Panics if parent genomes have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, limit: f32, rng: &mut R) -> Vec<f32>
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
                .clamp(-limit, limit)
        },
        p1.len(),
    )
}

/// Applies Gaussian mutation to a genome in place.
///
/// Each gene, with probability `rate`, receives a perturbation drawn from
/// `N(0, sigma)` and is then clamped to `[-limit, limit]`.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or if `rate` is outside `[0, 1]`.
pub fn mutate<R>(genome: &mut [f32], sigma: f32, limit: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for gene in genome {
        if rng.random_bool(rate.into()) {
            *gene = (*gene + rng.sample(normal)).clamp(-limit, limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn test_random_within_range() {
        let genes = random(&mut rng(), 0.5, 1000);
        assert_eq!(genes.len(), 1000);
        assert!(genes.iter().all(|g| (-0.5..=0.5).contains(g)));
        assert!(genes.iter().any(|g| *g < 0.0));
        assert!(genes.iter().any(|g| *g > 0.0));
    }

    #[test]
    fn test_uniform_takes_genes_from_parents() {
        let p1 = vec![1.0; 64];
        let p2 = vec![-1.0; 64];
        let child = uniform(&p1, &p2, &mut rng());
        assert!(child.iter().all(|g| *g == 1.0 || *g == -1.0));
        assert!(child.contains(&1.0));
        assert!(child.contains(&-1.0));
    }

    #[test]
    fn test_single_point_is_prefix_then_suffix() {
        let p1 = from_fn(|_| 1.0, 20);
        let p2 = from_fn(|_| 2.0, 20);
        let mut rng = rng();
        for _ in 0..20 {
            let child = single_point(&p1, &p2, &mut rng);
            let cut = child.iter().take_while(|g| **g == 1.0).count();
            assert!(child[cut..].iter().all(|g| *g == 2.0));
        }
    }

    #[test]
    fn test_blx_alpha_stays_near_parents() {
        let p1 = vec![0.0, -0.5, 0.9];
        let p2 = vec![0.2, 0.5, 0.9];
        let mut rng = rng();
        for _ in 0..100 {
            let child = blx_alpha(&p1, &p2, 0.5, 1.0, &mut rng);
            assert!((-0.101..=0.301).contains(&child[0]));
            assert!((-1.0..=1.0).contains(&child[1]));
            assert!((child[2] - 0.9).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_mutate_rate_zero_is_identity() {
        let mut genes = vec![0.25; 32];
        mutate(&mut genes, 1.0, 1.0, 0.0, &mut rng());
        assert_eq!(genes, vec![0.25; 32]);
    }

    #[test]
    fn test_mutate_clamps_to_limit() {
        let mut genes = vec![0.0; 256];
        mutate(&mut genes, 10.0, 2.0, 1.0, &mut rng());
        assert!(genes.iter().all(|g| (-2.0..=2.0).contains(g)));
        assert!(genes.iter().any(|g| *g != 0.0));
    }
}
