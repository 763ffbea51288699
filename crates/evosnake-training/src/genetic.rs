//! Genetic algorithm over network genomes.
//!
//! This module evolves populations of genomes to maximize a fitness function.
//! The GA uses tournament selection, one of three crossover operators and
//! Gaussian mutation to create new generations.
//!
//! # Algorithm Overview
//!
//! 1. **Evaluate Fitness** - Every individual without a score is scored by the
//!    [`FitnessFunction`], then the population is sorted best first
//! 2. **Elite Selection** - The top `elite_count` individuals are copied unchanged,
//!    score included
//! 3. **Tournament Selection** - Two parents are picked per child
//! 4. **Crossover** - The parents produce one child ([`Crossover`])
//! 5. **Mutation** - Gaussian noise is added to a fraction of the child's genes
//!
//! # Key Components
//!
//! - [`Individual`] - A genome and its fitness, once evaluated
//! - [`Population`] - Individuals evaluated together, kept sorted by fitness
//! - [`PopulationEvolver`] - Selection, crossover and mutation parameters
//!
//! # Determinism
//!
//! Fitness evaluation runs on the rayon thread pool. Before any work is handed
//! out, each pending individual receives its own [`Pcg32`] drawn in population
//! order from the caller's generator. Scores therefore depend only on that
//! generator's seed, never on thread scheduling.
//!
//! # Ties
//!
//! Sorting is stable, so individuals with equal fitness keep their previous
//! order. A tournament is won by the lowest sampled index of the sorted
//! population, i.e. by the earliest of the fittest contestants.
//!
//! # Example
//!
//! ```
//! use evosnake_training::genetic::{Crossover, Population, PopulationEvolver};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! // maximize the sum of genes
//! let fitness = |genome: &[f32], _rng: &mut Pcg32| genome.iter().sum::<f32>();
//!
//! let evolver = PopulationEvolver {
//!     elite_count: 2,
//!     tournament_size: 3,
//!     crossover: Crossover::Uniform,
//!     blx_alpha: 0.5,
//!     mutation_rate: 0.1,
//!     mutation_sigma: 0.2,
//!     weight_limit: 1.0,
//! };
//! let mut population = Population::random(20, 8, 1.0, &mut rng);
//! for _ in 0..10 {
//!     population.evaluate_fitness(&fitness, &mut rng);
//!     population = evolver.evolve(&population, &mut rng);
//! }
//! population.evaluate_fitness(&fitness, &mut rng);
//! assert!(population.best().unwrap().fitness().unwrap() > 0.0);
//! ```

use rand::{Rng, SeedableRng as _, seq::index};
use rand_pcg::Pcg32;
use rayon::prelude::*;
use tracing::debug;

use crate::{genome, stats::FitnessStats};

/// Scores a genome; higher is better.
///
/// `rng` is private to this call. Implementations must draw all their
/// randomness from it to stay reproducible.
pub trait FitnessFunction: Sync {
    fn evaluate(&self, genome: &[f32], rng: &mut Pcg32) -> f32;
}

impl<F> FitnessFunction for F
where
    F: Fn(&[f32], &mut Pcg32) -> f32 + Sync,
{
    fn evaluate(&self, genome: &[f32], rng: &mut Pcg32) -> f32 {
        self(genome, rng)
    }
}

/// A candidate genome and its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    genome: Vec<f32>,
    fitness: Option<f32>,
}

impl Individual {
    /// Creates an unevaluated individual.
    #[must_use]
    pub fn new(genome: Vec<f32>) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Creates an individual with genes uniform in `[-init_range, init_range]`.
    pub fn random<R>(rng: &mut R, init_range: f32, genome_len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(genome::random(rng, init_range, genome_len))
    }

    #[must_use]
    pub fn genome(&self) -> &[f32] {
        &self.genome
    }

    #[must_use]
    pub fn into_genome(self) -> Vec<f32> {
        self.genome
    }

    /// Returns the fitness, or `None` before the first evaluation.
    #[must_use]
    pub fn fitness(&self) -> Option<f32> {
        self.fitness
    }

    fn score(&self) -> f32 {
        self.fitness.unwrap_or(f32::NEG_INFINITY)
    }
}

/// Returns the evaluated individual with the highest fitness.
///
/// The first one wins ties. Unevaluated individuals are ignored.
#[must_use]
pub fn select_best(individuals: &[Individual]) -> Option<&Individual> {
    let mut best: Option<&Individual> = None;
    for ind in individuals.iter().filter(|ind| ind.fitness.is_some()) {
        if best.is_none_or(|b| ind.score() > b.score()) {
            best = Some(ind);
        }
    }
    best
}

/// A generation of individuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` random individuals.
    pub fn random<R>(count: usize, genome_len: usize, init_range: f32, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::random(rng, init_range, genome_len))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Scores every unevaluated individual in parallel, then sorts best first.
    ///
    /// Individuals that already carry a fitness, such as elites, keep it. A
    /// `NaN` fitness is recorded as negative infinity.
    pub fn evaluate_fitness<F, R>(&mut self, fitness: &F, rng: &mut R)
    where
        F: FitnessFunction + ?Sized,
        R: Rng + ?Sized,
    {
        let mut pending = self
            .individuals
            .iter_mut()
            .filter(|ind| ind.fitness.is_none())
            .map(|ind| (ind, Pcg32::from_seed(rng.random())))
            .collect::<Vec<_>>();
        debug!(count = pending.len(), "evaluating individuals");

        pending.par_iter_mut().for_each(|(ind, rng)| {
            let value = fitness.evaluate(&ind.genome, rng);
            ind.fitness = Some(if value.is_nan() {
                f32::NEG_INFINITY
            } else {
                value
            });
        });

        // stable: equal fitness keeps first-seen order
        self.individuals
            .sort_by(|a, b| b.score().total_cmp(&a.score()));
    }

    /// Returns the best evaluated individual; see [`select_best`].
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        select_best(&self.individuals)
    }

    /// Fitness summary over evaluated individuals.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.individuals.iter().filter_map(Individual::fitness))
    }

    fn is_sorted(&self) -> bool {
        self.individuals
            .is_sorted_by(|a, b| a.score() >= b.score())
    }
}

/// Crossover operator used to produce a child from two parents.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr,
)]
pub enum Crossover {
    /// Per-gene coin flip between parents.
    #[default]
    Uniform,
    /// Prefix of one parent, suffix of the other.
    SinglePoint,
    /// BLX-α blend, using [`PopulationEvolver::blx_alpha`].
    BlxAlpha,
}

/// Controls how one generation produces the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top individuals copied unchanged (elitism)
    pub elite_count: usize,
    /// Number of distinct contestants per tournament
    pub tournament_size: usize,
    pub crossover: Crossover,
    /// Range expansion of [`Crossover::BlxAlpha`]
    pub blx_alpha: f32,
    /// Probability of mutating each gene
    pub mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation noise
    pub mutation_sigma: f32,
    /// Genes are kept within `[-weight_limit, weight_limit]`
    pub weight_limit: f32,
}

impl PopulationEvolver {
    /// Creates the next generation with the same size as `population`.
    ///
    /// # Panics
    ///
    /// Panics if `population` is not evaluated and sorted best first, as
    /// [`Population::evaluate_fitness`] leaves it.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let individuals = &population.individuals;
        assert!(population.is_sorted());

        let elite_count = self.elite_count.min(individuals.len());
        let mut next = Vec::with_capacity(individuals.len());
        next.extend(individuals[..elite_count].iter().cloned());

        while next.len() < individuals.len() {
            let p1 = tournament_select(individuals, self.tournament_size, rng);
            let p2 = tournament_select(individuals, self.tournament_size, rng);
            let mut child = match self.crossover {
                Crossover::Uniform => genome::uniform(&p1.genome, &p2.genome, rng),
                Crossover::SinglePoint => genome::single_point(&p1.genome, &p2.genome, rng),
                Crossover::BlxAlpha => genome::blx_alpha(
                    &p1.genome,
                    &p2.genome,
                    self.blx_alpha,
                    self.weight_limit,
                    rng,
                ),
            };
            genome::mutate(
                &mut child,
                self.mutation_sigma,
                self.weight_limit,
                self.mutation_rate,
                rng,
            );
            next.push(Individual::new(child));
        }

        Population { individuals: next }
    }
}

/// Picks the winner of a tournament among `tournament_size` distinct individuals.
///
/// `population` must be sorted best first, so the lowest sampled index wins.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Individual
where
    R: Rng + ?Sized,
{
    assert!(!population.is_empty() && tournament_size > 0);
    let amount = tournament_size.min(population.len());
    let winner = index::sample(rng, population.len(), amount)
        .into_iter()
        .min()
        .unwrap_or(0);
    &population[winner]
}
