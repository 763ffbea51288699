//! Generation loop driving a [`Population`] toward higher fitness.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    TrainingError,
    genetic::{Crossover, FitnessFunction, Individual, Population, PopulationEvolver},
    stats::FitnessStats,
};

/// Parameters of a training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingParams {
    pub population_size: usize,
    pub generations: usize,
    pub elite_count: usize,
    pub tournament_size: usize,
    pub crossover: Crossover,
    pub blx_alpha: f32,
    pub mutation_rate: f32,
    pub mutation_sigma: f32,
    pub weight_limit: f32,
    /// Initial genes are uniform in `[-init_range, init_range]`.
    pub init_range: f32,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 100,
            elite_count: 5,
            tournament_size: 3,
            crossover: Crossover::Uniform,
            blx_alpha: 0.5,
            mutation_rate: 0.05,
            mutation_sigma: 0.3,
            weight_limit: 5.0,
            init_range: 1.0,
        }
    }
}

impl TrainingParams {
    /// Rejects parameters that cannot run, before any generation starts.
    pub fn validate(&self, genome_len: usize) -> Result<(), TrainingError> {
        if self.population_size == 0 {
            return Err(TrainingError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(TrainingError::NoGenerations);
        }
        if genome_len == 0 {
            return Err(TrainingError::EmptyGenome);
        }
        if self.elite_count > self.population_size {
            return Err(TrainingError::TooManyElites {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(TrainingError::EmptyTournament);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TrainingError::InvalidMutationRate {
                rate: self.mutation_rate,
            });
        }
        let finite_non_negative = |value: f32| value.is_finite() && value >= 0.0;
        if !finite_non_negative(self.mutation_sigma) {
            return Err(TrainingError::InvalidParameter {
                name: "mutation sigma",
                value: self.mutation_sigma,
            });
        }
        if !finite_non_negative(self.blx_alpha) {
            return Err(TrainingError::InvalidParameter {
                name: "BLX alpha",
                value: self.blx_alpha,
            });
        }
        if !(self.weight_limit.is_finite() && self.weight_limit > 0.0) {
            return Err(TrainingError::InvalidParameter {
                name: "weight limit",
                value: self.weight_limit,
            });
        }
        if !finite_non_negative(self.init_range) {
            return Err(TrainingError::InvalidParameter {
                name: "initial range",
                value: self.init_range,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn evolver(&self) -> PopulationEvolver {
        PopulationEvolver {
            elite_count: self.elite_count,
            tournament_size: self.tournament_size,
            crossover: self.crossover,
            blx_alpha: self.blx_alpha,
            mutation_rate: self.mutation_rate,
            mutation_sigma: self.mutation_sigma,
            weight_limit: self.weight_limit,
        }
    }
}

/// Fitness summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub stats: FitnessStats,
    /// Best fitness in this generation.
    pub best_fitness: f32,
    /// Best fitness seen in this or any earlier generation.
    pub best_ever_fitness: f32,
}

/// Result of a finished training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    best: Individual,
    population: Population,
    history: Vec<GenerationReport>,
}

impl TrainingOutcome {
    /// The fittest individual ever observed, earliest on ties.
    ///
    /// With at least one elite this is also the best of the final population.
    #[must_use]
    pub fn best(&self) -> &Individual {
        &self.best
    }

    #[must_use]
    pub fn into_best(self) -> Individual {
        self.best
    }

    /// The last generation, evaluated and sorted best first.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn history(&self) -> &[GenerationReport] {
        &self.history
    }
}

/// Runs the genetic algorithm against a fitness function.
#[derive(Debug)]
pub struct Trainer<'a, F: ?Sized> {
    params: TrainingParams,
    genome_len: usize,
    fitness: &'a F,
}

impl<'a, F> Trainer<'a, F>
where
    F: FitnessFunction + ?Sized,
{
    pub fn new(
        params: TrainingParams,
        genome_len: usize,
        fitness: &'a F,
    ) -> Result<Self, TrainingError> {
        params.validate(genome_len)?;
        Ok(Self {
            params,
            genome_len,
            fitness,
        })
    }

    /// Evolves a random population for the configured number of generations.
    ///
    /// `on_generation` sees every report right after it is logged.
    pub fn run<R, C>(&self, rng: &mut R, mut on_generation: C) -> TrainingOutcome
    where
        R: Rng + ?Sized,
        C: FnMut(&GenerationReport),
    {
        let params = &self.params;
        let evolver = params.evolver();
        let mut population = Population::random(
            params.population_size,
            self.genome_len,
            params.init_range,
            rng,
        );
        let mut best: Option<Individual> = None;
        let mut history = Vec::with_capacity(params.generations);

        for generation in 0..params.generations {
            population.evaluate_fitness(self.fitness, rng);

            let generation_best = population.individuals()[0].clone();
            let best_fitness = generation_best.fitness().unwrap_or(f32::NEG_INFINITY);
            if best
                .as_ref()
                .is_none_or(|b| best_fitness > b.fitness().unwrap_or(f32::NEG_INFINITY))
            {
                best = Some(generation_best);
            }
            let best_ever_fitness = best
                .as_ref()
                .and_then(Individual::fitness)
                .unwrap_or(best_fitness);
            let stats = population.fitness_stats().unwrap_or(FitnessStats {
                min: best_fitness,
                max: best_fitness,
                mean: best_fitness,
                std_dev: 0.0,
            });

            let report = GenerationReport {
                generation,
                stats,
                best_fitness,
                best_ever_fitness,
            };
            info!(
                generation,
                min = stats.min,
                mean = stats.mean,
                max = stats.max,
                std_dev = stats.std_dev,
                best_ever = best_ever_fitness,
                "generation evaluated"
            );
            on_generation(&report);
            history.push(report);

            if generation + 1 < params.generations {
                population = evolver.evolve(&population, rng);
            }
        }

        let best = best.unwrap_or_else(|| population.individuals()[0].clone());
        TrainingOutcome {
            best,
            population,
            history,
        }
    }
}
