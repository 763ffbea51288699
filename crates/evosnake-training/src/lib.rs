//! Training system evolving snake-playing networks with a genetic algorithm.
//!
//! # How Training Works
//!
//! 1. **Population** - Create individuals with random genomes
//! 2. **Evaluation** - Each individual's genome becomes a network that plays
//!    a batch of seeded games ([`NnFitness`](nn_fitness::NnFitness))
//! 3. **Fitness** - The session outcomes are reduced to one score
//! 4. **Selection** - Elites survive, tournaments pick parents
//! 5. **Reproduction** - Crossover and mutation fill the next generation
//! 6. **Repeat** - For a fixed number of generations ([`Trainer`](trainer::Trainer))
//!
//! # Architecture
//!
//! ```text
//! Trainer (generation loop, reports)
//!     ↓ drives
//! Genetic Algorithm (population, selection, crossover, mutation)
//!     ↓ scores genomes with
//! FitnessFunction ← NnFitness (evosnake-evaluator session evaluation)
//! ```
//!
//! The genetic algorithm only knows genomes and scores. Any closure
//! `Fn(&[f32], &mut Pcg32) -> f32` is a [`FitnessFunction`](genetic::FitnessFunction),
//! which keeps the algorithm testable without playing games.
//!
//! # Parameters
//!
//! - **Population size** - Individuals per generation
//! - **Elite count** - Top individuals copied unchanged; at least one makes the
//!   best fitness non-decreasing across generations
//! - **Tournament size** - Contestants per parent selection
//! - **Crossover** - Uniform, single-point or BLX-α
//! - **Mutation rate / sigma** - Per-gene probability and strength of Gaussian noise
//! - **Weight limit** - Bound on every gene's magnitude
//!
//! See [`trainer::TrainingParams`] for defaults.

pub mod genetic;
pub mod genome;
pub mod nn_fitness;
pub mod stats;
pub mod trainer;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("at least one generation is required")]
    NoGenerations,
    #[display("genome must have at least one gene")]
    EmptyGenome,
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    TooManyElites {
        elite_count: usize,
        population_size: usize,
    },
    #[display("tournament size must be at least 1")]
    EmptyTournament,
    #[display("mutation rate {rate} is not a probability")]
    InvalidMutationRate { rate: f32 },
    #[display("{name} must be finite and non-negative, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}
