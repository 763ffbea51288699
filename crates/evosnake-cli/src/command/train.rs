use std::path::PathBuf;

use anyhow::Context as _;
use evosnake_evaluator::{
    model::{Model, ModelConfig},
    session_evaluator::SessionEvaluator,
};
use evosnake_training::{
    genetic::Crossover,
    nn_fitness::NnFitness,
    trainer::{Trainer, TrainingParams},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::info;

use crate::{
    command::{
        BoardArg,
        play::{self, PlayOptions},
    },
    model::{SnakeModel, TrainingRecord},
};

const GAMES_PER_INDIVIDUAL: usize = 5;
const ROUND_LIMIT: usize = 5000;

const POPULATION_COUNT: usize = 100;
const MAX_GENERATIONS: usize = 2000;
const ELITE_COUNT: usize = 5;
const TOURNAMENT_SIZE: usize = 3;

const MUTATION_RATE: f32 = 0.05;
const MUTATION_SIGMA: f32 = 0.3;
const BLX_ALPHA: f32 = 0.5;
const WEIGHT_LIMIT: f32 = 5.0;
const INIT_RANGE: f32 = 1.0;

const MODEL_NAME: &str = "evosnake";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Layer widths of the network, input first
    #[arg(long, value_delimiter = ',', default_values_t = [8, 16, 16, 4])]
    pub(crate) layers: Vec<usize>,
    /// Individuals per generation
    #[arg(long, default_value_t = POPULATION_COUNT)]
    population: usize,
    /// Number of generations to evolve
    #[arg(long, default_value_t = MAX_GENERATIONS)]
    generations: usize,
    /// Best individuals copied unchanged into the next generation
    #[arg(long, default_value_t = ELITE_COUNT)]
    elites: usize,
    /// Contestants per parent selection
    #[arg(long, default_value_t = TOURNAMENT_SIZE)]
    tournament_size: usize,
    /// Crossover operator (uniform, single-point, blx-alpha)
    #[arg(long, default_value = "uniform", value_parser = parse_crossover)]
    crossover: Crossover,
    /// Range expansion of BLX-α crossover
    #[arg(long, default_value_t = BLX_ALPHA)]
    blx_alpha: f32,
    /// Probability that a gene is mutated
    #[arg(long, default_value_t = MUTATION_RATE)]
    mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation
    #[arg(long, default_value_t = MUTATION_SIGMA)]
    mutation_sigma: f32,
    /// Bound on the magnitude of every weight
    #[arg(long, default_value_t = WEIGHT_LIMIT)]
    weight_limit: f32,
    /// Initial weights are uniform in [-init-range, init-range]
    #[arg(long, default_value_t = INIT_RANGE)]
    init_range: f32,
    /// Games played per fitness evaluation
    #[arg(long, default_value_t = GAMES_PER_INDIVIDUAL)]
    games: usize,
    /// Round limit of every evaluation game
    #[arg(long, default_value_t = ROUND_LIMIT)]
    rounds: usize,
    /// Deaths that end a snake's evaluation
    #[arg(long, default_value_t = 1)]
    lives: usize,
    /// Rounds without food that end a snake's evaluation
    #[arg(long)]
    hunger_limit: Option<usize>,
    /// Snakes per evaluation game, all driven by the same network
    #[arg(long, default_value_t = 1)]
    snakes: usize,
    #[clap(flatten)]
    board: BoardArg,
    /// Seed of the training run (random by default)
    #[arg(long)]
    seed: Option<u64>,
    /// Worker threads for fitness evaluation (all cores by default)
    #[arg(long)]
    threads: Option<usize>,
    /// Name stored in the model file
    #[arg(long, default_value = MODEL_NAME)]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Watch the best network play once training is done
    #[arg(long)]
    replay: bool,
}

/// Accepts variant names in any case, with or without separators.
fn parse_crossover(s: &str) -> Result<Crossover, String> {
    s.replace(['-', '_'], "")
        .parse()
        .map_err(|_| format!("unknown crossover: {s}"))
}

impl TrainArg {
    pub(crate) fn training_params(&self) -> TrainingParams {
        TrainingParams {
            population_size: self.population,
            generations: self.generations,
            elite_count: self.elites,
            tournament_size: self.tournament_size,
            crossover: self.crossover,
            blx_alpha: self.blx_alpha,
            mutation_rate: self.mutation_rate,
            mutation_sigma: self.mutation_sigma,
            weight_limit: self.weight_limit,
            init_range: self.init_range,
        }
    }

    fn session_evaluator(&self) -> anyhow::Result<SessionEvaluator> {
        let evaluator = SessionEvaluator::new(
            self.board.game_config(self.snakes),
            self.games,
            self.rounds,
        )
        .context("Invalid game configuration")?
        .with_lives(self.lives)
        .context("Invalid number of lives")?
        .with_hunger_limit(self.hunger_limit);
        Ok(evaluator)
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    if let Some(threads) = arg.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    let config = ModelConfig::new(arg.layers.clone()).context("Invalid network topology")?;
    let fitness = NnFitness::new(config.clone(), arg.session_evaluator()?)
        .context("The network cannot drive a snake")?;
    let trainer = Trainer::new(arg.training_params(), fitness.genome_len(), &fitness)
        .context("Invalid training parameters")?;

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    info!(
        seed,
        layers = ?config.layers(),
        genome_len = fitness.genome_len(),
        population = arg.population,
        generations = arg.generations,
        threads = rayon::current_num_threads(),
        "training started"
    );
    let outcome = trainer.run(&mut rng, |_| {});

    eprintln!("Best Individuals:");
    for (i, ind) in outcome.population().individuals().iter().take(5).enumerate() {
        eprintln!("  {i:2}: {:.3?}", ind.fitness());
    }

    let training = TrainingRecord {
        seed,
        generations: arg.generations,
        final_fitness: outcome.best().fitness().unwrap_or(f32::NEG_INFINITY),
        board: arg.board.game_config(arg.snakes),
        last_generation: outcome.history().last().copied(),
    };
    let genome = outcome.into_best().into_genome();
    let network = Model::new(config, &genome).context("Best genome does not fit")?;
    let model = SnakeModel::new(arg.name.clone(), training, &network);
    model.save(arg.output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Seed: {}", model.training.seed);
    eprintln!("  Final fitness: {:.3}", model.training.final_fitness);
    eprintln!("  Layers: {:?}", model.config.layers());

    if arg.replay {
        let options = PlayOptions {
            snakes: arg.snakes,
            board: arg.board.clone(),
            ..PlayOptions::default()
        };
        play::play(Some(&model), &options)?;
    }

    Ok(())
}
