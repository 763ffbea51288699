//! Session evaluation: turning a model into a fitness score.
//!
//! A session is a batch of independent games played in lockstep by the same
//! model. Each game starts from its own [`GameSeed`] drawn from the caller's
//! random source, so a session is reproducible given that source.
//!
//! # How It Works
//!
//! 1. **Set up** - Draw one seed per game and build the games
//! 2. **Play** - Step every game with [`step_multi`], one [`NnDriver`] per snake slot
//! 3. **Freeze outcomes** - Record a snake's [`GameOutcome`] once its run ends
//! 4. **Aggregate** - Reduce all outcomes with [`evaluate_multi_games`]
//!
//! A snake's run ends when it has died `lives` times, when it has gone
//! `hunger_limit` moves without eating, or when its game reports a full board.
//! Play stops once every run has ended or after `round_limit` rounds.
//!
//! # Fitness
//!
//! ```text
//! fitness = mean over outcomes of (food_eaten + rounds_survived / round_limit)
//! ```
//!
//! A meal is worth more than any amount of survival, so the survival term only
//! separates models that eat equally well. It still gives the very first
//! generations, which rarely find food, a gradient toward staying alive.
//!
//! A full board never raises an error here. The affected runs simply end with
//! the score they had, so one stalled game cannot abort a training run.
//!
//! # Usage
//!
//! ```
//! use evosnake_engine::GameConfig;
//! use evosnake_evaluator::{
//!     model::{Model, ModelConfig},
//!     session_evaluator::SessionEvaluator,
//! };
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let config = ModelConfig::default();
//! let model = Model::new(config.clone(), &vec![0.1; config.size()]).unwrap();
//! let evaluator = SessionEvaluator::new(GameConfig::default(), 3, 200)
//!     .unwrap()
//!     .with_hunger_limit(Some(100));
//!
//! let fitness = evaluator
//!     .evaluate(&model, &mut Pcg32::seed_from_u64(1))
//!     .unwrap();
//! assert!(fitness >= 0.0);
//! ```

use std::iter;

use evosnake_engine::{
    Game, GameConfig, GameSeed, MultiDriver, Snake, SnakeStats, step_multi,
};
use rand::Rng;
use tracing::debug;

use crate::{ModelError, SessionError, model::Model, nn_driver::NnDriver};

/// Result of one snake's run within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOutcome {
    pub food_eaten: usize,
    /// Successful moves made before the run ended.
    pub rounds_survived: usize,
    /// The run ended by using up all lives.
    pub died: bool,
    /// The run ended by hitting the hunger limit.
    pub starved: bool,
}

impl GameOutcome {
    fn from_stats(stats: &SnakeStats) -> Self {
        Self {
            food_eaten: stats.food_eaten(),
            rounds_survived: stats.moves(),
            died: false,
            starved: false,
        }
    }
}

/// Reduces outcomes to one fitness value; `0.0` when there are none.
///
/// # Example
///
/// ```
/// use evosnake_evaluator::session_evaluator::{GameOutcome, evaluate_multi_games};
///
/// let outcomes = [
///     GameOutcome { food_eaten: 2, rounds_survived: 50, ..Default::default() },
///     GameOutcome { food_eaten: 0, rounds_survived: 100, ..Default::default() },
/// ];
/// assert_eq!(evaluate_multi_games(&outcomes, 100), 1.75);
/// ```
#[must_use]
pub fn evaluate_multi_games(outcomes: &[GameOutcome], round_limit: usize) -> f32 {
    if outcomes.is_empty() {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let limit = round_limit.max(1) as f32;
    #[expect(clippy::cast_precision_loss)]
    let total = outcomes
        .iter()
        .map(|o| o.food_eaten as f32 + o.rounds_survived as f32 / limit)
        .sum::<f32>();
    #[expect(clippy::cast_precision_loss)]
    let count = outcomes.len() as f32;
    total / count
}

/// Plays batches of games with a model and scores them.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEvaluator {
    game_config: GameConfig,
    games: usize,
    round_limit: usize,
    lives: usize,
    hunger_limit: Option<usize>,
}

impl SessionEvaluator {
    /// Creates an evaluator playing `games` games of at most `round_limit`
    /// rounds, one life per snake and no hunger limit.
    pub fn new(
        game_config: GameConfig,
        games: usize,
        round_limit: usize,
    ) -> Result<Self, SessionError> {
        game_config.validate().map_err(SessionError::Game)?;
        Ok(Self {
            game_config,
            games,
            round_limit,
            lives: 1,
            hunger_limit: None,
        })
    }

    /// Sets the number of deaths that end a snake's run.
    pub fn with_lives(mut self, lives: usize) -> Result<Self, SessionError> {
        if lives == 0 {
            return Err(SessionError::ZeroLives);
        }
        self.lives = lives;
        Ok(self)
    }

    /// Sets the number of moves without food that end a snake's run.
    #[must_use]
    pub fn with_hunger_limit(mut self, hunger_limit: Option<usize>) -> Self {
        self.hunger_limit = hunger_limit;
        self
    }

    #[must_use]
    pub fn game_config(&self) -> &GameConfig {
        &self.game_config
    }

    #[must_use]
    pub fn games(&self) -> usize {
        self.games
    }

    #[must_use]
    pub fn round_limit(&self) -> usize {
        self.round_limit
    }

    #[must_use]
    pub fn lives(&self) -> usize {
        self.lives
    }

    #[must_use]
    pub fn hunger_limit(&self) -> Option<usize> {
        self.hunger_limit
    }

    /// Plays one session and returns an outcome per snake slot per game.
    ///
    /// Outcomes are ordered by game, then by slot. Games that could not be set
    /// up contribute empty outcomes after all the others.
    pub fn play_multi_games<R>(
        &self,
        model: &Model,
        rng: &mut R,
    ) -> Result<Vec<GameOutcome>, ModelError>
    where
        R: Rng + ?Sized,
    {
        let driver = NnDriver::new(model)?;
        let slots = self.game_config.num_snakes;

        let mut games = Vec::with_capacity(self.games);
        let mut unplayable = vec![];
        for _ in 0..self.games {
            let seed: GameSeed = rng.random();
            match Game::new(&self.game_config, seed) {
                Ok(game) => games.push(game),
                Err(e) => {
                    debug!(error = %e, "game could not be set up");
                    unplayable.extend(iter::repeat_n(GameOutcome::default(), slots));
                }
            }
        }

        let mut runs = vec![vec![None; slots]; games.len()];
        let mut nn_drivers = vec![driver; slots];
        let mut drivers = nn_drivers
            .iter_mut()
            .map(|d| d as &mut dyn MultiDriver)
            .collect::<Vec<_>>();
        for _ in 0..self.round_limit {
            if runs.iter().flatten().all(Option::is_some) {
                break;
            }
            let results = step_multi(&mut games, &mut drivers);
            for ((game, result), run) in games.iter().zip(results).zip(&mut runs) {
                for (snake, outcome) in game.snakes().iter().zip(run) {
                    if outcome.is_none() {
                        *outcome = self.finished_outcome(snake, result.is_err());
                    }
                }
            }
        }

        let mut outcomes = Vec::with_capacity(self.games * slots);
        for (game, run) in games.iter().zip(runs) {
            for (snake, outcome) in game.snakes().iter().zip(run) {
                outcomes.push(outcome.unwrap_or_else(|| GameOutcome::from_stats(snake.stats())));
            }
        }
        outcomes.append(&mut unplayable);
        Ok(outcomes)
    }

    /// Returns the outcome of `snake` if its run ends after this round.
    fn finished_outcome(&self, snake: &Snake, board_full: bool) -> Option<GameOutcome> {
        let stats = snake.stats();
        let died = stats.deaths() >= self.lives;
        let starved = !died
            && self
                .hunger_limit
                .is_some_and(|limit| stats.rounds_since_food() >= limit);
        (died || starved || board_full).then(|| GameOutcome {
            died,
            starved,
            ..GameOutcome::from_stats(stats)
        })
    }

    /// Plays one session and reduces it with [`evaluate_multi_games`].
    pub fn evaluate<R>(&self, model: &Model, rng: &mut R) -> Result<f32, ModelError>
    where
        R: Rng + ?Sized,
    {
        let outcomes = self.play_multi_games(model, rng)?;
        Ok(evaluate_multi_games(&outcomes, self.round_limit))
    }
}
