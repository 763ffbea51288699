use std::path::PathBuf;

use anyhow::{Context as _, bail};
use evosnake_engine::{
    Direction, Driver, Game, GameSeed, Headless, RunError, RunSummary, Snake, StraightDriver,
};
use evosnake_evaluator::{model::Model, nn_driver::NnDriver};
use rand::Rng as _;
use tracing::{info, warn};

use crate::{command::BoardArg, model::SnakeModel, ui::terminal::TerminalFrontend};

use self::keyboard_driver::KeyboardDriver;

mod keyboard_driver;

const DEFAULT_FRAME_RATE: f64 = 10.0;
const DEFAULT_HEADLESS_ROUNDS: usize = 1000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Path to the model file (JSON format); without one, snakes move straight
    pub(crate) model_path: Option<PathBuf>,
    #[clap(flatten)]
    pub(crate) options: PlayOptions,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayOptions {
    /// Steer the first snake with the keyboard
    #[arg(long)]
    pub(crate) human: bool,
    /// Number of snakes on the board
    #[arg(long, default_value_t = 1)]
    pub(crate) snakes: usize,
    /// Stop after this many rounds (unbounded in the terminal by default)
    #[arg(long)]
    pub(crate) rounds: Option<usize>,
    /// Rounds per second in the terminal
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, value_parser = parse_frame_rate)]
    pub(crate) frame_rate: f64,
    /// Play without drawing, as fast as possible
    #[arg(long)]
    pub(crate) headless: bool,
    /// Seed of the game (random by default)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    #[clap(flatten)]
    pub(crate) board: BoardArg,
}

fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let rate = s.parse::<f64>().map_err(|e| format!("{e}"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("frame rate must be a positive number, got {s}"))
    }
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            human: false,
            snakes: 1,
            rounds: None,
            frame_rate: DEFAULT_FRAME_RATE,
            headless: false,
            seed: None,
            board: BoardArg::default(),
        }
    }
}

/// Driver of one snake slot during play.
#[derive(Debug)]
enum PlayDriver<'a> {
    Keyboard(KeyboardDriver),
    Network(NnDriver<'a>),
    Straight(StraightDriver),
}

impl Driver for PlayDriver<'_> {
    fn get_direction(&mut self, snake: &Snake, game: &Game) -> Direction {
        match self {
            Self::Keyboard(driver) => driver.get_direction(snake, game),
            Self::Network(driver) => driver.get_direction(snake, game),
            Self::Straight(driver) => driver.get_direction(snake, game),
        }
    }

    fn handle_input(&mut self, direction: Direction) {
        match self {
            Self::Keyboard(driver) => driver.handle_input(direction),
            Self::Network(driver) => driver.handle_input(direction),
            Self::Straight(driver) => driver.handle_input(direction),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        model_path,
        options,
    } = arg;
    let model = model_path
        .as_deref()
        .map(SnakeModel::load)
        .transpose()?;
    if let Some(model) = &model {
        info!(
            name = %model.name,
            trained_at = %model.trained_at,
            seed = model.training.seed,
            final_fitness = model.training.final_fitness,
            "loaded model"
        );
    }
    play(model.as_ref(), options)
}

/// Plays one game with `model` driving every snake not steered by a human.
pub(crate) fn play(model: Option<&SnakeModel>, options: &PlayOptions) -> anyhow::Result<()> {
    if options.human && options.headless {
        bail!("--human needs the terminal; remove --headless");
    }
    if options.human && options.snakes == 0 {
        bail!("--human needs at least one snake");
    }

    let network = model
        .map(SnakeModel::to_model)
        .transpose()
        .context("Failed to restore the network from the model file")?;
    let nn_driver = network
        .as_ref()
        .map(NnDriver::new)
        .transpose()
        .context("The model cannot drive a snake")?;

    let config = options.board.game_config(options.snakes);
    let seed = options.seed.unwrap_or_else(|| rand::rng().random());
    let mut game =
        Game::new(&config, GameSeed::from_u64(seed)).context("Failed to set up the game")?;

    let mut drivers = (0..options.snakes)
        .map(|slot| match nn_driver {
            _ if options.human && slot == 0 => PlayDriver::Keyboard(KeyboardDriver::default()),
            Some(driver) => PlayDriver::Network(driver),
            None => PlayDriver::Straight(StraightDriver),
        })
        .collect::<Vec<_>>();
    let mut drivers = drivers
        .iter_mut()
        .map(|driver| driver as &mut dyn Driver)
        .collect::<Vec<_>>();

    info!(
        width = config.width,
        height = config.height,
        snakes = config.num_snakes,
        human = options.human,
        seed,
        "starting game"
    );
    let result = if options.headless {
        let rounds = options.rounds.unwrap_or(DEFAULT_HEADLESS_ROUNDS);
        game.run(Some(rounds), None, &mut Headless, &mut drivers)
    } else {
        let title = title(model, network.as_ref());
        ratatui::run(|terminal| {
            let mut frontend = TerminalFrontend::new(terminal, title, options.human);
            game.run(
                options.rounds,
                Some(options.frame_rate),
                &mut frontend,
                &mut drivers,
            )
        })
    };

    report(result, &game)
}

fn title(model: Option<&SnakeModel>, network: Option<&Model>) -> String {
    match (model, network) {
        (Some(model), Some(network)) => {
            format!(" {} {:?} ", model.name, network.config().layers())
        }
        _ => " EVOSNAKE ".to_owned(),
    }
}

fn report(result: Result<RunSummary, RunError>, game: &Game) -> anyhow::Result<()> {
    match result {
        Ok(summary) => {
            eprintln!(
                "Game {} after {} rounds",
                if summary.interrupted {
                    "stopped"
                } else {
                    "finished"
                },
                summary.rounds
            );
        }
        Err(RunError::BoardFull(e)) => {
            warn!(round = game.round(), "{e}");
            eprintln!("Game stalled after {} rounds: {e}", game.round());
        }
        Err(RunError::Frontend(e)) => {
            return Err(e).context("Terminal frontend failed");
        }
    }

    for (i, snake) in game.snakes().iter().enumerate() {
        let stats = snake.stats();
        eprintln!(
            "  Snake #{i}: food {}, deaths {}, longest {}, moves {}",
            stats.food_eaten(),
            stats.deaths(),
            stats.longest(),
            stats.moves()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use evosnake_evaluator::model::ModelConfig;

    use super::*;
    use crate::model::test_record;

    fn headless(snakes: usize, rounds: usize) -> PlayOptions {
        PlayOptions {
            snakes,
            rounds: Some(rounds),
            headless: true,
            seed: Some(9),
            ..PlayOptions::default()
        }
    }

    #[test]
    fn test_headless_play_with_model() {
        let config = ModelConfig::default();
        let network = Model::new(config.clone(), &vec![0.1; config.size()]).unwrap();
        let model = SnakeModel::new("flat".to_owned(), test_record(), &network);
        assert!(play(Some(&model), &headless(2, 30)).is_ok());
    }

    #[test]
    fn test_frame_rate_must_be_positive() {
        assert_eq!(parse_frame_rate("2.5"), Ok(2.5));
        assert!(parse_frame_rate("0").is_err());
        assert!(parse_frame_rate("-1").is_err());
        assert!(parse_frame_rate("inf").is_err());
        assert!(parse_frame_rate("NaN").is_err());
        assert!(parse_frame_rate("fast").is_err());
    }

    #[test]
    fn test_headless_play_without_model() {
        assert!(play(None, &headless(1, 10)).is_ok());
    }

    #[test]
    fn test_human_requires_terminal() {
        let options = PlayOptions {
            human: true,
            ..headless(1, 10)
        };
        assert!(play(None, &options).is_err());
    }

    #[test]
    fn test_rejects_model_with_wrong_topology() {
        let config = ModelConfig::new(vec![8, 3]).unwrap();
        let network = Model::new(config.clone(), &vec![0.0; config.size()]).unwrap();
        let model = SnakeModel::new("bad".to_owned(), test_record(), &network);
        assert!(play(Some(&model), &headless(1, 10)).is_err());
    }
}
