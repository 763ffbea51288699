use clap::{Parser, Subcommand};
use evosnake_engine::GameConfig;

use self::{
    play::{PlayArg, PlayOptions},
    train::TrainArg,
};

mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a snake-playing network with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Watch a saved network play, or steer a snake yourself
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| {
        Mode::Play(PlayArg {
            model_path: None,
            options: PlayOptions {
                human: true,
                ..PlayOptions::default()
            },
        })
    }) {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}

/// Board layout shared by training and play.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BoardArg {
    /// Board width in cells
    #[arg(long, default_value_t = 20)]
    width: usize,
    /// Board height in cells
    #[arg(long, default_value_t = 20)]
    height: usize,
    /// Body length of a freshly spawned snake
    #[arg(long, default_value_t = 3)]
    init_snake_size: usize,
    /// Number of food items on the board
    #[arg(long, default_value_t = 1)]
    foods: usize,
}

impl Default for BoardArg {
    fn default() -> Self {
        let config = GameConfig::default();
        Self {
            width: config.width,
            height: config.height,
            init_snake_size: config.init_snake_size,
            foods: config.num_foods,
        }
    }
}

impl BoardArg {
    pub(crate) fn game_config(&self, num_snakes: usize) -> GameConfig {
        GameConfig {
            width: self.width,
            height: self.height,
            init_snake_size: self.init_snake_size,
            num_snakes,
            num_foods: self.foods,
        }
    }
}
