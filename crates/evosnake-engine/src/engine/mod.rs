//! Game simulation and the loops that drive it.
//!
//! - [`Game`] - One board with its snakes and foods, advanced by [`Game::update`]
//! - [`GameSeed`] - Seed of a game's private random source
//! - [`Driver`] / [`MultiDriver`] - Policies choosing snake directions
//! - [`Frontend`] - Rendering and input boundary of [`Game::run`]
//! - [`step_multi`] / [`run_multi`] - Lockstep play of many games
//!
//! # Round Resolution
//!
//! Each [`Game::update`] walks the snakes in slot order. A snake first applies
//! its requested direction, then either dies and respawns (wall, block or body),
//! eats and grows (food), or moves. Later snakes observe the effects of earlier
//! ones within the same round.
//!
//! # Example
//!
//! ```
//! use evosnake_engine::{Game, GameConfig, GameSeed, Headless, StraightDriver};
//!
//! let config = GameConfig {
//!     num_snakes: 2,
//!     ..GameConfig::default()
//! };
//! let mut game = Game::new(&config, GameSeed::from_u64(7)).unwrap();
//! let (mut a, mut b) = (StraightDriver, StraightDriver);
//! let summary = game
//!     .run(Some(50), None, &mut Headless, &mut [&mut a, &mut b])
//!     .unwrap();
//!
//! assert_eq!(summary.rounds, 50);
//! assert!(game.snakes().iter().all(|snake| snake.is_alive()));
//! ```

pub use self::{driver::*, game::*, game_seed::*, runner::*};

mod driver;
mod game;
mod game_seed;
mod runner;
