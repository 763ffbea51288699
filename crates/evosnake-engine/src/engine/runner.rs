use std::{
    io,
    time::{Duration, Instant},
};

use tracing::debug;

use crate::{
    BoardFullError, RunError,
    core::{Direction, Snake},
};

use super::{
    driver::{Driver, MultiDriver},
    game::Game,
};

/// A direction requested by a human for the driver in slot `player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steering {
    pub player: usize,
    pub direction: Direction,
}

/// Result of one input poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polled {
    pub keep_running: bool,
    pub steering: Option<Steering>,
}

impl Polled {
    pub const IDLE: Self = Self {
        keep_running: true,
        steering: None,
    };

    pub const QUIT: Self = Self {
        keep_running: false,
        steering: None,
    };
}

/// Rendering and input boundary of [`Game::run`].
pub trait Frontend {
    fn draw(&mut self, game: &Game) -> io::Result<()>;

    /// Waits at most `timeout` for one input event.
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Polled>;
}

/// Frontend that draws nothing and never stops the loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Frontend for Headless {
    fn draw(&mut self, _game: &Game) -> io::Result<()> {
        Ok(())
    }

    fn poll_input(&mut self, _timeout: Duration) -> io::Result<Polled> {
        Ok(Polled::IDLE)
    }
}

/// How a [`Game::run`] loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rounds played.
    pub rounds: usize,
    /// Whether the frontend stopped the loop before the round budget ran out.
    pub interrupted: bool,
}

impl Game {
    /// Asks `drivers[i]` for the direction of snake `i`.
    ///
    /// Snakes beyond the number of drivers get no entry and keep their heading.
    pub fn get_directions(&self, drivers: &mut [&mut dyn Driver]) -> Vec<Direction> {
        drivers
            .iter_mut()
            .zip(self.snakes())
            .map(|(driver, snake)| driver.get_direction(snake, self))
            .collect()
    }

    /// Plays rounds until `rounds` are done (forever for `None`) or the
    /// frontend asks to stop.
    ///
    /// With a `frame_rate`, an update happens only once `1 / frame_rate`
    /// seconds have passed since the previous one, while input is polled
    /// continuously in between. Without one, or with a rate that is not a
    /// positive finite number, rounds run back to back.
    pub fn run<F>(
        &mut self,
        rounds: Option<usize>,
        frame_rate: Option<f64>,
        frontend: &mut F,
        drivers: &mut [&mut dyn Driver],
    ) -> Result<RunSummary, RunError>
    where
        F: Frontend + ?Sized,
    {
        let frame = frame_rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .map(|rate| Duration::from_secs_f64(1.0 / rate));
        frontend.draw(self).map_err(RunError::Frontend)?;

        let mut played = 0;
        let mut last_update = Instant::now();
        loop {
            if rounds.is_some_and(|limit| played >= limit) {
                return Ok(RunSummary {
                    rounds: played,
                    interrupted: false,
                });
            }

            if frame.is_none_or(|frame| last_update.elapsed() >= frame) {
                let directions = self.get_directions(drivers);
                self.update(&directions).map_err(RunError::BoardFull)?;
                frontend.draw(self).map_err(RunError::Frontend)?;
                last_update = Instant::now();
                played += 1;
            }

            let timeout = frame.map_or(Duration::ZERO, |frame| {
                frame.saturating_sub(last_update.elapsed())
            });
            let polled = frontend.poll_input(timeout).map_err(RunError::Frontend)?;
            if let Some(steering) = polled.steering
                && let Some(driver) = drivers.get_mut(steering.player)
            {
                driver.handle_input(steering.direction);
            }
            if !polled.keep_running {
                debug!(rounds = played, "run interrupted by frontend");
                return Ok(RunSummary {
                    rounds: played,
                    interrupted: true,
                });
            }
        }
    }
}

/// Plays one lockstep round in every game.
///
/// `drivers[i]` controls snake slot `i` of every game and sees the cross-section
/// of that slot across all games. A direction missing from a driver's answer
/// leaves that snake on its heading. Returns the result of each game's update.
///
/// # Panics
///
/// Panics if a game has fewer snakes than there are drivers.
pub fn step_multi(
    games: &mut [Game],
    drivers: &mut [&mut dyn MultiDriver],
) -> Vec<Result<(), BoardFullError>> {
    let per_driver = drivers
        .iter_mut()
        .enumerate()
        .map(|(slot, driver)| {
            let snakes = games
                .iter()
                .map(|game| &game.snakes()[slot])
                .collect::<Vec<&Snake>>();
            driver.get_directions(&snakes, games)
        })
        .collect::<Vec<_>>();

    games
        .iter_mut()
        .enumerate()
        .map(|(j, game)| {
            let directions = per_driver
                .iter()
                .enumerate()
                .map(|(slot, dirs)| {
                    dirs.get(j)
                        .copied()
                        .unwrap_or_else(|| game.snakes()[slot].direction())
                })
                .collect::<Vec<_>>();
            game.update(&directions)
        })
        .collect()
}

/// Plays `rounds` lockstep rounds, stopping at the first game that stalls.
///
/// # Panics
///
/// Panics if a game has fewer snakes than there are drivers.
pub fn run_multi(
    games: &mut [Game],
    rounds: usize,
    drivers: &mut [&mut dyn MultiDriver],
) -> Result<(), BoardFullError> {
    for _ in 0..rounds {
        for result in step_multi(games, drivers) {
            result?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, GameSeed, Position, ScriptedDriver, StraightDriver};

    fn open_config() -> GameConfig {
        GameConfig {
            width: 30,
            height: 30,
            init_snake_size: 2,
            num_snakes: 0,
            num_foods: 0,
        }
    }

    fn game_with_snake(seed: u64) -> Game {
        let mut game = Game::empty(&open_config(), GameSeed::from_u64(seed)).unwrap();
        game.place_snake(&[Position::new(2, 15), Position::new(1, 15)], Direction::Right)
            .unwrap();
        game
    }

    /// Counts draws and quits after a fixed number of polls.
    #[derive(Debug, Default)]
    struct CountingFrontend {
        draws: usize,
        polls: usize,
        quit_after: usize,
        steering: Option<Steering>,
    }

    impl Frontend for CountingFrontend {
        fn draw(&mut self, _game: &Game) -> io::Result<()> {
            self.draws += 1;
            Ok(())
        }

        fn poll_input(&mut self, _timeout: Duration) -> io::Result<Polled> {
            self.polls += 1;
            Ok(Polled {
                keep_running: self.polls < self.quit_after,
                steering: self.steering.take(),
            })
        }
    }

    #[test]
    fn test_bounded_run() {
        let mut game = game_with_snake(1);
        let mut driver = StraightDriver;
        let summary = game
            .run(Some(5), None, &mut Headless, &mut [&mut driver])
            .unwrap();
        assert_eq!(
            summary,
            RunSummary {
                rounds: 5,
                interrupted: false
            }
        );
        assert_eq!(game.round(), 5);
        assert_eq!(game.snakes()[0].head(), Some(Position::new(7, 15)));
    }

    #[test]
    fn test_frontend_can_interrupt() {
        let mut game = game_with_snake(1);
        let mut frontend = CountingFrontend {
            quit_after: 3,
            ..Default::default()
        };
        let summary = game
            .run(None, None, &mut frontend, &mut [&mut StraightDriver])
            .unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.rounds, 3);
        // initial frame plus one per round
        assert_eq!(frontend.draws, 4);
    }

    #[test]
    fn test_steering_reaches_driver() {
        let mut game = game_with_snake(1);
        let mut frontend = CountingFrontend {
            quit_after: 3,
            steering: Some(Steering {
                player: 0,
                direction: Direction::Down,
            }),
            ..Default::default()
        };
        let mut driver = ScriptedDriver::default();
        game.run(None, None, &mut frontend, &mut [&mut driver])
            .unwrap();
        // round 1 straight, rounds 2 and 3 after steering down
        assert_eq!(game.snakes()[0].head(), Some(Position::new(3, 17)));
    }

    #[test]
    fn test_frame_rate_gates_updates() {
        let mut game = game_with_snake(1);
        let summary = game
            .run(Some(3), Some(500.0), &mut Headless, &mut [&mut StraightDriver])
            .unwrap();
        assert_eq!(summary.rounds, 3);
        assert_eq!(game.round(), 3);
    }

    /// Turns every snake up and records the cross-section it saw.
    #[derive(Debug, Default)]
    struct UpDriver {
        seen: Vec<Vec<Option<Position>>>,
    }

    impl MultiDriver for UpDriver {
        fn get_directions(&mut self, snakes: &[&Snake], games: &[Game]) -> Vec<Direction> {
            assert_eq!(snakes.len(), games.len());
            self.seen.push(snakes.iter().map(|s| s.head()).collect());
            vec![Direction::Up; snakes.len()]
        }
    }

    #[test]
    fn test_step_multi_uses_cross_section() {
        let mut games = (0..3).map(game_with_snake).collect::<Vec<_>>();
        for game in &mut games {
            game.place_snake(&[Position::new(20, 20), Position::new(20, 21)], Direction::Up)
                .unwrap();
        }
        let mut first = StraightDriver;
        let mut second = UpDriver::default();
        let results = step_multi(&mut games, &mut [&mut first, &mut second]);
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(second.seen, vec![vec![Some(Position::new(20, 20)); 3]]);
        for game in &games {
            assert_eq!(game.snakes()[0].head(), Some(Position::new(3, 15)));
            assert_eq!(game.snakes()[1].head(), Some(Position::new(20, 19)));
        }
    }

    #[test]
    fn test_run_multi_matches_single_runs() {
        let mut games = (0..2).map(game_with_snake).collect::<Vec<_>>();
        run_multi(&mut games, 4, &mut [&mut StraightDriver]).unwrap();

        let mut single = game_with_snake(0);
        single
            .run(Some(4), None, &mut Headless, &mut [&mut StraightDriver])
            .unwrap();
        assert_eq!(games[0].board(), single.board());
        assert_eq!(games[0].snakes(), single.snakes());
    }
}
