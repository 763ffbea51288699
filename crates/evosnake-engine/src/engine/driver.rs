use crate::core::{Direction, Snake};

use super::game::Game;

/// Policy controlling one snake slot of a single game.
pub trait Driver {
    /// Chooses the heading for `snake`'s next move.
    ///
    /// `snake` may be dead with an empty body when the board had no room to
    /// respawn it.
    fn get_direction(&mut self, snake: &Snake, game: &Game) -> Direction;

    /// Receives a steering event from the frontend. Ignored by default.
    fn handle_input(&mut self, _direction: Direction) {}
}

/// Policy controlling the same snake slot across many games at once.
///
/// `snakes[j]` is the controlled snake of `games[j]`; the result holds one
/// direction per game in the same order.
pub trait MultiDriver {
    fn get_directions(&mut self, snakes: &[&Snake], games: &[Game]) -> Vec<Direction>;
}

/// Keeps the current heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightDriver;

impl Driver for StraightDriver {
    fn get_direction(&mut self, snake: &Snake, _game: &Game) -> Direction {
        snake.direction()
    }
}

impl MultiDriver for StraightDriver {
    fn get_directions(&mut self, snakes: &[&Snake], _games: &[Game]) -> Vec<Direction> {
        snakes.iter().map(|snake| snake.direction()).collect()
    }
}

/// Replays a fixed list of directions, then keeps the current heading.
///
/// Steering events replace the rest of the script with the steered direction.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    script: Vec<Direction>,
    next: usize,
}

impl ScriptedDriver {
    #[must_use]
    pub fn new(script: Vec<Direction>) -> Self {
        Self { script, next: 0 }
    }

    /// Number of scripted directions not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len() - self.next
    }
}

impl Driver for ScriptedDriver {
    fn get_direction(&mut self, snake: &Snake, _game: &Game) -> Direction {
        match self.script.get(self.next) {
            Some(direction) => {
                self.next += 1;
                *direction
            }
            None => snake.direction(),
        }
    }

    fn handle_input(&mut self, direction: Direction) {
        self.script.truncate(self.next);
        self.script.push(direction);
    }
}
