use evosnake_engine::{Direction, Driver, Game, Snake};

/// Driver following the last steering key pressed since the previous round.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeyboardDriver {
    pending: Option<Direction>,
}

impl Driver for KeyboardDriver {
    fn get_direction(&mut self, snake: &Snake, _game: &Game) -> Direction {
        self.pending.take().unwrap_or(snake.direction())
    }

    fn handle_input(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }
}
