use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    BoardFullError, GameError,
    core::{Board, Cell, Collision, Direction, Element, ElementKind, Position, Snake, SnakeId},
};

use super::game_seed::GameSeed;

/// Fixed parameters of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Body length of every freshly spawned or respawned snake.
    pub init_snake_size: usize,
    pub num_snakes: usize,
    pub num_foods: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            init_snake_size: 3,
            num_snakes: 1,
            num_foods: 1,
        }
    }
}

impl GameConfig {
    /// Checks the parameters that make every game construction fail.
    pub fn validate(&self) -> Result<(), GameError> {
        let board = Board::new(self.width, self.height).map_err(GameError::Board)?;
        if self.init_snake_size == 0 {
            return Err(GameError::InvalidSnakeSize);
        }
        if self.init_snake_size > board.width().max(board.height()) {
            return Err(GameError::SnakeTooLong {
                size: self.init_snake_size,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// One snake game: a board, snakes in player-slot order and foods.
///
/// All randomness comes from a [`Pcg32`] seeded by the [`GameSeed`] given at
/// construction, so a game is a pure function of its seed and the directions
/// it is fed.
#[derive(Debug, Clone)]
pub struct Game {
    init_snake_size: usize,
    board: Board,
    snakes: Vec<Snake>,
    foods: Vec<Element>,
    rng: Pcg32,
    round: usize,
}

impl Game {
    /// Creates a game with `num_snakes` snakes and `num_foods` foods placed at random.
    pub fn new(config: &GameConfig, seed: GameSeed) -> Result<Self, GameError> {
        config.validate()?;
        let mut game = Self::empty(config, seed)?;
        for index in 0..config.num_snakes {
            let snake = game
                .board
                .new_snake(SnakeId::new(index), config.init_snake_size, &mut game.rng)
                .map_err(GameError::BoardFull)?;
            game.snakes.push(snake);
        }
        for index in 0..config.num_foods {
            let food = game
                .board
                .new_food(index, &mut game.rng)
                .map_err(GameError::BoardFull)?;
            game.foods.push(food);
        }
        Ok(game)
    }

    /// Creates a game with an empty board, ignoring `num_snakes` and `num_foods`.
    ///
    /// Entities are then added with [`Self::place_snake`], [`Self::place_food`]
    /// and [`Self::place_block`].
    pub fn empty(config: &GameConfig, seed: GameSeed) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            init_snake_size: config.init_snake_size,
            board: Board::new(config.width, config.height).map_err(GameError::Board)?,
            snakes: vec![],
            foods: vec![],
            rng: seed.rng(),
            round: 0,
        })
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Snakes in slot order; a snake's index equals its [`SnakeId::index`].
    #[must_use]
    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    #[must_use]
    pub fn foods(&self) -> &[Element] {
        &self.foods
    }

    #[must_use]
    pub const fn init_snake_size(&self) -> usize {
        self.init_snake_size
    }

    /// Number of completed [`Self::update`] calls.
    #[must_use]
    pub const fn round(&self) -> usize {
        self.round
    }

    fn check_free(&self, pos: Position) -> Result<(), GameError> {
        match self.board.get(pos) {
            None => Err(GameError::OutOfBounds { x: pos.x, y: pos.y }),
            Some(Cell::Empty) => Ok(()),
            Some(_) => Err(GameError::Occupied { x: pos.x, y: pos.y }),
        }
    }

    /// Adds a snake with an explicit body (head first) in the next slot.
    pub fn place_snake(
        &mut self,
        body: &[Position],
        direction: Direction,
    ) -> Result<SnakeId, GameError> {
        if body.is_empty() {
            return Err(GameError::InvalidBody);
        }
        for (i, pos) in body.iter().enumerate() {
            self.check_free(*pos)?;
            if body[..i].contains(pos) {
                return Err(GameError::InvalidBody);
            }
        }
        let adjacent = body.windows(2).all(|pair| {
            Direction::ALL
                .into_iter()
                .any(|d| pair[0].step(d) == Some(pair[1]))
        });
        if !adjacent {
            return Err(GameError::InvalidBody);
        }

        let id = SnakeId::new(self.snakes.len());
        for pos in body {
            self.board.set(*pos, Cell::Body(id));
        }
        self.snakes.push(Snake::new(id, body.to_vec(), direction));
        Ok(id)
    }

    /// Adds a food at `pos` and returns its index.
    pub fn place_food(&mut self, pos: Position) -> Result<usize, GameError> {
        self.check_free(pos)?;
        let index = self.foods.len();
        self.board.set(pos, Cell::Food(index));
        self.foods.push(Element::new(ElementKind::Food, pos));
        Ok(index)
    }

    /// Adds a static obstacle at `pos`.
    pub fn place_block(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_free(pos)?;
        self.board.set(pos, Cell::Block);
        Ok(())
    }

    /// Executes one round.
    ///
    /// Snakes are resolved strictly in slot order: each one applies
    /// `directions[i]` (snakes without an entry keep their heading), then
    ///
    /// - dies and respawns with the initial size on a wall or block,
    /// - eats, moves and respawns the eaten food on food,
    /// - moves otherwise.
    ///
    /// A snake therefore sees the board as left by every lower-indexed snake in
    /// the same round. Respawn happens within the round, so no snake is ever
    /// left dead between rounds unless the board has no room for it. In that
    /// case the snake stays dead, its respawn is retried at its next turn, and
    /// this round returns [`BoardFullError`]. Foods that find no room stay
    /// unplaced and are retried at the start of the next round.
    pub fn update(&mut self, directions: &[Direction]) -> Result<(), BoardFullError> {
        self.place_missing_foods();

        let mut result = Ok(());
        for (i, snake) in self.snakes.iter_mut().enumerate() {
            if !snake.is_alive()
                && let Err(e) =
                    self.board
                        .respawn_snake(snake, self.init_snake_size, &mut self.rng)
            {
                result = Err(e);
                continue;
            }
            if let Some(direction) = directions.get(i) {
                snake.update_direction(*direction);
            }

            match snake.next_move_collide(&self.board) {
                None => snake.move_forward(&mut self.board),
                Some(Collision::Wall | Collision::Block) => {
                    snake.die(&mut self.board);
                    if let Err(e) =
                        self.board
                            .respawn_snake(snake, self.init_snake_size, &mut self.rng)
                    {
                        warn!(snake = %snake.id(), round = self.round, "no room to respawn snake");
                        result = Err(e);
                    }
                }
                Some(Collision::Food(index)) => {
                    let food = &mut self.foods[index];
                    snake.eat(&mut self.board, food);
                    snake.move_forward(&mut self.board);
                    if self
                        .board
                        .respawn_food(food, index, &mut self.rng)
                        .is_err()
                    {
                        debug!(food = index, round = self.round, "no room to respawn food");
                    }
                }
            }
        }
        self.round += 1;
        result
    }

    fn place_missing_foods(&mut self) {
        for (index, food) in self.foods.iter_mut().enumerate() {
            if !food.is_placed() && self.board.respawn_food(food, index, &mut self.rng).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: usize, height: usize) -> GameConfig {
        GameConfig {
            width,
            height,
            init_snake_size: 3,
            num_snakes: 0,
            num_foods: 0,
        }
    }

    fn seed() -> GameSeed {
        GameSeed::from_u64(1234)
    }

    fn line(head: (usize, usize), len: usize, toward: Direction) -> Vec<Position> {
        let mut body = vec![Position::new(head.0, head.1)];
        while body.len() < len {
            let last = *body.last().unwrap();
            body.push(last.step(toward.opposite()).unwrap());
        }
        body
    }

    fn assert_board_consistent(game: &Game) {
        let board = game.board();
        let mut body_cells = 0;
        for snake in game.snakes() {
            assert!(snake.is_alive(), "{} left dead between rounds", snake.id());
            for pos in snake.body() {
                assert!(board.contains(*pos));
                assert_eq!(board.get(*pos), Some(Cell::Body(snake.id())));
                body_cells += 1;
            }
        }
        for (index, food) in game.foods().iter().enumerate() {
            if let Some(pos) = food.position() {
                assert_eq!(board.get(pos), Some(Cell::Food(index)));
            }
        }
        let marked = board
            .positions()
            .filter(|p| board.get(*p).is_some_and(|c| c.is_body()))
            .count();
        assert_eq!(marked, body_cells);
    }

    #[test]
    fn test_config_validation() {
        assert!(GameConfig::default().validate().is_ok());
        assert!(matches!(
            config(0, 5).validate(),
            Err(GameError::Board(_))
        ));
        let mut c = config(5, 5);
        c.init_snake_size = 0;
        assert!(matches!(c.validate(), Err(GameError::InvalidSnakeSize)));
        c.init_snake_size = 6;
        assert!(matches!(c.validate(), Err(GameError::SnakeTooLong { .. })));
    }

    #[test]
    fn test_new_places_entities() {
        let config = GameConfig {
            num_snakes: 3,
            num_foods: 2,
            ..config(12, 12)
        };
        let game = Game::new(&config, seed()).unwrap();
        assert_eq!(game.snakes().len(), 3);
        assert_eq!(game.foods().len(), 2);
        for (i, snake) in game.snakes().iter().enumerate() {
            assert_eq!(snake.id().index(), i);
            assert_eq!(snake.len(), 3);
        }
        assert!(game.foods().iter().all(Element::is_placed));
        assert_board_consistent(&game);
    }

    #[test]
    fn test_new_fails_when_board_too_small() {
        let config = GameConfig {
            num_snakes: 4,
            ..config(3, 3)
        };
        assert!(matches!(
            Game::new(&config, seed()),
            Err(GameError::BoardFull(_))
        ));
    }

    #[test]
    fn test_place_snake_rejects_invalid_bodies() {
        let mut game = Game::empty(&config(6, 6), seed()).unwrap();
        assert!(matches!(
            game.place_snake(&[], Direction::Up),
            Err(GameError::InvalidBody)
        ));
        assert!(matches!(
            game.place_snake(&[Position::new(0, 0), Position::new(2, 0)], Direction::Left),
            Err(GameError::InvalidBody)
        ));
        assert!(matches!(
            game.place_snake(&[Position::new(6, 0)], Direction::Left),
            Err(GameError::OutOfBounds { x: 6, y: 0 })
        ));
        game.place_block(Position::new(1, 1)).unwrap();
        assert!(matches!(
            game.place_snake(&[Position::new(1, 1)], Direction::Left),
            Err(GameError::Occupied { x: 1, y: 1 })
        ));
        assert!(game.snakes().is_empty());
    }

    #[test]
    fn test_straight_moves_keep_length() {
        let mut game = Game::empty(&config(10, 10), seed()).unwrap();
        game.place_snake(&line((4, 5), 3, Direction::Right), Direction::Right)
            .unwrap();
        for _ in 0..3 {
            game.update(&[Direction::Right]).unwrap();
        }
        let snake = &game.snakes()[0];
        assert_eq!(snake.head(), Some(Position::new(7, 5)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.stats().moves(), 3);
        assert_eq!(snake.stats().deaths(), 0);
        assert_eq!(game.round(), 3);
        assert_board_consistent(&game);
    }

    #[test]
    fn test_eating_grows_and_respawns_food() {
        let mut game = Game::empty(&config(10, 10), seed()).unwrap();
        game.place_snake(&line((4, 5), 3, Direction::Right), Direction::Right)
            .unwrap();
        let food_pos = Position::new(5, 5);
        game.place_food(food_pos).unwrap();

        game.update(&[Direction::Right]).unwrap();

        let snake = &game.snakes()[0];
        assert_eq!(snake.head(), Some(food_pos));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.stats().food_eaten(), 1);
        let new_food = game.foods()[0].position().unwrap();
        assert_ne!(new_food, food_pos);
        assert!(!snake.body().any(|p| *p == new_food));
        assert_board_consistent(&game);
    }

    #[test]
    fn test_wall_collision_respawns_within_round() {
        let mut game = Game::empty(&config(10, 10), seed()).unwrap();
        game.place_snake(&line((9, 2), 3, Direction::Right), Direction::Right)
            .unwrap();
        game.update(&[Direction::Right]).unwrap();

        let snake = &game.snakes()[0];
        assert!(snake.is_alive());
        assert_eq!(snake.len(), game.init_snake_size());
        assert_eq!(snake.stats().deaths(), 1);
        assert_eq!(snake.stats().moves(), 0);
        assert_board_consistent(&game);
    }

    #[test]
    fn test_reversal_onto_neck_keeps_moving_forward() {
        let mut game = Game::empty(&config(10, 10), seed()).unwrap();
        game.place_snake(&line((4, 5), 3, Direction::Right), Direction::Right)
            .unwrap();
        game.update(&[Direction::Left]).unwrap();

        let snake = &game.snakes()[0];
        assert!(snake.is_alive());
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.head(), Some(Position::new(5, 5)));
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.stats().deaths(), 0);
        assert_board_consistent(&game);
    }

    #[test]
    fn test_missing_directions_keep_heading() {
        let mut game = Game::empty(&config(10, 10), seed()).unwrap();
        game.place_snake(&line((2, 2), 2, Direction::Right), Direction::Right)
            .unwrap();
        game.place_snake(&line((2, 7), 2, Direction::Right), Direction::Right)
            .unwrap();
        game.update(&[Direction::Down]).unwrap();
        assert_eq!(game.snakes()[0].head(), Some(Position::new(2, 3)));
        assert_eq!(game.snakes()[1].head(), Some(Position::new(3, 7)));
        game.update(&[]).unwrap();
        assert_eq!(game.snakes()[0].head(), Some(Position::new(2, 4)));
        assert_eq!(game.snakes()[1].head(), Some(Position::new(4, 7)));
    }

    #[test]
    fn test_slot_order_resolution() {
        // Snake 1 enters the cell that snake 0's tail vacated earlier in the round.
        let mut game = Game::empty(&config(8, 8), seed()).unwrap();
        // snake 0: head (3,3) moving down, tail at (3,2)
        game.place_snake(&[Position::new(3, 3), Position::new(3, 2)], Direction::Down)
            .unwrap();
        // snake 1: head (2,2) moving right into (3,2)
        game.place_snake(&[Position::new(2, 2), Position::new(1, 2)], Direction::Right)
            .unwrap();
        game.update(&[]).unwrap();
        assert_eq!(game.snakes()[1].stats().deaths(), 0);
        assert_eq!(game.snakes()[1].head(), Some(Position::new(3, 2)));

        // Reversed slot order: snake 1 resolves first while the tail is still there.
        let mut game = Game::empty(&config(8, 8), seed()).unwrap();
        game.place_snake(&[Position::new(2, 2), Position::new(1, 2)], Direction::Right)
            .unwrap();
        game.place_snake(&[Position::new(3, 3), Position::new(3, 2)], Direction::Down)
            .unwrap();
        game.update(&[]).unwrap();
        assert_eq!(game.snakes()[0].stats().deaths(), 1);
        assert_board_consistent(&game);
    }

    #[test]
    fn test_same_seed_same_evolution() {
        let config = GameConfig {
            num_snakes: 2,
            num_foods: 3,
            ..config(10, 10)
        };
        let mut a = Game::new(&config, seed()).unwrap();
        let mut b = Game::new(&config, seed()).unwrap();
        let script = [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Right,
        ];
        for round in 0..200 {
            let dirs = [script[round % 4], script[(round / 3) % 4]];
            let ra = a.update(&dirs);
            let rb = b.update(&dirs);
            assert_eq!(ra, rb);
            assert_eq!(a.board(), b.board());
            assert_eq!(a.snakes(), b.snakes());
            assert_eq!(a.foods(), b.foods());
        }
    }

    #[test]
    fn test_respawn_failure_is_reported_and_retried() {
        // 3x1 board fully occupied by a size-3 snake facing the wall.
        let config = GameConfig {
            init_snake_size: 3,
            ..config(3, 1)
        };
        let mut game = Game::empty(&config, seed()).unwrap();
        game.place_snake(&line((2, 0), 3, Direction::Right), Direction::Right)
            .unwrap();
        game.place_food(Position::new(0, 0)).unwrap_err();
        // Dies, then the empty board has room again: respawn succeeds.
        game.update(&[]).unwrap();
        assert!(game.snakes()[0].is_alive());

        // A block makes the respawn impossible.
        let mut game = Game::empty(&config, seed()).unwrap();
        game.place_snake(&line((1, 0), 2, Direction::Right), Direction::Right)
            .unwrap();
        game.place_block(Position::new(2, 0)).unwrap();
        assert_eq!(game.update(&[]), Err(BoardFullError));
        assert!(!game.snakes()[0].is_alive());
        assert_eq!(game.update(&[]), Err(BoardFullError));
        assert_eq!(game.snakes()[0].stats().deaths(), 1);
    }
}
