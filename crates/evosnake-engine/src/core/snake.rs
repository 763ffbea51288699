use std::collections::VecDeque;

use super::{
    board::{Board, Cell},
    element::Element,
    position::{Direction, Position},
    snake_stats::SnakeStats,
};

/// Stable identity of a snake: its slot index in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("snake #{_0}")]
pub struct SnakeId(usize);

impl SnakeId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What the head of a snake would run into on its next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Collision {
    /// Outside the board.
    Wall,
    /// A static block or any snake body segment, including the snake's own.
    Block,
    /// Food with the given index.
    Food(usize),
}

/// A snake: an ordered body (head first), a heading and a life state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    id: SnakeId,
    body: VecDeque<Position>,
    direction: Direction,
    alive: bool,
    pending_growth: usize,
    stats: SnakeStats,
}

impl Snake {
    pub(crate) fn new(id: SnakeId, body: Vec<Position>, direction: Direction) -> Self {
        let mut stats = SnakeStats::new();
        stats.record_spawn(body.len());
        Self {
            id,
            body: body.into(),
            direction,
            alive: true,
            pending_growth: 0,
            stats,
        }
    }

    #[must_use]
    pub const fn id(&self) -> SnakeId {
        self.id
    }

    /// Returns the head position, or `None` while the snake is dead.
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.body.front().copied()
    }

    #[must_use]
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Iterates over the body from head to tail.
    pub fn body(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub const fn stats(&self) -> &SnakeStats {
        &self.stats
    }

    /// Requests a new heading for the next move.
    ///
    /// Reversing onto the neck is ignored for snakes longer than one segment,
    /// since it would be an immediate self-collision. Returns whether the
    /// heading was accepted.
    pub fn update_direction(&mut self, direction: Direction) -> bool {
        if self.body.len() > 1 && direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Returns the cell the head would enter on the next move.
    #[must_use]
    pub fn next_head(&self, board: &Board) -> Option<Position> {
        board.step(self.head()?, self.direction)
    }

    /// Classifies the cell the head would enter on the next move.
    ///
    /// Returns `None` for a free move. The snake's own tail cell counts as free
    /// when no growth is pending, because the tail vacates it in the same move.
    /// A dead snake reports [`Collision::Block`].
    #[must_use]
    pub fn next_move_collide(&self, board: &Board) -> Option<Collision> {
        if !self.alive {
            return Some(Collision::Block);
        }
        let Some(next) = self.next_head(board) else {
            return Some(Collision::Wall);
        };
        match board.get(next)? {
            Cell::Empty => None,
            Cell::Food(index) => Some(Collision::Food(index)),
            Cell::Block => Some(Collision::Block),
            Cell::Body(id) if id == self.id && self.is_vacating_tail(next) => None,
            Cell::Body(_) => Some(Collision::Block),
        }
    }

    fn is_vacating_tail(&self, pos: Position) -> bool {
        self.pending_growth == 0 && self.body.len() > 1 && self.tail() == Some(pos)
    }

    /// Advances the head one cell and drops the tail unless growth is pending.
    ///
    /// # Panics
    ///
    /// Panics if the snake is dead or the move leaves the board; callers must
    /// check [`Self::next_move_collide`] first.
    pub(crate) fn move_forward(&mut self, board: &mut Board) {
        let next = self
            .next_head(board)
            .expect("move target must be a cell inside the board");
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else if let Some(tail) = self.body.pop_back() {
            board.set(tail, Cell::Empty);
        }
        board.set(next, Cell::Body(self.id));
        self.body.push_front(next);
        self.stats.record_move(self.body.len());
    }

    /// Consumes `food`: removes it from the board and schedules one segment of growth.
    pub(crate) fn eat(&mut self, board: &mut Board, food: &mut Element) {
        if let Some(pos) = food.take_position() {
            board.set(pos, Cell::Empty);
        }
        self.pending_growth += 1;
        self.stats.record_meal();
    }

    /// Clears the body from the board and marks the snake dead.
    pub(crate) fn die(&mut self, board: &mut Board) {
        for pos in self.body.drain(..) {
            board.set(pos, Cell::Empty);
        }
        self.alive = false;
        self.pending_growth = 0;
        self.stats.record_death();
    }

    /// Brings a dead snake back with a fresh body that is already on the board.
    pub(crate) fn respawn(&mut self, body: Vec<Position>, direction: Direction) {
        debug_assert!(!self.alive);
        self.stats.record_spawn(body.len());
        self.body = body.into();
        self.direction = direction;
        self.alive = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    /// Places a snake by hand; `body` is head first.
    fn place(
        board: &mut Board,
        id: usize,
        body: &[(usize, usize)],
        direction: Direction,
    ) -> Snake {
        let body = body
            .iter()
            .map(|&(x, y)| Position::new(x, y))
            .collect::<Vec<_>>();
        for pos in &body {
            board.set(*pos, Cell::Body(SnakeId::new(id)));
        }
        Snake::new(SnakeId::new(id), body, direction)
    }

    #[test]
    fn test_reversal_onto_neck_is_ignored() {
        let mut board = Board::new(10, 10).unwrap();
        let mut snake = place(&mut board, 0, &[(5, 5), (4, 5), (3, 5)], Direction::Right);
        assert!(!snake.update_direction(Direction::Left));
        assert_eq!(snake.direction(), Direction::Right);
        assert!(snake.update_direction(Direction::Up));
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let mut board = Board::new(10, 10).unwrap();
        let mut snake = place(&mut board, 0, &[(5, 5)], Direction::Right);
        assert!(snake.update_direction(Direction::Left));
        assert_eq!(snake.next_move_collide(&board), None);
    }

    #[test]
    fn test_wall_collision() {
        let mut board = Board::new(4, 4).unwrap();
        let snake = place(&mut board, 0, &[(3, 1), (2, 1)], Direction::Right);
        assert_eq!(snake.next_move_collide(&board), Some(Collision::Wall));
        let snake = place(&mut board, 1, &[(0, 3)], Direction::Left);
        assert_eq!(snake.next_move_collide(&board), Some(Collision::Wall));
    }

    #[test]
    fn test_other_body_is_block() {
        let mut board = Board::new(6, 6).unwrap();
        let snake = place(&mut board, 0, &[(2, 2), (1, 2)], Direction::Right);
        let _other = place(&mut board, 1, &[(3, 1), (3, 2), (3, 3)], Direction::Up);
        assert_eq!(snake.next_move_collide(&board), Some(Collision::Block));
    }

    #[test]
    fn test_own_body_is_block() {
        // head at (2,2) turning down into (2,3), which is a middle segment
        let mut board = Board::new(6, 6).unwrap();
        let mut snake = place(
            &mut board,
            0,
            &[(2, 2), (3, 2), (3, 3), (2, 3), (1, 3)],
            Direction::Left,
        );
        assert!(snake.update_direction(Direction::Down));
        assert_eq!(snake.next_move_collide(&board), Some(Collision::Block));
    }

    #[test]
    fn test_vacating_tail_is_free() {
        // 2x2 loop: the head chases its own tail
        let mut board = Board::new(2, 2).unwrap();
        let mut snake = place(
            &mut board,
            0,
            &[(0, 0), (1, 0), (1, 1), (0, 1)],
            Direction::Left,
        );
        assert!(snake.update_direction(Direction::Down));
        assert_eq!(snake.next_move_collide(&board), None);
        snake.move_forward(&mut board);
        assert_eq!(snake.head(), Some(Position::new(0, 1)));
        assert_eq!(snake.tail(), Some(Position::new(1, 1)));
        assert_eq!(snake.len(), 4);
        assert_eq!(board.empty_cell_count(), 0);
    }

    #[test]
    fn test_tail_is_block_while_growing() {
        let mut board = Board::new(2, 2).unwrap();
        let mut snake = place(
            &mut board,
            0,
            &[(0, 0), (1, 0), (1, 1), (0, 1)],
            Direction::Left,
        );
        snake.pending_growth = 1;
        snake.update_direction(Direction::Down);
        assert_eq!(snake.next_move_collide(&board), Some(Collision::Block));
    }

    #[test]
    fn test_eat_then_move_grows() {
        let mut board = Board::new(6, 6).unwrap();
        let mut snake = place(&mut board, 0, &[(2, 2), (1, 2), (0, 2)], Direction::Right);
        let food_pos = Position::new(3, 2);
        board.set(food_pos, Cell::Food(0));
        let mut food = Element::new(ElementKind::Food, food_pos);

        assert_eq!(snake.next_move_collide(&board), Some(Collision::Food(0)));
        snake.eat(&mut board, &mut food);
        snake.move_forward(&mut board);

        assert!(!food.is_placed());
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Some(food_pos));
        assert_eq!(board.get(food_pos), Some(Cell::Body(SnakeId::new(0))));
        assert_eq!(snake.stats().food_eaten(), 1);
    }

    #[test]
    fn test_die_clears_board() {
        let mut board = Board::new(6, 6).unwrap();
        let mut snake = place(&mut board, 0, &[(2, 2), (1, 2), (0, 2)], Direction::Right);
        snake.die(&mut board);
        assert!(!snake.is_alive());
        assert!(snake.is_empty());
        assert_eq!(board.empty_cell_count(), 36);
        assert_eq!(snake.stats().deaths(), 1);
        assert_eq!(snake.next_move_collide(&board), Some(Collision::Block));
    }
}
