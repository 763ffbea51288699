use rand::Rng;
use tracing::debug;

use crate::{BoardError, BoardFullError};

use super::{
    element::{Element, ElementKind},
    position::{Direction, Position},
    snake::{Snake, SnakeId},
};

/// Number of uniformly random probes tried before placement falls back to
/// scanning every candidate on the board.
pub const MAX_RANDOM_PLACEMENT_ATTEMPTS: usize = 64;

/// The logical occupant of a single in-bounds cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum Cell {
    #[default]
    Empty,
    /// Food, identified by its index in the game's food list.
    Food(usize),
    /// Static obstacle.
    Block,
    /// Segment of the given snake's body.
    Body(SnakeId),
}

/// Occupancy grid of a single game.
///
/// Every in-bounds cell holds exactly one [`Cell`]. Coordinates outside
/// `[0, width) × [0, height)` are never stored; queries for them return `None`,
/// which callers treat as a wall.
///
/// # Example
///
/// ```
/// use evosnake_engine::{Board, Direction, Position};
///
/// let board = Board::new(4, 3).unwrap();
/// assert_eq!(board.step(Position::new(3, 0), Direction::Right), None);
/// assert_eq!(
///     board.step(Position::new(3, 0), Direction::Down),
///     Some(Position::new(3, 1)),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        let len = width
            .checked_mul(height)
            .filter(|len| *len > 0 && isize::try_from(width.max(height)).is_ok())
            .ok_or(BoardError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; len],
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.width + pos.x)
    }

    /// Returns the occupant of `pos`, or `None` if it lies outside the board.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Returns whether `pos` is inside the board and empty.
    #[must_use]
    pub fn is_free(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(|c| c.is_empty())
    }

    /// Returns the typed element at `pos`, or `None` for empty or out-of-bounds cells.
    #[must_use]
    pub fn element_at(&self, pos: Position) -> Option<Element> {
        let kind = match self.get(pos)? {
            Cell::Empty => return None,
            Cell::Food(_) => ElementKind::Food,
            Cell::Block => ElementKind::Block,
            Cell::Body(_) => ElementKind::BodySegment,
        };
        Some(Element::new(kind, pos))
    }

    /// Returns the neighbour of `pos` in `direction` if it is inside the board.
    #[must_use]
    pub fn step(&self, pos: Position, direction: Direction) -> Option<Position> {
        pos.step(direction).filter(|next| self.contains(*next))
    }

    /// Iterates over every in-bounds position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    #[must_use]
    pub fn empty_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// Overwrites the occupant of `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        let index = self
            .index(pos)
            .unwrap_or_else(|| panic!("position {pos:?} is outside the board"));
        self.cells[index] = cell;
    }

    fn random_position<R>(&self, rng: &mut R) -> Position
    where
        R: Rng + ?Sized,
    {
        Position::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.height),
        )
    }

    /// Picks a uniformly random empty cell.
    ///
    /// Tries [`MAX_RANDOM_PLACEMENT_ATTEMPTS`] random probes first, then chooses
    /// among all empty cells, so the call always terminates.
    pub(crate) fn random_empty_cell<R>(&self, rng: &mut R) -> Result<Position, BoardFullError>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..MAX_RANDOM_PLACEMENT_ATTEMPTS {
            let pos = self.random_position(rng);
            if self.is_free(pos) {
                return Ok(pos);
            }
        }
        debug!("random cell probes exhausted, scanning the board");
        let mut candidates = self
            .positions()
            .filter(|pos| self.is_free(*pos))
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Err(BoardFullError);
        }
        let index = rng.random_range(0..candidates.len());
        Ok(candidates.swap_remove(index))
    }

    /// Returns the body a snake of `size` would have with its head at `head`
    /// facing `heading`, if every segment is inside the board and empty.
    ///
    /// The body trails behind the head, opposite to the heading.
    fn snake_body_at(
        &self,
        head: Position,
        heading: Direction,
        size: usize,
    ) -> Option<Vec<Position>> {
        let mut body = Vec::with_capacity(size);
        let mut pos = head;
        for i in 0..size {
            if i > 0 {
                pos = self.step(pos, heading.opposite())?;
            }
            if !self.is_free(pos) {
                return None;
            }
            body.push(pos);
        }
        Some(body)
    }

    /// Picks a random collision-free body and heading for a snake of `size`.
    ///
    /// Same bounded policy as [`Self::random_empty_cell`]: random probes, then a
    /// uniform choice among every valid `(head, heading)` pair.
    pub(crate) fn random_snake_body<R>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<(Vec<Position>, Direction), BoardFullError>
    where
        R: Rng + ?Sized,
    {
        for _ in 0..MAX_RANDOM_PLACEMENT_ATTEMPTS {
            let head = self.random_position(rng);
            let heading = Direction::ALL[rng.random_range(0..Direction::LEN)];
            if let Some(body) = self.snake_body_at(head, heading, size) {
                return Ok((body, heading));
            }
        }
        debug!(size, "random snake probes exhausted, scanning the board");
        let mut candidates = self
            .positions()
            .flat_map(|head| Direction::ALL.into_iter().map(move |heading| (head, heading)))
            .filter_map(|(head, heading)| {
                self.snake_body_at(head, heading, size)
                    .map(|body| (body, heading))
            })
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return Err(BoardFullError);
        }
        let index = rng.random_range(0..candidates.len());
        Ok(candidates.swap_remove(index))
    }

    /// Places a new snake of `size` at a random free location.
    pub fn new_snake<R>(
        &mut self,
        id: SnakeId,
        size: usize,
        rng: &mut R,
    ) -> Result<Snake, BoardFullError>
    where
        R: Rng + ?Sized,
    {
        let (body, heading) = self.random_snake_body(size, rng)?;
        self.fill_body(id, &body);
        Ok(Snake::new(id, body, heading))
    }

    /// Gives a dead snake a fresh body of `size` at a random free location.
    ///
    /// The snake keeps its id, so drivers addressing it by slot are unaffected.
    /// On failure the snake stays dead with an empty body.
    pub fn respawn_snake<R>(
        &mut self,
        snake: &mut Snake,
        size: usize,
        rng: &mut R,
    ) -> Result<(), BoardFullError>
    where
        R: Rng + ?Sized,
    {
        if snake.is_alive() {
            snake.die(self);
        }
        let (body, heading) = self.random_snake_body(size, rng)?;
        self.fill_body(snake.id(), &body);
        snake.respawn(body, heading);
        Ok(())
    }

    fn fill_body(&mut self, id: SnakeId, body: &[Position]) {
        for &pos in body {
            self.set(pos, Cell::Body(id));
        }
    }

    /// Places food number `index` on a random empty cell.
    pub fn new_food<R>(&mut self, index: usize, rng: &mut R) -> Result<Element, BoardFullError>
    where
        R: Rng + ?Sized,
    {
        let pos = self.random_empty_cell(rng)?;
        self.set(pos, Cell::Food(index));
        Ok(Element::new(ElementKind::Food, pos))
    }

    /// Moves food number `index` to a random empty cell.
    ///
    /// On failure the food is left unplaced.
    pub fn respawn_food<R>(
        &mut self,
        food: &mut Element,
        index: usize,
        rng: &mut R,
    ) -> Result<(), BoardFullError>
    where
        R: Rng + ?Sized,
    {
        if let Some(old) = food.take_position()
            && self.get(old) == Some(Cell::Food(index))
        {
            self.set(old, Cell::Empty);
        }
        let pos = self.random_empty_cell(rng)?;
        self.set(pos, Cell::Food(index));
        food.set_position(pos);
        Ok(())
    }
}
