//! Multi-snake game engine.
//!
//! A [`Game`] owns a [`Board`], a list of [`Snake`]s and a list of foods, and
//! advances one round per [`Game::update`]. Drivers ([`Driver`], [`MultiDriver`])
//! supply directions; [`Game::run`] and [`run_multi`] loop rounds with an
//! optional [`Frontend`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned when no collision-free placement exists on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no free cell left on the board")]
pub struct BoardFullError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GameError {
    #[display("invalid board: {_0}")]
    Board(BoardError),
    #[display("initial snake size must be at least 1")]
    InvalidSnakeSize,
    #[display("a snake of size {size} does not fit on a {width}x{height} board")]
    SnakeTooLong {
        size: usize,
        width: usize,
        height: usize,
    },
    #[display("position ({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[display("cell ({x}, {y}) is already occupied")]
    Occupied { x: usize, y: usize },
    #[display("snake body must be a non-empty chain of adjacent cells")]
    InvalidBody,
    #[display("not enough room for the initial snakes and foods")]
    BoardFull(BoardFullError),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RunError {
    #[display("frontend failed")]
    Frontend(std::io::Error),
    #[display("game stalled")]
    BoardFull(BoardFullError),
}
