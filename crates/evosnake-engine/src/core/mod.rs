//! Board and entity data structures.
//!
//! - [`Board`] - Occupancy grid with bounded random placement
//! - [`Snake`] - Body, heading, life state and per-snake [`SnakeStats`]
//! - [`Element`] - Typed occupant (food, block, body segment)
//! - [`Position`] / [`Direction`] - Grid coordinates and cardinal moves

pub use self::{board::*, element::*, position::*, snake::*, snake_stats::*};

pub(crate) mod board;
pub(crate) mod element;
pub(crate) mod position;
pub(crate) mod snake;
pub(crate) mod snake_stats;
