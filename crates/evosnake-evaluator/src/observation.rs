//! Encoding of a snake's surroundings into the network input vector.
//!
//! A snake looks along eight compass rays starting next to its head, in the
//! order N, NE, E, SE, S, SW, W, NW. Each ray reports only the first non-empty
//! cell it meets at distance `d`:
//!
//! - food: `+1 / d`
//! - wall, block or any body segment: `-1 / d`
//!
//! Every ray ends at a wall at the latest, so no entry is ever zero for a live
//! snake. A dead snake observes all zeros.

use evosnake_engine::{ElementKind, Game, Position, Snake};

pub const OBSERVATION_LEN: usize = 8;

/// Ray offsets, clockwise from north.
pub const RAYS: [(isize, isize); OBSERVATION_LEN] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Encodes what `snake` sees on `game`'s board.
#[must_use]
pub fn encode(snake: &Snake, game: &Game) -> [f32; OBSERVATION_LEN] {
    let mut observation = [0.0; OBSERVATION_LEN];
    let Some(head) = snake.head() else {
        return observation;
    };
    for (value, (dx, dy)) in observation.iter_mut().zip(RAYS) {
        *value = cast_ray(game, head, dx, dy);
    }
    observation
}

fn cast_ray(game: &Game, head: Position, dx: isize, dy: isize) -> f32 {
    let board = game.board();
    let mut pos = Some(head);
    let mut distance = 0_u16;
    loop {
        distance = distance.saturating_add(1);
        pos = pos
            .and_then(|p| p.offset(dx, dy))
            .filter(|p| board.contains(*p));
        let Some(p) = pos else {
            return -1.0 / f32::from(distance);
        };
        let signal = match board.element_at(p).map(|element| element.kind()) {
            None => continue,
            Some(ElementKind::Food) => 1.0,
            Some(ElementKind::Block | ElementKind::BodySegment) => -1.0,
        };
        return signal / f32::from(distance);
    }
}
