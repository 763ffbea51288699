use super::position::Position;

/// What kind of thing occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ElementKind {
    /// Edible; grows the snake that enters it.
    Food,
    /// Static obstacle, lethal on entry.
    Block,
    /// Part of a snake's body, lethal on entry.
    BodySegment,
}

/// A typed thing on the board.
///
/// Foods are kept as `Element`s by the [`Game`](crate::Game). A food that could
/// not be placed because the board was full has no position until a later round
/// finds room for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    kind: ElementKind,
    position: Option<Position>,
}

impl Element {
    #[must_use]
    pub const fn new(kind: ElementKind, position: Position) -> Self {
        Self {
            kind,
            position: Some(position),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub(crate) fn take_position(&mut self) -> Option<Position> {
        self.position.take()
    }
}
