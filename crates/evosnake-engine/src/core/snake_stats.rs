/// Per-snake statistics accumulated over a game.
///
/// Tracks:
///
/// - **Moves**: successful head advances (deaths are not moves)
/// - **Food eaten**: total across all lives
/// - **Deaths**: collisions with a wall, block or body
/// - **Rounds since food**: moves made in the current life since the last meal
/// - **Longest**: maximum body length reached
///
/// # Example
///
/// ```
/// use evosnake_engine::SnakeStats;
///
/// let stats = SnakeStats::new();
/// assert_eq!(stats.moves(), 0);
/// assert_eq!(stats.deaths(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnakeStats {
    moves: usize,
    food_eaten: usize,
    deaths: usize,
    rounds_since_food: usize,
    longest: usize,
}

impl SnakeStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            moves: 0,
            food_eaten: 0,
            deaths: 0,
            rounds_since_food: 0,
            longest: 0,
        }
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn food_eaten(&self) -> usize {
        self.food_eaten
    }

    #[must_use]
    pub const fn deaths(&self) -> usize {
        self.deaths
    }

    /// Moves since the last meal or respawn; the eating move itself counts.
    #[must_use]
    pub const fn rounds_since_food(&self) -> usize {
        self.rounds_since_food
    }

    #[must_use]
    pub const fn longest(&self) -> usize {
        self.longest
    }

    pub(crate) fn record_move(&mut self, len: usize) {
        self.moves += 1;
        self.rounds_since_food += 1;
        self.longest = self.longest.max(len);
    }

    pub(crate) const fn record_meal(&mut self) {
        self.food_eaten += 1;
        self.rounds_since_food = 0;
    }

    pub(crate) const fn record_death(&mut self) {
        self.deaths += 1;
        self.rounds_since_food = 0;
    }

    pub(crate) fn record_spawn(&mut self, len: usize) {
        self.longest = self.longest.max(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_resets_hunger() {
        let mut stats = SnakeStats::new();
        stats.record_move(3);
        stats.record_move(3);
        assert_eq!(stats.rounds_since_food(), 2);
        stats.record_meal();
        stats.record_move(4);
        assert_eq!(stats.rounds_since_food(), 1);
        assert_eq!(stats.food_eaten(), 1);
        assert_eq!(stats.moves(), 3);
        assert_eq!(stats.longest(), 4);
    }

    #[test]
    fn test_death_keeps_totals() {
        let mut stats = SnakeStats::new();
        stats.record_spawn(3);
        stats.record_move(3);
        stats.record_meal();
        stats.record_move(4);
        stats.record_death();
        assert_eq!(stats.deaths(), 1);
        assert_eq!(stats.food_eaten(), 1);
        assert_eq!(stats.rounds_since_food(), 0);
        assert_eq!(stats.longest(), 4);
    }
}
