use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;

/// Seed for a game's random source.
///
/// A 128-bit seed for the [`Pcg32`] each [`Game`](crate::Game) owns. Every
/// random draw a game makes (snake spawns, food placement) comes from that
/// generator, so two games created from the same seed and fed the same
/// directions evolve identically.
///
/// # Example
///
/// ```
/// use evosnake_engine::{Game, GameConfig, GameSeed};
///
/// let seed = GameSeed::from_u64(42);
/// let a = Game::new(&GameConfig::default(), seed).unwrap();
/// let b = Game::new(&GameConfig::default(), seed).unwrap();
/// assert_eq!(a.board(), b.board());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    /// Widens a `u64` into a seed, for seeds given on the command line.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }

    pub(crate) fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

/// Draws a game seed from another generator, e.g. one per evaluation game.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        GameSeed(rng.random())
    }
}
