use evosnake_engine::{Direction, Driver, Game, MultiDriver, Snake};

use crate::{
    ModelError,
    model::Model,
    observation::{self, OBSERVATION_LEN},
};

/// Driver steering a snake with a [`Model`].
///
/// Output neuron `i` votes for `Direction::ALL[i]` (up, right, down, left).
///
/// # Example
///
/// ```
/// use evosnake_evaluator::{
///     model::{Model, ModelConfig},
///     nn_driver::NnDriver,
/// };
///
/// let config = ModelConfig::default();
/// let model = Model::new(config.clone(), &vec![0.0; config.size()]).unwrap();
/// assert!(NnDriver::new(&model).is_ok());
///
/// let wrong = ModelConfig::new(vec![8, 3]).unwrap();
/// let model = Model::new(wrong.clone(), &vec![0.0; wrong.size()]).unwrap();
/// assert!(NnDriver::new(&model).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NnDriver<'a> {
    model: &'a Model,
}

impl<'a> NnDriver<'a> {
    pub const INPUTS: usize = OBSERVATION_LEN;
    pub const OUTPUTS: usize = Direction::LEN;

    /// Wraps `model`, which must map the observation onto the four directions.
    pub fn new(model: &'a Model) -> Result<Self, ModelError> {
        let config = model.config();
        if config.inputs() != Self::INPUTS || config.outputs() != Self::OUTPUTS {
            return Err(ModelError::Topology {
                inputs: config.inputs(),
                outputs: config.outputs(),
            });
        }
        Ok(Self { model })
    }

    /// Chooses the direction for `snake`; dead snakes keep their heading.
    #[must_use]
    pub fn decide(&self, snake: &Snake, game: &Game) -> Direction {
        if !snake.is_alive() {
            return snake.direction();
        }
        let input = observation::encode(snake, game);
        Direction::from_index(self.model.decide(&input)).unwrap_or(snake.direction())
    }
}

impl Driver for NnDriver<'_> {
    fn get_direction(&mut self, snake: &Snake, game: &Game) -> Direction {
        self.decide(snake, game)
    }
}

impl MultiDriver for NnDriver<'_> {
    fn get_directions(&mut self, snakes: &[&Snake], games: &[Game]) -> Vec<Direction> {
        snakes
            .iter()
            .zip(games)
            .map(|(snake, game)| self.decide(snake, game))
            .collect()
    }
}
