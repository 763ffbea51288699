use evosnake_evaluator::{
    ModelError,
    model::{Model, ModelConfig},
    nn_driver::NnDriver,
    session_evaluator::SessionEvaluator,
};
use rand_pcg::Pcg32;
use tracing::warn;

use crate::genetic::FitnessFunction;

/// Fitness of a genome as a snake-playing network.
///
/// Each evaluation decodes the genome for `config` and plays one session
/// with the [`SessionEvaluator`].
#[derive(Debug, Clone)]
pub struct NnFitness {
    config: ModelConfig,
    evaluator: SessionEvaluator,
}

impl NnFitness {
    /// Fails if `config` cannot drive a snake.
    pub fn new(config: ModelConfig, evaluator: SessionEvaluator) -> Result<Self, ModelError> {
        let probe = Model::new(config.clone(), &vec![0.0; config.size()])?;
        NnDriver::new(&probe)?;
        Ok(Self { config, evaluator })
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[must_use]
    pub fn evaluator(&self) -> &SessionEvaluator {
        &self.evaluator
    }

    /// Genome length the trainer must produce.
    #[must_use]
    pub fn genome_len(&self) -> usize {
        self.config.size()
    }
}

impl FitnessFunction for NnFitness {
    fn evaluate(&self, genome: &[f32], rng: &mut Pcg32) -> f32 {
        let result = Model::new(self.config.clone(), genome)
            .and_then(|model| self.evaluator.evaluate(&model, rng));
        match result {
            Ok(fitness) => fitness,
            Err(e) => {
                warn!(error = %e, "genome could not be evaluated");
                f32::NEG_INFINITY
            }
        }
    }
}
