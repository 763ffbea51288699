//! Fixed-topology feedforward network decoded from a flat genome.
//!
//! # Genome Layout
//!
//! For each consecutive layer pair `(inputs, outputs)` the genome holds
//! `outputs × inputs` weights, one row per output neuron, followed by
//! `outputs` biases:
//!
//! ```text
//! [ W1 (row-major) | b1 | W2 (row-major) | b2 | ... ]
//! ```
//!
//! [`Model::to_genome`] writes the same layout back, so decoding and encoding
//! are exact inverses.
//!
//! # Activation
//!
//! Hidden layers apply `tanh`; the output layer is linear. [`Model::decide`]
//! picks the output with the highest value, the lowest index winning ties.

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Layer widths of a network, input layer first.
///
/// # Example
///
/// ```
/// use evosnake_evaluator::model::ModelConfig;
///
/// let config = ModelConfig::new(vec![8, 16, 16, 4]).unwrap();
/// assert_eq!(config.size(), 8 * 16 + 16 + 16 * 16 + 16 + 16 * 4 + 4);
/// assert!(ModelConfig::new(vec![8]).is_err());
/// assert!(ModelConfig::new(vec![usize::MAX, 2]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct ModelConfig {
    layers: Vec<usize>,
    size: usize,
}

impl Default for ModelConfig {
    /// 8 observation inputs, two hidden layers of 16, 4 direction outputs.
    fn default() -> Self {
        Self {
            layers: vec![8, 16, 16, 4],
            size: 8 * 16 + 16 + 16 * 16 + 16 + 16 * 4 + 4,
        }
    }
}

impl ModelConfig {
    /// Validates the layer widths.
    ///
    /// Needs at least two layers, none empty, and a parameter count that
    /// fits in `usize`.
    pub fn new(layers: Vec<usize>) -> Result<Self, ModelError> {
        if layers.len() < 2 || layers.contains(&0) {
            return Err(ModelError::InvalidLayers { layers });
        }
        let Some(size) = parameter_count(&layers) else {
            return Err(ModelError::InvalidLayers { layers });
        };
        Ok(Self { layers, size })
    }

    #[must_use]
    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.layers[0]
    }

    #[must_use]
    pub fn outputs(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Number of parameters a genome for this topology must have.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

fn parameter_count(layers: &[usize]) -> Option<usize> {
    layers.windows(2).try_fold(0_usize, |total, pair| {
        pair[0]
            .checked_mul(pair[1])?
            .checked_add(pair[1])?
            .checked_add(total)
    })
}

impl TryFrom<Vec<usize>> for ModelConfig {
    type Error = ModelError;

    fn try_from(layers: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(layers)
    }
}

impl From<ModelConfig> for Vec<usize> {
    fn from(config: ModelConfig) -> Self {
        config.layers
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    inputs: usize,
    outputs: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl Layer {
    fn apply(&self, input: &[f32], hidden: bool) -> Vec<f32> {
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias;
                if hidden { sum.tanh() } else { sum }
            })
            .collect()
    }
}

/// A network with its weights decoded from a genome.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    config: ModelConfig,
    layers: Vec<Layer>,
}

impl Model {
    /// Decodes `genome` for `config`.
    ///
    /// Fails unless `genome.len() == config.size()`.
    pub fn new(config: ModelConfig, genome: &[f32]) -> Result<Self, ModelError> {
        let expected = config.size();
        if genome.len() != expected {
            return Err(ModelError::GenomeLength {
                expected,
                actual: genome.len(),
            });
        }

        let mut rest = genome;
        let layers = config
            .layers
            .windows(2)
            .map(|pair| {
                let (inputs, outputs) = (pair[0], pair[1]);
                let (weights, tail) = rest.split_at(inputs * outputs);
                let (biases, tail) = tail.split_at(outputs);
                rest = tail;
                Layer {
                    inputs,
                    outputs,
                    weights: weights.to_vec(),
                    biases: biases.to_vec(),
                }
            })
            .collect();
        Ok(Self { config, layers })
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Flattens the weights back into genome layout.
    #[must_use]
    pub fn to_genome(&self) -> Vec<f32> {
        let mut genome = Vec::with_capacity(self.config.size());
        for layer in &self.layers {
            genome.extend_from_slice(&layer.weights);
            genome.extend_from_slice(&layer.biases);
        }
        genome
    }

    /// Runs a forward pass and returns the raw output layer.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from the input layer width.
    #[must_use]
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(
            input.len(),
            self.config.inputs(),
            "input length must match the input layer"
        );
        let last = self.layers.len() - 1;
        let mut activations = input.to_vec();
        for (i, layer) in self.layers.iter().enumerate() {
            debug_assert_eq!(activations.len(), layer.inputs);
            activations = layer.apply(&activations, i != last);
            debug_assert_eq!(activations.len(), layer.outputs);
        }
        activations
    }

    /// Returns the index of the strongest output.
    ///
    /// # Panics
    ///
    /// Panics if `input.len()` differs from the input layer width.
    #[must_use]
    pub fn decide(&self, input: &[f32]) -> usize {
        argmax(&self.forward(input))
    }
}

/// Index of the largest value; the first one wins ties.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::cast_precision_loss)]
    fn genome(len: usize) -> Vec<f32> {
        (0..len).map(|i| ((i as f32) * 0.37).sin()).collect()
    }

    #[test]
    fn test_config_validation() {
        assert!(ModelConfig::new(vec![]).is_err());
        assert!(ModelConfig::new(vec![3]).is_err());
        assert!(ModelConfig::new(vec![3, 0, 2]).is_err());
        let config = ModelConfig::new(vec![3, 2]).unwrap();
        assert_eq!(config.size(), 3 * 2 + 2);
        assert_eq!(config.inputs(), 3);
        assert_eq!(config.outputs(), 2);
    }

    #[test]
    fn test_oversized_topology_is_rejected() {
        assert!(matches!(
            ModelConfig::new(vec![usize::MAX, 2]),
            Err(ModelError::InvalidLayers { .. })
        ));
        assert!(ModelConfig::new(vec![2, 1 << (usize::BITS / 2), 1 << (usize::BITS / 2)]).is_err());
        assert!(serde_json::from_str::<ModelConfig>("[18446744073709551615, 2]").is_err());
    }

    #[test]
    fn test_default_size() {
        assert_eq!(ModelConfig::default().size(), 484);
    }

    #[test]
    fn test_config_serde() {
        let config = ModelConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, "[8,16,16,4]");
        let back: ModelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert!(serde_json::from_str::<ModelConfig>("[4]").is_err());
    }

    #[test]
    fn test_genome_length_mismatch() {
        let config = ModelConfig::new(vec![2, 3, 1]).unwrap();
        let err = Model::new(config.clone(), &genome(12)).unwrap_err();
        assert!(matches!(
            err,
            ModelError::GenomeLength {
                expected: 13,
                actual: 12
            }
        ));
        assert!(Model::new(config, &genome(14)).is_err());
    }

    #[test]
    fn test_known_forward_pass() {
        // 2 -> 1 linear: out = 1*x0 + 2*x1 + 0.5
        let config = ModelConfig::new(vec![2, 1]).unwrap();
        let model = Model::new(config, &[1.0, 2.0, 0.5]).unwrap();
        assert_eq!(model.forward(&[3.0, -1.0]), vec![1.5]);

        // 1 -> 1 (tanh) -> 2 linear
        let config = ModelConfig::new(vec![1, 1, 2]).unwrap();
        let model = Model::new(config, &[1.0, 0.0, 2.0, -2.0, 0.0, 0.0]).unwrap();
        let h = 0.5_f32.tanh();
        assert_eq!(model.forward(&[0.5]), vec![2.0 * h, -2.0 * h]);
        assert_eq!(model.decide(&[0.5]), 0);
        assert_eq!(model.decide(&[-0.5]), 1);
    }

    #[test]
    fn test_genome_roundtrip() {
        let config = ModelConfig::default();
        let original = genome(config.size());
        let model = Model::new(config.clone(), &original).unwrap();
        let encoded = model.to_genome();
        assert_eq!(encoded, original);

        let rebuilt = Model::new(config, &encoded).unwrap();
        let input = [0.5, -1.0, 0.25, 0.0, 1.0, -0.5, 0.125, -0.25];
        assert_eq!(model.forward(&input), rebuilt.forward(&input));
    }

    #[test]
    fn test_argmax_prefers_lowest_index() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[-1.0, -2.0]), 0);
    }
}
