use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use evosnake_engine::GameConfig;
use evosnake_evaluator::{
    ModelError,
    model::{Model, ModelConfig},
};
use evosnake_training::trainer::GenerationReport;
use serde::{Deserialize, Serialize};

/// How a stored network was trained.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrainingRecord {
    /// Reproduces the run when passed back as `train --seed`.
    pub seed: u64,
    pub generations: usize,
    /// Best fitness seen over the whole run.
    pub final_fitness: f32,
    /// Board every evaluation game was played on.
    pub board: GameConfig,
    pub last_generation: Option<GenerationReport>,
}

/// A trained network as stored on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnakeModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub training: TrainingRecord,
    pub config: ModelConfig,
    pub genome: Vec<f32>,
}

impl SnakeModel {
    pub fn new(name: String, training: TrainingRecord, model: &Model) -> Self {
        Self {
            name,
            trained_at: Utc::now(),
            training,
            config: model.config().clone(),
            genome: model.to_genome(),
        }
    }

    pub fn to_model(&self) -> Result<Model, ModelError> {
        Model::new(self.config.clone(), &self.genome)
    }

    /// Writes the model as pretty JSON to `path`, or to stdout without one.
    ///
    /// Missing parent directories are created.
    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<()> {
        let Some(path) = path else {
            return self
                .write_json(io::stdout().lock())
                .context("Failed to write model to stdout");
        };
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create model file: {}", path.display()))?;
        self.write_json(BufWriter::new(file))
            .with_context(|| format!("Failed to write model file: {}", path.display()))
    }

    fn write_json<W>(&self, mut writer: W) -> anyhow::Result<()>
    where
        W: Write,
    {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a model file and checks that its genome fits its topology.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open model file: {}", path.display()))?;
        let model: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse model file: {}", path.display()))?;
        model
            .to_model()
            .with_context(|| format!("Inconsistent model file: {}", path.display()))?;
        Ok(model)
    }
}

#[cfg(test)]
pub(crate) fn test_record() -> TrainingRecord {
    TrainingRecord {
        seed: 1,
        generations: 1,
        final_fitness: 0.0,
        board: GameConfig::default(),
        last_generation: None,
    }
}
