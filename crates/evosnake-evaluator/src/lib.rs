//! Neural-network policies for the snake engine and their evaluation.
//!
//! This crate turns a flat genome into a playing policy and scores it:
//!
//! 1. **Model** ([`model`]) - Decodes a genome into a feedforward network for a
//!    given [`ModelConfig`](model::ModelConfig) and runs forward passes.
//!
//! 2. **Observation** ([`observation`]) - Encodes what a snake sees along eight
//!    compass rays into the network input.
//!
//! 3. **Driver** ([`nn_driver`]) - Wraps a model as an engine
//!    [`Driver`](evosnake_engine::Driver) and
//!    [`MultiDriver`](evosnake_engine::MultiDriver).
//!
//! 4. **Session Evaluation** ([`session_evaluator`]) - Plays batches of seeded
//!    games with a model and reduces the outcomes to one fitness value.
//!
//! # Architecture
//!
//! ```text
//! Session Evaluation (fitness for training)
//!     ↓ plays games with
//! NN Driver (direction per snake)
//!     ↓ feeds
//! Observation → Model → arg-max over directions
//! ```
//!
//! The genetic algorithm in `evosnake-training` only sees the genome and the
//! resulting fitness; everything in between lives here.

pub mod model;
pub mod nn_driver;
pub mod observation;
pub mod session_evaluator;

use evosnake_engine::GameError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ModelError {
    #[display(
        "invalid layer widths {layers:?}: need at least two non-empty layers and a parameter count that fits in usize"
    )]
    InvalidLayers { layers: Vec<usize> },
    #[display("genome length mismatch: expected {expected}, got {actual}")]
    GenomeLength { expected: usize, actual: usize },
    #[display(
        "network maps {inputs} inputs to {outputs} outputs, but a snake driver needs 8 to 4"
    )]
    Topology { inputs: usize, outputs: usize },
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("invalid game configuration: {_0}")]
    Game(GameError),
    #[display("a snake needs at least one life")]
    ZeroLives,
}
