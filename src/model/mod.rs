//! High-level model API.
//!
//! - [`DndtConfig`]: validated training configuration (builder via `bon`)
//! - [`DndtModel`]: trained tree with prediction and evaluation
//! - [`TrainReport`]: model plus accuracy, loss curve and seed of a run

mod config;
mod dndt;

pub use config::{CutSpec, DndtConfig, DndtConfigBuilder, TestSplit};
pub use dndt::{DndtModel, EvalSplit, TrainReport};
