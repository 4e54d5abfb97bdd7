//! Declarative release pipelines.
//!
//! A release step is an ordered list of [`Stage`]s. The [`Pipeline`] runner
//! executes them one by one and stops at the first stage that does not
//! complete, reporting why through [`StageOutcome`].

mod runner;
mod stage;
pub mod steps;

pub use runner::{Pipeline, PipelineReport, StageFailure, StageOutcome};
pub use stage::{Action, Checkpoint, Precondition, Stage};
