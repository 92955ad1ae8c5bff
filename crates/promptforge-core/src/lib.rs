//! # promptforge-core
//!
//! Orchestrates the Critic → Refiner → Evaluator pipeline: one strictly
//! sequential run per prompt, each stage fed the fully resolved output of
//! the one before it, always ending in a well-formed [`PipelineOutcome`].

mod context;
mod message;
mod outcome;
mod runner;

pub use context::PipelineContext;
pub use message::{MessageMetadata, PipelineMessage, StageType};
pub use outcome::PipelineOutcome;
pub use runner::PipelineRunner;
