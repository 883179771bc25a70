//! Pipeline module.
//!
//! This module provides the cleaning pipeline, batch cleaning and progress
//! reporting.

mod batch;
mod builder;
pub mod progress;

pub use batch::SheetOutcome;
pub use builder::{CleanOutput, Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, CleaningStage, ProgressReporter, ProgressUpdate};
