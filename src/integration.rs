//! Integration module for connecting detection backends and callers with the tracker.
//!
//! This module provides the detector trait, a detection builder, the
//! progress/cancellation controller and the sequence-level pipeline.

mod builder;
mod controller;
mod detector;
mod pipeline;
mod sequence;

pub use builder::DetectionBuilder;
pub use controller::ProcessingController;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{Frame, PipelineError, TrackerPipeline};
pub use sequence::TrackedSequence;
