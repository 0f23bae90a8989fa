//! SORT-style multi-object tracking.
//!
//! Detections from an external detector go in one frame at a time; tracked
//! boxes with stable identities come out. Each track carries a constant
//! velocity Kalman filter, tracks and detections are paired by an optimal
//! assignment over normalized centroid distances, and near-duplicate output
//! boxes of the same class are suppressed.
//!
//! ```
//! use sort_track::{Detection, Rect, TrackManager, TrackerConfig, frame_diagonal};
//!
//! let mut tracker = TrackManager::new(TrackerConfig::default()).unwrap();
//! let diagonal = frame_diagonal(1280, 720);
//!
//! let first = tracker
//!     .update(&[Detection::new(Rect::new(10.0, 10.0, 20.0, 20.0), 0, 0.9)], 1, diagonal)
//!     .unwrap();
//! let second = tracker
//!     .update(&[Detection::new(Rect::new(12.0, 11.0, 20.0, 20.0), 0, 0.8)], 2, diagonal)
//!     .unwrap();
//!
//! assert_eq!(first[0].id, second[0].id);
//! ```

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use integration::{
    DetectionBuilder, DetectionSource, Frame, IntoDetections, PipelineError, ProcessingController,
    TrackedSequence, TrackerPipeline,
};
pub use tracker::{
    Detection, Lifecycle, Rect, Track, TrackId, TrackManager, TrackedBox, TrackerConfig,
    frame_diagonal,
};
