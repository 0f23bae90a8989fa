mod dedup;
pub mod hungarian;
mod kalman_filter;
mod matching;
mod rect;
mod track;
mod track_manager;
mod track_state;

pub use dedup::Deduplicator;
pub use kalman_filter::KalmanFilter;
pub use matching::{AssignmentResult, Detection, centroid_distance, linear_assignment};
pub use rect::{Rect, frame_diagonal};
pub use track::{StateEstimator, Track, TrackId};
pub use track_manager::{TrackManager, TrackedBox, TrackerConfig};
pub use track_state::Lifecycle;
