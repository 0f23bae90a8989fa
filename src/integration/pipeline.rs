//! TrackerPipeline for combining detection with tracking.

use log::{info, warn};
use thiserror::Error;

use crate::error::TrackerError;
use crate::tracker::{TrackManager, TrackedBox, TrackerConfig, frame_diagonal};

use super::{DetectionSource, ProcessingController, TrackedSequence};

/// Failure while processing a frame.
#[derive(Debug, Error)]
pub enum PipelineError<E: std::error::Error + 'static> {
    #[error("detection failed: {0}")]
    Detection(#[source] E),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// One decoded video frame handed to the detector.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Frame number; must increase across a sequence
    pub number: i64,
    /// Raw image bytes
    pub data: &'a [u8],
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// A combined tracker that bundles detection inference with SORT tracking.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    tracker: TrackManager,
    class_names: Vec<String>,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a new tracking pipeline with the given detector and tracker config.
    pub fn new(detector: D, config: TrackerConfig) -> Result<Self, TrackerError> {
        Ok(Self {
            detector,
            tracker: TrackManager::new(config)?,
            class_names: Vec::new(),
        })
    }

    /// Create a new tracking pipeline with default tracker configuration.
    pub fn with_default_config(detector: D) -> Result<Self, TrackerError> {
        Self::new(detector, TrackerConfig::default())
    }

    /// Attach the detector's class names to recorded sequences.
    pub fn with_class_names(mut self, class_names: Vec<String>) -> Self {
        self.class_names = class_names;
        self
    }

    /// Process a single frame and return the reported tracks.
    ///
    /// # Arguments
    /// * `frame` - Frame number, increasing from call to call
    /// * `input` - Raw image bytes
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn process_frame(
        &mut self,
        frame: i64,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<TrackedBox>, PipelineError<D::Error>> {
        let detections = self
            .detector
            .detect(input, width, height)
            .map_err(PipelineError::Detection)?;
        let diagonal = frame_diagonal(width, height);
        Ok(self.tracker.update(&detections, frame, diagonal)?)
    }

    /// Track a whole sequence of frames.
    ///
    /// Cancellation is checked before every frame; a cancelled run returns
    /// the frames processed so far and leaves the controller unfinished.
    /// On failure the controller's error flag and message are set.
    pub fn run<'a, I>(
        &mut self,
        frames: I,
        controller: &ProcessingController,
    ) -> Result<TrackedSequence, PipelineError<D::Error>>
    where
        I: IntoIterator<Item = Frame<'a>>,
        I::IntoIter: ExactSizeIterator,
    {
        let frames = frames.into_iter();
        let total = frames.len();
        let mut sequence = TrackedSequence::new(self.class_names.clone());

        controller.set_finished(false);
        info!("tracking {total} frames");

        for (done, frame) in frames.enumerate() {
            if controller.should_stop() {
                info!("tracking cancelled after {done} of {total} frames");
                return Ok(sequence);
            }

            let boxes = match self.process_frame(frame.number, frame.data, frame.width, frame.height)
            {
                Ok(boxes) => boxes,
                Err(err) => {
                    warn!("frame {}: {err}", frame.number);
                    controller.set_error(true, err.to_string());
                    return Err(err);
                }
            };
            sequence.insert(frame.number, boxes);

            controller.set_progress(((done + 1) * 100 / total) as u32);
        }

        controller.set_progress(100);
        controller.set_finished(true);
        info!("tracking finished: {} frames recorded", sequence.len());
        Ok(sequence)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &TrackManager {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut TrackManager {
        &mut self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Detection, Rect};
    use std::sync::Arc;

    /// Returns one box per frame, moving right by `step` pixels.
    struct MovingBoxDetector {
        x: f32,
        step: f32,
    }

    impl DetectionSource for MovingBoxDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<Detection>, Self::Error> {
            let det = Detection::new(Rect::new(self.x, 100.0, 40.0, 40.0), 0, 0.9);
            self.x += self.step;
            Ok(vec![det])
        }
    }

    #[derive(Debug, Error)]
    #[error("model failed to load")]
    struct LoadError;

    struct FailingDetector;

    impl DetectionSource for FailingDetector {
        type Error = LoadError;

        fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
            Err(LoadError)
        }
    }

    /// Requests cancellation while detecting frame `cancel_at`.
    struct CancellingDetector {
        controller: Arc<ProcessingController>,
        calls: usize,
        cancel_at: usize,
    }

    impl DetectionSource for CancellingDetector {
        type Error = std::convert::Infallible;

        fn detect(&mut self, _: &[u8], _: u32, _: u32) -> Result<Vec<Detection>, Self::Error> {
            self.calls += 1;
            if self.calls == self.cancel_at {
                self.controller.cancel();
            }
            Ok(vec![Detection::new(Rect::new(100.0, 100.0, 40.0, 40.0), 0, 0.9)])
        }
    }

    fn frames(count: i64) -> Vec<Frame<'static>> {
        (1..=count)
            .map(|number| Frame {
                number,
                data: &[],
                width: 640,
                height: 480,
            })
            .collect()
    }

    #[test]
    fn test_tracker_pipeline() {
        let detector = MovingBoxDetector { x: 10.0, step: 2.0 };
        let mut pipeline = TrackerPipeline::with_default_config(detector).unwrap();
        let tracks = pipeline.process_frame(1, &[], 640, 480).unwrap();

        // Frame 1 is within the warm-up window.
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].frame, 1);
    }

    #[test]
    fn test_run_records_every_frame() {
        let detector = MovingBoxDetector { x: 10.0, step: 3.0 };
        let mut pipeline = TrackerPipeline::with_default_config(detector)
            .unwrap()
            .with_class_names(vec!["person".into()]);
        let controller = ProcessingController::new();

        let sequence = pipeline.run(frames(10), &controller).unwrap();

        assert_eq!(sequence.len(), 10);
        assert_eq!(sequence.class_names, vec!["person".to_string()]);
        for (_, boxes) in sequence.iter() {
            assert_eq!(boxes.len(), 1);
            assert_eq!(boxes[0].id, 1);
        }
        assert!(controller.is_finished());
        assert_eq!(controller.progress(), 100);
    }

    #[test]
    fn test_run_stops_when_cancelled() {
        let detector = MovingBoxDetector { x: 10.0, step: 3.0 };
        let mut pipeline = TrackerPipeline::with_default_config(detector).unwrap();
        let controller = ProcessingController::new();
        controller.cancel();

        let sequence = pipeline.run(frames(5), &controller).unwrap();

        assert!(sequence.is_empty());
        assert!(!controller.is_finished());
        assert_eq!(pipeline.tracker().frame_count(), 0);
    }

    #[test]
    fn test_run_stops_when_cancelled_mid_sequence() {
        let controller = Arc::new(ProcessingController::new());
        let detector = CancellingDetector {
            controller: Arc::clone(&controller),
            calls: 0,
            cancel_at: 3,
        };
        let mut pipeline = TrackerPipeline::with_default_config(detector).unwrap();

        let sequence = pipeline.run(frames(5), &controller).unwrap();

        assert_eq!(sequence.len(), 3);
        assert!(sequence.frame(3).is_some());
        assert!(sequence.frame(4).is_none());
        assert_eq!(pipeline.detector().calls, 3);
        assert!(!controller.is_finished());
        assert_eq!(controller.progress(), 60);
        assert!(!controller.error());
    }

    #[test]
    fn test_run_reports_detector_error() {
        let mut pipeline = TrackerPipeline::with_default_config(FailingDetector).unwrap();
        let controller = ProcessingController::new();

        let result = pipeline.run(frames(3), &controller);

        assert!(matches!(result, Err(PipelineError::Detection(LoadError))));
        assert!(controller.error());
        assert_eq!(controller.error_message(), "detection failed: model failed to load");
        assert!(!controller.is_finished());
    }
}
