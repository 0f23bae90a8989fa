//! Per-frame SORT tracking: predict, associate, update, and prune.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::tracker::dedup::Deduplicator;
use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::matching::{self, AssignmentResult, Detection};
use crate::tracker::rect::Rect;
use crate::tracker::track::{Track, TrackId};
use crate::tracker::track_state::Lifecycle;

/// Configuration for the TrackManager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Frames a track may go unmatched before it is deleted
    pub max_age: u32,
    /// Consecutive matches needed before a track is reported
    pub min_hits: u32,
    /// Largest centroid distance, as a fraction of the frame diagonal, for a match
    pub distance_threshold: f64,
    /// Per-axis center offset, in pixels, under which same-class boxes are duplicates
    pub centroid_pixel_threshold: f64,
    /// Inclusive-edge IOU over which same-class boxes are duplicates
    pub iou_threshold: f64,
    /// Suppress duplicate boxes in each frame's output
    pub deduplicate: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_age: 7,
            min_hits: 2,
            distance_threshold: 0.05,
            centroid_pixel_threshold: 10.0,
            iou_threshold: 0.5,
            deduplicate: true,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_age == 0 {
            return Err(TrackerError::InvalidConfig(
                "max_age must be at least 1".to_string(),
            ));
        }
        let thresholds = [
            ("distance_threshold", self.distance_threshold),
            ("centroid_pixel_threshold", self.centroid_pixel_threshold),
            ("iou_threshold", self.iou_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackerError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One reported box of one track in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedBox {
    pub frame: i64,
    pub id: TrackId,
    pub bbox: Rect,
    pub class_id: i32,
    pub confidence: f32,
}

pub struct TrackManager {
    tracks: Vec<Track>,
    next_id: TrackId,
    frame_count: u64,
    config: TrackerConfig,
    dedup: Deduplicator,
    kalman_filter: KalmanFilter,
}

impl TrackManager {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let dedup = Deduplicator::new(config.centroid_pixel_threshold, config.iou_threshold);
        Ok(Self {
            tracks: Vec::new(),
            next_id: 1,
            frame_count: 0,
            config,
            dedup,
            kalman_filter: KalmanFilter::default(),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Live tracks in creation order, reported or not.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Drop every live track. Ids handed out later still never repeat.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.frame_count = 0;
    }

    /// Track one frame of detections.
    ///
    /// `frame` must increase from call to call; `frame_diagonal` is the
    /// diagonal of the frame in pixels and normalizes the matching distance.
    pub fn update(
        &mut self,
        detections: &[Detection],
        frame: i64,
        frame_diagonal: f64,
    ) -> Result<Vec<TrackedBox>> {
        if !(frame_diagonal.is_finite() && frame_diagonal > 0.0) {
            return Err(TrackerError::InvalidFrameDiagonal(frame_diagonal));
        }
        self.frame_count += 1;

        let detections: Vec<&Detection> = detections
            .iter()
            .filter(|det| {
                let valid = det.is_valid();
                if !valid {
                    warn!("frame {frame}: dropping detection with degenerate box {:?}", det.bbox);
                }
                valid
            })
            .collect();

        if self.tracks.is_empty() {
            // Nothing to predict against: every detection starts a track.
            for det in &detections {
                self.spawn(det);
            }
            return Ok(self.emit(frame));
        }

        // Step 1: Predict, dropping tracks whose prediction left the frame
        let kalman_filter = &self.kalman_filter;
        let mut predicted = Vec::with_capacity(self.tracks.len());
        self.tracks.retain_mut(|track| {
            let rect = track.predict(kalman_filter);
            if is_degenerate(&rect) {
                debug!("frame {frame}: dropping track {} with degenerate prediction {rect:?}", track.id());
                false
            } else {
                predicted.push(rect);
                true
            }
        });

        // Step 2: Associate predictions with detections
        let det_rects: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let dists = matching::centroid_distance(&predicted, &det_rects, frame_diagonal);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::linear_assignment(&dists, self.config.distance_threshold)?;

        trace!(
            "frame {frame}: {} tracks, {} detections, {} matches",
            predicted.len(),
            detections.len(),
            matches.len()
        );

        // Step 3: Update matched tracks
        for (itrack, idet) in matches {
            let det = detections[idet];
            self.tracks[itrack].update(&det.bbox, det.class_id, det.confidence, &self.kalman_filter);
        }

        for itrack in unmatched_tracks {
            self.tracks[itrack].mark_missed();
        }

        // Step 4: Init new tracks
        for idet in unmatched_detections {
            self.spawn(detections[idet]);
        }

        // Step 5: Remove tracks unmatched for too long
        let (min_hits, max_age) = (self.config.min_hits, self.config.max_age);
        self.tracks.retain(|track| {
            let deleted = Lifecycle::of(track, frame, min_hits, max_age) == Lifecycle::Deleted;
            if deleted {
                debug!(
                    "frame {frame}: deleting track {} after {} frames unmatched",
                    track.id(),
                    track.time_since_update()
                );
            }
            !deleted
        });

        Ok(self.emit(frame))
    }

    fn spawn(&mut self, det: &Detection) {
        let id = self.next_id;
        self.next_id += 1;
        debug!("new track {id} (class {}, confidence {:.3})", det.class_id, det.confidence);
        self.tracks.push(Track::new(
            id,
            &det.bbox,
            det.class_id,
            det.confidence,
            &self.kalman_filter,
        ));
    }

    fn emit(&self, frame: i64) -> Vec<TrackedBox> {
        let mut output: Vec<TrackedBox> = self
            .tracks
            .iter()
            .filter(|track| {
                Lifecycle::of(track, frame, self.config.min_hits, self.config.max_age)
                    == Lifecycle::Confirmed
            })
            .map(|track| TrackedBox {
                frame,
                id: track.id(),
                bbox: track.rect(),
                class_id: track.class_id,
                confidence: track.confidence,
            })
            .collect();

        if self.config.deduplicate {
            self.dedup.apply(&mut output);
        }
        output
    }
}

/// A prediction is unusable once its top-left goes negative or its size collapses.
fn is_degenerate(rect: &Rect) -> bool {
    !(rect.x >= 0.0 && rect.y >= 0.0) || !rect.has_positive_area()
}
