//! Single object track for multi-object tracking.

use ndarray::{Array1, Array2};

use crate::tracker::kalman_filter::KalmanFilter;
use crate::tracker::rect::Rect;

/// Track identifier, unique within one `TrackManager`.
pub type TrackId = u64;

/// Kalman state of one tracked object together with its hit bookkeeping.
#[derive(Debug, Clone)]
pub struct StateEstimator {
    /// Kalman filter state mean (7-dim)
    mean: Array1<f64>,
    /// Kalman filter state covariance (7x7)
    covariance: Array2<f64>,
    /// Number of predictions since creation
    age: u32,
    /// Total number of successful updates, including the initial box
    hits: u32,
    /// Consecutive successful updates
    hit_streak: u32,
    /// Predictions since the last successful update
    time_since_update: u32,
}

impl StateEstimator {
    /// Initialize from an observed box; velocities start at zero.
    pub fn new(bbox: &Rect, kalman_filter: &KalmanFilter) -> Self {
        let (mean, covariance) = kalman_filter.initiate(bbox.to_xysr());
        Self {
            mean,
            covariance,
            age: 0,
            hits: 1,
            hit_streak: 1,
            time_since_update: 0,
        }
    }

    /// Advance the state one frame and return the predicted box.
    pub fn predict(&mut self, kalman_filter: &KalmanFilter) -> Rect {
        let (mean, covariance) = kalman_filter.predict(&self.mean, &self.covariance);
        self.mean = mean;
        self.covariance = covariance;

        self.age += 1;
        if self.time_since_update > 0 {
            self.hit_streak = 0;
        }
        self.time_since_update += 1;

        self.get_state()
    }

    /// Correct the state with an observed box.
    pub fn update(&mut self, bbox: &Rect, kalman_filter: &KalmanFilter) {
        let (mean, covariance) =
            kalman_filter.update(&self.mean, &self.covariance, bbox.to_xysr());
        self.mean = mean;
        self.covariance = covariance;

        self.time_since_update = 0;
        self.hits += 1;
        self.hit_streak += 1;
    }

    /// Current posterior decoded to a box.
    pub fn get_state(&self) -> Rect {
        Rect::from_xysr(self.mean[0], self.mean[1], self.mean[2], self.mean[3])
    }

    /// Record a frame without a match.
    pub fn mark_missed(&mut self) {
        self.hit_streak = 0;
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn hit_streak(&self) -> u32 {
        self.hit_streak
    }

    pub fn time_since_update(&self) -> u32 {
        self.time_since_update
    }

    /// Velocity of the box center in pixels per frame.
    pub fn velocity(&self) -> (f64, f64) {
        (self.mean[4], self.mean[5])
    }
}

/// A persistent object identity maintained across frames.
#[derive(Debug, Clone)]
pub struct Track {
    id: TrackId,
    estimator: StateEstimator,
    /// Class of the most recently matched detection
    pub class_id: i32,
    /// Confidence of the most recently matched detection
    pub confidence: f32,
}

impl Track {
    pub fn new(
        id: TrackId,
        bbox: &Rect,
        class_id: i32,
        confidence: f32,
        kalman_filter: &KalmanFilter,
    ) -> Self {
        Self {
            id,
            estimator: StateEstimator::new(bbox, kalman_filter),
            class_id,
            confidence,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn estimator(&self) -> &StateEstimator {
        &self.estimator
    }

    /// Current posterior box.
    pub fn rect(&self) -> Rect {
        self.estimator.get_state()
    }

    pub fn predict(&mut self, kalman_filter: &KalmanFilter) -> Rect {
        self.estimator.predict(kalman_filter)
    }

    /// Apply a matched observation; class and confidence follow the latest detection.
    pub fn update(
        &mut self,
        bbox: &Rect,
        class_id: i32,
        confidence: f32,
        kalman_filter: &KalmanFilter,
    ) {
        self.estimator.update(bbox, kalman_filter);
        self.class_id = class_id;
        self.confidence = confidence;
    }

    pub fn mark_missed(&mut self) {
        self.estimator.mark_missed();
    }

    pub fn age(&self) -> u32 {
        self.estimator.age()
    }

    pub fn hits(&self) -> u32 {
        self.estimator.hits()
    }

    pub fn hit_streak(&self) -> u32 {
        self.estimator.hit_streak()
    }

    pub fn time_since_update(&self) -> u32 {
        self.estimator.time_since_update()
    }
}
