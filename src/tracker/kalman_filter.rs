//! Kalman filter for bounding box tracking using ndarray and a nalgebra-based inverse.
//!
//! The state is `[cx, cy, s, r, vcx, vcy, vs]`: box center, area, aspect
//! ratio, and the velocities of center and area. The aspect ratio has no
//! velocity term.

use log::warn;
use ndarray::{Array1, Array2};

const STATE_DIM: usize = 7;
const MEASURE_DIM: usize = 4;

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    process_noise: Array2<f64>,
    measurement_noise: Array2<f64>,
    initial_covariance: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl KalmanFilter {
    pub fn new() -> Self {
        let mut motion_mat = Array2::eye(STATE_DIM);
        // cx, cy and s advance by their velocities; r has none.
        for i in 0..3 {
            motion_mat[[i, MEASURE_DIM + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((MEASURE_DIM, STATE_DIM));
        for i in 0..MEASURE_DIM {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            process_noise: Array2::<f64>::eye(STATE_DIM) * 1e-1,
            measurement_noise: Array2::<f64>::eye(MEASURE_DIM) * 1e-4,
            initial_covariance: 1e-2,
        }
    }

    pub fn initiate(&self, measurement: [f64; 4]) -> (Array1<f64>, Array2<f64>) {
        let mut mean = Array1::zeros(STATE_DIM);
        for i in 0..MEASURE_DIM {
            mean[i] = measurement[i];
        }
        let cov = Array2::<f64>::eye(STATE_DIM) * self.initial_covariance;
        (mean, cov)
    }

    pub fn predict(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let new_mean = self.motion_mat.dot(mean);
        let new_covariance =
            self.motion_mat.dot(covariance).dot(&self.motion_mat.t()) + &self.process_noise;

        (new_mean, new_covariance)
    }

    pub fn project(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
    ) -> (Array1<f64>, Array2<f64>) {
        let mean_proj = self.update_mat.dot(mean);
        let covariance_proj = self.update_mat.dot(covariance).dot(&self.update_mat.t())
            + &self.measurement_noise;

        (mean_proj, covariance_proj)
    }

    /// Correct the state with a `[cx, cy, s, r]` measurement.
    ///
    /// If the innovation covariance cannot be inverted the prior is returned
    /// unchanged.
    pub fn update(
        &self,
        mean: &Array1<f64>,
        covariance: &Array2<f64>,
        measurement: [f64; 4],
    ) -> (Array1<f64>, Array2<f64>) {
        let (projected_mean, projected_cov) = self.project(mean, covariance);

        let measurement_arr = Array1::from_vec(measurement.to_vec());
        let innovation = measurement_arr - projected_mean;

        // K = P * H^T * S^-1
        let Some(s_inv) = invert_4x4(&projected_cov) else {
            warn!("innovation covariance is singular, skipping correction");
            return (mean.clone(), covariance.clone());
        };

        let pht = covariance.dot(&self.update_mat.t()); // 7x4
        let kalman_gain = pht.dot(&s_inv); // 7x4

        let new_mean = mean + &kalman_gain.dot(&innovation);
        let new_covariance = covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        (new_mean, new_covariance)
    }
}

/// Invert a 4x4 matrix using nalgebra (pure Rust).
fn invert_4x4(m: &Array2<f64>) -> Option<Array2<f64>> {
    let nm = nalgebra::Matrix4::from_fn(|i, j| m[[i, j]]);
    let inv = nm.try_inverse()?;
    Some(Array2::from_shape_fn((4, 4), |(i, j)| inv[(i, j)]))
}
