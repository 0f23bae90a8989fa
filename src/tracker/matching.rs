//! Matching utilities for multi-object tracking.

use log::trace;
use ndarray::Array2;

use crate::error::Result;
use crate::tracker::hungarian;
use crate::tracker::rect::Rect;

/// Detection input for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Bounding box in TLWH format
    pub bbox: Rect,
    /// Object category reported by the detector
    pub class_id: i32,
    /// Detection confidence score in `0..=1`
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: Rect, class_id: i32, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }

    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32, class_id: i32, confidence: f32) -> Self {
        Self::new(Rect::from_tlbr(x1, y1, x2, y2), class_id, confidence)
    }

    /// Only boxes with a finite, strictly positive size may seed or update a track.
    pub fn is_valid(&self) -> bool {
        self.bbox.has_positive_area() && self.bbox.x.is_finite() && self.bbox.y.is_finite()
    }
}

/// Centroid distance between every track and detection box, divided by the
/// frame diagonal.
pub fn centroid_distance(
    track_boxes: &[Rect],
    det_boxes: &[Rect],
    frame_diagonal: f64,
) -> Array2<f64> {
    let mut dists = Array2::zeros((track_boxes.len(), det_boxes.len()));
    for (i, t) in track_boxes.iter().enumerate() {
        for (j, d) in det_boxes.iter().enumerate() {
            dists[[i, j]] = t.centroid_distance(d) / frame_diagonal;
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Solve the assignment and split it by the distance threshold.
///
/// A pair the solver assigned with a cost above `thresh` is too far apart to
/// be the same object and is reported unmatched on both sides.
pub fn linear_assignment(cost_matrix: &Array2<f64>, thresh: f64) -> Result<AssignmentResult> {
    let (num_rows, num_cols) = cost_matrix.dim();
    let assignment = hungarian::solve(cost_matrix)?;

    let mut matches = vec![];
    let mut unmatched_tracks = vec![];
    let mut unmatched_detections_mask: Vec<bool> = vec![true; num_cols];

    for (row_idx, col) in assignment.into_iter().enumerate() {
        match col {
            Some(col_idx) if cost_matrix[[row_idx, col_idx]] <= thresh => {
                matches.push((row_idx, col_idx));
                unmatched_detections_mask[col_idx] = false;
            }
            Some(col_idx) => {
                trace!(
                    "rejecting pair ({row_idx}, {col_idx}) with cost {:.4} over {thresh}",
                    cost_matrix[[row_idx, col_idx]]
                );
                unmatched_tracks.push(row_idx);
            }
            None => unmatched_tracks.push(row_idx),
        }
    }

    let unmatched_detections: Vec<usize> = unmatched_detections_mask
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { Some(i) } else { None })
        .collect();

    trace!(
        "{num_rows}x{num_cols} assignment: {} matched, {} unmatched tracks, {} unmatched detections",
        matches.len(),
        unmatched_tracks.len(),
        unmatched_detections.len()
    );

    Ok(AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    })
}
