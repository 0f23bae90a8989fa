//! Suppression of near-duplicate tracked boxes.
//!
//! Two tracks can converge on the same physical object. Both passes here
//! only compare boxes of the same class and always keep the more confident
//! box of a pair.

use log::debug;

use crate::tracker::track_manager::TrackedBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deduplicator {
    /// Maximum per-axis center offset, in pixels, for two boxes to be duplicates
    pub centroid_pixel_threshold: f64,
    /// Inclusive-edge IOU above which two boxes are duplicates
    pub iou_threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            centroid_pixel_threshold: 10.0,
            iou_threshold: 0.5,
        }
    }
}

impl Deduplicator {
    pub fn new(centroid_pixel_threshold: f64, iou_threshold: f64) -> Self {
        Self {
            centroid_pixel_threshold,
            iou_threshold,
        }
    }

    /// Run the centroid pass, then the IOU pass.
    pub fn apply(&self, boxes: &mut Vec<TrackedBox>) {
        let threshold = self.centroid_pixel_threshold;
        remove_duplicates(boxes, |a, b| {
            let (ax, ay) = a.bbox.center();
            let (bx, by) = b.bbox.center();
            f64::from((ax - bx).abs()) < threshold && f64::from((ay - by).abs()) < threshold
        });

        let threshold = self.iou_threshold;
        remove_duplicates(boxes, |a, b| a.bbox.iou_inclusive(&b.bbox) > threshold);
    }
}

/// Remove the weaker box of the first same-class duplicate pair found, then
/// rescan from the start until no pair matches.
fn remove_duplicates<F>(boxes: &mut Vec<TrackedBox>, is_duplicate: F)
where
    F: Fn(&TrackedBox, &TrackedBox) -> bool,
{
    while let Some(idx) = find_weaker_duplicate(boxes, &is_duplicate) {
        let removed = boxes.remove(idx);
        debug!(
            "suppressed duplicate track {} (class {}, confidence {:.3})",
            removed.id, removed.class_id, removed.confidence
        );
    }
}

fn find_weaker_duplicate<F>(boxes: &[TrackedBox], is_duplicate: &F) -> Option<usize>
where
    F: Fn(&TrackedBox, &TrackedBox) -> bool,
{
    for (i, a) in boxes.iter().enumerate() {
        for (j, b) in boxes.iter().enumerate().skip(i + 1) {
            if a.class_id == b.class_id && is_duplicate(a, b) {
                // Ties keep the earlier box.
                return Some(if a.confidence >= b.confidence { j } else { i });
            }
        }
    }
    None
}
