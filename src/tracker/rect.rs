use serde::{Deserialize, Serialize};

/// Bounding box representation with format conversion utilities.
///
/// Supports three bounding box formats:
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - XYSR: Center X, Center Y, Area (w*h), Aspect Ratio (w/h)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect from XYSR format (center x, center y, area, aspect ratio).
    ///
    /// Width and height are never negative: a non-positive `s * r` decodes to
    /// an empty box. A top-left coordinate that would fall below zero while
    /// its center is positive is clamped to zero.
    pub fn from_xysr(cx: f64, cy: f64, s: f64, r: f64) -> Self {
        let sr = s * r;
        let (w, h) = if sr > 0.0 {
            let w = sr.sqrt();
            (w, s / w)
        } else {
            (0.0, 0.0)
        };

        let mut x = cx - w / 2.0;
        let mut y = cy - h / 2.0;
        if x < 0.0 && cx > 0.0 {
            x = 0.0;
        }
        if y < 0.0 && cy > 0.0 {
            y = 0.0;
        }

        Self::new(x as f32, y as f32, w as f32, h as f32)
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Convert to XYSR format: (center_x, center_y, area, aspect_ratio).
    #[inline]
    pub fn to_xysr(&self) -> [f64; 4] {
        let (cx, cy) = self.center();
        let w = self.width as f64;
        let h = self.height as f64;
        let aspect_ratio = if h > 0.0 { w / h } else { 0.0 };
        [cx as f64, cy as f64, w * h, aspect_ratio]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// True when width and height are finite and strictly positive.
    #[inline]
    pub fn has_positive_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Euclidean distance between the two centers.
    pub fn centroid_distance(&self, other: &Rect) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let dx = (bx - ax) as f64;
        let dy = (by - ay) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Intersection over Union with inclusive pixel edges.
    ///
    /// Both corners count as pixels, so a box spans `width + 1` by
    /// `height + 1` pixels.
    pub fn iou_inclusive(&self, other: &Rect) -> f64 {
        let [ax1, ay1, ax2, ay2] = self.to_tlbr().map(f64::from);
        let [bx1, by1, bx2, by2] = other.to_tlbr().map(f64::from);

        let xa = ax1.max(bx1);
        let ya = ay1.max(by1);
        let xb = ax2.min(bx2);
        let yb = ay2.min(by2);

        let inter_area = (xb - xa + 1.0).max(0.0) * (yb - ya + 1.0).max(0.0);
        let area_a = (ax2 - ax1 + 1.0) * (ay2 - ay1 + 1.0);
        let area_b = (bx2 - bx1 + 1.0) * (by2 - by1 + 1.0);
        let union_area = area_a + area_b - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

/// Length of the frame diagonal in pixels, used to normalize distances.
pub fn frame_diagonal(width: u32, height: u32) -> f64 {
    (width as f64).hypot(height as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_conversions() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        assert_eq!(rect.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);

        let xysr = rect.to_xysr();
        assert_eq!(xysr[0], 25.0); // cx
        assert_eq!(xysr[1], 40.0); // cy
        assert_eq!(xysr[2], 1200.0); // area
        assert_relative_eq!(xysr[3], 0.75); // 30/40
    }

    #[test]
    fn test_from_tlbr() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(rect.to_tlwh(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_from_xysr() {
        let rect = Rect::from_xysr(25.0, 40.0, 1200.0, 0.75);
        assert_relative_eq!(rect.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(rect.y, 20.0, epsilon = 1e-4);
        assert_relative_eq!(rect.width, 30.0, epsilon = 1e-4);
        assert_relative_eq!(rect.height, 40.0, epsilon = 1e-4);
    }

    #[test]
    fn test_from_xysr_clamps_to_origin() {
        // Centered near the corner, the top-left would be negative.
        let rect = Rect::from_xysr(2.0, 3.0, 100.0, 1.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_relative_eq!(rect.width, 10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_from_xysr_negative_center_is_not_clamped() {
        let rect = Rect::from_xysr(-5.0, 10.0, 100.0, 1.0);
        assert!(rect.x < 0.0);
    }

    #[test]
    fn test_from_xysr_negative_area() {
        let rect = Rect::from_xysr(50.0, 50.0, -10.0, 1.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(!rect.has_positive_area());
    }

    #[test]
    fn test_centroid_distance() {
        let a = Rect::new(10.0, 10.0, 20.0, 20.0);
        let b = Rect::new(13.0, 14.0, 20.0, 20.0);
        assert_relative_eq!(a.centroid_distance(&b), 5.0);
    }

    #[test]
    fn test_iou_inclusive() {
        // Inclusive edges: each box covers 11x11 pixels, overlap is 6x6.
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_relative_eq!(a.iou_inclusive(&b), 36.0 / (121.0 + 121.0 - 36.0));
    }

    #[test]
    fn test_iou_inclusive_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(a.iou_inclusive(&b), 0.0);
    }

    #[test]
    fn test_iou_inclusive_same_box() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_relative_eq!(a.iou_inclusive(&a), 1.0);
    }

    #[test]
    fn test_frame_diagonal() {
        assert_relative_eq!(frame_diagonal(640, 480), 800.0);
    }
}
