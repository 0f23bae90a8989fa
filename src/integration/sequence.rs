//! Per-sequence tracking record handed to a persistence layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tracker::TrackedBox;

/// Tracked boxes of a whole sequence, keyed by frame number.
///
/// Serializable with any serde format so the storage layer can choose its
/// own encoding; class names travel with the boxes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedSequence {
    pub class_names: Vec<String>,
    pub frames: BTreeMap<i64, Vec<TrackedBox>>,
}

impl TrackedSequence {
    pub fn new(class_names: Vec<String>) -> Self {
        Self {
            class_names,
            frames: BTreeMap::new(),
        }
    }

    /// Store the output of one frame, replacing any earlier entry for it.
    pub fn insert(&mut self, frame: i64, boxes: Vec<TrackedBox>) {
        self.frames.insert(frame, boxes);
    }

    pub fn frame(&self, frame: i64) -> Option<&[TrackedBox]> {
        self.frames.get(&frame).map(Vec::as_slice)
    }

    /// Name of a class id, if the sequence carries one.
    pub fn class_name(&self, class_id: i32) -> Option<&str> {
        usize::try_from(class_id)
            .ok()
            .and_then(|idx| self.class_names.get(idx))
            .map(String::as_str)
    }

    /// Number of frames recorded.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &[TrackedBox])> {
        self.frames.iter().map(|(frame, boxes)| (*frame, boxes.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Rect;

    fn tracked(frame: i64, id: u64) -> TrackedBox {
        TrackedBox {
            frame,
            id,
            bbox: Rect::new(10.5, 20.25, 30.0, 40.0),
            class_id: 1,
            confidence: 0.875,
        }
    }

    #[test]
    fn test_frames_are_ordered() {
        let mut seq = TrackedSequence::new(vec!["person".into(), "car".into()]);
        seq.insert(3, vec![tracked(3, 1)]);
        seq.insert(1, vec![tracked(1, 1), tracked(1, 2)]);
        seq.insert(2, vec![]);

        let frames: Vec<i64> = seq.iter().map(|(f, _)| f).collect();
        assert_eq!(frames, vec![1, 2, 3]);
        assert_eq!(seq.frame(1).map(<[TrackedBox]>::len), Some(2));
        assert!(seq.frame(7).is_none());
        assert_eq!(seq.class_name(1), Some("car"));
        assert_eq!(seq.class_name(-1), None);
    }

    #[test]
    fn test_serde_preserves_classes_and_boxes() {
        let mut seq = TrackedSequence::new(vec!["person".into(), "car".into()]);
        seq.insert(1, vec![tracked(1, 1)]);
        seq.insert(2, vec![tracked(2, 1), tracked(2, 4)]);

        let json = serde_json::to_string(&seq).unwrap();
        let restored: TrackedSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, seq);
    }
}
