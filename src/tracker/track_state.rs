use crate::tracker::track::Track;

/// Lifecycle stage of a track, derived from its hit counters each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Alive but not reported: still building a hit streak, or missed this frame
    #[default]
    Tentative,
    /// Reported in the frame's output
    Confirmed,
    /// Unmatched for `max_age` frames; removed from the live set
    Deleted,
}

impl Lifecycle {
    /// Classify `track` at `frame`.
    ///
    /// Tracks are reported when freshly matched with a long enough streak,
    /// or unconditionally during the first `min_hits` frames of a sequence,
    /// before any streak could have built up.
    pub fn of(track: &Track, frame: i64, min_hits: u32, max_age: u32) -> Self {
        let since_update = track.time_since_update();
        if since_update >= max_age {
            Lifecycle::Deleted
        } else if (since_update < 1 && track.hit_streak() >= min_hits) || frame <= i64::from(min_hits)
        {
            Lifecycle::Confirmed
        } else {
            Lifecycle::Tentative
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::kalman_filter::KalmanFilter;
    use crate::tracker::rect::Rect;

    fn track() -> (Track, KalmanFilter) {
        let kf = KalmanFilter::new();
        (Track::new(1, &Rect::new(10.0, 10.0, 20.0, 20.0), 0, 0.9, &kf), kf)
    }

    #[test]
    fn test_warm_up_frames_are_confirmed() {
        let (track, _) = track();
        assert_eq!(Lifecycle::of(&track, 1, 2, 7), Lifecycle::Confirmed);
        assert_eq!(Lifecycle::of(&track, 2, 2, 7), Lifecycle::Confirmed);
        // hit_streak is 1, below min_hits, once past warm-up.
        assert_eq!(Lifecycle::of(&track, 3, 2, 7), Lifecycle::Tentative);
    }

    #[test]
    fn test_streak_confirms() {
        let (mut track, kf) = track();
        track.predict(&kf);
        track.update(&Rect::new(11.0, 10.0, 20.0, 20.0), 0, 0.9, &kf);
        assert_eq!(Lifecycle::of(&track, 10, 2, 7), Lifecycle::Confirmed);
    }

    #[test]
    fn test_missed_frame_is_not_confirmed() {
        let (mut track, kf) = track();
        track.predict(&kf);
        track.update(&Rect::new(11.0, 10.0, 20.0, 20.0), 0, 0.9, &kf);
        track.predict(&kf);
        assert_eq!(Lifecycle::of(&track, 10, 2, 7), Lifecycle::Tentative);
    }

    #[test]
    fn test_deleted_at_max_age() {
        let (mut track, kf) = track();
        for _ in 0..6 {
            track.predict(&kf);
        }
        assert_eq!(Lifecycle::of(&track, 20, 2, 7), Lifecycle::Tentative);
        track.predict(&kf);
        assert_eq!(Lifecycle::of(&track, 20, 2, 7), Lifecycle::Deleted);
    }
}
