/// Gapless playback cursor for inbound audio.
///
/// Each buffer starts at `max(cursor, now)` and pushes the cursor forward by
/// its own duration, so buffers that arrive ahead of real time play
/// back-to-back and late ones start immediately.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackScheduler {
    cursor: f64,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self, now: f64) {
        self.cursor = now;
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Returns the start time for a buffer of `duration` seconds.
    pub fn schedule(&mut self, now: f64, duration: f64) -> f64 {
        let start = self.cursor.max(now);
        self.cursor = start + duration;
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_buffers_play_back_to_back() {
        let mut s = PlaybackScheduler::new();
        s.reset(1.0);
        let durations = [0.25, 0.5, 0.125];
        let mut starts = Vec::new();
        for d in durations {
            starts.push(s.schedule(1.0, d));
        }
        assert_eq!(starts, vec![1.0, 1.25, 1.75]);
        for n in 0..2 {
            assert_eq!(starts[n + 1], starts[n] + durations[n]);
        }
    }

    #[test]
    fn late_buffer_starts_now_leaving_a_gap() {
        let mut s = PlaybackScheduler::new();
        s.reset(0.0);
        let first = s.schedule(0.0, 0.5);
        let second = s.schedule(2.0, 0.5);
        assert_eq!(first, 0.0);
        assert_eq!(second, 2.0);
        assert!(second >= first + 0.5);
        assert_eq!(s.cursor(), 2.5);
    }

    #[test]
    fn starts_never_overlap() {
        let mut s = PlaybackScheduler::new();
        let arrivals = [(0.0, 0.3), (0.1, 0.3), (0.9, 0.2), (0.95, 0.4), (3.0, 0.1)];
        let mut prev: Option<(f64, f64)> = None;
        for (now, d) in arrivals {
            let start = s.schedule(now, d);
            assert!(start >= now);
            if let Some((ps, pd)) = prev {
                assert!(start >= ps + pd);
            }
            prev = Some((start, d));
        }
    }
}
