//! Frame clock for the engine.
//!
//! The backdrop advances one fixed step per frame and never scales motion by
//! elapsed time. The clock exists for the host and for diagnostics: frame
//! count, running time that excludes stopped periods, and an FPS estimate.
//!
//! # Example
//!
//! ```
//! use motefield::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! clock.tick();
//! assert_eq!(clock.frame(), 1);
//! ```

use std::time::{Duration, Instant};

/// Frame counting and timing while the engine runs.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// Total frames ticked.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// When the clock was paused, if it is.
    paused_at: Option<Instant>,
    /// Accumulated time spent paused.
    paused_total: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    /// Record one frame. Ignored while paused. Returns the frame number.
    pub fn tick(&mut self) -> u64 {
        if self.paused_at.is_some() {
            return self.frame_count;
        }

        let now = Instant::now();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.frame_count
    }

    /// Stop counting time until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if let Some(at) = self.paused_at.take() {
            let now = Instant::now();
            self.paused_total += now.duration_since(at);
            // The FPS window restarts so a long pause does not read as a slow frame.
            self.fps_update_time = now;
            self.fps_frame_count = self.frame_count;
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Frames ticked since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Running time, excluding paused periods.
    pub fn elapsed(&self) -> Duration {
        let end = self.paused_at.unwrap_or_else(Instant::now);
        end.duration_since(self.start).saturating_sub(self.paused_total)
    }

}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.tick(), 2);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_paused_clock_ignores_ticks() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.pause();
        assert!(clock.is_paused());

        assert_eq!(clock.tick(), 1);
        clock.resume();
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn test_elapsed_excludes_pause() {
        let mut clock = FrameClock::new();
        clock.pause();
        let frozen = clock.elapsed();
        thread::sleep(Duration::from_millis(20));

        // Elapsed should not increase while paused
        assert_eq!(clock.elapsed(), frozen);

        clock.resume();
        assert!(clock.elapsed() < Duration::from_millis(20));
    }

    #[test]
    fn test_fps_estimate() {
        let mut clock = FrameClock::new();
        clock.fps_update_interval = Duration::from_millis(10);
        clock.tick();
        thread::sleep(Duration::from_millis(15));
        clock.tick();
        assert!(clock.fps() > 0.0);
    }
}
