//! Frame clocks.
//!
//! The engine never reads the system time itself. Each frame it asks a
//! [`FrameClock`] for the elapsed seconds since start, so the same engine
//! runs against wall time in the viewer and against a hand-stepped
//! [`ManualClock`] in tests.
//!
//! # Example
//!
//! ```ignore
//! use heart_morph::time::{FrameClock, Time};
//!
//! let mut time = Time::new();
//!
//! // Once per refresh:
//! let (elapsed, delta) = time.tick();
//! println!("Elapsed: {:.2}s  FPS: {:.1}", elapsed, time.fps());
//! ```

use std::time::{Duration, Instant};

/// Source of elapsed time, advanced once per displayed frame.
pub trait FrameClock {
    /// Advance to the current frame and return `(elapsed, delta)` in seconds.
    fn tick(&mut self) -> (f32, f32);

    /// Elapsed seconds as of the last tick.
    fn elapsed(&self) -> f32;
}

/// Wall-clock time tracking for rendering.
///
/// Tracks elapsed time, delta time, frame count and a periodically refreshed
/// FPS estimate. Pausing freezes elapsed time, which freezes every animation
/// driven from it.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds (cached for fast access).
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Total time spent paused, excluded from elapsed.
    pause_elapsed: Duration,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
        }
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause time progression.
    ///
    /// While paused, the delta is 0 and elapsed time stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression after pausing.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl FrameClock for Time {
    fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = (now.duration_since(self.start) - self.pause_elapsed).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    #[inline]
    fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock stepped by hand, one fixed delta per tick.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: f32,
    step: f32,
    last_delta: f32,
}

impl ManualClock {
    /// Clock that advances `step` seconds on every tick.
    pub fn new(step: f32) -> Self {
        Self {
            elapsed: 0.0,
            step,
            last_delta: 0.0,
        }
    }

    /// Clock ticking at `hz` frames per second.
    pub fn at_hz(hz: f32) -> Self {
        Self::new(1.0 / hz)
    }

    /// Jump to an absolute time. The next tick continues from there.
    pub fn set(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
    }
}

impl FrameClock for ManualClock {
    fn tick(&mut self) -> (f32, f32) {
        self.elapsed += self.step;
        self.last_delta = self.step;
        (self.elapsed, self.last_delta)
    }

    #[inline]
    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn time_starts_at_frame_zero() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert!(!time.is_paused());
    }

    #[test]
    fn time_tick_advances() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.tick();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn paused_time_stands_still() {
        let mut time = Time::new();
        time.tick();

        time.pause();
        let elapsed_before = time.elapsed();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.tick();

        assert_eq!(elapsed, elapsed_before);
        assert_eq!(delta, 0.0);
    }

    #[test]
    fn resume_excludes_paused_span() {
        let mut time = Time::new();
        time.pause();
        thread::sleep(Duration::from_millis(50));
        time.resume();
        let (elapsed, _) = time.tick();
        assert!(elapsed < 0.05);
    }

    #[test]
    fn manual_clock_steps_exactly() {
        let mut clock = ManualClock::new(0.25);
        assert_eq!(clock.tick(), (0.25, 0.25));
        assert_eq!(clock.tick(), (0.5, 0.25));
        clock.set(10.0);
        assert_eq!(clock.tick().0, 10.25);
        assert_eq!(clock.elapsed(), 10.25);
    }
}
