//! Per-frame scheduling: a run loop that invokes one registered handler per tick.
//!
//! The window's redraw event drives `tick` in the app; tests drive it directly
//! with a [`ManualClock`]. A handler error only costs its own frame.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Monotonic time source for the loop
pub trait FrameClock {
    /// Time since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock starting when the loop is built
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Hand-advanced clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// What a handler sees for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Zero-based tick number, counting skipped frames
    pub index: u64,
    /// Time since the clock origin
    pub elapsed: Duration,
    /// Time since the previous tick (zero on the first)
    pub delta: Duration,
}

impl FrameContext {
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// High-resolution timestamp in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Handler decision after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// Work done once per frame
pub trait FrameHandler {
    fn on_frame(&mut self, frame: &FrameContext) -> Result<FrameControl>;
}

/// Counters for completed and skipped frames plus a smoothed frame rate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub skipped: u64,
    pub fps: f32,
}

impl FrameStats {
    fn record_interval(&mut self, delta: Duration) {
        let secs = delta.as_secs_f32();
        if secs <= 0.0 {
            return;
        }
        let instant = 1.0 / secs;
        self.fps = if self.fps == 0.0 {
            instant
        } else {
            self.fps * 0.9 + instant * 0.1
        };
    }
}

/// Run loop owning its handler and clock
pub struct FrameLoop<H, C = SystemClock> {
    handler: H,
    clock: C,
    last: Option<Duration>,
    index: u64,
    stats: FrameStats,
    running: bool,
}

impl<H: FrameHandler> FrameLoop<H, SystemClock> {
    pub fn new(handler: H) -> Self {
        Self::with_clock(handler, SystemClock::default())
    }
}

impl<H: FrameHandler, C: FrameClock> FrameLoop<H, C> {
    pub fn with_clock(handler: H, clock: C) -> Self {
        Self {
            handler,
            clock,
            last: None,
            index: 0,
            stats: FrameStats::default(),
            running: true,
        }
    }

    /// Run exactly one frame; returns whether the loop is still running
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let elapsed = self.clock.now();
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| elapsed.saturating_sub(last));
        self.last = Some(elapsed);

        let frame = FrameContext {
            index: self.index,
            elapsed,
            delta,
        };
        self.index += 1;
        self.stats.record_interval(delta);

        match self.handler.on_frame(&frame) {
            Ok(FrameControl::Continue) => self.stats.frames += 1,
            Ok(FrameControl::Stop) => {
                self.stats.frames += 1;
                self.running = false;
            }
            Err(e) => {
                self.stats.skipped += 1;
                log::warn!("Frame {} skipped: {}", frame.index, e);
            }
        }

        self.running
    }

    /// Tick until the handler stops the loop or `max_frames` ticks have run
    pub fn run_frames(&mut self, max_frames: u64) -> u64 {
        let mut ticks = 0;
        while ticks < max_frames && self.tick() {
            ticks += 1;
        }
        ticks
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisualizerError;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<FrameContext>,
        fail_on: Option<u64>,
        stop_on: Option<u64>,
    }

    impl FrameHandler for Recorder {
        fn on_frame(&mut self, frame: &FrameContext) -> Result<FrameControl> {
            self.seen.push(*frame);
            if self.fail_on == Some(frame.index) {
                return Err(VisualizerError::Stream("test".to_string()));
            }
            if self.stop_on == Some(frame.index) {
                return Ok(FrameControl::Stop);
            }
            Ok(FrameControl::Continue)
        }
    }

    #[test]
    fn test_one_handler_call_per_tick() {
        let clock = ManualClock::default();
        let mut frame_loop = FrameLoop::with_clock(Recorder::default(), clock.clone());

        for _ in 0..3 {
            clock.advance(Duration::from_millis(16));
            assert!(frame_loop.tick());
        }

        let seen = &frame_loop.handler().seen;
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].delta, Duration::ZERO);
        assert_eq!(seen[1].delta, Duration::from_millis(16));
        assert_eq!(seen[2].elapsed, Duration::from_millis(48));
        assert_eq!(seen[2].index, 2);
        assert_eq!(frame_loop.stats().frames, 3);
    }

    #[test]
    fn test_error_skips_frame_and_keeps_running() {
        let handler = Recorder {
            fail_on: Some(1),
            ..Default::default()
        };
        let mut frame_loop = FrameLoop::with_clock(handler, ManualClock::default());

        assert_eq!(frame_loop.run_frames(4), 4);
        assert!(frame_loop.is_running());
        let stats = frame_loop.stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(frame_loop.handler().seen.len(), 4);
    }

    #[test]
    fn test_handler_can_stop_loop() {
        let handler = Recorder {
            stop_on: Some(2),
            ..Default::default()
        };
        let mut frame_loop = FrameLoop::with_clock(handler, ManualClock::default());

        // The stopping tick reports false, so only two ticks count as continuing
        assert_eq!(frame_loop.run_frames(10), 2);
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.tick());
        assert_eq!(frame_loop.handler().seen.len(), 3);
    }

    #[test]
    fn test_stop_prevents_further_frames() {
        let mut frame_loop = FrameLoop::with_clock(Recorder::default(), ManualClock::default());
        frame_loop.tick();
        frame_loop.stop();
        assert!(!frame_loop.tick());
        assert_eq!(frame_loop.handler().seen.len(), 1);
    }

    #[test]
    fn test_fps_tracks_frame_interval() {
        let clock = ManualClock::default();
        let mut frame_loop = FrameLoop::with_clock(Recorder::default(), clock.clone());
        for _ in 0..50 {
            clock.advance(Duration::from_millis(20));
            frame_loop.tick();
        }
        assert!((frame_loop.stats().fps - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_context_time_units() {
        let frame = FrameContext {
            index: 0,
            elapsed: Duration::from_millis(1500),
            delta: Duration::ZERO,
        };
        assert_eq!(frame.elapsed_ms(), 1500.0);
        assert_eq!(frame.elapsed_secs(), 1.5);
    }
}
