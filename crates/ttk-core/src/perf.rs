//! Frame and render timing for host loops.
//!
//! A [`PerformanceMonitor`] keeps the last N frame intervals and render
//! durations in ring buffers and derives FPS and timing aggregates from
//! them. It is optional instrumentation: nothing in the toolkit requires it.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  host loop                                                 │
//! │    start_frame() ──► frame interval ──► frame_times (N)    │
//! │    start_render()                                          │
//! │      ... draw + refresh ...                                │
//! │    end_render()  ──► render duration ──► render_times (N)  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use ttk_core::perf::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new(60);
//! for _ in 0..3 {
//!     monitor.start_frame();
//!     monitor.start_render();
//!     // draw...
//!     monitor.end_render();
//! }
//! assert_eq!(monitor.total_frames(), 3);
//! ```
//!
//! With a history size of zero every aggregate reads as zero.

use serde::Serialize;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<Duration>>);

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

/// Snapshot of every aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerfSummary {
    /// FPS over the recent window.
    pub fps: f64,
    /// Frames per second since construction or reset.
    pub average_fps: f64,
    /// Mean recent render time.
    pub render_time_ms: f64,
    /// Fastest recent render.
    pub min_render_time_ms: f64,
    /// Slowest recent render.
    pub max_render_time_ms: f64,
    /// Mean recent frame interval.
    pub frame_time_ms: f64,
    /// Frames counted since construction or reset.
    pub total_frames: u64,
    /// Seconds since construction or reset.
    pub uptime_secs: f64,
}

/// Ring-buffered frame/render statistics.
#[derive(Debug)]
pub struct PerformanceMonitor<C: Clock = SystemClock> {
    clock: C,
    history_size: usize,
    frame_times: VecDeque<Duration>,
    render_times: VecDeque<Duration>,
    last_frame: Option<Duration>,
    render_started: Option<Duration>,
    total_frames: u64,
    started_at: Duration,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(60)
    }
}

impl PerformanceMonitor {
    /// Monitor keeping the last `history_size` samples, on the wall clock.
    #[must_use]
    pub fn new(history_size: usize) -> Self {
        Self::with_clock(history_size, SystemClock::default())
    }
}

impl<C: Clock> PerformanceMonitor<C> {
    /// Monitor on a caller-supplied clock.
    pub fn with_clock(history_size: usize, clock: C) -> Self {
        let started_at = clock.now();
        Self {
            clock,
            history_size,
            frame_times: VecDeque::with_capacity(history_size),
            render_times: VecDeque::with_capacity(history_size),
            last_frame: None,
            render_started: None,
            total_frames: 0,
            started_at,
        }
    }

    /// Ring buffer capacity.
    #[must_use]
    pub const fn history_size(&self) -> usize {
        self.history_size
    }

    fn push(buf: &mut VecDeque<Duration>, cap: usize, sample: Duration) {
        if cap == 0 {
            return;
        }
        if buf.len() == cap {
            buf.pop_front();
        }
        buf.push_back(sample);
    }

    /// Mark the start of a frame. The first call only sets the baseline interval.
    pub fn start_frame(&mut self) {
        let now = self.clock.now();
        if let Some(last) = self.last_frame {
            Self::push(&mut self.frame_times, self.history_size, now.saturating_sub(last));
        }
        self.last_frame = Some(now);
        self.total_frames += 1;
    }

    /// Mark the start of rendering.
    pub fn start_render(&mut self) {
        self.render_started = Some(self.clock.now());
    }

    /// Mark the end of rendering. Without a matching `start_render` this does nothing.
    pub fn end_render(&mut self) {
        if let Some(start) = self.render_started.take() {
            let elapsed = self.clock.now().saturating_sub(start);
            Self::push(&mut self.render_times, self.history_size, elapsed);
        }
    }

    fn mean(buf: &VecDeque<Duration>) -> Option<Duration> {
        let n = u32::try_from(buf.len()).ok().filter(|&n| n > 0)?;
        Some(buf.iter().sum::<Duration>() / n)
    }

    fn ms(d: Duration) -> f64 {
        d.as_secs_f64() * 1000.0
    }

    /// Reciprocal of the mean recent frame interval.
    #[must_use]
    pub fn fps(&self) -> f64 {
        match Self::mean(&self.frame_times) {
            Some(mean) if !mean.is_zero() => 1.0 / mean.as_secs_f64(),
            _ => 0.0,
        }
    }

    /// Total frames over uptime.
    #[must_use]
    pub fn average_fps(&self) -> f64 {
        let uptime = self.uptime().as_secs_f64();
        if uptime > 0.0 {
            self.total_frames as f64 / uptime
        } else {
            0.0
        }
    }

    /// Mean recent render time in milliseconds.
    #[must_use]
    pub fn render_time_ms(&self) -> f64 {
        Self::mean(&self.render_times).map_or(0.0, Self::ms)
    }

    /// Fastest recent render in milliseconds.
    #[must_use]
    pub fn min_render_time_ms(&self) -> f64 {
        self.render_times.iter().min().copied().map_or(0.0, Self::ms)
    }

    /// Slowest recent render in milliseconds.
    #[must_use]
    pub fn max_render_time_ms(&self) -> f64 {
        self.render_times.iter().max().copied().map_or(0.0, Self::ms)
    }

    /// Mean recent frame interval in milliseconds.
    #[must_use]
    pub fn frame_time_ms(&self) -> f64 {
        Self::mean(&self.frame_times).map_or(0.0, Self::ms)
    }

    /// Frames counted since construction or reset.
    #[must_use]
    pub const fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Time since construction or reset.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.clock.now().saturating_sub(self.started_at)
    }

    /// Every aggregate at once.
    #[must_use]
    pub fn summary(&self) -> PerfSummary {
        PerfSummary {
            fps: self.fps(),
            average_fps: self.average_fps(),
            render_time_ms: self.render_time_ms(),
            min_render_time_ms: self.min_render_time_ms(),
            max_render_time_ms: self.max_render_time_ms(),
            frame_time_ms: self.frame_time_ms(),
            total_frames: self.total_frames,
            uptime_secs: self.uptime().as_secs_f64(),
        }
    }

    /// Drop all samples and counters and restart the uptime clock.
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.render_times.clear();
        self.last_frame = None;
        self.render_started = None;
        self.total_frames = 0;
        self.started_at = self.clock.now();
    }
}
