use std::time::{Duration, Instant};

/// Frame timing snapshot handed to update code.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped. Zero while paused.
    pub dt: f32,

    /// Unpaused seconds accumulated since the clock started.
    pub elapsed: f64,

    /// Monotonic frame counter; counts paused frames too.
    pub frame_index: u64,

    pub paused: bool,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per loop, so nothing shares delta-time state through globals.
///
/// Delta time is clamped to avoid pathological values when the application is
/// stopped by a debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    elapsed: f64,
    paused: bool,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            elapsed: 0.0,
            paused: false,
            dt_min,
            dt_max,
        }
    }

    /// Resets the wall-clock baseline, e.g. after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("frame clock: {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advances by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.advance(dt)
    }

    /// Advances by an explicit duration. Used for fixed steps and tests.
    pub fn advance(&mut self, dt: Duration) -> FrameTime {
        let dt = dt.clamp(self.dt_min, self.dt_max);
        let dt = if self.paused { 0.0 } else { dt.as_secs_f32() };
        self.elapsed += f64::from(dt);

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            frame_index: self.frame_index,
            paused: self.paused,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
