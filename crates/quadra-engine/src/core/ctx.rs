use crate::input::InputSnapshot;
use crate::time::FrameTime;

/// Per-frame context threaded through update calls.
///
/// Carries time, pause state, and input explicitly so nothing reads
/// process-wide state during a frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameContext<'a> {
    pub time: FrameTime,
    pub input: &'a InputSnapshot,
}

impl<'a> FrameContext<'a> {
    #[inline]
    pub fn new(time: FrameTime, input: &'a InputSnapshot) -> Self {
        Self { time, input }
    }

    /// Delta time in seconds; zero while paused.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.time.dt
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.time.paused
    }
}
