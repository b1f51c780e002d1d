//! Time subsystem.
//!
//! Frame timing without globals:
//! - one `FrameClock` per loop
//! - call `tick()` (or `advance(dt)` for fixed steps) once per frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
