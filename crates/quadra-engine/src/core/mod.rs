//! Frame-level context shared by the scene and UI layers.

mod ctx;

pub use ctx::FrameContext;
