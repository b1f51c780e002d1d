//! GPU seam and backends.
//!
//! The sprite batch only sees [`GraphicsDevice`]. Two implementations ship:
//! - [`WgpuDevice`]: the real backend (one command submission per flush)
//! - [`RecordingDevice`]: headless, records every call for tests and tools
//!
//! Convention:
//! - vertex positions are world pixels; the view-projection uniform maps them to clip space
//! - the uniform matrix is column-major (`Mat4::to_cols_array`)

mod ctx;
mod device;
mod gpu;
pub mod recording;

pub use ctx::RenderCtx;
pub use device::{
    BufferKind, DeviceError, FrameUniforms, GraphicsDevice, Sampling, Texture, TextureId,
    TextureRegistry,
};
pub use gpu::WgpuDevice;
pub use recording::{DrawCall, RecordingDevice, Submission};
