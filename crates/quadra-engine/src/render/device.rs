use std::fmt;

use glam::Mat4;

use crate::coords::Rect;

/// Opaque texture handle.
///
/// Identity is handle equality: two handles to pixel-identical images are
/// still distinct textures. `TextureId::NONE` is never valid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextureId(u32);

impl TextureId {
    pub const NONE: TextureId = TextureId(0);

    /// Wraps a backend-assigned handle. `0` is reserved for [`TextureId::NONE`].
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// A texture as returned by a backend: handle plus pixel dimensions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Converts a source rect in texels to normalized UV space.
    pub fn uv_rect(&self, texels: Rect) -> Rect {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Rect::new(texels.x() / w, texels.y() / h, texels.width() / w, texels.height() / h)
    }
}

/// Texture filtering used for a whole flush.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Sampling {
    /// Nearest-neighbour; crisp pixel art.
    Point,
    #[default]
    Linear,
}

/// Which dynamic buffer a call refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Per-submission state, fixed for every draw of one flush.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameUniforms {
    pub view_proj: Mat4,
    pub sampling: Sampling,
    /// Grayscale blend amount in `[0, 1]`; 0 keeps full color.
    pub monochrome: f32,
}

/// Error reported by a [`GraphicsDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The requested buffer exceeds what the device can allocate.
    CapacityExceeded { kind: BufferKind, requested: u64, limit: u64 },
    /// The device could not service the request for a backend-specific reason.
    Unavailable(String),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::CapacityExceeded { kind, requested, limit } => write!(
                f,
                "{kind:?} buffer of {requested} bytes exceeds device limit of {limit} bytes"
            ),
            DeviceError::Unavailable(msg) => write!(f, "graphics device unavailable: {msg}"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Texture validity query. Split from [`GraphicsDevice`] so scene code can
/// filter sprites without a live submission.
pub trait TextureRegistry {
    fn texture_valid(&self, texture: TextureId) -> bool;
}

/// The narrow GPU surface the sprite batch talks to.
///
/// Call order within one flush:
/// `create_or_grow_buffer`* → `begin_submission` → `upload_dynamic`* →
/// `draw_indexed`* → `end_submission`.
///
/// All growth happens before `begin_submission`, so a failed growth never
/// leaves a half-recorded submission behind.
pub trait GraphicsDevice: TextureRegistry {
    /// Ensures the buffer of `kind` holds at least `size_bytes`.
    ///
    /// Growing may discard the previous contents.
    fn create_or_grow_buffer(&mut self, kind: BufferKind, size_bytes: u64) -> Result<(), DeviceError>;

    /// Starts a submission with the given per-flush state.
    fn begin_submission(&mut self, uniforms: &FrameUniforms);

    /// Replaces the leading bytes of the buffer of `kind`.
    fn upload_dynamic(&mut self, kind: BufferKind, bytes: &[u8]);

    /// Draws `index_count` indices starting at `first_index`, sampling `texture`.
    fn draw_indexed(&mut self, texture: TextureId, first_index: u32, index_count: u32);

    /// Finishes and submits the recorded draws.
    fn end_submission(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_handle_is_reserved() {
        assert!(TextureId::NONE.is_none());
        assert!(!TextureId::from_raw(7).is_none());
        assert_eq!(TextureId::default(), TextureId::NONE);
    }

    #[test]
    fn uv_rect_normalizes_texels() {
        let tex = Texture { id: TextureId::from_raw(1), width: 256, height: 128 };
        let uv = tex.uv_rect(Rect::new(64.0, 32.0, 32.0, 64.0));
        assert_eq!(uv, Rect::new(0.25, 0.25, 0.125, 0.5));
    }
}
