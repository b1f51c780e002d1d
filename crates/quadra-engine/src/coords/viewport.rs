/// Output size in physical pixels, clamped so it never degenerates.
///
/// The camera uses this to map pointer coordinates back into world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport, clamping each dimension to at least one pixel.
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width: clamp_dim(width), height: clamp_dim(height) }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1.0, height: 1.0 }
    }
}

/// Clamps a size component to `>= 1`; NaN also becomes 1.
#[inline]
pub(crate) fn clamp_dim(v: f32) -> f32 {
    if v.is_nan() || v < 1.0 { 1.0 } else { v.min(f32::MAX) }
}
