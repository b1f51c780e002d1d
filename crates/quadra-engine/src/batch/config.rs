use crate::render::Sampling;

/// Global batch state, read once per flush rather than per command.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Quad capacity requested up front by [`SpriteBatch::with_device`](super::SpriteBatch::with_device).
    pub initial_quads: usize,

    /// Texture filtering for every draw of the flush.
    pub sampling: Sampling,

    /// Grayscale blend amount in `[0, 1]`.
    pub monochrome: f32,

    /// Round destination rect origins to whole pixels before building vertices.
    pub pixel_snap: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            initial_quads: 256,
            sampling: Sampling::Linear,
            monochrome: 0.0,
            pixel_snap: false,
        }
    }
}
