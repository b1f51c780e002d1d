use crate::coords::{Rect, Vec2};
use crate::render::TextureId;

/// Per-glyph metrics in unscaled font pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Glyph {
    /// Source region in normalized UV space of [`Font::texture`].
    pub uv: Rect,
    /// Bitmap size. Zero for whitespace.
    pub size: Vec2,
    /// Offset from the pen position on the baseline to the bitmap's top-left.
    /// `y` is negative for glyphs that rise above the baseline.
    pub bearing: Vec2,
    /// Horizontal pen advance.
    pub advance: f32,
}

impl Glyph {
    /// True when the glyph produces no visible quad.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LineMetrics {
    pub line_height: f32,
    /// Distance from the top of a line to the baseline (positive).
    pub ascent: f32,
    /// Distance from the baseline to the bottom of a line (positive).
    pub descent: f32,
}

/// A rasterized font: glyph lookup by code point plus line metrics, all
/// sampled from one texture.
pub trait Font {
    fn glyph(&self, ch: char) -> Option<Glyph>;

    fn line_metrics(&self) -> LineMetrics;

    fn texture(&self) -> TextureId;
}
