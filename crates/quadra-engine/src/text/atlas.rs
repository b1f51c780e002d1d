use std::collections::HashMap;

use crate::coords::{Rect, Vec2};
use crate::render::TextureId;

use super::{Font, FontLoadError, Glyph, LineMetrics};

/// Rasterization settings for [`FontAtlas::from_bytes`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlasConfig {
    /// Pixel size glyphs are rasterized at.
    pub px: f32,
    /// Characters baked into the atlas.
    pub charset: String,
    /// Empty texels around each glyph.
    pub padding: u32,
}

impl Default for FontAtlasConfig {
    fn default() -> Self {
        Self {
            px: 16.0,
            charset: (' '..='~').collect(),
            padding: 1,
        }
    }
}

/// One rasterized glyph before packing.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub ch: char,
    pub width: u32,
    pub height: u32,
    /// Left edge relative to the pen.
    pub xmin: f32,
    /// Bottom edge relative to the baseline, +Y up.
    pub ymin: f32,
    pub advance: f32,
    /// `width * height` coverage values, row-major.
    pub coverage: Vec<u8>,
}

/// A fixed charset rasterized into one RGBA bitmap with a glyph table.
///
/// Pixels are white with coverage in alpha, so the sprite color tints text.
/// The bitmap is not uploaded here: upload [`pixels`](Self::pixels) with the
/// device of your choice and attach the handle with
/// [`set_texture`](Self::set_texture).
pub struct FontAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    glyphs: HashMap<char, Glyph>,
    metrics: LineMetrics,
    texture: TextureId,
}

impl FontAtlas {
    /// Parses a TrueType/OpenType font with fontdue and rasterizes `config.charset`.
    pub fn from_bytes(bytes: &[u8], config: &FontAtlasConfig) -> Result<Self, FontLoadError> {
        let px = config.px;
        if !(px.is_finite() && px > 0.0) {
            return Err(FontLoadError(format!("invalid pixel size {px}")));
        }

        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings {
            scale: px,
            ..Default::default()
        })
        .map_err(|e| FontLoadError(e.to_string()))?;

        let line = font
            .horizontal_line_metrics(px)
            .ok_or_else(|| FontLoadError("font has no horizontal line metrics".into()))?;

        // fontdue reports descent as a negative offset below the baseline.
        let metrics = LineMetrics {
            line_height: line.new_line_size,
            ascent: line.ascent,
            descent: -line.descent,
        };

        let mut raster = Vec::with_capacity(config.charset.len());
        for ch in config.charset.chars() {
            if ch != ' ' && font.lookup_glyph_index(ch) == 0 {
                log::debug!("font atlas: no glyph for {ch:?}");
                continue;
            }
            let (m, coverage) = font.rasterize(ch, px);
            raster.push(RasterGlyph {
                ch,
                width: m.width as u32,
                height: m.height as u32,
                xmin: m.xmin as f32,
                ymin: m.ymin as f32,
                advance: m.advance_width,
                coverage,
            });
        }

        Ok(Self::from_glyphs(&raster, metrics, config.padding))
    }

    /// Packs pre-rasterized glyphs into shelves.
    ///
    /// The atlas is square-ish: its width is the next power of two above the
    /// square root of the total padded glyph area, at least 64 and wide enough
    /// for the widest glyph.
    pub fn from_glyphs(raster: &[RasterGlyph], metrics: LineMetrics, padding: u32) -> Self {
        let area: u64 = raster
            .iter()
            .map(|g| u64::from(g.width + padding) * u64::from(g.height + padding))
            .sum();
        let widest = raster.iter().map(|g| g.width).max().unwrap_or(0) + 2 * padding;
        let width = ((area as f64).sqrt().ceil() as u32)
            .next_power_of_two()
            .max(64)
            .max(widest);

        // First pass: shelf positions.
        let mut placed: Vec<(u32, u32)> = Vec::with_capacity(raster.len());
        let mut cursor_x = padding;
        let mut cursor_y = padding;
        let mut row_height = 0u32;
        for g in raster {
            if g.width == 0 || g.height == 0 {
                placed.push((0, 0));
                continue;
            }
            if cursor_x + g.width + padding > width {
                cursor_x = padding;
                cursor_y += row_height + padding;
                row_height = 0;
            }
            placed.push((cursor_x, cursor_y));
            cursor_x += g.width + padding;
            row_height = row_height.max(g.height);
        }
        let height = (cursor_y + row_height + padding).max(1);

        // Second pass: blit coverage and build the glyph table.
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        let mut glyphs = HashMap::with_capacity(raster.len());
        let (wf, hf) = (width as f32, height as f32);

        for (g, &(x0, y0)) in raster.iter().zip(&placed) {
            let blank = g.width == 0 || g.height == 0;
            if !blank {
                for row in 0..g.height {
                    for col in 0..g.width {
                        let alpha = g.coverage.get((row * g.width + col) as usize).copied().unwrap_or(0);
                        let i = (((y0 + row) * width + x0 + col) * 4) as usize;
                        pixels[i..i + 4].copy_from_slice(&[255, 255, 255, alpha]);
                    }
                }
            }

            let size = Vec2::new(g.width as f32, g.height as f32);
            glyphs.insert(
                g.ch,
                Glyph {
                    uv: if blank {
                        Rect::default()
                    } else {
                        Rect::new(x0 as f32 / wf, y0 as f32 / hf, size.x / wf, size.y / hf)
                    },
                    size,
                    // Top-left relative to the pen on the baseline, +Y down.
                    bearing: Vec2::new(g.xmin, -(g.ymin + size.y)),
                    advance: g.advance,
                },
            );
        }

        log::debug!("font atlas: {} glyphs in {width}x{height}", glyphs.len());

        Self { width, height, pixels, glyphs, metrics, texture: TextureId::NONE }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Attaches the uploaded texture; glyph quads sample from it.
    pub fn set_texture(&mut self, texture: TextureId) {
        self.texture = texture;
    }
}

impl Font for FontAtlas {
    fn glyph(&self, ch: char) -> Option<Glyph> {
        self.glyphs.get(&ch).copied()
    }

    fn line_metrics(&self) -> LineMetrics {
        self.metrics
    }

    fn texture(&self) -> TextureId {
        self.texture
    }
}
