use crate::batch::{DrawCommand, SpriteBatch};
use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::{Font, Glyph};

/// Walks `text` and calls `emit` with the destination rect of every visible
/// glyph. Returns the laid-out size.
///
/// Rules:
/// - `origin` is the top-left of the first line; the baseline sits `ascent` below it
/// - `\n` returns the pen to `origin.x` and moves down one line height
/// - a missing glyph falls back to `?`, and is skipped if that is missing too
/// - blank glyphs (spaces) advance the pen without emitting
fn walk(font: &dyn Font, text: &str, origin: Vec2, scale: f32, mut emit: impl FnMut(&Glyph, Rect)) -> Vec2 {
    let metrics = font.line_metrics();
    let line_height = metrics.line_height * scale;

    let mut pen_x = origin.x;
    let mut baseline = origin.y + metrics.ascent * scale;
    let mut width = 0.0f32;
    let mut lines = 1usize;

    for ch in text.chars() {
        if ch == '\n' {
            pen_x = origin.x;
            baseline += line_height;
            lines += 1;
            continue;
        }

        let Some(glyph) = font.glyph(ch).or_else(|| font.glyph('?')) else { continue };

        if !glyph.is_blank() {
            let dst = Rect::from_origin_size(
                Vec2::new(pen_x, baseline) + glyph.bearing * scale,
                glyph.size * scale,
            );
            emit(&glyph, dst);
        }

        pen_x += glyph.advance * scale;
        width = width.max(pen_x - origin.x);
    }

    if text.is_empty() {
        return Vec2::zero();
    }
    Vec2::new(width, lines as f32 * line_height)
}

/// Size of `text` in pixels at `scale`: widest line by pen advance, times the
/// number of lines. Empty text measures zero.
pub fn measure_text(font: &dyn Font, text: &str, scale: f32) -> Vec2 {
    walk(font, text, Vec2::zero(), scale, |_, _| {})
}

impl SpriteBatch {
    /// Pushes one quad per visible glyph of `text`, all on the font's texture.
    ///
    /// Returns the laid-out size, the same value [`measure_text`] reports.
    pub fn push_text(
        &mut self,
        font: &dyn Font,
        text: &str,
        origin: Vec2,
        scale: f32,
        color: Color,
        layer: i32,
    ) -> Vec2 {
        let texture = font.texture();
        walk(font, text, origin, scale, |glyph, dst| {
            self.push(DrawCommand::new(texture, dst).src(glyph.uv).color(color).layer(layer));
        })
    }
}
