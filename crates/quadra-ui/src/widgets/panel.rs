use quadra_engine::batch::{DrawCommand, SpriteBatch};
use quadra_engine::coords::{Rect, Vec2};
use quadra_engine::paint::Color;

use crate::context::UiContext;
use crate::element::ElementBehavior;

/// Solid outline drawn inside a panel's rect.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

impl Border {
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }
}

/// A filled rectangle with an optional border.
///
/// Both fill and border are drawn with the context's white texture tinted by
/// their color.
///
/// # Example
/// ```rust,ignore
/// Panel::new(Color::rgb(0.1, 0.1, 0.15)).border(Border::new(2.0, Color::WHITE))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub fill: Color,
    pub border: Option<Border>,
}

impl Panel {
    pub fn new(fill: Color) -> Self {
        Self { fill, border: None }
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}

/// Pushes a white-texture quad covering `rect`, skipping fully transparent
/// fills.
pub(crate) fn fill_rect(batch: &mut SpriteBatch, ctx: &UiContext<'_>, rect: Rect, color: Color, layer: i32) {
    if color.a <= 0.0 || rect.is_empty() {
        return;
    }
    batch.push(DrawCommand::new(ctx.white, rect).color(color).layer(layer));
}

/// Four edge strips inset into `rect`. The width is clamped to half the
/// smaller side so opposite edges never cross.
fn border_strips(rect: Rect, width: f32) -> [Rect; 4] {
    let w = width.min(rect.width() * 0.5).min(rect.height() * 0.5).max(0.0);
    let inner_h = rect.height() - 2.0 * w;
    let o = rect.origin;
    [
        Rect::from_origin_size(o, Vec2::new(rect.width(), w)),
        Rect::from_origin_size(Vec2::new(o.x, rect.bottom() - w), Vec2::new(rect.width(), w)),
        Rect::from_origin_size(Vec2::new(o.x, o.y + w), Vec2::new(w, inner_h)),
        Rect::from_origin_size(Vec2::new(rect.right() - w, o.y + w), Vec2::new(w, inner_h)),
    ]
}

impl ElementBehavior for Panel {
    fn on_render(&self, rect: Rect, layer: i32, ctx: &UiContext<'_>, batch: &mut SpriteBatch) {
        fill_rect(batch, ctx, rect, self.fill, layer);

        if let Some(border) = self.border {
            if border.width > 0.0 {
                for strip in border_strips(rect, border.width) {
                    fill_rect(batch, ctx, strip, border.color, layer);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cover_the_outline() {
        let [top, bottom, left, right] = border_strips(Rect::new(10.0, 20.0, 100.0, 50.0), 2.0);
        assert_eq!(top, Rect::new(10.0, 20.0, 100.0, 2.0));
        assert_eq!(bottom, Rect::new(10.0, 68.0, 100.0, 2.0));
        assert_eq!(left, Rect::new(10.0, 22.0, 2.0, 46.0));
        assert_eq!(right, Rect::new(108.0, 22.0, 2.0, 46.0));
    }

    #[test]
    fn wide_border_is_clamped() {
        let [top, _, left, _] = border_strips(Rect::new(0.0, 0.0, 10.0, 4.0), 9.0);
        assert_eq!(top.height(), 2.0);
        assert_eq!(left.height(), 0.0);
    }
}
