use quadra_engine::batch::SpriteBatch;
use quadra_engine::coords::{Rect, Vec2};
use quadra_engine::paint::Color;
use quadra_engine::text::FontId;

use crate::context::UiContext;
use crate::element::ElementBehavior;

/// A single run of text drawn from the element's top-left corner.
///
/// With auto-size on (the default) the element is resized every update to
/// the measured text, so anchors like `Center` place the text itself.
///
/// # Example
/// ```rust,ignore
/// Label::new("Score: 0", font).scale(2.0).color(Color::rgb(1.0, 0.8, 0.2))
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    font: FontId,
    scale: f32,
    color: Color,
    auto_size: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, font: FontId) -> Self {
        Self {
            text: text.into(),
            font,
            scale: 1.0,
            color: Color::WHITE,
            auto_size: true,
        }
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Keep the element's own size instead of measuring the text.
    pub fn fixed_size(mut self) -> Self {
        self.auto_size = false;
        self
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn font(&self) -> FontId {
        self.font
    }

    /// Laid-out size of the current text.
    pub fn measure(&self, ctx: &UiContext<'_>) -> Vec2 {
        ctx.fonts.measure_text(self.font, &self.text, self.scale)
    }

    pub(crate) fn draw_at(&self, origin: Vec2, layer: i32, ctx: &UiContext<'_>, batch: &mut SpriteBatch) {
        let Some(font) = ctx.fonts.get(self.font) else {
            log::trace!("label {:?}: unknown font {:?}", self.text, self.font);
            return;
        };
        batch.push_text(font, &self.text, origin, self.scale, self.color, layer);
    }
}

impl ElementBehavior for Label {
    fn on_update(&mut self, _rect: Rect, ctx: &UiContext<'_>) -> Option<Vec2> {
        self.auto_size.then(|| self.measure(ctx))
    }

    fn on_render(&self, rect: Rect, layer: i32, ctx: &UiContext<'_>, batch: &mut SpriteBatch) {
        self.draw_at(rect.origin, layer, ctx, batch);
    }
}
