use quadra_engine::batch::{DrawCommand, SpriteBatch};
use quadra_engine::coords::Rect;
use quadra_engine::paint::Color;
use quadra_engine::render::TextureId;

use crate::context::UiContext;
use crate::element::ElementBehavior;

/// A textured quad stretched over the element's rect.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub texture: TextureId,
    /// Source region in UV space.
    pub uv: Rect,
    pub tint: Color,
}

impl Image {
    pub fn new(texture: TextureId) -> Self {
        Self { texture, uv: Rect::UNIT, tint: Color::WHITE }
    }

    pub fn uv(mut self, uv: Rect) -> Self {
        self.uv = uv;
        self
    }

    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

impl ElementBehavior for Image {
    fn on_render(&self, rect: Rect, layer: i32, _ctx: &UiContext<'_>, batch: &mut SpriteBatch) {
        batch.push(DrawCommand::new(self.texture, rect).src(self.uv).color(self.tint).layer(layer));
    }
}
