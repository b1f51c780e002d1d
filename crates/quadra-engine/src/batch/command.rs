use crate::coords::Rect;
use crate::paint::Color;
use crate::render::TextureId;

/// One quad request recorded between `begin` and `end`.
///
/// The texture is referenced by handle only; whatever owns it must keep it
/// alive until the flush that consumes this command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCommand {
    pub texture: TextureId,
    /// Destination in world pixels.
    pub dst: Rect,
    /// Source region in normalized UV space.
    pub src: Rect,
    pub color: Color,
    /// Radians about the center of `dst`.
    pub rotation: f32,
    /// Order within the same texture bucket; lower draws first.
    pub layer: i32,
}

impl DrawCommand {
    /// Full-texture, untinted, unrotated quad on layer 0.
    #[inline]
    pub fn new(texture: TextureId, dst: Rect) -> Self {
        Self {
            texture,
            dst,
            src: Rect::UNIT,
            color: Color::WHITE,
            rotation: 0.0,
            layer: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn src(mut self, src: Rect) -> Self {
        self.src = src;
        self
    }

    #[inline]
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    #[must_use]
    pub fn rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    #[inline]
    #[must_use]
    pub fn layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}
