use quadra_engine::coords::{Rect, Vec2};
use quadra_engine::input::InputSnapshot;
use quadra_engine::render::TextureId;
use quadra_engine::text::FontSystem;

/// Per-call environment for UI update and render.
///
/// Built fresh by the caller each frame; no UI node keeps it.
#[derive(Clone, Copy)]
pub struct UiContext<'a> {
    /// Logical screen size; the root element is laid out against it.
    pub screen_size: Vec2,
    pub input: &'a InputSnapshot,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub fonts: &'a FontSystem,
    /// A 1x1 opaque white texture used for solid fills. `TextureId::NONE`
    /// when the application has none; fills are then dropped by the batch.
    pub white: TextureId,
    /// Set by the tree while updating an element that is not the topmost
    /// one under the pointer.
    pub(crate) occluded: bool,
}

impl<'a> UiContext<'a> {
    pub fn new(screen_size: Vec2, input: &'a InputSnapshot, fonts: &'a FontSystem) -> Self {
        Self {
            screen_size,
            input,
            dt: 0.0,
            fonts,
            white: TextureId::NONE,
            occluded: false,
        }
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_white_texture(mut self, white: TextureId) -> Self {
        self.white = white;
        self
    }

    #[inline]
    pub fn screen_rect(&self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), self.screen_size)
    }

    /// `true` when the pointer is over `rect` and nothing else is drawn on
    /// top of the element being updated.
    pub fn is_hovered(&self, rect: Rect) -> bool {
        !self.occluded && self.input.pointer().is_some_and(|p| rect.contains(p))
    }
}
