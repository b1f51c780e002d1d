use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::render::TextureId;

use super::ColliderId;

/// Stable entity identity. Ids start at 1; `0` is [`EntityId::INVALID`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    pub const INVALID: EntityId = EntityId(0);

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// World-space placement. Scale is non-uniform; rotation is in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec2::zero(), rotation: 0.0, scale: Vec2::splat(1.0) }
    }
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }
}

/// Textured quad attached to an entity.
///
/// `rect.origin` is the offset of the quad's center from the entity position
/// and `rect.size` its unscaled size; both are multiplied by the entity scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub rect: Rect,
    pub uv: Rect,
    pub color: Color,
    pub layer: i32,
}

impl Sprite {
    /// Full-texture sprite of `size`, centered on the entity.
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self {
            texture,
            rect: Rect::from_origin_size(Vec2::zero(), size),
            uv: Rect::UNIT,
            color: Color::WHITE,
            layer: 0,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.rect.origin = offset;
        self
    }

    #[must_use]
    pub fn with_uv(mut self, uv: Rect) -> Self {
        self.uv = uv;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Destination rect in world pixels for an entity with `transform`.
    ///
    /// Rotation is not applied here; the batch rotates the quad about this
    /// rect's center.
    pub fn world_rect(&self, transform: &Transform) -> Rect {
        let size = self.rect.size.scale(transform.scale);
        let offset = self.rect.origin.scale(transform.scale);
        Rect::from_center_size(transform.position + offset, size)
    }
}

/// One scene object. Storage is owned by [`Scene`](super::Scene).
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    active: bool,
    pub transform: Transform,
    pub sprite: Option<Sprite>,
    pub(crate) colliders: Vec<ColliderId>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            active: true,
            transform: Transform::default(),
            sprite: None,
            colliders: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// False once the entity has been destroyed.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    /// Colliders attached through [`Scene::add_collider`](super::Scene::add_collider).
    #[inline]
    pub fn collider_ids(&self) -> &[ColliderId] {
        &self.colliders
    }
}
