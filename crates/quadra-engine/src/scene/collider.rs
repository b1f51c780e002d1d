use crate::coords::{Rect, Vec2};

use super::Transform;

/// Index into a scene's collider table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ColliderId(pub(crate) usize);

/// Collision shape in entity-local space.
///
/// `offset` is scaled and rotated with the entity. Circle radii scale by the
/// larger absolute scale component. Boxes stay axis-aligned: their extents
/// scale but ignore rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Collider {
    Circle { offset: Vec2, radius: f32 },
    Aabb { offset: Vec2, half_extents: Vec2 },
}

/// A collider resolved into world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) enum WorldShape {
    Circle { center: Vec2, radius: f32 },
    Aabb(Rect),
}

impl Collider {
    pub fn circle(radius: f32) -> Self {
        Collider::Circle { offset: Vec2::zero(), radius }
    }

    pub fn aabb(half_extents: Vec2) -> Self {
        Collider::Aabb { offset: Vec2::zero(), half_extents }
    }

    pub(crate) fn to_world(&self, t: &Transform) -> WorldShape {
        let place = |offset: Vec2| t.position + offset.scale(t.scale).rotated(t.rotation);
        match *self {
            Collider::Circle { offset, radius } => WorldShape::Circle {
                center: place(offset),
                radius: radius * t.scale.x.abs().max(t.scale.y.abs()),
            },
            Collider::Aabb { offset, half_extents } => {
                let half = Vec2::new(
                    (half_extents.x * t.scale.x).abs(),
                    (half_extents.y * t.scale.y).abs(),
                );
                WorldShape::Aabb(Rect::from_center_size(place(offset), half * 2.0))
            }
        }
    }
}

impl WorldShape {
    /// Closed overlap test: touching shapes collide.
    pub(crate) fn overlaps(&self, other: &WorldShape) -> bool {
        match (self, other) {
            (WorldShape::Circle { center: a, radius: ra }, WorldShape::Circle { center: b, radius: rb }) => {
                let r = ra + rb;
                (*a - *b).length_squared() <= r * r
            }
            (WorldShape::Aabb(a), WorldShape::Aabb(b)) => a.intersects(*b),
            (WorldShape::Circle { center, radius }, WorldShape::Aabb(rect))
            | (WorldShape::Aabb(rect), WorldShape::Circle { center, radius }) => {
                let r = rect.normalized();
                let nearest = Vec2::new(
                    center.x.clamp(r.x(), r.right()),
                    center.y.clamp(r.y(), r.bottom()),
                );
                (*center - nearest).length_squared() <= radius * radius
            }
        }
    }
}
