use crate::batch::{DrawCommand, SpriteBatch};
use crate::core::FrameContext;
use crate::render::TextureRegistry;

use super::collider::WorldShape;
use super::{Collider, ColliderId, Entity, EntityId};

/// Owns every entity and the collider side table.
///
/// Entities are stored densely in creation order, which is also id order, so
/// lookups are a binary search. Destroying an entity only deactivates it; its
/// storage and id stay until [`clear`](Self::clear).
pub struct Scene {
    entities: Vec<Entity>,
    colliders: Vec<Collider>,
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self { entities: Vec::new(), colliders: Vec::new(), next_id: 1 }
    }

    // ── entities ──────────────────────────────────────────────────────────

    /// Creates an active entity with a fresh id. Ids strictly increase and
    /// are never reused, not even after [`clear`](Self::clear).
    pub fn create_entity(&mut self) -> &mut Entity {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity::new(id));
        log::trace!("scene: created entity {}", id.raw());
        let last = self.entities.len() - 1;
        &mut self.entities[last]
    }

    /// Deactivates `id`. Idempotent; unknown ids are ignored.
    pub fn destroy_entity(&mut self, id: EntityId) {
        if let Some(e) = self.find_entity_mut(id) {
            e.deactivate();
        }
    }

    /// Finds an entity by id, including deactivated ones.
    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        let i = self.index_of(id)?;
        Some(&self.entities[i])
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let i = self.index_of(id)?;
        Some(&mut self.entities[i])
    }

    /// Drops all entities and colliders. The id counter keeps counting.
    pub fn clear(&mut self) {
        log::debug!("scene: cleared {} entities", self.entities.len());
        self.entities.clear();
        self.colliders.clear();
    }

    /// Stored entities, active or not.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_active()).count()
    }

    /// All stored entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Runs `system` over every active entity in id order. Skipped while paused.
    pub fn update<F>(&mut self, ctx: &FrameContext<'_>, mut system: F)
    where
        F: FnMut(&mut Entity, &FrameContext<'_>),
    {
        if ctx.time.paused {
            return;
        }
        for e in self.entities.iter_mut().filter(|e| e.is_active()) {
            system(e, ctx);
        }
    }

    /// Pushes the sprite of every active entity whose texture is valid.
    ///
    /// Returns the number of sprites pushed.
    pub fn render(&self, batch: &mut SpriteBatch, textures: &dyn TextureRegistry) -> usize {
        let mut pushed = 0;
        for e in self.entities.iter().filter(|e| e.is_active()) {
            let Some(sprite) = e.sprite.as_ref() else { continue };
            if sprite.texture.is_none() || !textures.texture_valid(sprite.texture) {
                continue;
            }
            batch.push(
                DrawCommand::new(sprite.texture, sprite.world_rect(&e.transform))
                    .src(sprite.uv)
                    .color(sprite.color)
                    .rotation(e.transform.rotation)
                    .layer(sprite.layer),
            );
            pushed += 1;
        }
        pushed
    }

    // ── colliders ─────────────────────────────────────────────────────────

    /// Stores `collider` and attaches it to `entity`. `None` for unknown ids.
    pub fn add_collider(&mut self, entity: EntityId, collider: Collider) -> Option<ColliderId> {
        let i = self.index_of(entity)?;
        let id = ColliderId(self.colliders.len());
        self.colliders.push(collider);
        self.entities[i].colliders.push(id);
        Some(id)
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id.0)
    }

    /// Colliders attached to `entity`, in attach order.
    pub fn colliders(&self, entity: EntityId) -> impl Iterator<Item = &Collider> {
        self.find_entity(entity)
            .map(|e| e.colliders.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|c| self.colliders.get(c.0))
    }

    /// True if any collider of `a` overlaps any collider of `b`.
    ///
    /// Inactive or unknown entities never collide; neither does an entity with itself.
    pub fn test_collision(&self, a: EntityId, b: EntityId) -> bool {
        if a == b {
            return false;
        }
        let (Some(ea), Some(eb)) = (self.find_entity(a), self.find_entity(b)) else {
            return false;
        };
        if !ea.is_active() || !eb.is_active() {
            return false;
        }
        let sa = self.world_shapes(ea);
        let sb = self.world_shapes(eb);
        sa.iter().any(|x| sb.iter().any(|y| x.overlaps(y)))
    }

    /// Every colliding pair of active entities, each pair once with the lower id first.
    pub fn collisions(&self) -> Vec<(EntityId, EntityId)> {
        let shaped: Vec<(EntityId, Vec<WorldShape>)> = self
            .entities
            .iter()
            .filter(|e| e.is_active() && !e.colliders.is_empty())
            .map(|e| (e.id(), self.world_shapes(e)))
            .collect();

        let mut out = Vec::new();
        for (i, (ida, sa)) in shaped.iter().enumerate() {
            for (idb, sb) in &shaped[i + 1..] {
                if sa.iter().any(|x| sb.iter().any(|y| x.overlaps(y))) {
                    out.push((*ida, *idb));
                }
            }
        }
        out
    }

    // ── internal ──────────────────────────────────────────────────────────

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id()).ok()
    }

    fn world_shapes(&self, e: &Entity) -> Vec<WorldShape> {
        e.colliders
            .iter()
            .filter_map(|c| self.colliders.get(c.0))
            .map(|c| c.to_world(&e.transform))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::Mat4;

    use super::*;
    use crate::batch::BatchConfig;
    use crate::coords::Vec2;
    use crate::input::InputSnapshot;
    use crate::render::{RecordingDevice, TextureId};
    use crate::scene::{Sprite, Transform};
    use crate::time::FrameClock;

    fn spawn_pair(scene: &mut Scene, radius: f32) -> (EntityId, EntityId) {
        let mut ids = [EntityId::INVALID; 2];
        for (slot, x) in ids.iter_mut().zip([0.0, 100.0]) {
            let e = scene.create_entity();
            e.transform = Transform::from_position(Vec2::new(x, 0.0));
            e.sprite = Some(Sprite::new(TextureId::from_raw(1), Vec2::new(32.0, 32.0)));
            *slot = e.id();
        }
        for id in ids {
            scene.add_collider(id, Collider::circle(radius));
        }
        (ids[0], ids[1])
    }

    // ── ids ───────────────────────────────────────────────────────────────

    #[test]
    fn ids_increase_and_survive_destroy_and_clear() {
        let mut scene = Scene::new();
        let a = scene.create_entity().id();
        let b = scene.create_entity().id();
        assert!(a.raw() >= 1 && b > a);

        scene.destroy_entity(a);
        let c = scene.create_entity().id();
        assert!(c > b);

        scene.clear();
        assert!(scene.is_empty());
        let d = scene.create_entity().id();
        assert!(d > c);
    }

    #[test]
    fn destroy_is_soft_and_idempotent() {
        let mut scene = Scene::new();
        let a = scene.create_entity().id();
        let b = scene.create_entity().id();

        scene.destroy_entity(a);
        scene.destroy_entity(a);
        scene.destroy_entity(EntityId(999));

        let found = scene.find_entity(a).unwrap();
        assert_eq!(found.id(), a);
        assert!(!found.is_active());
        assert!(scene.find_entity(b).unwrap().is_active());
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.active_count(), 1);
    }

    #[test]
    fn find_returns_same_entity_across_calls() {
        let mut scene = Scene::new();
        for _ in 0..5 {
            scene.create_entity();
        }
        let id = scene.iter().nth(3).unwrap().id();
        scene.find_entity_mut(id).unwrap().transform.position = Vec2::new(7.0, 8.0);
        assert_eq!(scene.find_entity(id).unwrap().transform.position, Vec2::new(7.0, 8.0));
        assert!(scene.find_entity(EntityId::INVALID).is_none());
    }

    // ── update ────────────────────────────────────────────────────────────

    #[test]
    fn update_visits_active_entities_unless_paused() {
        let mut scene = Scene::new();
        let a = scene.create_entity().id();
        let b = scene.create_entity().id();
        scene.destroy_entity(b);

        let input = InputSnapshot::new();
        let mut clock = FrameClock::new();
        let time = clock.advance(Duration::from_millis(250));
        let ctx = FrameContext { time, input: &input };

        scene.update(&ctx, |e, ctx| e.transform.position.x += 10.0 * ctx.time.dt);
        assert_eq!(scene.find_entity(a).unwrap().transform.position.x, 2.5);
        assert_eq!(scene.find_entity(b).unwrap().transform.position.x, 0.0);

        clock.set_paused(true);
        let time = clock.advance(Duration::from_millis(250));
        let ctx = FrameContext { time, input: &input };
        scene.update(&ctx, |e, _| e.transform.position.x += 1.0);
        assert_eq!(scene.find_entity(a).unwrap().transform.position.x, 2.5);
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn render_places_sprites_and_skips_inactive_or_invalid() {
        let mut dev = RecordingDevice::new();
        let tex = dev.create_texture(32, 32).id;
        let mut batch = SpriteBatch::with_device(&mut dev, BatchConfig::default()).unwrap();

        let mut scene = Scene::new();
        let e = scene.create_entity();
        e.transform = Transform {
            position: Vec2::new(100.0, 100.0),
            rotation: 0.0,
            scale: Vec2::new(2.0, 2.0),
        };
        e.sprite = Some(Sprite::new(tex, Vec2::new(16.0, 8.0)).with_offset(Vec2::new(4.0, 0.0)));

        let hidden = scene.create_entity();
        hidden.sprite = Some(Sprite::new(tex, Vec2::new(16.0, 16.0)));
        let hidden = hidden.id();
        scene.destroy_entity(hidden);

        scene.create_entity().sprite = Some(Sprite::new(TextureId::NONE, Vec2::new(16.0, 16.0)));
        scene.create_entity().sprite = Some(Sprite::new(TextureId::from_raw(77), Vec2::new(1.0, 1.0)));
        scene.create_entity();

        batch.begin(Mat4::IDENTITY);
        assert_eq!(scene.render(&mut batch, &dev), 1);
        batch.end(&mut dev).unwrap();

        // Center (108, 100), size (32, 16).
        let v = dev.vertices();
        assert_eq!(v.len(), 4);
        assert_eq!(v[0].position, [92.0, 92.0]);
        assert_eq!(v[2].position, [124.0, 108.0]);
    }

    // ── collisions ────────────────────────────────────────────────────────

    #[test]
    fn distant_small_circles_do_not_collide() {
        let mut scene = Scene::new();
        let (a, b) = spawn_pair(&mut scene, 20.0);
        assert!(!scene.test_collision(a, b));
        assert!(scene.collisions().is_empty());
    }

    #[test]
    fn large_circles_collide() {
        let mut scene = Scene::new();
        let (a, b) = spawn_pair(&mut scene, 60.0);
        assert!(scene.test_collision(a, b));
        assert!(scene.test_collision(b, a));
        assert_eq!(scene.collisions(), vec![(a, b)]);
    }

    #[test]
    fn inactive_entities_never_collide() {
        let mut scene = Scene::new();
        let (a, b) = spawn_pair(&mut scene, 60.0);
        scene.destroy_entity(b);
        assert!(!scene.test_collision(a, b));
        assert!(scene.collisions().is_empty());
        assert!(!scene.test_collision(a, a));
    }

    #[test]
    fn colliders_are_listed_per_entity() {
        let mut scene = Scene::new();
        let a = scene.create_entity().id();
        assert!(scene.add_collider(EntityId(42), Collider::circle(1.0)).is_none());
        let c = scene.add_collider(a, Collider::aabb(Vec2::new(2.0, 3.0))).unwrap();
        assert_eq!(scene.collider(c), Some(&Collider::aabb(Vec2::new(2.0, 3.0))));
        assert_eq!(scene.colliders(a).count(), 1);
        assert_eq!(scene.find_entity(a).unwrap().collider_ids(), &[c]);
    }
}
