use quadra_engine::batch::SpriteBatch;
use quadra_engine::coords::{Rect, Vec2};

use crate::anchor::Anchor;
use crate::context::UiContext;
use crate::element::{ElementId, UiElement};
use crate::layout::LayoutCache;

struct Node {
    element: UiElement,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A retained element hierarchy with cached anchor-relative layout.
///
/// Elements live in an arena owned by the tree; parents own their children
/// through the arena and children refer back to parents by handle only.
///
/// Layout rule, applied from the root down:
///
/// ```text
/// world_origin = parent_world_origin + anchor.offset(parent_size, size) + position
/// ```
///
/// The root's parent is the screen rect at the origin. World rects are
/// cached per element; every geometry setter invalidates the element and all
/// of its descendants, and a cached rect is only reused for the screen size
/// it was computed against.
///
/// Traversals are depth-first with parents before children and siblings in
/// insertion order. Invisible elements are skipped together with their
/// subtrees.
///
/// Removed slots go on a free list and are reused by later inserts, so the
/// arena and the layout cache stay bounded by the peak element count.
pub struct UiTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    root: ElementId,
    cache: LayoutCache,
}

impl UiTree {
    /// Creates a tree rooted at `root`, moving in any children it carries.
    pub fn new(root: UiElement) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            root: ElementId { index: 0, generation: 0 },
            cache: LayoutCache::default(),
        };
        tree.root = tree.insert(None, root);
        tree
    }

    #[inline]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    fn insert(&mut self, parent: Option<ElementId>, mut element: UiElement) -> ElementId {
        let pending = std::mem::take(&mut element.pending);
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot { generation: 0, node: None });
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.node = Some(Node { element, parent, children: Vec::new() });
        let id = ElementId { index, generation: slot.generation };
        self.live += 1;
        self.cache.invalidate(index);

        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.push(id);
        }
        for child in pending {
            self.insert(Some(id), child);
        }
        id
    }

    // ── structure ─────────────────────────────────────────────────────────

    /// Moves `element` (and its detached children) under `parent` as the
    /// last child. Returns `None` if `parent` is not in the tree.
    pub fn add_child(&mut self, parent: ElementId, element: UiElement) -> Option<ElementId> {
        if self.node(parent).is_none() {
            log::debug!("ui tree: add_child to unknown parent {parent:?}");
            return None;
        }
        Some(self.insert(Some(parent), element))
    }

    /// Detaches `id` and its subtree and hands them back as a detached
    /// element. The root cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> Option<UiElement> {
        if id == self.root {
            log::debug!("ui tree: refusing to remove the root");
            return None;
        }
        let parent = self.node(id)?.parent;
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|&c| c != id);
        }
        self.take_subtree(id)
    }

    fn take_subtree(&mut self, id: ElementId) -> Option<UiElement> {
        let slot = self
            .slots
            .get_mut(id.index)
            .filter(|s| s.generation == id.generation)?;
        let node = slot.node.take()?;
        // Retire the handle before the slot goes back on the free list.
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        self.cache.invalidate(id.index);

        let mut element = node.element;
        for child in node.children {
            if let Some(c) = self.take_subtree(child) {
                element.pending.push(c);
            }
        }
        Some(element)
    }

    pub fn get(&self, id: ElementId) -> Option<&UiElement> {
        self.node(id).map(|n| &n.element)
    }

    /// Mutable access to an element's payload. Geometry changes go through
    /// the `set_*` methods.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut UiElement> {
        self.node_mut(id).map(|n| &mut n.element)
    }

    /// First element named `name` in depth-first order.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.walk(self.root, false)
            .into_iter()
            .find(|&id| self.get(id).is_some_and(|e| e.name == name))
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order; empty for unknown handles.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Depth-first, parents first. With `visible_only`, hidden elements and
    /// their subtrees are left out.
    fn walk(&self, from: ElementId, visible_only: bool) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if visible_only && !node.element.visible {
                continue;
            }
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // ── geometry ──────────────────────────────────────────────────────────

    /// Applies `edit` and invalidates the subtree if it reports a change.
    fn edit_geometry(&mut self, id: ElementId, edit: impl FnOnce(&mut UiElement) -> bool) {
        let Some(node) = self.node_mut(id) else { return };
        if edit(&mut node.element) {
            self.invalidate_subtree(id);
        }
    }

    fn invalidate_subtree(&mut self, id: ElementId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            self.cache.invalidate(id.index);
            if let Some(node) = self.node(id) {
                stack.extend_from_slice(&node.children);
            }
        }
    }

    pub fn set_position(&mut self, id: ElementId, position: Vec2) {
        self.edit_geometry(id, |e| std::mem::replace(&mut e.position, position) != position);
    }

    pub fn set_size(&mut self, id: ElementId, size: Vec2) {
        self.edit_geometry(id, |e| std::mem::replace(&mut e.size, size) != size);
    }

    pub fn set_anchor(&mut self, id: ElementId, anchor: Anchor) {
        self.edit_geometry(id, |e| std::mem::replace(&mut e.anchor, anchor) != anchor);
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        self.edit_geometry(id, |e| std::mem::replace(&mut e.visible, visible) != visible);
    }

    /// Layer only affects draw order, so layout stays cached.
    pub fn set_layer(&mut self, id: ElementId, layer: i32) {
        if let Some(node) = self.node_mut(id) {
            node.element.layer = layer;
        }
    }

    /// `true` if `id` has a valid cached rect for `screen`.
    pub fn is_layout_cached(&self, id: ElementId, screen: Vec2) -> bool {
        self.cache.is_valid(id.index, screen)
    }

    /// World rect of `id` laid out against `screen`.
    ///
    /// Uses the cache when it holds a valid entry for `screen`, otherwise
    /// recomputes from the nearest cached ancestor. Never writes the cache.
    pub fn world_rect(&self, id: ElementId, screen: Vec2) -> Option<Rect> {
        if let Some(rect) = self.cache.get(id.index, screen) {
            return Some(rect);
        }
        let node = self.node(id)?;
        let parent = match node.parent {
            Some(p) => self.world_rect(p, screen)?,
            None => Rect::from_origin_size(Vec2::zero(), screen),
        };
        Some(node.element.place(parent))
    }

    /// Computes and caches the rect of `id` for `screen`.
    fn resolve(&mut self, id: ElementId, screen: Vec2) -> Option<Rect> {
        if let Some(rect) = self.cache.get(id.index, screen) {
            return Some(rect);
        }
        let rect = self.world_rect(id, screen)?;
        self.cache.store(id.index, rect, screen);
        Some(rect)
    }

    /// Recomputes every stale cache entry for `screen`, parents first so each
    /// child reads its parent from the cache.
    pub fn refresh_layout(&mut self, screen: Vec2) {
        for id in self.walk(self.root, false) {
            self.resolve(id, screen);
        }
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Runs per-element update hooks over the visible tree. Only the
    /// topmost element under the pointer (see [`hit_test`](Self::hit_test))
    /// sees it as hovering.
    pub fn update(&mut self, ctx: &UiContext<'_>) {
        self.refresh_layout(ctx.screen_size);
        let target = ctx.input.pointer().and_then(|p| self.hit_test(p, ctx.screen_size));
        self.update_with_target(ctx, target);
    }

    /// Update pass where `target` alone receives the pointer; `None` hides
    /// it from every element.
    pub(crate) fn update_with_target(&mut self, ctx: &UiContext<'_>, target: Option<ElementId>) {
        let screen = ctx.screen_size;
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            if !self.get(id).is_some_and(|e| e.visible) {
                continue;
            }
            let Some(rect) = self.resolve(id, screen) else { continue };

            let resize = self
                .node_mut(id)
                .and_then(|n| n.element.kind.behavior_mut())
                .and_then(|b| b.on_update(rect, &UiContext { occluded: target != Some(id), ..*ctx }));
            if let Some(size) = resize {
                self.set_size(id, size);
            }

            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
    }

    /// Pushes every visible element into `batch`. Returns how many elements
    /// drew; containers do not count.
    pub fn render(&self, ctx: &UiContext<'_>, batch: &mut SpriteBatch) -> usize {
        let mut drawn = 0;
        for id in self.walk(self.root, true) {
            let (Some(element), Some(rect)) = (self.get(id), self.world_rect(id, ctx.screen_size)) else {
                continue;
            };
            if let Some(behavior) = element.kind.behavior() {
                behavior.on_render(rect, element.layer, ctx, batch);
                drawn += 1;
            }
        }
        log::trace!("ui tree: rendered {drawn} elements");
        drawn
    }

    /// Topmost visible element under `point`: highest layer first, then the
    /// latest in depth-first order. This matches draw order for elements
    /// sharing a texture. Containers are never hit.
    pub fn hit_test(&self, point: Vec2, screen: Vec2) -> Option<ElementId> {
        self.walk(self.root, true)
            .into_iter()
            .enumerate()
            .filter_map(|(order, id)| {
                let element = self.get(id)?;
                if element.kind.is_container() || !self.world_rect(id, screen)?.contains(point) {
                    return None;
                }
                Some((element.layer, order, id))
            })
            .max_by_key(|&(layer, order, _)| (layer, order))
            .map(|(_, _, id)| id)
    }
}
