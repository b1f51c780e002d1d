use quadra_engine::coords::{Rect, Vec2};

/// One node's computed world rect and the screen size it was computed for.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub(crate) struct CachedRect {
    rect: Rect,
    screen: Vec2,
    valid: bool,
}

/// World-rect cache, kept beside the element arena rather than inside the
/// elements so reads of the tree never mutate it.
///
/// Entries are indexed by element slot. An entry is usable only while it is
/// valid and was computed for the screen size being asked about.
#[derive(Debug, Default)]
pub(crate) struct LayoutCache {
    entries: Vec<CachedRect>,
}

impl LayoutCache {
    pub(crate) fn get(&self, slot: usize, screen: Vec2) -> Option<Rect> {
        self.entries
            .get(slot)
            .filter(|e| e.valid && e.screen == screen)
            .map(|e| e.rect)
    }

    #[inline]
    pub(crate) fn is_valid(&self, slot: usize, screen: Vec2) -> bool {
        self.get(slot, screen).is_some()
    }

    pub(crate) fn store(&mut self, slot: usize, rect: Rect, screen: Vec2) {
        if slot >= self.entries.len() {
            self.entries.resize(slot + 1, CachedRect::default());
        }
        self.entries[slot] = CachedRect { rect, screen, valid: true };
    }

    pub(crate) fn invalidate(&mut self, slot: usize) {
        if let Some(e) = self.entries.get_mut(slot) {
            e.valid = false;
        }
    }
}
