use quadra_engine::batch::SpriteBatch;
use quadra_engine::coords::Vec2;

use crate::context::UiContext;
use crate::element::{ElementId, UiElement};
use crate::tree::UiTree;

struct Screen {
    name: String,
    tree: UiTree,
    visible: bool,
}

/// Ordered stack of named screens, each owning one [`UiTree`].
///
/// Screens update and render bottom to top; the last pushed is on top and
/// wins hit tests. Every update resizes each visible root to the current
/// screen size.
#[derive(Default)]
pub struct UiSystem {
    screens: Vec<Screen>,
}

impl UiSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.screens.iter().position(|s| s.name == name)
    }

    /// Pushes a screen on top. A screen with the same name is replaced.
    pub fn push_screen(&mut self, name: impl Into<String>, root: UiElement) -> &mut UiTree {
        let name = name.into();
        if let Some(i) = self.index_of(&name) {
            log::debug!("ui: replacing screen {name:?}");
            self.screens.remove(i);
        }
        self.screens.push(Screen {
            name,
            tree: UiTree::new(root),
            visible: true,
        });
        let top = self.screens.len() - 1;
        &mut self.screens[top].tree
    }

    pub fn remove_screen(&mut self, name: &str) -> Option<UiTree> {
        let i = self.index_of(name)?;
        Some(self.screens.remove(i).tree)
    }

    pub fn screen(&self, name: &str) -> Option<&UiTree> {
        self.screens.iter().find(|s| s.name == name).map(|s| &s.tree)
    }

    pub fn screen_mut(&mut self, name: &str) -> Option<&mut UiTree> {
        self.screens.iter_mut().find(|s| s.name == name).map(|s| &mut s.tree)
    }

    /// Returns `false` if no screen is called `name`.
    pub fn set_screen_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.screens.iter_mut().find(|s| s.name == name) {
            Some(s) => {
                s.visible = visible;
                true
            }
            None => false,
        }
    }

    pub fn is_screen_visible(&self, name: &str) -> Option<bool> {
        self.screens.iter().find(|s| s.name == name).map(|s| s.visible)
    }

    /// Moves a screen to the top of the stack.
    pub fn bring_to_front(&mut self, name: &str) -> bool {
        let Some(i) = self.index_of(name) else { return false };
        let screen = self.screens.remove(i);
        self.screens.push(screen);
        true
    }

    /// Screen names, bottom to top.
    pub fn screen_names(&self) -> impl Iterator<Item = &str> {
        self.screens.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Resizes every visible root to the screen, then updates screens bottom
    /// to top. The pointer belongs to the topmost hit across all screens, so
    /// a button under another screen's panel never sees it.
    pub fn update(&mut self, ctx: &UiContext<'_>) {
        for screen in self.screens.iter_mut().filter(|s| s.visible) {
            let root = screen.tree.root();
            screen.tree.set_size(root, ctx.screen_size);
            screen.tree.refresh_layout(ctx.screen_size);
        }

        let hit = ctx.input.pointer().and_then(|p| self.topmost(p, ctx.screen_size));
        for (i, screen) in self.screens.iter_mut().enumerate().filter(|(_, s)| s.visible) {
            let target = hit.filter(|&(owner, _)| owner == i).map(|(_, id)| id);
            screen.tree.update_with_target(ctx, target);
        }
    }

    /// Renders visible screens bottom to top. Returns the number of elements
    /// drawn.
    pub fn render(&self, ctx: &UiContext<'_>, batch: &mut SpriteBatch) -> usize {
        self.screens
            .iter()
            .filter(|s| s.visible)
            .map(|s| s.tree.render(ctx, batch))
            .sum()
    }

    /// Topmost hit across visible screens, with the owning screen's name.
    pub fn hit_test(&self, point: Vec2, screen_size: Vec2) -> Option<(&str, ElementId)> {
        self.topmost(point, screen_size)
            .map(|(i, id)| (self.screens[i].name.as_str(), id))
    }

    fn topmost(&self, point: Vec2, screen_size: Vec2) -> Option<(usize, ElementId)> {
        self.screens
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| s.visible)
            .find_map(|(i, s)| s.tree.hit_test(point, screen_size).map(|id| (i, id)))
    }
}
