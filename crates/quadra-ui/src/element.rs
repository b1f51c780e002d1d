use quadra_engine::batch::SpriteBatch;
use quadra_engine::coords::{Rect, Vec2};

use crate::anchor::Anchor;
use crate::context::UiContext;
use crate::widgets::{Button, Image, Label, Panel};

/// Handle to an element stored in a [`UiTree`](crate::UiTree).
///
/// Arena slots are recycled, but each reuse bumps the slot's generation, so a
/// handle to a removed element never resolves again.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl ElementId {
    /// Arena slot; shared by successive elements in the same slot.
    #[inline]
    pub fn index(self) -> usize {
        self.index
    }
}

// ── ElementBehavior ───────────────────────────────────────────────────────

/// Per-variant hooks invoked by the tree.
///
/// The tree owns traversal; a behavior only sees its own element's world
/// rect.
pub trait ElementBehavior {
    /// Frame logic. Returning `Some(size)` asks the tree to resize the
    /// element, which invalidates its layout and that of its descendants.
    fn on_update(&mut self, _rect: Rect, _ctx: &UiContext<'_>) -> Option<Vec2> {
        None
    }

    /// Pushes draw commands for the element occupying `rect`.
    fn on_render(&self, rect: Rect, layer: i32, ctx: &UiContext<'_>, batch: &mut SpriteBatch);
}

// ── ElementKind ───────────────────────────────────────────────────────────

/// Closed set of element variants, each holding only its own payload.
pub enum ElementKind {
    /// Pure grouping node: no drawing, never hit.
    Container,
    Panel(Panel),
    Label(Label),
    Image(Image),
    Button(Button),
}

impl ElementKind {
    pub fn behavior(&self) -> Option<&dyn ElementBehavior> {
        match self {
            ElementKind::Container => None,
            ElementKind::Panel(p) => Some(p),
            ElementKind::Label(l) => Some(l),
            ElementKind::Image(i) => Some(i),
            ElementKind::Button(b) => Some(b),
        }
    }

    pub fn behavior_mut(&mut self) -> Option<&mut dyn ElementBehavior> {
        match self {
            ElementKind::Container => None,
            ElementKind::Panel(p) => Some(p),
            ElementKind::Label(l) => Some(l),
            ElementKind::Image(i) => Some(i),
            ElementKind::Button(b) => Some(b),
        }
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, ElementKind::Container)
    }

    pub fn as_label(&self) -> Option<&Label> {
        match self {
            ElementKind::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_label_mut(&mut self) -> Option<&mut Label> {
        match self {
            ElementKind::Label(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&Button> {
        match self {
            ElementKind::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            ElementKind::Button(b) => Some(b),
            _ => None,
        }
    }
}

impl From<Panel> for ElementKind {
    fn from(p: Panel) -> Self {
        ElementKind::Panel(p)
    }
}

impl From<Label> for ElementKind {
    fn from(l: Label) -> Self {
        ElementKind::Label(l)
    }
}

impl From<Image> for ElementKind {
    fn from(i: Image) -> Self {
        ElementKind::Image(i)
    }
}

impl From<Button> for ElementKind {
    fn from(b: Button) -> Self {
        ElementKind::Button(b)
    }
}

// ── UiElement ─────────────────────────────────────────────────────────────

/// A node of the UI tree: common geometry plus a variant payload.
///
/// Elements are built detached, optionally with children, and handed to a
/// [`UiTree`](crate::UiTree), which takes ownership of the whole subtree.
/// Once inside a tree, geometry changes go through the tree's setters so the
/// layout cache stays coherent.
///
/// # Example
/// ```rust,ignore
/// let hud = UiElement::container("hud").child(
///     UiElement::new("score", Label::new("0", font))
///         .with_anchor(Anchor::TopRight)
///         .with_position(Vec2::new(-8.0, 8.0)),
/// );
/// ```
pub struct UiElement {
    pub(crate) name: String,
    pub(crate) position: Vec2,
    pub(crate) size: Vec2,
    pub(crate) anchor: Anchor,
    pub(crate) visible: bool,
    pub(crate) layer: i32,
    pub(crate) kind: ElementKind,
    /// Children not yet moved into a tree.
    pub(crate) pending: Vec<UiElement>,
}

impl UiElement {
    pub fn new(name: impl Into<String>, kind: impl Into<ElementKind>) -> Self {
        Self {
            name: name.into(),
            position: Vec2::zero(),
            size: Vec2::zero(),
            anchor: Anchor::TopLeft,
            visible: true,
            layer: 0,
            kind: kind.into(),
            pending: Vec::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Container)
    }

    /// Local position, added after the anchor offset.
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Layer forwarded to draw commands; orders quads on the same texture.
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn child(mut self, child: UiElement) -> Self {
        self.pending.push(child);
        self
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn layer(&self) -> i32 {
        self.layer
    }

    #[inline]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Variant payload. Geometry is not reachable from here.
    #[inline]
    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    /// Detached children, i.e. those given with [`child`](Self::child) or
    /// returned by [`UiTree::remove`](crate::UiTree::remove).
    pub fn detached_children(&self) -> &[UiElement] {
        &self.pending
    }

    /// Rect of this element inside a parent occupying `parent`.
    pub(crate) fn place(&self, parent: Rect) -> Rect {
        let origin = parent.origin + self.anchor.offset(parent.size, self.size) + self.position;
        Rect::from_origin_size(origin, self.size)
    }
}
