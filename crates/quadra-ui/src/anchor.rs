use quadra_engine::coords::Vec2;

/// Reference point of an element inside its parent.
///
/// The anchor picks where the element's local position is measured from:
/// `TopLeft` keeps the position as-is, `BottomRight` pins the element's
/// bottom-right corner to the parent's, and so on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Anchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Anchor {
    /// Offset of an element of `size` inside a parent of `parent` size,
    /// before the element's local position is added.
    pub fn offset(self, parent: Vec2, size: Vec2) -> Vec2 {
        let free = parent - size;
        match self {
            Anchor::TopLeft => Vec2::zero(),
            Anchor::TopRight => Vec2::new(free.x, 0.0),
            Anchor::BottomLeft => Vec2::new(0.0, free.y),
            Anchor::BottomRight => free,
            Anchor::Center => free * 0.5,
        }
    }
}
