//! Quadra UI: a retained element tree drawn through the engine's sprite batch.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use quadra_ui::prelude::*;
//!
//! let mut ui = UiSystem::new();
//! ui.push_screen(
//!     "hud",
//!     UiElement::container("root")
//!         .child(UiElement::new("score", Label::new("0", font)).with_anchor(Anchor::TopRight))
//!         .child(
//!             UiElement::new("pause", Button::new().caption(Label::new("Pause", font)))
//!                 .with_size(Vec2::new(120.0, 32.0))
//!                 .with_anchor(Anchor::BottomRight),
//!         ),
//! );
//!
//! // Each frame, after the scene pushed its sprites:
//! let ctx = UiContext::new(screen, &input, &fonts).with_dt(dt).with_white_texture(white);
//! ui.update(&ctx);
//! ui.render(&ctx, &mut batch);
//! batch.end(&mut device)?;
//! ```
//!
//! # Element variants
//!
//! Every element carries one [`ElementKind`]: `Container`, [`Panel`],
//! [`Label`], [`Image`] or [`Button`]. Variant behavior lives behind
//! [`ElementBehavior`]; the tree owns traversal and layout.

pub mod anchor;
pub mod context;
pub mod element;
mod layout;
pub mod system;
pub mod tree;
pub mod widgets;

pub use anchor::Anchor;
pub use context::UiContext;
pub use element::{ElementBehavior, ElementId, ElementKind, UiElement};
pub use system::UiSystem;
pub use tree::UiTree;
pub use widgets::{Border, Button, ButtonState, Image, Label, Panel};

/// Everything needed to build and drive UI.
pub mod prelude {
    pub use crate::anchor::Anchor;
    pub use crate::context::UiContext;
    pub use crate::element::{ElementBehavior, ElementId, ElementKind, UiElement};
    pub use crate::system::UiSystem;
    pub use crate::tree::UiTree;
    pub use crate::widgets::{Border, Button, ButtonState, Image, Label, Panel};

    // Engine primitives most UI code touches.
    pub use quadra_engine::coords::{Rect, Vec2};
    pub use quadra_engine::paint::Color;
    pub use quadra_engine::render::TextureId;
    pub use quadra_engine::text::FontId;
}
