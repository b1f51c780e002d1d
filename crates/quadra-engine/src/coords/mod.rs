//! Coordinate and geometry types shared across the batch, scene and UI.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The camera maps this space to clip space; see [`crate::camera`].

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;

pub(crate) use viewport::clamp_dim;
