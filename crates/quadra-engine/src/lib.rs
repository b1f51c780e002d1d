//! Quadra engine crate.
//!
//! 2D rendering substrate: entities with transforms are batched into
//! texture-grouped draw submissions each frame and composited through a
//! camera. Window and device bring-up stay with the caller; this crate
//! starts from a [`render::GraphicsDevice`].

pub mod batch;
pub mod camera;
pub mod coords;
pub mod core;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
