//! Sprite batch accumulator.
//!
//! Responsibilities:
//! - record per-frame draw requests between `begin` and `end`
//! - group them by texture, first-seen texture first
//! - build the quad vertex stream and keep a static quad index pattern
//! - emit exactly one indexed draw per texture bucket
//!
//! The batch never talks to a GPU API directly; it goes through
//! [`GraphicsDevice`](crate::render::GraphicsDevice).

mod command;
mod config;
mod error;
mod sprite_batch;
mod vertex;

pub use command::DrawCommand;
pub use config::BatchConfig;
pub use error::BatchError;
pub use sprite_batch::{FlushStats, SpriteBatch};
pub use vertex::{SpriteVertex, INDICES_PER_QUAD, QUAD_INDICES, VERTICES_PER_QUAD};
