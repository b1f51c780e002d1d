//! Color model shared between the batch, the scene and UI.
//!
//! Channels are plain floats; the unit range is not enforced so tints above
//! 1.0 can be used for overbright effects.

pub mod color;

pub use color::Color;
