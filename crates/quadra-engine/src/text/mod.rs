//! Text: font capability, glyph layout, and a fontdue-backed atlas.
//!
//! Layout is a plain pen walk over a [`Font`]; there is no shaping, kerning,
//! or wrapping. The atlas rasterizes a fixed charset up front; uploading its
//! bitmap is left to the caller's device.

mod atlas;
mod font;
mod font_system;
mod layout;

pub use atlas::{FontAtlas, FontAtlasConfig};
pub use font::{Font, Glyph, LineMetrics};
pub use font_system::{FontId, FontLoadError, FontSystem};
pub use layout::measure_text;
