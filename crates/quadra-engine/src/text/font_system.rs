use std::fmt;

use crate::coords::Vec2;

use super::Font;

/// Error returned by [`FontAtlas::from_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font stored in a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns a collection of fonts.
///
/// Fonts are immutable once added. The system is owned by the application
/// and lent to the UI layer each frame for measuring and drawing text.
///
/// A fontdue font is typically added as a [`FontAtlas`](super::FontAtlas)
/// after its bitmap has been uploaded and the texture attached.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<Box<dyn Font>>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores any [`Font`] implementation and returns its handle.
    pub fn add(&mut self, font: Box<dyn Font>) -> FontId {
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        id
    }

    pub fn get(&self, id: FontId) -> Option<&dyn Font> {
        self.fonts.get(id.0).map(|f| f.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Size of `text` laid out with font `id` at `scale`.
    ///
    /// Unknown fonts measure as zero.
    #[must_use]
    pub fn measure_text(&self, id: FontId, text: &str, scale: f32) -> Vec2 {
        match self.get(id) {
            Some(font) => super::measure_text(font, text, scale),
            None => Vec2::zero(),
        }
    }
}
