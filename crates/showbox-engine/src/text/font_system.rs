use std::fmt;
use std::path::Path;

use fontdue::layout::{CoordinateSystem, GlyphPosition, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`] and [`FontSystem::load_font_file`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns the loaded fonts.
///
/// Fonts are immutable after loading; the renderer rasterizes glyphs from
/// them on demand, and the host measures with the same layout rules.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    pub fn load_font_file(&mut self, path: &Path) -> Result<FontId, FontLoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FontLoadError(format!("{}: {}", path.display(), e)))?;
        self.load_font(&bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Lays `text` out with its top-left at the origin. Returns `false` for an unknown font.
    pub(crate) fn layout(
        &self,
        layout: &mut Layout<()>,
        text: &str,
        id: FontId,
        size: f32,
    ) -> bool {
        let Some(font) = self.get(id) else {
            return false;
        };
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));
        true
    }

    /// Bounding box of a single line in logical pixels. Width runs to the
    /// pen position after the last glyph, so trailing spaces count.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: FontId, size: f32) -> Vec2 {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        if !self.layout(&mut layout, text, id, size) {
            return Vec2::new(0.0, size * 1.2);
        }
        let Some(font) = self.get(id) else {
            return Vec2::new(0.0, size * 1.2);
        };

        let glyphs: &[GlyphPosition] = layout.glyphs();
        let w = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        let h = layout.height().max(size);
        Vec2::new(w, h)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_measures_as_empty_line() {
        let fonts = FontSystem::new();
        assert!(fonts.is_empty());
        assert_eq!(fonts.measure_text("abc", FontId(3), 10.0), Vec2::new(0.0, 12.0));
    }

    #[test]
    fn invalid_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"not a font").is_err());
        assert!(fonts.load_font_file(Path::new("/definitely/missing.ttf")).is_err());
    }
}
