use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontId;

/// One line of text, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    pub font: FontId,
    /// Pixel size passed to the rasterizer.
    pub size: f32,
    pub color: Color,
    pub origin: Vec2,
}

impl DrawList {
    /// Records a line of text. Blank strings and invisible colors record nothing.
    pub fn push_text(&mut self, text: impl Into<String>, font: FontId, size: f32, color: Color, origin: Vec2) {
        let text = text.into();
        if text.is_empty() || color.is_transparent() || size <= 0.0 {
            return;
        }
        self.push(DrawCmd::Text(TextCmd { text, font, size, color, origin }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invisible_text_is_not_recorded() {
        let mut list = DrawList::new();
        list.push_text("", FontId(0), 14.0, Color::BLACK, Vec2::zero());
        list.push_text("hi", FontId(0), 14.0, Color::TRANSPARENT, Vec2::zero());
        list.push_text("hi", FontId(0), 0.0, Color::BLACK, Vec2::zero());
        assert!(list.is_empty());

        list.push_text("hi", FontId(0), 14.0, Color::BLACK, Vec2::new(3.0, 4.0));
        match &list.items()[0].cmd {
            DrawCmd::Text(t) => assert_eq!((t.text.as_str(), t.origin), ("hi", Vec2::new(3.0, 4.0))),
            other => panic!("unexpected {other:?}"),
        }
    }
}
