use showbox_engine::coords::{Rect, Vec2};
use showbox_engine::paint::Color;
use showbox_engine::scene::DrawList;
use showbox_engine::text::{FontId, FontSystem};

/// Drawing surface handed to an example's `draw`.
///
/// Wraps the engine's `DrawList`. Coordinates are local to `bounds`: (0, 0)
/// is the top-left of the example area, and the host clips everything to it.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    fonts: &'a FontSystem,
    font: Option<FontId>,
    bounds: Rect,
}

impl<'a> Painter<'a> {
    pub fn new(draw_list: &'a mut DrawList, fonts: &'a FontSystem, font: Option<FontId>, bounds: Rect) -> Self {
        Self { draw_list, fonts, font, bounds }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bounds.height()
    }

    /// Fills the whole area.
    pub fn clear(&mut self, color: Color) {
        self.draw_list.push_solid_rect(self.bounds, color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !rect.is_finite() {
            return;
        }
        self.draw_list.push_solid_rect(rect.translated(self.bounds.origin), color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        self.draw_list.push_solid_circle(center + self.bounds.origin, radius, color);
    }

    /// Draws `text` with its top-left at `pos`. A no-op when no font is loaded.
    pub fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        let Some(font) = self.font else { return };
        if !pos.is_finite() || !(size > 0.0) {
            return;
        }
        self.draw_list.push_text(text, font, size, color, pos + self.bounds.origin);
    }

    /// Width of `text` at `size`, matching what [`text`](Self::text) draws.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match self.font {
            Some(font) => self.fonts.measure_text(text, font, size).x,
            None => text.chars().count() as f32 * size * 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showbox_engine::scene::DrawCmd;

    #[test]
    fn shapes_are_offset_by_the_area_origin() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let mut p = Painter::new(&mut list, &fonts, None, Rect::new(300.0, 0.0, 600.0, 600.0));
        p.fill_rect(Rect::new(10.0, 20.0, 5.0, 5.0), Color::BLACK);
        p.fill_circle(Vec2::new(1.0, 2.0), 3.0, Color::BLACK);

        let items = list.items();
        match &items[0].cmd {
            DrawCmd::Rect(r) => assert_eq!(r.rect, Rect::new(310.0, 20.0, 5.0, 5.0)),
            other => panic!("expected rect, got {other:?}"),
        }
        match &items[1].cmd {
            DrawCmd::Circle(c) => assert_eq!(c.center, Vec2::new(301.0, 2.0)),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn text_without_font_is_skipped() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let mut p = Painter::new(&mut list, &fonts, None, Rect::new(0.0, 0.0, 10.0, 10.0));
        p.text("hi", Vec2::zero(), 12.0, Color::WHITE);
        assert!(list.is_empty());
    }

    #[test]
    fn non_finite_geometry_is_dropped() {
        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let mut p = Painter::new(&mut list, &fonts, None, Rect::new(0.0, 0.0, 10.0, 10.0));
        p.fill_rect(Rect::new(f32::NAN, 0.0, 1.0, 1.0), Color::WHITE);
        p.fill_circle(Vec2::new(0.0, 0.0), f32::INFINITY, Color::WHITE);
        assert!(list.is_empty());
    }
}
