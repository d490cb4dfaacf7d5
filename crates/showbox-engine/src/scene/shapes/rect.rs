use crate::coords::Rect;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Solid rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl DrawList {
    /// Records a solid rectangle. Empty or fully transparent rects are dropped.
    #[inline]
    pub fn push_solid_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.normalized();
        if rect.is_empty() || color.is_transparent() {
            return;
        }
        self.push(DrawCmd::Rect(RectCmd { rect, color }));
    }
}
