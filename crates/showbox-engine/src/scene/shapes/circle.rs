use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList};

/// Solid anti-aliased circle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl DrawList {
    /// Records a solid circle. Non-positive radii are dropped.
    #[inline]
    pub fn push_solid_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 || color.is_transparent() {
            return;
        }
        self.push(DrawCmd::Circle(CircleCmd { center, radius, color }));
    }
}
