use super::Vec2;

/// Axis-aligned rectangle in logical pixels, `origin` at the top-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { origin: Vec2::new(x, y), size: Vec2::new(w, h) }
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn translated(self, offset: Vec2) -> Self {
        Self { origin: self.origin + offset, size: self.size }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Flips negative extents so the size is non-negative and the covered area is unchanged.
    pub fn normalized(self) -> Self {
        let (x, w) = if self.size.x < 0.0 { (self.origin.x + self.size.x, -self.size.x) } else { (self.origin.x, self.size.x) };
        let (y, h) = if self.size.y < 0.0 { (self.origin.y + self.size.y, -self.size.y) } else { (self.origin.y, self.size.y) };
        Rect::new(x, y, w, h)
    }

    /// Overlap of two rects; `None` when they share no area.
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let (a, b) = (self.normalized(), other.normalized());
        let left = a.origin.x.max(b.origin.x);
        let top = a.origin.y.max(b.origin.y);
        let right = (a.origin.x + a.size.x).min(b.origin.x + b.size.x);
        let bottom = (a.origin.y + a.size.y).min(b.origin.y + b.size.y);
        (right > left && bottom > top).then(|| Rect::new(left, top, right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizing_flips_negative_extents() {
        assert_eq!(Rect::new(10.0, 10.0, -4.0, -3.0).normalized(), Rect::new(6.0, 7.0, 4.0, 3.0));
        let plain = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(plain.normalized(), plain);
    }

    #[test]
    fn sidebar_and_example_area_do_not_overlap() {
        let sidebar = Rect::new(0.0, 0.0, 300.0, 600.0);
        let area = Rect::new(300.0, 0.0, 600.0, 600.0);
        assert_eq!(sidebar.intersect(area), None);
    }

    #[test]
    fn nested_clip_is_the_overlap() {
        let area = Rect::new(300.0, 0.0, 600.0, 600.0);
        let inner = Rect::new(250.0, 550.0, 100.0, 100.0);
        assert_eq!(area.intersect(inner), Some(Rect::new(300.0, 550.0, 50.0, 50.0)));
        assert_eq!(inner.intersect(area), area.intersect(inner));
    }

    #[test]
    fn empty_and_non_finite() {
        assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert!(!Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_finite());
        assert_eq!(Rect::new(1.0, 1.0, 2.0, 2.0).translated(Vec2::new(300.0, 0.0)).origin, Vec2::new(301.0, 1.0));
    }
}
