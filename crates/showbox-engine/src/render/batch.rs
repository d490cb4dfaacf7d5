use std::ops::Range;

use crate::coords::Rect;
use crate::scene::DrawCmd;

use super::common::{ShapeInstance, SHAPE_CIRCLE, SHAPE_RECT};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum Pipeline {
    Shapes,
    Glyphs,
}

/// A run of instances drawn with one pipeline under one scissor rect.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Batch {
    pub pipeline: Pipeline,
    pub clip: Option<Rect>,
    pub instances: Range<u32>,
}

/// Paint-ordered batches. Consecutive runs with the same pipeline and clip
/// are merged, so interleaved shapes and text keep their stacking order.
#[derive(Debug, Default)]
pub(super) struct BatchList {
    batches: Vec<Batch>,
}

impl BatchList {
    pub(super) fn clear(&mut self) {
        self.batches.clear();
    }

    pub(super) fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub(super) fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub(super) fn push(&mut self, pipeline: Pipeline, clip: Option<Rect>, instances: Range<u32>) {
        if instances.is_empty() {
            return;
        }
        if let Some(last) = self.batches.last_mut()
            && last.pipeline == pipeline
            && last.clip == clip
            && last.instances.end == instances.start
        {
            last.instances.end = instances.end;
            return;
        }
        self.batches.push(Batch { pipeline, clip, instances });
    }
}

/// GPU instance for a rect or circle command; `None` for other commands.
pub(super) fn shape_instance(cmd: &DrawCmd) -> Option<ShapeInstance> {
    match cmd {
        DrawCmd::Rect(r) => Some(ShapeInstance {
            origin: [r.rect.origin.x, r.rect.origin.y],
            size: [r.rect.size.x, r.rect.size.y],
            color: r.color.to_array(),
            shape: [SHAPE_RECT, 0.0, 0.0, 0.0],
        }),
        DrawCmd::Circle(c) => Some(ShapeInstance {
            origin: [c.center.x - c.radius, c.center.y - c.radius],
            size: [c.radius * 2.0, c.radius * 2.0],
            color: c.color.to_array(),
            shape: [SHAPE_CIRCLE, 0.0, 0.0, 0.0],
        }),
        DrawCmd::Text(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::scene::{CircleCmd, DrawList};

    #[test]
    fn merges_adjacent_runs_only() {
        let mut list = BatchList::default();
        list.push(Pipeline::Shapes, None, 0..2);
        list.push(Pipeline::Shapes, None, 2..3);
        list.push(Pipeline::Glyphs, None, 0..5);
        list.push(Pipeline::Shapes, None, 3..4);
        assert_eq!(
            list.batches(),
            &[
                Batch { pipeline: Pipeline::Shapes, clip: None, instances: 0..3 },
                Batch { pipeline: Pipeline::Glyphs, clip: None, instances: 0..5 },
                Batch { pipeline: Pipeline::Shapes, clip: None, instances: 3..4 },
            ]
        );
    }

    #[test]
    fn clip_change_splits_batch() {
        let mut list = BatchList::default();
        let clip = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        list.push(Pipeline::Shapes, None, 0..1);
        list.push(Pipeline::Shapes, clip, 1..2);
        list.push(Pipeline::Glyphs, clip, 0..0);
        assert_eq!(list.batches().len(), 2);
    }

    #[test]
    fn circle_instance_covers_bounding_square() {
        let cmd = DrawCmd::Circle(CircleCmd {
            center: Vec2::new(10.0, 20.0),
            radius: 5.0,
            color: Color::WHITE,
        });
        let inst = shape_instance(&cmd).unwrap();
        assert_eq!(inst.origin, [5.0, 15.0]);
        assert_eq!(inst.size, [10.0, 10.0]);
        assert_eq!(inst.shape[0], SHAPE_CIRCLE);
    }

    #[test]
    fn rect_instance_keeps_geometry() {
        let mut draw = DrawList::new();
        draw.push_solid_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::BLACK);
        let inst = shape_instance(&draw.items()[0].cmd).unwrap();
        assert_eq!(inst.origin, [1.0, 2.0]);
        assert_eq!(inst.size, [3.0, 4.0]);
        assert_eq!(inst.color, [0.0, 0.0, 0.0, 1.0]);
    }
}
