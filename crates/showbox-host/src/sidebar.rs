use std::path::{Path, PathBuf};

use showbox_engine::coords::{Rect, Vec2};
use showbox_engine::paint::Color;

use crate::painter::Painter;
use crate::registry::{DescriptorId, Registry};

pub const WIDTH: f32 = 300.0;
pub const HEADER_HEIGHT: f32 = 50.0;
/// Top of the first row: the header plus a 15 px gap.
pub const FIRST_ROW_TOP: f32 = HEADER_HEIGHT + 15.0;
pub const ROW_HEIGHT: f32 = 25.0;
pub const ROW_SPACING: f32 = 5.0;

const TEXT_LEFT: f32 = 13.0;
const ROW_TEXT_SIZE: f32 = 18.0;
const HEADER_TEXT_SIZE: f32 = 22.0;

fn highlight() -> Color {
    Color::from_argb(0xff_1565e5)
}

fn header_band() -> Color {
    Color::from_argb(0xff_eeeeee)
}

fn border() -> Color {
    Color::from_argb(0xff_c8c8c8)
}

struct Row {
    id: DescriptorId,
    label: String,
    origin: PathBuf,
}

/// Clickable list of the registry's examples.
///
/// Clicks are mapped back to rows purely by position; the row under a click
/// is reported through the `on_select` callback given to [`Sidebar::build`].
pub struct Sidebar {
    title: String,
    width: f32,
    rows: Vec<Row>,
    on_select: Box<dyn FnMut(DescriptorId)>,
}

impl Sidebar {
    /// One row per entry of [`Registry::list_examples`], in catalog order.
    pub fn build(registry: &Registry, on_select: impl FnMut(DescriptorId) + 'static) -> Self {
        let examples = registry.list_examples();
        let rows = examples
            .iter()
            .map(|d| {
                let siblings = examples.iter().filter(|o| o.origin() == d.origin()).count();
                let label = if siblings > 1 {
                    format!("{}: {}", d.file_name(), d.type_name())
                } else {
                    d.file_name()
                };
                Row { id: d.id(), label, origin: d.origin().to_path_buf() }
            })
            .collect();

        Self { title: "Examples".to_string(), width: WIDTH, rows, on_select: Box::new(on_select) }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.rows.get(index).map(|r| r.label.as_str())
    }

    /// Descriptor ids in row order.
    pub fn ids(&self) -> impl Iterator<Item = DescriptorId> + '_ {
        self.rows.iter().map(|r| r.id)
    }

    /// Top edge of row `index`.
    pub fn row_top(index: usize) -> f32 {
        FIRST_ROW_TOP + index as f32 * (ROW_HEIGHT + ROW_SPACING)
    }

    /// The row under `(x, y)`, if any.
    pub fn row_at(&self, x: f32, y: f32) -> Option<usize> {
        if !(0.0..self.width).contains(&x) || !(y >= FIRST_ROW_TOP) {
            return None;
        }
        let index = ((y - FIRST_ROW_TOP) / (ROW_HEIGHT + ROW_SPACING)).floor() as usize;
        (index < self.rows.len()).then_some(index)
    }

    /// Selects the row under `(x, y)`. Returns `false` (and selects nothing)
    /// above the first row, past the last row, or outside the sidebar.
    pub fn handle_click(&mut self, x: f32, y: f32) -> bool {
        match self.row_at(x, y) {
            Some(index) => {
                let id = self.rows[index].id;
                (self.on_select)(id);
                true
            }
            None => false,
        }
    }

    /// Draws the sidebar. Rows loaded from `active_origin` are highlighted.
    pub fn render(&self, painter: &mut Painter<'_>, active_origin: Option<&Path>) {
        let height = painter.height();
        painter.clear(Color::WHITE);
        painter.fill_rect(Rect::new(0.0, 0.0, self.width, HEADER_HEIGHT), header_band());
        painter.text(&self.title, Vec2::new(TEXT_LEFT, 12.0), HEADER_TEXT_SIZE, Color::BLACK);

        for (i, row) in self.rows.iter().enumerate() {
            let top = Self::row_top(i);
            let active = active_origin == Some(row.origin.as_path());
            let text_color = if active {
                painter.fill_rect(Rect::new(0.0, top, self.width, ROW_HEIGHT), highlight());
                Color::WHITE
            } else {
                Color::BLACK
            };
            painter.text(&row.label, Vec2::new(TEXT_LEFT, top + 2.0), ROW_TEXT_SIZE, text_color);
        }

        painter.fill_rect(Rect::new(self.width - 1.0, 0.0, 1.0, height), border());
    }
}
