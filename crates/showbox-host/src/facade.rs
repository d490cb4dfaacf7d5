use std::collections::HashSet;
use std::rc::Rc;

use showbox_engine::input::{Button, Key, Modifiers};
use showbox_engine::text::{FontId, FontSystem};

use crate::text_input::TextInput;

/// Handle to a text field created through [`HostFacade::create_text_input`].
///
/// Handles are only valid for the instance that created them; switching
/// examples discards every field.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextInputId(usize);

impl TextInputId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn from_index(index: usize) -> Self {
        Self(index)
    }
}

/// The narrow view of the host an example gets.
///
/// Pointer coordinates are relative to the example area's top-left corner.
pub struct HostFacade {
    mouse: (f32, f32),
    held: HashSet<Button>,
    millis: u64,

    text_inputs: Vec<TextInput>,
    focus: Option<TextInputId>,

    close_requested: bool,

    fonts: Rc<FontSystem>,
    font: Option<FontId>,
    rng: fastrand::Rng,
}

impl HostFacade {
    pub fn new(fonts: Rc<FontSystem>, font: Option<FontId>) -> Self {
        Self {
            mouse: (0.0, 0.0),
            held: HashSet::new(),
            millis: 0,
            text_inputs: Vec::new(),
            focus: None,
            close_requested: false,
            fonts,
            font,
            rng: fastrand::Rng::new(),
        }
    }

    // ── input ─────────────────────────────────────────────────────────────

    pub fn mouse_x(&self) -> f32 {
        self.mouse.0
    }

    pub fn mouse_y(&self) -> f32 {
        self.mouse.1
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    /// Milliseconds since the host started.
    pub fn milliseconds(&self) -> u64 {
        self.millis
    }

    /// Uniform random number in `[lo, hi)`.
    pub fn random(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.rng.f64() * (hi - lo)
    }

    // ── text fields ───────────────────────────────────────────────────────

    pub fn create_text_input(&mut self, text: impl Into<String>, max_chars: Option<usize>) -> TextInputId {
        let id = TextInputId(self.text_inputs.len());
        self.text_inputs.push(TextInput::new(text, max_chars));
        id
    }

    pub fn text_input(&self, id: TextInputId) -> Option<&TextInput> {
        self.text_inputs.get(id.0)
    }

    pub fn text_input_mut(&mut self, id: TextInputId) -> Option<&mut TextInput> {
        self.text_inputs.get_mut(id.0)
    }

    /// The field receiving typed text, if any.
    pub fn text_focus(&self) -> Option<TextInputId> {
        self.focus
    }

    /// Moves text focus. Unknown ids clear it.
    pub fn set_text_focus(&mut self, id: Option<TextInputId>) {
        self.focus = id.filter(|id| id.0 < self.text_inputs.len());
    }

    // ── text measurement ──────────────────────────────────────────────────

    /// Width of `text` at `size` in the host font. Without a font, every
    /// char is taken to be half as wide as it is tall.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self.font {
            Some(font) => self.fonts.measure_text(text, font, size).x,
            None => text.chars().count() as f32 * size * 0.5,
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    // ── host side ─────────────────────────────────────────────────────────

    pub(crate) fn set_mouse(&mut self, x: f32, y: f32) {
        self.mouse = (x, y);
    }

    pub(crate) fn set_held(&mut self, held: &HashSet<Button>) {
        self.held.clone_from(held);
    }

    pub(crate) fn press(&mut self, button: Button) {
        self.held.insert(button);
    }

    pub(crate) fn release(&mut self, button: Button) {
        self.held.remove(&button);
    }

    pub(crate) fn set_millis(&mut self, millis: u64) {
        self.millis = millis;
    }

    /// Drops every field and the focus; called between instances.
    pub(crate) fn reset_instance_state(&mut self) {
        self.text_inputs.clear();
        self.focus = None;
    }

    /// Sends committed text to the focused field. Returns `true` if a field took it.
    pub(crate) fn route_text(&mut self, text: &str) -> bool {
        match self.focus.and_then(|id| self.text_inputs.get_mut(id.0)) {
            Some(input) => {
                input.insert_str(text);
                true
            }
            None => false,
        }
    }

    /// Sends an editing key to the focused field. Returns `true` if it was consumed.
    pub(crate) fn route_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        match self.focus.and_then(|id| self.text_inputs.get_mut(id.0)) {
            Some(input) => input.handle_key(key, modifiers),
            None => false,
        }
    }
}
