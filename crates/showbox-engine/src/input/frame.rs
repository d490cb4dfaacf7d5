use super::types::{InputEvent, TextEvent};

/// Per-frame input: every event since the previous frame, in arrival order.
///
/// `InputState` holds what is currently down; `InputFrame` holds what happened.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Text committed this frame.
    pub fn text(&self) -> impl Iterator<Item = &TextEvent> {
        self.events.iter().filter_map(|ev| match ev {
            InputEvent::Text(t) => Some(t),
            _ => None,
        })
    }
}
