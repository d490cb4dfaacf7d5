use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    Button, InputEvent, KeyState, Modifiers, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};

/// Current input state for the window.
///
/// Holds "is down" information and the pointer position. Every applied event
/// is also appended to the current `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Keys and mouse buttons currently held.
    pub held: HashSet<Button>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and records it in `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Focus loss mid-press never delivers the release.
                    self.held.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => self.held.insert(Button::Key(*key)),
                    KeyState::Released => self.held.remove(&Button::Key(*key)),
                };
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => self.held.insert(Button::Mouse(*button)),
                    MouseButtonState::Released => self.held.remove(&Button::Mouse(*button)),
                };
            }

            InputEvent::Text(_) => {}
        }

        frame.push_event(ev);
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.held.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, MouseButton};

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat: false }
    }

    #[test]
    fn tracks_held_buttons_and_records_events() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed));
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state: MouseButtonState::Pressed,
                x: 5.0,
                y: 6.0,
                modifiers: Modifiers::default(),
            }),
        );
        assert!(state.is_down(Button::Key(Key::A)));
        assert!(state.is_down(Button::Mouse(MouseButton::Left)));
        assert_eq!(state.pointer_pos, Some((5.0, 6.0)));

        state.apply_event(&mut frame, key(Key::A, KeyState::Released));
        assert!(!state.is_down(Button::Key(Key::A)));
        assert_eq!(frame.events.len(), 3);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.held.is_empty());
    }
}
