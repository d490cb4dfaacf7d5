//! Button ids as scripts see them.
//!
//! Scripts receive and query buttons by lowercase name (`"space"`, `"a"`,
//! `"mouse_left"`). Keys with no name here are delivered as `none`.

use showbox_engine::input::{Button, Key, MouseButton};

const BUTTON_NAMES: &[(Button, &str)] = &[
    (Button::Key(Key::Escape), "escape"),
    (Button::Key(Key::Enter), "enter"),
    (Button::Key(Key::Tab), "tab"),
    (Button::Key(Key::Backspace), "backspace"),
    (Button::Key(Key::Space), "space"),
    (Button::Key(Key::Insert), "insert"),
    (Button::Key(Key::Delete), "delete"),
    (Button::Key(Key::Home), "home"),
    (Button::Key(Key::End), "end"),
    (Button::Key(Key::PageUp), "pageup"),
    (Button::Key(Key::PageDown), "pagedown"),
    (Button::Key(Key::ArrowUp), "up"),
    (Button::Key(Key::ArrowDown), "down"),
    (Button::Key(Key::ArrowLeft), "left"),
    (Button::Key(Key::ArrowRight), "right"),
    (Button::Key(Key::Shift), "shift"),
    (Button::Key(Key::Control), "control"),
    (Button::Key(Key::Alt), "alt"),
    (Button::Key(Key::Meta), "meta"),
    (Button::Key(Key::A), "a"),
    (Button::Key(Key::B), "b"),
    (Button::Key(Key::C), "c"),
    (Button::Key(Key::D), "d"),
    (Button::Key(Key::E), "e"),
    (Button::Key(Key::F), "f"),
    (Button::Key(Key::G), "g"),
    (Button::Key(Key::H), "h"),
    (Button::Key(Key::I), "i"),
    (Button::Key(Key::J), "j"),
    (Button::Key(Key::K), "k"),
    (Button::Key(Key::L), "l"),
    (Button::Key(Key::M), "m"),
    (Button::Key(Key::N), "n"),
    (Button::Key(Key::O), "o"),
    (Button::Key(Key::P), "p"),
    (Button::Key(Key::Q), "q"),
    (Button::Key(Key::R), "r"),
    (Button::Key(Key::S), "s"),
    (Button::Key(Key::T), "t"),
    (Button::Key(Key::U), "u"),
    (Button::Key(Key::V), "v"),
    (Button::Key(Key::W), "w"),
    (Button::Key(Key::X), "x"),
    (Button::Key(Key::Y), "y"),
    (Button::Key(Key::Z), "z"),
    (Button::Key(Key::Digit0), "0"),
    (Button::Key(Key::Digit1), "1"),
    (Button::Key(Key::Digit2), "2"),
    (Button::Key(Key::Digit3), "3"),
    (Button::Key(Key::Digit4), "4"),
    (Button::Key(Key::Digit5), "5"),
    (Button::Key(Key::Digit6), "6"),
    (Button::Key(Key::Digit7), "7"),
    (Button::Key(Key::Digit8), "8"),
    (Button::Key(Key::Digit9), "9"),
    (Button::Key(Key::F1), "f1"),
    (Button::Key(Key::F2), "f2"),
    (Button::Key(Key::F3), "f3"),
    (Button::Key(Key::F4), "f4"),
    (Button::Key(Key::F5), "f5"),
    (Button::Key(Key::F6), "f6"),
    (Button::Key(Key::F7), "f7"),
    (Button::Key(Key::F8), "f8"),
    (Button::Key(Key::F9), "f9"),
    (Button::Key(Key::F10), "f10"),
    (Button::Key(Key::F11), "f11"),
    (Button::Key(Key::F12), "f12"),
    (Button::Mouse(MouseButton::Left), "mouse_left"),
    (Button::Mouse(MouseButton::Right), "mouse_right"),
    (Button::Mouse(MouseButton::Middle), "mouse_middle"),
    (Button::Mouse(MouseButton::Back), "mouse_back"),
    (Button::Mouse(MouseButton::Forward), "mouse_forward"),
];

pub fn button_name(button: Button) -> Option<&'static str> {
    BUTTON_NAMES.iter().find(|(b, _)| *b == button).map(|(_, name)| *name)
}

pub fn button_from_name(name: &str) -> Option<Button> {
    BUTTON_NAMES.iter().find(|(_, n)| *n == name).map(|(b, _)| *b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for (button, name) in BUTTON_NAMES {
            assert_eq!(button_from_name(name), Some(*button));
            assert_eq!(button_name(*button), Some(*name));
        }
    }

    #[test]
    fn unnamed_buttons() {
        assert_eq!(button_name(Button::Key(Key::Unknown(77))), None);
        assert_eq!(button_name(Button::Mouse(MouseButton::Other(9))), None);
        assert_eq!(button_from_name("hyper"), None);
    }
}
