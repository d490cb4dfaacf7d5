//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! [`platform`] translates window-system events into `InputEvent`s.

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    Button,
    ButtonEdge,
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    TextEvent,
};
