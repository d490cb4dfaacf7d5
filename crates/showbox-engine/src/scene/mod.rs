//! Scene (draw stream) types.
//!
//! A `DrawList` records renderer-agnostic commands for one frame. Paint order
//! is insertion order: later commands cover earlier ones. Shape payloads and
//! their push helpers live under `scene::shapes`.

mod cmd;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use list::{DrawItem, DrawList};
pub use shapes::{CircleCmd, RectCmd, TextCmd};
