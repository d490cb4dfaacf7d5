use crate::scene::shapes::{CircleCmd, RectCmd, TextCmd};

/// Renderer-agnostic draw command.
///
/// Adding a shape: a payload module under `scene::shapes`, a variant here,
/// and a matching arm in `render::SceneRenderer`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
}
