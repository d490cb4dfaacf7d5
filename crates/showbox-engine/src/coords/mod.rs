//! Geometry shared by the scene, the renderer and the host.
//!
//! All coordinates are logical pixels with a top-left origin, +X right and
//! +Y down. Renderers convert to NDC with a viewport uniform.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
