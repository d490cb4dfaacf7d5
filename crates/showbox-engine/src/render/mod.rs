//! GPU rendering subsystem.
//!
//! [`SceneRenderer`] consumes a `scene::DrawList` and issues wgpu commands.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.
//! - Colors are premultiplied; pipelines blend with `One, OneMinusSrcAlpha`.

mod batch;
mod common;
mod ctx;
mod glyph_atlas;
mod scene_renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::SceneRenderer;
