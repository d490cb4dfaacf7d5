//! Color model shared by the scene and the renderer.

pub mod color;

pub use color::Color;
