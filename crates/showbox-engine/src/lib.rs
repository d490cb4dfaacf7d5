//! Showbox engine crate.
//!
//! Owns the platform and GPU runtime: one window, input translation, frame
//! timing, a retained draw list and the renderer that paints it. The host
//! crate builds on the [`core::App`] contract and never touches winit events
//! directly beyond it.

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;
pub mod window;

pub use winit;
