//! GPU device + surface management.
//!
//! Creates the wgpu device/queue for the window, keeps the surface
//! configured across resizes, and hands out one frame (view + encoder) at a time.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
