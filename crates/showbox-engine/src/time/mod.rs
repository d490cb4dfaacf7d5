//! Frame timing.
//!
//! The runtime owns one `FrameClock` and calls `tick()` once per frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
