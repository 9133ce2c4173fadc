//! Time subsystem.
//!
//! Provides frame timing without coupling to the runtime:
//! - one `FrameClock` per window
//! - `tick()` once per presented frame to obtain `FrameTime`
//! - `since_start()` for event timestamps between frames

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
