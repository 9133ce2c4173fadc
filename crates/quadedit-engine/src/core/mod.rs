//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and higher layers (editor, studio) without leaking runtime internals.

mod app;
mod ctx;

pub use app::{App, AppControl, InputCtx};
pub use ctx::{FrameCtx, WindowCtx};
