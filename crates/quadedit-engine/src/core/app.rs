use std::time::Duration;

use crate::input::{InputEvent, InputState};

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Per-event context passed to [`App::on_input`].
pub struct InputCtx<'a> {
    pub window: WindowCtx<'a>,
    /// State after `event` has been applied.
    pub input: &'a InputState,
    /// Monotonic time since the window's clock started.
    pub now: Duration,
}

/// Application contract implemented by higher layers.
///
/// Events arrive one at a time in arrival order; each callback runs to
/// completion before the next event is delivered. The runtime redraws a
/// window only after the app asked for it through
/// [`WindowCtx::request_redraw`].
pub trait App {
    /// Called for every translated input event.
    fn on_input(&mut self, ctx: &mut InputCtx<'_>, event: &InputEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called once per presented frame per window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
