use winit::window::{Window, WindowId};

use crate::coords::ColorRgba;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// The window a callback is running for.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Asks for an `on_frame` call. Requests made before the frame runs
    /// coalesce into one.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

/// Context for [`App::on_frame`](super::App::on_frame).
///
/// `'a` is the callback; `'w` is the window borrow held by the GPU surface.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Acquires the surface, clears it to `clear`, lets `draw` encode on top
    /// and presents.
    ///
    /// `draw` is not called when no surface texture could be acquired; the
    /// frame is retried on the next redraw unless the error is fatal, which
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: ColorRgba, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match self.gpu.recover(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => {
                        self.window.request_redraw();
                        AppControl::Continue
                    }
                };
            }
        };

        {
            let mut target = frame.target();
            // Dropping the pass ends it before `draw` opens its own.
            drop(target.pass("quadedit clear", wgpu::LoadOp::Clear(clear.to_wgpu())));
            draw(&self.gpu.render_ctx(), &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.present(frame);
        AppControl::Continue
    }
}
