use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, InputCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::InputState;
use crate::time::FrameClock;

use super::translate;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Inner size in logical pixels; the app's canvas.
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "quadedit".to_string(),
            initial_size: LogicalSize::new(700.0, 700.0),
            resizable: false,
        }
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window is
    /// closed.
    ///
    /// Returns an error if the event loop, the window or its GPU surface
    /// could not be created.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut host = Host { config, gpu_init, app, window: None, startup_error: None };

        event_loop
            .run_app(&mut host)
            .context("event loop terminated with an error")?;

        host.startup_error.map_or(Ok(()), Err)
    }
}

/// A window and the GPU surface borrowing it, plus its per-window input and
/// clock.
#[self_referencing]
struct WindowEntry {
    input: InputState,
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn open(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gpu_init: GpuInit,
    ) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        WindowEntryTryBuilder {
            input: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .map_err(|e: anyhow::Error| e.context("graphics context unavailable"))
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn redraw<A: App>(&mut self, app: &mut A) -> AppControl {
        self.with_mut(|f| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id: f.window.id(), window: f.window },
                gpu: f.gpu,
                input: f.input,
                time: f.clock.tick(),
            };
            app.on_frame(&mut ctx)
        })
    }

    fn deliver_input<A: App>(&mut self, app: &mut A, event: &WindowEvent) -> AppControl {
        self.with_mut(|f| {
            let Some(ev) = translate::input_event(f.window, f.input, event) else {
                return AppControl::Continue;
            };
            if !f.input.apply_event(&ev) {
                return AppControl::Continue;
            }
            let mut ctx = InputCtx {
                window: WindowCtx { id: f.window.id(), window: f.window },
                input: f.input,
                now: f.clock.since_start(),
            };
            app.on_input(&mut ctx, &ev)
        })
    }
}

struct Host<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    window: Option<WindowEntry>,
    startup_error: Option<anyhow::Error>,
}

impl<A: App + 'static> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match WindowEntry::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("startup failed: {e:#}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Frames are drawn only on request.
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut().filter(|e| e.id() == id) else { return };

        let control = match event {
            WindowEvent::CloseRequested => AppControl::Exit,
            WindowEvent::Resized(size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                entry.with_window(|w| w.request_redraw());
                AppControl::Continue
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                entry.with_window(|w| w.request_redraw());
                AppControl::Continue
            }
            WindowEvent::RedrawRequested => entry.redraw(&mut self.app),
            other => entry.deliver_input(&mut self.app, &other),
        };

        if control == AppControl::Exit {
            log::debug!("closing window");
            self.window = None;
            event_loop.exit();
        }
    }
}
