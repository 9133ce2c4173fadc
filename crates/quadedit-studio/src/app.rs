use std::time::Duration;

use quadedit_editor::config::KeyBindings;
use quadedit_editor::{Command, Editor};
use quadedit_engine::core::{App, AppControl, FrameCtx, InputCtx};
use quadedit_engine::input::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};
use quadedit_engine::render::ImmediateRenderer;

use crate::scheduler::RedrawScheduler;

pub type StudioEditor = Editor<ImmediateRenderer, RedrawScheduler>;

/// Bridges runtime events to the editor.
///
/// Handlers record frames into the renderer as they run; the window is asked
/// for a redraw whenever a recorded frame has not been presented yet or an
/// animation tick is pending.
pub struct EditorApp {
    editor: StudioEditor,
    keys: KeyBindings,
    /// Start animating on the first frame, when a timestamp is available.
    autostart: bool,
    presented: u64,
}

impl EditorApp {
    pub fn new(editor: StudioEditor, keys: KeyBindings, autostart: bool) -> Self {
        Self { editor, keys, autostart, presented: 0 }
    }

    pub fn editor(&self) -> &StudioEditor {
        &self.editor
    }

    fn handle(&mut self, event: &InputEvent, now: Duration) -> AppControl {
        match event {
            InputEvent::Key { key, state: KeyState::Pressed, repeat: false, .. } => {
                if *key == Key::Escape {
                    return AppControl::Exit;
                }
                if let Some(command) = self.keys.command_for(*key) {
                    log::debug!("{key} -> {command}");
                    self.editor.execute(command, now);
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                ..
            }) => match state {
                MouseButtonState::Pressed => {
                    self.editor.pointer_down(*x, *y);
                }
                MouseButtonState::Released => self.editor.pointer_up(),
            },

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.editor.pointer_move(*x, *y);
            }

            // The release will never arrive.
            InputEvent::Focused(false) => self.editor.pointer_up(),

            _ => {}
        }
        AppControl::Continue
    }

    /// Work due at the start of a frame: the deferred animation start and the
    /// animation ticks requested before this frame.
    fn advance(&mut self, now: Duration) {
        if std::mem::take(&mut self.autostart) && !self.editor.modes().anim_on {
            self.editor.execute(Command::ToggleAnimate, now);
        }
        for request in self.editor.scheduler_mut().take_due() {
            self.editor.on_frame_request(request, now);
        }
    }

    fn needs_redraw(&self) -> bool {
        self.editor.graphics().frames_recorded() != self.presented
            || self.editor.scheduler().has_pending()
    }
}

impl App for EditorApp {
    fn on_input(&mut self, ctx: &mut InputCtx<'_>, event: &InputEvent) -> AppControl {
        let control = self.handle(event, ctx.now);
        if control == AppControl::Continue && self.needs_redraw() {
            ctx.window.request_redraw();
        }
        control
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.advance(ctx.time.since_start);

        let gfx = self.editor.graphics_mut();
        let clear = gfx.clear_color();
        let control = ctx.render(clear, |rctx, target| gfx.encode(rctx, target));
        self.presented = self.editor.graphics().frames_recorded();

        if self.editor.scheduler().has_pending() {
            ctx.window.request_redraw();
        }
        control
    }
}
