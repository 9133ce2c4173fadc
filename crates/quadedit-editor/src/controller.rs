//! Pointer and mode handling on top of the geometry.
//!
//! Handlers only mutate state; the [`Editor`](crate::Editor) decides what to
//! re-render from their results.

use std::time::Duration;

use quadedit_engine::coords::Vec2;

use crate::clock::{FrameScheduler, TransformClock};
use crate::config::{EditorConfig, InitialModes};
use crate::geometry::GeometryStore;
use crate::mapper::{CoordinateMapper, Transform};

/// Mode flags. `edit_on && anim_on` never holds between handlers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModeState {
    pub edit_on: bool,
    pub wireframe_on: bool,
    pub anim_on: bool,
}

impl From<InitialModes> for ModeState {
    fn from(m: InitialModes) -> Self {
        Self { edit_on: m.edit, wireframe_on: m.wireframe, anim_on: false }
    }
}

/// Vertex being dragged and the last pointer position seen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragSession {
    pub vertex: usize,
    pub last_pointer: Vec2,
}

/// Result of a mode toggle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ModeChange {
    /// Flags changed; geometry untouched.
    Flags,
    /// The animation stopped and its transform was written into the vertex
    /// positions.
    Baked(Transform),
}

#[derive(Debug, Clone)]
pub struct EditorState {
    geometry: GeometryStore,
    mapper: CoordinateMapper,
    modes: ModeState,
    clock: TransformClock,
    drag: Option<DragSession>,
    drag_radius: f32,
}

impl EditorState {
    pub fn new(geometry: GeometryStore, mapper: CoordinateMapper, config: &EditorConfig) -> Self {
        Self {
            geometry,
            mapper,
            modes: config.initial.into(),
            clock: TransformClock::new(config.animation),
            drag: None,
            drag_radius: config.drag_radius,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    #[inline]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[inline]
    pub fn modes(&self) -> ModeState {
        self.modes
    }

    #[inline]
    pub fn clock(&self) -> &TransformClock {
        &self.clock
    }

    pub(crate) fn clock_mut(&mut self) -> &mut TransformClock {
        &mut self.clock
    }

    #[inline]
    pub fn drag(&self) -> Option<DragSession> {
        self.drag
    }

    /// Lowest-index vertex strictly within `drag_radius` of `p`.
    pub fn hit_test(&self, p: Vec2) -> Option<usize> {
        let r2 = self.drag_radius * self.drag_radius;
        self.geometry.positions().position(|v| v.distance_squared(p) < r2)
    }

    /// Opens a drag session if editing and `p` (inside the canvas) hits a
    /// vertex. Returns whether a session was opened.
    pub fn pointer_down(&mut self, p: Vec2) -> bool {
        if !self.modes.edit_on || !self.mapper.canvas().contains(p) {
            return false;
        }
        match self.hit_test(p) {
            Some(vertex) => {
                log::debug!("drag start: vertex {vertex} at ({}, {})", p.x, p.y);
                self.drag = Some(DragSession { vertex, last_pointer: p });
                true
            }
            None => false,
        }
    }

    /// Moves the dragged vertex to `p`. Returns whether geometry changed.
    pub fn pointer_move(&mut self, p: Vec2) -> bool {
        let Some(drag) = self.drag.as_mut() else { return false };
        drag.last_pointer = p;
        self.geometry.set_vertex_position(drag.vertex, p);
        true
    }

    /// Closes any drag session.
    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            log::debug!("drag end: vertex {}", drag.vertex);
        }
    }

    pub fn toggle_wireframe(&mut self) -> ModeChange {
        self.modes.wireframe_on = !self.modes.wireframe_on;
        log::debug!("wireframe {}", on_off(self.modes.wireframe_on));
        ModeChange::Flags
    }

    pub fn toggle_edit(&mut self, scheduler: &mut dyn FrameScheduler) -> ModeChange {
        self.modes.edit_on = !self.modes.edit_on;
        log::debug!("edit mode {}", on_off(self.modes.edit_on));

        if !self.modes.edit_on {
            self.pointer_up();
            return ModeChange::Flags;
        }
        if self.modes.anim_on {
            self.modes.anim_on = false;
            return self.stop_and_bake(scheduler);
        }
        ModeChange::Flags
    }

    pub fn toggle_animate(
        &mut self,
        now: Duration,
        scheduler: &mut dyn FrameScheduler,
    ) -> ModeChange {
        self.modes.anim_on = !self.modes.anim_on;
        log::debug!("animation {}", on_off(self.modes.anim_on));

        if self.modes.anim_on {
            self.modes.edit_on = false;
            self.pointer_up();
            self.clock.start(now, scheduler);
            ModeChange::Flags
        } else {
            self.stop_and_bake(scheduler)
        }
    }

    fn stop_and_bake(&mut self, scheduler: &mut dyn FrameScheduler) -> ModeChange {
        match self.clock.stop(scheduler) {
            Some(t) => {
                log::debug!("baking transform: {:.3}°, x{:.3}", t.angle_deg, t.scale);
                self.mapper.bake_transform(&mut self.geometry, t);
                ModeChange::Baked(t)
            }
            None => ModeChange::Flags,
        }
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}
