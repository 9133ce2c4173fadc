//! Frame driver: turns editor state into draw calls.

use std::time::Duration;

use quadedit_engine::coords::Vec2;
use quadedit_engine::render::{BufferHandle, GraphicsContext, PrimitiveKind, ProgramHandle};

use crate::buffer::{self, COLOR_COMPONENTS, COLOR_OFFSET, POSITION_COMPONENTS, VERTEX_STRIDE};
use crate::clock::{FrameDelta, FrameRequest, FrameScheduler};
use crate::command::Command;
use crate::config::EditorConfig;
use crate::controller::{EditorState, ModeChange, ModeState};
use crate::error::InitError;
use crate::geometry::{GeometryStore, QUAD_VERTICES};
use crate::mapper::CoordinateMapper;
use crate::scene::SceneData;

pub const POLYGON_VS: &str = include_str!("shaders/polygon_vs.wgsl");
pub const POLYGON_FS: &str = include_str!("shaders/polygon_fs.wgsl");

/// The editor: one [`EditorState`], the graphics context it renders through
/// and the scheduler its animation ticks come from.
///
/// Every handler that changes what is on screen records a complete frame
/// before returning.
pub struct Editor<G, S> {
    state: EditorState,
    gfx: G,
    scheduler: S,
    program: ProgramHandle,
    vertex_buffer: BufferHandle,
    scratch: Vec<f32>,
    order: Vec<usize>,
    frames_rendered: u64,
}

impl<G: GraphicsContext, S: FrameScheduler> Editor<G, S> {
    /// Builds the geometry from `scene`, sets up the polygon program and
    /// renders the first frame.
    pub fn new(
        scene: &SceneData,
        config: &EditorConfig,
        gfx: G,
        scheduler: S,
    ) -> Result<Self, InitError> {
        let geometry = scene.to_geometry()?;
        let mapper = CoordinateMapper::new(scene.canvas());
        Self::with_geometry(geometry, mapper, config, gfx, scheduler)
    }

    /// Like [`Editor::new`] for geometry built in code. `config` is still
    /// validated.
    pub fn with_geometry(
        geometry: GeometryStore,
        mapper: CoordinateMapper,
        config: &EditorConfig,
        mut gfx: G,
        scheduler: S,
    ) -> Result<Self, InitError> {
        config.validate()?;

        let program = gfx.compile_program(POLYGON_VS, POLYGON_FS)?;
        gfx.use_program(program);

        let vertex_buffer = gfx.create_buffer();
        gfx.bind_vertex_attribute(
            vertex_buffer,
            "a_position",
            POSITION_COMPONENTS,
            VERTEX_STRIDE,
            0,
        )?;
        gfx.bind_vertex_attribute(
            vertex_buffer,
            "a_color",
            COLOR_COMPONENTS,
            VERTEX_STRIDE,
            COLOR_OFFSET,
        )?;

        log::info!(
            "editor ready: {} vertices, {} polygons, canvas {}x{}",
            geometry.vertex_count(),
            geometry.polygon_count(),
            mapper.canvas().width,
            mapper.canvas().height
        );

        let mut editor = Self {
            state: EditorState::new(geometry, mapper, config),
            gfx,
            scheduler,
            program,
            vertex_buffer,
            scratch: Vec::new(),
            order: Vec::new(),
            frames_rendered: 0,
        };
        editor.render_frame(None);
        Ok(editor)
    }

    #[inline]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    #[inline]
    pub fn modes(&self) -> ModeState {
        self.state.modes()
    }

    #[inline]
    pub fn geometry(&self) -> &GeometryStore {
        self.state.geometry()
    }

    #[inline]
    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    #[inline]
    pub fn graphics(&self) -> &G {
        &self.gfx
    }

    #[inline]
    pub fn graphics_mut(&mut self) -> &mut G {
        &mut self.gfx
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Buffer rebuilds so far, including the initial frame.
    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Rebuilds and uploads the vertex buffer and records one frame of draws.
    /// `delta` is composed onto the context's model transform first.
    pub fn render_frame(&mut self, delta: Option<FrameDelta>) {
        let geometry = self.state.geometry();
        buffer::build_into(geometry, self.state.mapper(), &mut self.scratch);
        self.gfx.upload_buffer_data(self.vertex_buffer, &self.scratch);

        self.gfx.clear();
        if let Some(d) = delta {
            self.gfx.set_transform_uniform(d.angle_delta, d.scale_ratio);
        }

        let dragged = self.state.drag().map(|d| d.vertex);
        draw_order(geometry.polygons(), dragged, &mut self.order);

        let polygons = geometry.polygon_count();
        let count = QUAD_VERTICES as u32;
        for &p in &self.order {
            self.gfx.draw_primitive(PrimitiveKind::TriangleFan, buffer::fill_offset(p), count);
        }
        if self.state.modes().wireframe_on {
            for &p in &self.order {
                self.gfx.draw_primitive(
                    PrimitiveKind::LineLoop,
                    buffer::wireframe_offset(p, polygons),
                    count,
                );
            }
        }

        self.frames_rendered += 1;
        log::trace!("frame {} rendered", self.frames_rendered);
    }

    pub fn execute(&mut self, command: Command, now: Duration) {
        let change = match command {
            Command::ToggleEdit => self.state.toggle_edit(&mut self.scheduler),
            Command::ToggleWireframe => self.state.toggle_wireframe(),
            Command::ToggleAnimate => self.state.toggle_animate(now, &mut self.scheduler),
        };
        if let ModeChange::Baked(_) = change {
            self.gfx.reset_transform_uniform();
        }
        self.render_frame(None);
    }

    /// Returns whether a drag session was opened.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.state.pointer_down(Vec2::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.state.pointer_move(Vec2::new(x, y)) {
            self.render_frame(None);
        }
    }

    pub fn pointer_up(&mut self) {
        self.state.pointer_up();
    }

    /// Runs a scheduled animation tick. Returns whether a frame was rendered.
    pub fn on_frame_request(&mut self, request: FrameRequest, now: Duration) -> bool {
        match self.state.clock_mut().fire(request, now, &mut self.scheduler) {
            Some(delta) => {
                self.render_frame(Some(delta));
                true
            }
            None => false,
        }
    }
}

/// Polygon indices in draw order: insertion order, with every polygon that
/// uses `dragged` moved to the end.
fn draw_order(polygons: &[[usize; QUAD_VERTICES]], dragged: Option<usize>, out: &mut Vec<usize>) {
    out.clear();
    out.extend(0..polygons.len());
    if let Some(v) = dragged {
        // Stable sort on a bool key is a stable partition.
        out.sort_by_key(|&p| polygons[p].contains(&v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::geometry::Rgb8;
    use crate::scene::SceneFile;
    use crate::testing::{Call, FakeGraphics, ManualScheduler};
    use quadedit_engine::coords::Viewport;
    use quadedit_engine::render::attribute_location;

    type TestEditor = Editor<FakeGraphics, ManualScheduler>;

    const EPS: f32 = 1e-3;

    fn secs(v: f32) -> Duration {
        Duration::from_secs_f32(v)
    }

    fn editor() -> TestEditor {
        let file = SceneFile::builtin().unwrap();
        Editor::new(&file.scene, &file.editor, FakeGraphics::default(), ManualScheduler::default())
            .unwrap()
    }

    /// Fires everything the scheduler has outstanding, as one presented frame.
    fn present(ed: &mut TestEditor, now: Duration) -> usize {
        let due = ed.scheduler_mut().take_outstanding();
        due.into_iter().filter(|&r| ed.on_frame_request(r, now)).count()
    }

    fn positions(ed: &TestEditor) -> Vec<Vec2> {
        ed.geometry().positions().collect()
    }

    // ── setup ─────────────────────────────────────────────────────────────

    #[test]
    fn shader_sources_declare_bound_attributes() {
        assert_eq!(attribute_location(POLYGON_VS, "a_position"), Some(0));
        assert_eq!(attribute_location(POLYGON_VS, "a_color"), Some(1));
        assert!(POLYGON_VS.contains("fn vs_main"));
        assert!(POLYGON_FS.contains("fn fs_main"));
    }

    #[test]
    fn init_binds_interleaved_layout_and_renders_once() {
        let ed = editor();
        let calls = &ed.graphics().calls;
        assert!(calls.contains(&Call::Bind {
            name: "a_position".into(),
            components: 2,
            stride: 5,
            offset: 0,
        }));
        assert!(calls.contains(&Call::Bind {
            name: "a_color".into(),
            components: 3,
            stride: 5,
            offset: 2,
        }));
        assert_eq!(ed.frames_rendered(), 1);
        assert_eq!(ed.graphics().last_upload.len(), 4 * 4 * 5 * 2);
    }

    #[test]
    fn shader_failure_is_fatal() {
        let file = SceneFile::builtin().unwrap();
        let gfx = FakeGraphics::failing_compile();
        let err = Editor::new(&file.scene, &file.editor, gfx, ManualScheduler::default())
            .err()
            .unwrap();
        assert!(matches!(err, InitError::Shader(_)));
    }

    #[test]
    fn missing_attribute_is_fatal() {
        let file = SceneFile::builtin().unwrap();
        let gfx = FakeGraphics::with_attributes(vec!["a_position"]);
        let err = Editor::new(&file.scene, &file.editor, gfx, ManualScheduler::default())
            .err()
            .unwrap();
        assert!(matches!(err, InitError::Attribute(ref e) if e.name == "a_color"));
    }

    #[test]
    fn invalid_scene_is_fatal() {
        let mut file = SceneFile::builtin().unwrap();
        file.scene.polygons.push([0, 1, 2, 99]);
        let gfx = FakeGraphics::default();
        let err = Editor::new(&file.scene, &file.editor, gfx, ManualScheduler::default())
            .err()
            .unwrap();
        assert!(matches!(err, InitError::Scene(_)));
    }

    #[test]
    fn geometry_constructor_rejects_invalid_config() {
        let file = SceneFile::builtin().unwrap();
        let mut config = EditorConfig::default();
        config.animation.min_size = 0.0;

        let err = Editor::with_geometry(
            file.scene.to_geometry().unwrap(),
            CoordinateMapper::new(file.scene.canvas()),
            &config,
            FakeGraphics::default(),
            ManualScheduler::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, InitError::Scene(SceneError::Config(_))));
    }

    #[test]
    fn animation_scale_stays_finite_over_long_runs() {
        let mut ed = editor();
        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        for t in [1.0, 4.0, 5.0, 6.0, 9.5, 30.0] {
            assert_eq!(present(&mut ed, secs(t)), 1);
            let scale = ed.graphics().scale;
            assert!(scale.is_finite() && scale >= 0.2 - EPS && scale <= 1.0 + EPS, "{scale}");
        }
    }

    // ── draw calls ────────────────────────────────────────────────────────

    #[test]
    fn frame_draws_fans_then_loops() {
        let ed = editor();
        assert_eq!(
            ed.graphics().last_frame_draws(),
            vec![
                (PrimitiveKind::TriangleFan, 0, 4),
                (PrimitiveKind::TriangleFan, 4, 4),
                (PrimitiveKind::TriangleFan, 8, 4),
                (PrimitiveKind::TriangleFan, 12, 4),
                (PrimitiveKind::LineLoop, 16, 4),
                (PrimitiveKind::LineLoop, 20, 4),
                (PrimitiveKind::LineLoop, 24, 4),
                (PrimitiveKind::LineLoop, 28, 4),
            ]
        );
    }

    #[test]
    fn wireframe_off_skips_loops() {
        let mut ed = editor();
        ed.execute(Command::ToggleWireframe, Duration::ZERO);
        assert!(!ed.modes().wireframe_on);
        let draws = ed.graphics().last_frame_draws();
        assert_eq!(draws.len(), 4);
        assert!(draws.iter().all(|(k, ..)| *k == PrimitiveKind::TriangleFan));
    }

    #[test]
    fn every_toggle_renders() {
        let mut ed = editor();
        for (i, c) in Command::ALL.into_iter().enumerate() {
            ed.execute(c, Duration::ZERO);
            assert_eq!(ed.frames_rendered(), 2 + i as u64);
        }
    }

    #[test]
    fn dragged_quads_draw_last_while_dragging() {
        let mut ed = editor();
        // Vertex 1 (350, 120) belongs to polygons 0 and 1.
        assert!(ed.pointer_down(350.0, 120.0));
        ed.pointer_move(360.0, 130.0);

        let fans: Vec<u32> = ed
            .graphics()
            .last_frame_draws()
            .iter()
            .filter(|(k, ..)| *k == PrimitiveKind::TriangleFan)
            .map(|(_, start, _)| *start)
            .collect();
        assert_eq!(fans, vec![8, 12, 0, 4]);
    }

    #[test]
    fn order_returns_to_insertion_after_drag() {
        let mut order = Vec::new();
        let polys = [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];
        draw_order(&polys, Some(7), &mut order);
        assert_eq!(order, vec![0, 1, 2, 3]);
        draw_order(&polys, Some(3), &mut order);
        assert_eq!(order, vec![1, 3, 0, 2]);
        draw_order(&polys, None, &mut order);
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    // ── drag scenario ─────────────────────────────────────────────────────

    #[test]
    fn drag_rebuilds_once_per_move() {
        let mut ed = editor();
        let before = ed.frames_rendered();
        let uploads = ed.graphics().uploads();

        assert!(ed.pointer_down(350.0, 355.0)); // vertex 4 at (350, 350)
        assert_eq!(ed.frames_rendered(), before);

        ed.pointer_move(400.0, 420.0);
        ed.pointer_up();

        assert_eq!(ed.frames_rendered(), before + 1);
        assert_eq!(ed.graphics().uploads(), uploads + 1);
        assert_eq!(ed.geometry().vertex_position(4), Vec2::new(400.0, 420.0));

        // Vertex 4 is the third vertex of polygon 0 in the fill block.
        let buf = &ed.graphics().last_upload;
        let at = ((buffer::fill_offset(0) + 2) * VERTEX_STRIDE) as usize;
        let ndc = ed.state().mapper().to_ndc(Vec2::new(400.0, 420.0));
        assert_eq!(&buf[at..at + 2], &[ndc.x, ndc.y]);

        ed.pointer_move(0.0, 0.0);
        assert_eq!(ed.frames_rendered(), before + 1);
    }

    #[test]
    fn single_quad_corner_drag() {
        let geometry = GeometryStore::new(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 0.0),
                Vec2::new(100.0, 100.0),
                Vec2::new(0.0, 100.0),
            ],
            vec![Rgb8::from([255, 0, 0]); 4],
            vec![[0, 1, 2, 3]],
        );
        let mapper = CoordinateMapper::new(Viewport::new(200.0, 200.0));
        let mut ed = Editor::with_geometry(
            geometry,
            mapper,
            &EditorConfig::default(),
            FakeGraphics::default(),
            ManualScheduler::default(),
        )
        .unwrap();
        let before = ed.frames_rendered();

        assert!(ed.pointer_down(0.0, 0.0));
        ed.pointer_move(50.0, 50.0);
        ed.pointer_up();

        assert_eq!(ed.geometry().vertex_position(0), Vec2::new(50.0, 50.0));
        assert_eq!(ed.frames_rendered(), before + 1);
        assert_eq!(ed.graphics().count(|c| matches!(c, Call::Clear)), 2);
        assert_eq!(&ed.graphics().last_upload[..2], &[-0.5f32, 0.5]);
    }

    #[test]
    fn no_drag_while_animating() {
        let mut ed = editor();
        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        assert!(!ed.pointer_down(350.0, 350.0));
        let before = positions(&ed);
        ed.pointer_move(10.0, 10.0);
        assert_eq!(positions(&ed), before);
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn one_second_of_animation_then_bake() {
        let mut ed = editor();
        let before = positions(&ed);

        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        assert!(ed.modes().anim_on && !ed.modes().edit_on);

        // 60 frames over one second.
        for i in 1..=60 {
            assert_eq!(present(&mut ed, secs(i as f32 / 60.0)), 1);
        }
        let t = ed.state().clock().transform();
        assert!((t.angle_deg - 45.0).abs() < EPS, "{t:?}");
        assert!((t.scale - 0.8).abs() < EPS, "{t:?}");
        assert!((ed.graphics().angle - 45.0).abs() < EPS);
        assert!((ed.graphics().scale - 0.8).abs() < EPS);

        ed.execute(Command::ToggleAnimate, secs(1.0));
        assert!(!ed.modes().anim_on);
        assert_eq!(ed.graphics().scale, 1.0);
        assert_eq!(ed.graphics().angle, 0.0);
        assert_eq!(ed.state().clock().transform(), crate::mapper::Transform::IDENTITY);

        // Baked positions match what was on screen.
        let mapper = *ed.state().mapper();
        let t = crate::mapper::Transform::new(45.0, 0.8);
        for (old, new) in before.iter().zip(positions(&ed)) {
            let expect = mapper.to_pixel(crate::mapper::apply_transform(mapper.to_ndc(*old), t));
            assert!((expect.x - new.x).abs() < 0.05 && (expect.y - new.y).abs() < 0.05);
        }

        // No stray ticks after stopping.
        assert_eq!(present(&mut ed, secs(2.0)), 0);
    }

    #[test]
    fn zero_duration_animation_leaves_geometry_untouched() {
        let mut ed = editor();
        let before = positions(&ed);
        ed.execute(Command::ToggleAnimate, secs(5.0));
        ed.execute(Command::ToggleAnimate, secs(5.0));
        assert_eq!(positions(&ed), before);
        assert!(ed.scheduler().outstanding().is_empty());
    }

    #[test]
    fn edit_during_animation_bakes_and_resets_uniform() {
        let mut ed = editor();
        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        present(&mut ed, secs(0.5));

        let calls_before = ed.graphics().calls.len();
        ed.execute(Command::ToggleEdit, secs(0.5));

        let m = ed.modes();
        assert!(m.edit_on && !m.anim_on);
        assert!(ed.graphics().calls[calls_before..].contains(&Call::ResetTransform));
        assert!(ed.scheduler().outstanding().is_empty());
    }

    #[test]
    fn stale_request_after_restart_is_ignored() {
        let mut ed = editor();
        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        let stale = ed.state().clock().pending().unwrap();
        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        ed.execute(Command::ToggleAnimate, secs(1.0));

        let rendered = ed.frames_rendered();
        assert!(!ed.on_frame_request(stale, secs(2.0)));
        assert_eq!(ed.frames_rendered(), rendered);
        assert_eq!(ed.scheduler().outstanding().len(), 1);
    }

    #[test]
    fn ticks_compose_relative_deltas() {
        let mut ed = editor();
        ed.execute(Command::ToggleAnimate, Duration::ZERO);
        present(&mut ed, secs(0.25));
        present(&mut ed, secs(0.75));

        let sets: Vec<(f32, f32)> = ed
            .graphics()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::SetTransform { angle_delta, scale_ratio } => {
                    Some((*angle_delta, *scale_ratio))
                }
                _ => None,
            })
            .collect();
        assert_eq!(sets.len(), 2);
        assert!((sets[0].0 - 11.25).abs() < EPS);
        assert!((sets[1].0 - 22.5).abs() < EPS);
        assert!((sets[0].1 * sets[1].1 - 0.85).abs() < EPS);
    }

    #[test]
    fn mode_invariant_across_long_command_sequence() {
        let mut ed = editor();
        let script = [
            Command::ToggleAnimate,
            Command::ToggleEdit,
            Command::ToggleEdit,
            Command::ToggleAnimate,
            Command::ToggleWireframe,
            Command::ToggleAnimate,
            Command::ToggleAnimate,
            Command::ToggleEdit,
        ];
        for (i, c) in script.into_iter().cycle().take(40).enumerate() {
            let now = secs(i as f32 * 0.1);
            present(&mut ed, now);
            ed.execute(c, now);
            let m = ed.modes();
            assert!(!(m.edit_on && m.anim_on));
            assert_eq!(m.anim_on, ed.state().clock().is_running());
            if !m.anim_on {
                assert_eq!(ed.graphics().scale, 1.0);
            }
        }
    }
}
