mod app;
mod cli;
mod scheduler;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use quadedit_editor::{Editor, SceneFile};
use quadedit_engine::coords::ColorRgba;
use quadedit_engine::device::GpuInit;
use quadedit_engine::logging::{init_logging, LoggingConfig};
use quadedit_engine::render::ImmediateRenderer;
use quadedit_engine::window::{Runtime, RuntimeConfig};

use app::EditorApp;
use cli::Arguments;
use scheduler::RedrawScheduler;

/// Canvas background.
const BACKGROUND: ColorRgba = ColorRgba::new(0.0, 0.0, 0.0, 1.0);

fn main() -> Result<()> {
    let args = Arguments::parse();
    init_logging(LoggingConfig::default().with_filter(args.log.clone()));

    let file = match &args.scene {
        Some(path) => {
            log::info!("loading scene {}", path.display());
            SceneFile::load(path)
        }
        None => {
            log::info!("using built-in scene");
            SceneFile::builtin()
        }
    };
    let file = file.inspect_err(|e| log::error!("{e}"))?;

    let gfx = ImmediateRenderer::new().with_clear_color(BACKGROUND);
    let editor = Editor::new(&file.scene, &file.editor, gfx, RedrawScheduler::default())
        .inspect_err(|e| log::error!("editor initialization failed: {e}"))
        .context("editor initialization failed")?;

    let [width, height] = file.scene.canvas_size;
    let config = RuntimeConfig {
        title: "quadedit".to_string(),
        initial_size: LogicalSize::new(width as f64, height as f64),
        resizable: false,
    };
    let gpu_init = GpuInit {
        // Vertex colors are 8-bit sRGB values already; write them unconverted.
        prefer_srgb: false,
        ..GpuInit::default()
    }
    .with_vsync(!args.no_vsync);

    let app = EditorApp::new(editor, file.editor.keys.clone(), file.editor.initial.animate);
    Runtime::run(config, gpu_init, app)
}
