//! Scene files: canvas size, vertices and quads, plus optional editor tuning.

use std::path::Path;

use quadedit_engine::coords::{Vec2, Viewport};
use serde::Deserialize;

use crate::config::EditorConfig;
use crate::error::SceneError;
use crate::geometry::{GeometryStore, Polygon, Rgb8};

/// Scene shipped with the editor.
pub const BUILTIN_SCENE: &str = include_str!("../scenes/default.toml");

/// A whole scene file: `[scene]` plus an optional `[editor]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    pub scene: SceneData,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl SceneFile {
    /// Parses and validates a scene file.
    pub fn parse(src: &str) -> Result<Self, SceneError> {
        let file: SceneFile = toml::from_str(src)?;
        file.scene.validate()?;
        file.editor.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let src = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&src)
    }

    pub fn builtin() -> Result<Self, SceneError> {
        Self::parse(BUILTIN_SCENE)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneData {
    /// Width and height in pixels.
    pub canvas_size: [u32; 2],
    pub vertices: Vec<VertexData>,
    #[serde(default)]
    pub polygons: Vec<Polygon>,
}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VertexData {
    /// Pixel position, origin top-left.
    pub position: [f32; 2],
    pub color: [u8; 3],
}

impl SceneData {
    pub fn validate(&self) -> Result<(), SceneError> {
        let [width, height] = self.canvas_size;
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyCanvas { width, height });
        }
        if self.vertices.is_empty() {
            return Err(SceneError::NoVertices);
        }
        if let Some(vertex) = self
            .vertices
            .iter()
            .position(|v| !v.position.iter().all(|c| c.is_finite()))
        {
            return Err(SceneError::NonFinitePosition { vertex });
        }

        let vertex_count = self.vertices.len();
        for (polygon, indices) in self.polygons.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(SceneError::PolygonIndex { polygon, index, vertex_count });
            }
        }
        Ok(())
    }

    pub fn canvas(&self) -> Viewport {
        let [w, h] = self.canvas_size;
        Viewport::new(w as f32, h as f32)
    }

    /// Validates and converts into a geometry store.
    pub fn to_geometry(&self) -> Result<GeometryStore, SceneError> {
        self.validate()?;
        let positions = self.vertices.iter().map(|v| Vec2::from((v.position[0], v.position[1])));
        let colors = self.vertices.iter().map(|v| Rgb8::from(v.color));
        Ok(GeometryStore::new(
            positions.collect(),
            colors.collect(),
            self.polygons.clone(),
        ))
    }
}
