use std::fmt;
use std::path::PathBuf;

use quadedit_engine::render::{AttributeError, ShaderCompileError};

/// A scene or editor configuration could not be loaded.
#[derive(Debug)]
pub enum SceneError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    EmptyCanvas { width: u32, height: u32 },
    NoVertices,
    NonFinitePosition { vertex: usize },
    PolygonIndex { polygon: usize, index: usize, vertex_count: usize },
    Config(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io { path, source } => {
                write!(f, "cannot read scene {}: {source}", path.display())
            }
            SceneError::Parse(e) => write!(f, "scene parse error: {e}"),
            SceneError::EmptyCanvas { width, height } => {
                write!(f, "canvas size {width}x{height} has no area")
            }
            SceneError::NoVertices => f.write_str("scene has no vertices"),
            SceneError::NonFinitePosition { vertex } => {
                write!(f, "vertex {vertex} has a non-finite position")
            }
            SceneError::PolygonIndex { polygon, index, vertex_count } => write!(
                f,
                "polygon {polygon} refers to vertex {index}, \
                 but the scene has {vertex_count} vertices"
            ),
            SceneError::Config(msg) => write!(f, "invalid editor config: {msg}"),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io { source, .. } => Some(source),
            SceneError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SceneError {
    fn from(e: toml::de::Error) -> Self {
        SceneError::Parse(e)
    }
}

/// Startup failure. Fatal: there is no partial-render fallback.
#[derive(Debug)]
pub enum InitError {
    Scene(SceneError),
    Shader(ShaderCompileError),
    Attribute(AttributeError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::Scene(e) => write!(f, "scene: {e}"),
            InitError::Shader(e) => write!(f, "shader compilation failed: {e}"),
            InitError::Attribute(e) => write!(f, "attribute lookup failed: {e}"),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Scene(e) => Some(e),
            InitError::Shader(e) => Some(e),
            InitError::Attribute(e) => Some(e),
        }
    }
}

impl From<SceneError> for InitError {
    fn from(e: SceneError) -> Self {
        InitError::Scene(e)
    }
}

impl From<ShaderCompileError> for InitError {
    fn from(e: ShaderCompileError) -> Self {
        InitError::Shader(e)
    }
}

impl From<AttributeError> for InitError {
    fn from(e: AttributeError) -> Self {
        InitError::Attribute(e)
    }
}
