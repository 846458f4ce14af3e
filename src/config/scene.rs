use crate::render::mesh::GeometryConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Combined `#shader vertex` / `#shader fragment` source file.
    pub path: PathBuf,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("res/shaders/basic.shader"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Degrees per second while rotation is enabled.
    pub rotation_speed: f32,
    pub geometry: GeometryConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rotation_speed: 90.0,
            geometry: GeometryConfig::default(),
        }
    }
}
