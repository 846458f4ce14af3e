pub mod config;
pub mod render;
pub mod scene;
pub mod ui;

// Re-export commonly used types
pub use config::AppConfig;
pub use render::mesh::{GeometryConfig, ShapeKind};
pub use render::pipeline::Renderer;
pub use render::shaders::{ShaderError, ShaderProgram, ShaderProgramSource, ShaderSection};
pub use scene::SceneState;
pub use ui::{DebugPanel, PanelAction};
