pub mod core;
pub mod scene;
pub mod window;

pub use self::core::{load_or_create_config, AppConfig, ConfigError};
pub use scene::{SceneConfig, ShaderConfig};
pub use window::WindowConfig;
