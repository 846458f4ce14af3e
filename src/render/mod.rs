pub mod mesh;
pub mod pipeline;
pub mod shaders;

pub use pipeline::Renderer;
pub use shaders::{ShaderProgram, ShaderProgramSource};
