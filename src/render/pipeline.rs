use crate::render::mesh::{GeometryConfig, Mesh, ShapeKind};
use crate::render::shaders::ShaderProgram;
use crate::scene::SceneState;
use glam::Mat4;
use std::collections::HashMap;

/// Orthographic projection keeping shapes square whatever the window shape.
pub fn projection(aspect: f32) -> Mat4 {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    let (x, y) = if aspect >= 1.0 { (aspect, 1.0) } else { (1.0, 1.0 / aspect) };
    Mat4::orthographic_rh_gl(-x, x, -y, y, -10.0, 10.0)
}

pub struct Renderer {
    program: ShaderProgram,
    meshes: HashMap<ShapeKind, Mesh>,
}

impl Renderer {
    pub fn new(program: ShaderProgram, geometry: &GeometryConfig) -> Self {
        let meshes = ShapeKind::ALL
            .into_iter()
            .map(|kind| {
                let mesh = Mesh::upload(&kind.vertices(geometry));
                log::debug!("Uploaded {} ({} vertices)", kind.label(), mesh.vertex_count());
                (kind, mesh)
            })
            .collect();

        Self { program, meshes }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn draw(&mut self, scene: &SceneState, aspect: f32) {
        let [r, g, b, a] = scene.background;
        unsafe {
            // The UI painter leaves its own state behind every frame.
            gl::Enable(gl::DEPTH_TEST);
            gl::Disable(gl::SCISSOR_TEST);
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            gl::ClearColor(r, g, b, a);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.program.set_used();
        self.program.set_uniform_vec4("color", &scene.color);
        self.program
            .set_uniform_mat4("projection", &projection(aspect).to_cols_array());

        for kind in scene.shapes.enabled() {
            let Some(mesh) = self.meshes.get(&kind) else {
                continue;
            };
            self.program
                .set_uniform_mat4("model", &scene.model_matrix(kind).to_cols_array());
            mesh.draw();
        }

        unsafe {
            gl::BindVertexArray(0);
            gl::Disable(gl::DEPTH_TEST);
        }
    }
}
