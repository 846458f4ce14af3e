use glsketch::{AppConfig, ShaderProgramSource};
use std::path::Path;

fn bundled_shader() -> ShaderProgramSource {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(AppConfig::default().shader.path);
    ShaderProgramSource::parse_file(path).unwrap()
}

#[test]
fn bundled_shader_splits_into_both_stages() {
    let source = bundled_shader();
    assert_eq!(source.unmarked_lines, 0);
    assert!(source.vertex_source.starts_with("#version 330 core\n"));
    assert!(source.fragment_source.starts_with("#version 330 core\n"));
    assert!(!source.vertex_source.contains("#shader"));
    assert!(!source.fragment_source.contains("#shader"));
}

#[test]
fn bundled_shader_declares_renderer_uniforms() {
    let source = bundled_shader();
    assert!(source.vertex_source.contains("uniform mat4 model;"));
    assert!(source.vertex_source.contains("uniform mat4 projection;"));
    assert!(source.fragment_source.contains("uniform vec4 color;"));
    assert!(source.vertex_source.contains("layout(location = 0) in vec3 position;"));
    assert!(source.vertex_source.contains("layout(location = 1) in vec3 normal;"));
}

#[test]
fn bundled_shader_survives_a_round_trip() {
    let source = bundled_shader();
    assert_eq!(ShaderProgramSource::parse_str(&source.to_string()), source);
}
