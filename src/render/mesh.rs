use bytemuck::{Pod, Zeroable};
use gl::types::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Half extent shared by every built-in shape.
pub const SHAPE_EXTENT: f32 = 0.4;

/// Upper bound for any tessellation count read from config.
pub const MAX_SEGMENTS: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Triangle,
    Square,
    Circle,
    Pyramid,
    Cube,
    Sphere,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Triangle,
        ShapeKind::Square,
        ShapeKind::Circle,
        ShapeKind::Pyramid,
        ShapeKind::Cube,
        ShapeKind::Sphere,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Square => "Square",
            ShapeKind::Circle => "Circle",
            ShapeKind::Pyramid => "Pyramid",
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
        }
    }

    pub fn is_3d(self) -> bool {
        matches!(self, ShapeKind::Pyramid | ShapeKind::Cube | ShapeKind::Sphere)
    }

    /// Non-indexed triangle list for this shape.
    pub fn vertices(self, config: &GeometryConfig) -> Vec<Vertex> {
        match self {
            ShapeKind::Triangle => flat(&[[0.0, 0.4], [0.4, -0.4], [-0.4, -0.4]]),
            ShapeKind::Square => flat(&[
                [-0.4, -0.4],
                [0.4, -0.4],
                [0.4, 0.4],
                [0.4, 0.4],
                [-0.4, 0.4],
                [-0.4, -0.4],
            ]),
            ShapeKind::Circle => circle(config.circle_segments.clamp(3, MAX_SEGMENTS)),
            ShapeKind::Pyramid => pyramid(),
            ShapeKind::Cube => cube(),
            ShapeKind::Sphere => sphere(
                config.sphere_rings.clamp(2, MAX_SEGMENTS),
                config.sphere_sectors.clamp(3, MAX_SEGMENTS),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub circle_segments: u32,
    pub sphere_rings: u32,
    pub sphere_sectors: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            circle_segments: 48,
            sphere_rings: 16,
            sphere_sectors: 32,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

const FRONT: [f32; 3] = [0.0, 0.0, 1.0];

fn flat(points: &[[f32; 2]]) -> Vec<Vertex> {
    points
        .iter()
        .map(|[x, y]| Vertex::new([*x, *y, 0.0], FRONT))
        .collect()
}

fn circle(segments: u32) -> Vec<Vertex> {
    let point = |i: u32| {
        let theta = TAU * i as f32 / segments as f32;
        Vertex::new(
            [SHAPE_EXTENT * theta.cos(), SHAPE_EXTENT * theta.sin(), 0.0],
            FRONT,
        )
    };

    let center = Vertex::new([0.0; 3], FRONT);
    (0..segments)
        .flat_map(|i| [center, point(i), point(i + 1)])
        .collect()
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let ab = glam::Vec3::from(b) - glam::Vec3::from(a);
    let ac = glam::Vec3::from(c) - glam::Vec3::from(a);
    ab.cross(ac).normalize_or_zero().into()
}

fn push_triangle(out: &mut Vec<Vertex>, a: [f32; 3], b: [f32; 3], c: [f32; 3]) {
    let normal = face_normal(a, b, c);
    out.extend([a, b, c].map(|p| Vertex::new(p, normal)));
}

fn pyramid() -> Vec<Vertex> {
    let e = SHAPE_EXTENT;
    let apex = [0.0, e, 0.0];
    let base = [[-e, -e, e], [e, -e, e], [e, -e, -e], [-e, -e, -e]];

    let mut out = Vec::with_capacity(18);
    for i in 0..4 {
        push_triangle(&mut out, base[i], base[(i + 1) % 4], apex);
    }
    push_triangle(&mut out, base[0], base[3], base[2]);
    push_triangle(&mut out, base[2], base[1], base[0]);
    out
}

fn cube() -> Vec<Vertex> {
    let e = SHAPE_EXTENT;
    // Counter-clockwise quads seen from outside.
    let faces: [[[f32; 3]; 4]; 6] = [
        [[-e, -e, e], [e, -e, e], [e, e, e], [-e, e, e]],
        [[e, -e, -e], [-e, -e, -e], [-e, e, -e], [e, e, -e]],
        [[e, -e, e], [e, -e, -e], [e, e, -e], [e, e, e]],
        [[-e, -e, -e], [-e, -e, e], [-e, e, e], [-e, e, -e]],
        [[-e, e, e], [e, e, e], [e, e, -e], [-e, e, -e]],
        [[-e, -e, -e], [e, -e, -e], [e, -e, e], [-e, -e, e]],
    ];

    let mut out = Vec::with_capacity(36);
    for [a, b, c, d] in faces {
        push_triangle(&mut out, a, b, c);
        push_triangle(&mut out, c, d, a);
    }
    out
}

fn sphere(rings: u32, sectors: u32) -> Vec<Vertex> {
    let point = |ring: u32, sector: u32| {
        let phi = PI * ring as f32 / rings as f32;
        let theta = TAU * sector as f32 / sectors as f32;
        let normal = [phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin()];
        Vertex::new(normal.map(|n| n * SHAPE_EXTENT), normal)
    };

    let mut out = Vec::with_capacity(rings as usize * sectors as usize * 6);
    for ring in 0..rings {
        for sector in 0..sectors {
            let a = point(ring, sector);
            let b = point(ring + 1, sector);
            let c = point(ring + 1, sector + 1);
            let d = point(ring, sector + 1);
            out.extend([a, b, c, c, d, a]);
        }
    }
    out
}

/// A shape uploaded to the GPU.
pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    vertex_count: GLsizei,
}

impl Mesh {
    pub fn upload(vertices: &[Vertex]) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let stride = std::mem::size_of::<Vertex>() as GLsizei;

        let mut vao = 0;
        let mut vbo = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            // Position attribute
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, std::ptr::null());
            gl::EnableVertexAttribArray(0);

            // Normal attribute
            gl::VertexAttribPointer(
                1,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (3 * std::mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(1);

            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
        }

        Self {
            vao,
            vbo,
            vertex_count: vertices.len() as GLsizei,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count as usize
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawArrays(gl::TRIANGLES, 0, self.vertex_count);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(kind: ShapeKind) -> Vec<[f32; 3]> {
        kind.vertices(&GeometryConfig::default())
            .into_iter()
            .map(|v| v.position)
            .collect()
    }

    #[test]
    fn test_triangle_matches_fixed_vertices() {
        assert_eq!(
            positions(ShapeKind::Triangle),
            vec![[0.0, 0.4, 0.0], [0.4, -0.4, 0.0], [-0.4, -0.4, 0.0]]
        );
    }

    #[test]
    fn test_square_is_two_triangles() {
        let square = positions(ShapeKind::Square);
        assert_eq!(square.len(), 6);
        assert_eq!(square[0], [-0.4, -0.4, 0.0]);
        assert_eq!(square[2], square[3]);
        assert_eq!(square[0], square[5]);
    }

    #[test]
    fn test_vertex_counts() {
        let config = GeometryConfig {
            circle_segments: 10,
            sphere_rings: 4,
            sphere_sectors: 8,
        };
        assert_eq!(ShapeKind::Circle.vertices(&config).len(), 30);
        assert_eq!(ShapeKind::Pyramid.vertices(&config).len(), 18);
        assert_eq!(ShapeKind::Cube.vertices(&config).len(), 36);
        assert_eq!(ShapeKind::Sphere.vertices(&config).len(), 4 * 8 * 6);

        for kind in ShapeKind::ALL {
            assert_eq!(kind.vertices(&config).len() % 3, 0, "{:?}", kind);
        }
    }

    #[test]
    fn test_degenerate_config_is_clamped() {
        let config = GeometryConfig {
            circle_segments: 0,
            sphere_rings: 0,
            sphere_sectors: 1,
        };
        assert_eq!(ShapeKind::Circle.vertices(&config).len(), 9);
        assert_eq!(ShapeKind::Sphere.vertices(&config).len(), 2 * 3 * 6);
    }

    #[test]
    fn test_huge_config_is_clamped() {
        let config = GeometryConfig {
            circle_segments: u32::MAX,
            sphere_rings: 70_000,
            sphere_sectors: 70_000,
        };
        let max = MAX_SEGMENTS as usize;
        assert_eq!(ShapeKind::Circle.vertices(&config).len(), max * 3);
        assert_eq!(ShapeKind::Sphere.vertices(&config).len(), max * max * 6);
    }

    #[test]
    fn test_shapes_fit_in_extent() {
        for kind in ShapeKind::ALL {
            for v in kind.vertices(&GeometryConfig::default()) {
                for c in v.position {
                    assert!(c.abs() <= SHAPE_EXTENT + 1e-5, "{:?} {:?}", kind, v);
                }
            }
        }
    }

    #[test]
    fn test_cube_normals_point_outwards() {
        for v in ShapeKind::Cube.vertices(&GeometryConfig::default()) {
            let p = glam::Vec3::from(v.position);
            let n = glam::Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn test_pyramid_normals_point_outwards() {
        let center = glam::Vec3::new(0.0, -0.2, 0.0);
        for v in ShapeKind::Pyramid.vertices(&GeometryConfig::default()) {
            let p = glam::Vec3::from(v.position) - center;
            assert!(p.dot(glam::Vec3::from(v.normal)) > 0.0, "{:?}", v);
        }
    }

    #[test]
    fn test_dimensions() {
        assert!(!ShapeKind::Square.is_3d());
        assert!(ShapeKind::Sphere.is_3d());
        assert_eq!(ShapeKind::ALL.iter().filter(|k| k.is_3d()).count(), 3);
    }
}
