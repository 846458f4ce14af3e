//! Tweakable scene state shared by the debug panel and the renderer.

use crate::render::mesh::ShapeKind;
use glam::{Mat4, Quat, Vec3};
use std::f32::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeToggles {
    pub triangle: bool,
    pub square: bool,
    pub circle: bool,
    pub pyramid: bool,
    pub cube: bool,
    pub sphere: bool,
}

impl Default for ShapeToggles {
    fn default() -> Self {
        Self {
            triangle: false,
            square: true,
            circle: false,
            pyramid: false,
            cube: false,
            sphere: false,
        }
    }
}

impl ShapeToggles {
    pub fn get_mut(&mut self, kind: ShapeKind) -> &mut bool {
        match kind {
            ShapeKind::Triangle => &mut self.triangle,
            ShapeKind::Square => &mut self.square,
            ShapeKind::Circle => &mut self.circle,
            ShapeKind::Pyramid => &mut self.pyramid,
            ShapeKind::Cube => &mut self.cube,
            ShapeKind::Sphere => &mut self.sphere,
        }
    }

    pub fn get(&self, kind: ShapeKind) -> bool {
        match kind {
            ShapeKind::Triangle => self.triangle,
            ShapeKind::Square => self.square,
            ShapeKind::Circle => self.circle,
            ShapeKind::Pyramid => self.pyramid,
            ShapeKind::Cube => self.cube,
            ShapeKind::Sphere => self.sphere,
        }
    }

    pub fn set(&mut self, kind: ShapeKind, enabled: bool) {
        *self.get_mut(kind) = enabled;
    }

    /// Active shapes in drawing order.
    pub fn enabled(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        ShapeKind::ALL.into_iter().filter(|kind| self.get(*kind))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationToggles {
    pub rotate: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl RotationToggles {
    /// +1 spins counter-clockwise, -1 clockwise, 0 holds still.
    pub fn spin_direction(&self) -> f32 {
        match (self.rotate_left, self.rotate_right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ if self.rotate => 1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub color: [f32; 4],
    pub background: [f32; 4],
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    pub shapes: ShapeToggles,
    pub rotation: RotationToggles,
    /// Current spin angle in radians, kept in `[0, 2π)`.
    pub angle: f32,
    pub show_panel: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            color: [1.0, 0.76, 0.0, 1.0],
            background: [0.0, 0.0, 0.0, 0.0],
            translation: [0.0; 3],
            scale: [1.0; 3],
            shapes: ShapeToggles::default(),
            rotation: RotationToggles::default(),
            angle: 0.0,
            show_panel: true,
        }
    }
}

impl SceneState {
    pub fn toggle_panel(&mut self) {
        self.show_panel = !self.show_panel;
    }

    pub fn advance(&mut self, dt_secs: f32, degrees_per_sec: f32) {
        let step = self.rotation.spin_direction() * degrees_per_sec.to_radians() * dt_secs;
        if step != 0.0 {
            self.angle = (self.angle + step).rem_euclid(TAU);
        }
    }

    pub fn model_matrix(&self, kind: ShapeKind) -> Mat4 {
        let axis = if kind.is_3d() {
            Vec3::new(0.35, 1.0, 0.0).normalize()
        } else {
            Vec3::Z
        };

        Mat4::from_scale_rotation_translation(
            Vec3::from(self.scale),
            Quat::from_axis_angle(axis, self.angle),
            Vec3::from(self.translation),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let scene = SceneState::default();
        assert_eq!(scene.color, [1.0, 0.76, 0.0, 1.0]);
        assert!(scene.show_panel);
        assert_eq!(scene.shapes.enabled().collect::<Vec<_>>(), vec![ShapeKind::Square]);
    }

    #[test]
    fn test_enabled_follows_draw_order() {
        let mut shapes = ShapeToggles::default();
        shapes.set(ShapeKind::Sphere, true);
        shapes.set(ShapeKind::Triangle, true);
        shapes.set(ShapeKind::Square, false);
        assert_eq!(
            shapes.enabled().collect::<Vec<_>>(),
            vec![ShapeKind::Triangle, ShapeKind::Sphere]
        );
    }

    #[test]
    fn test_spin_direction() {
        let mut rotation = RotationToggles::default();
        assert_eq!(rotation.spin_direction(), 0.0);

        rotation.rotate = true;
        assert_eq!(rotation.spin_direction(), 1.0);

        rotation.rotate_right = true;
        assert_eq!(rotation.spin_direction(), -1.0);

        rotation.rotate_left = true;
        assert_eq!(rotation.spin_direction(), 1.0);

        rotation.rotate = false;
        assert_eq!(rotation.spin_direction(), 0.0);
    }

    #[test]
    fn test_advance_wraps_angle() {
        let mut scene = SceneState::default();
        scene.advance(1.0, 90.0);
        assert_eq!(scene.angle, 0.0);

        scene.rotation.rotate_right = true;
        scene.advance(1.0, 90.0);
        assert!((scene.angle - 1.5 * std::f32::consts::PI).abs() < 1e-5);

        scene.advance(4.0, 90.0);
        assert!(scene.angle >= 0.0 && scene.angle < TAU);
    }

    #[test]
    fn test_toggle_panel() {
        let mut scene = SceneState::default();
        scene.toggle_panel();
        assert!(!scene.show_panel);
        scene.toggle_panel();
        assert!(scene.show_panel);
    }

    #[test]
    fn test_model_matrix() {
        let mut scene = SceneState::default();
        scene.translation = [1.0, 2.0, 0.0];
        scene.scale = [2.0, 2.0, 1.0];

        let p = scene.model_matrix(ShapeKind::Square).transform_point3(Vec3::new(0.4, 0.0, 0.0));
        assert!((p - Vec3::new(1.8, 2.0, 0.0)).length() < 1e-5);

        scene.angle = std::f32::consts::FRAC_PI_2;
        let p = scene.model_matrix(ShapeKind::Square).transform_point3(Vec3::new(0.4, 0.0, 0.0));
        assert!((p - Vec3::new(1.0, 2.8, 0.0)).length() < 1e-5);
    }
}
