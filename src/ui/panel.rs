use crate::render::mesh::ShapeKind;
use crate::scene::SceneState;
use egui::{CollapsingHeader, Context, Event, Key, Slider, TopBottomPanel, Ui, Visuals, Window};

/// Key that shows or hides the "Edit" window.
pub const TOGGLE_KEY: Key = Key::T;

const SLIDER_RANGE: std::ops::RangeInclusive<f32> = -5.0..=5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    Exit,
}

#[derive(Debug, Default)]
pub struct DebugPanel {
    styled: bool,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ctx: &Context, scene: &mut SceneState) -> PanelAction {
        if !self.styled {
            ctx.set_visuals(Visuals::dark());
            self.styled = true;
        }

        if !ctx.wants_keyboard_input() && toggle_requested(ctx) {
            scene.toggle_panel();
            log::debug!("Edit panel visible: {}", scene.show_panel);
        }

        let action = Self::show_menu_bar(ctx);

        if scene.show_panel {
            Window::new("Edit").show(ctx, |ui| {
                Self::show_properties(ui, scene);
                Self::show_shapes(ui, scene);
                Self::show_rotation(ui, scene);
            });
        }

        action
    }

    fn show_menu_bar(ctx: &Context) -> PanelAction {
        let mut action = PanelAction::None;
        TopBottomPanel::top("main_menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        action = PanelAction::Exit;
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    ui.label(format!("Press {} to toggle the edit panel", TOGGLE_KEY.name()));
                });
            });
        });
        action
    }

    fn show_properties(ui: &mut Ui, scene: &mut SceneState) {
        CollapsingHeader::new("Properties").show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.color_edit_button_rgba_unmultiplied(&mut scene.color);
                ui.label("Object Color");
            });
            ui.horizontal(|ui| {
                ui.color_edit_button_rgba_unmultiplied(&mut scene.background);
                ui.label("Background Color");
            });
            vec3_sliders(ui, "Translate", &mut scene.translation);
            vec3_sliders(ui, "Scale", &mut scene.scale);
        });
    }

    fn show_shapes(ui: &mut Ui, scene: &mut SceneState) {
        CollapsingHeader::new("2D Shapes").show(ui, |ui| {
            for kind in ShapeKind::ALL.into_iter().filter(|k| !k.is_3d()) {
                ui.checkbox(scene.shapes.get_mut(kind), format!("Draw {}", kind.label()));
            }
        });
        CollapsingHeader::new("3D Shapes").show(ui, |ui| {
            for kind in ShapeKind::ALL.into_iter().filter(|k| k.is_3d()) {
                ui.checkbox(scene.shapes.get_mut(kind), format!("Draw {}", kind.label()));
            }
        });
    }

    fn show_rotation(ui: &mut Ui, scene: &mut SceneState) {
        CollapsingHeader::new("Rotation").show(ui, |ui| {
            ui.checkbox(&mut scene.rotation.rotate, "Rotate");
            ui.checkbox(&mut scene.rotation.rotate_left, "Rotate Left");
            ui.checkbox(&mut scene.rotation.rotate_right, "Rotate Right");
            if ui.button("Reset Angle").clicked() {
                scene.angle = 0.0;
            }
        });
    }
}

/// Only fresh presses count; OS auto-repeat while the key is held is ignored.
fn toggle_requested(ctx: &Context) -> bool {
    ctx.input(|i| {
        i.events.iter().any(|e| {
            matches!(
                e,
                Event::Key {
                    key: TOGGLE_KEY,
                    pressed: true,
                    repeat: false,
                    ..
                }
            )
        })
    })
}

fn vec3_sliders(ui: &mut Ui, label: &str, values: &mut [f32; 3]) {
    ui.label(label);
    for (value, axis) in values.iter_mut().zip(["x", "y", "z"]) {
        ui.add(Slider::new(value, SLIDER_RANGE).text(axis));
    }
}
