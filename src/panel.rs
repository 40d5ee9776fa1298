//! The debug panel for live parameter tweaking.

use glam::{Vec2, Vec3};

use crate::{
    scene::{ENV_SCALE_RANGE, GAMMA_RANGE, SceneState},
    shading::RenderMode,
};

fn drag_vec3(ui: &mut egui::Ui, label: &str, value: &mut Vec3, speed: f64) {
    ui.horizontal(|ui| {
        ui.add(egui::DragValue::new(&mut value.x).speed(speed));
        ui.add(egui::DragValue::new(&mut value.y).speed(speed));
        ui.add(egui::DragValue::new(&mut value.z).speed(speed));
        ui.label(label);
    });
}

fn drag_vec2(ui: &mut egui::Ui, label: &str, value: &mut Vec2, speed: f64, range: (f32, f32)) {
    ui.horizontal(|ui| {
        ui.add(
            egui::DragValue::new(&mut value.x)
                .speed(speed)
                .range(range.0..=range.1),
        );
        ui.add(
            egui::DragValue::new(&mut value.y)
                .speed(speed)
                .range(range.0..=range.1),
        );
        ui.label(label);
    });
}

fn drag_f32(ui: &mut egui::Ui, label: &str, value: &mut f32, speed: f64, range: Option<(f32, f32)>) {
    ui.horizontal(|ui| {
        let mut drag = egui::DragValue::new(value).speed(speed);
        if let Some((min, max)) = range {
            drag = drag.range(min..=max);
        }
        ui.add(drag);
        ui.label(label);
    });
}

fn color_rgb(ui: &mut egui::Ui, label: &str, color: &mut Vec3) {
    ui.horizontal(|ui| {
        let mut rgb = color.to_array();
        if ui.color_edit_button_rgb(&mut rgb).changed() {
            *color = Vec3::from_array(rgb);
        }
        ui.label(label);
    });
}

/// Draws the panel widgets for `state` into `ui`.
pub fn debug_panel(ui: &mut egui::Ui, state: &mut SceneState) {
    ui.horizontal(|ui| {
        let mut rgba = state.clear_color.to_array();
        if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
            state.clear_color = rgba.into();
        }
        ui.label("clear color");
    });
    drag_f32(ui, "gamma", &mut state.gamma, 0.01, Some(GAMMA_RANGE));
    ui.separator();

    drag_vec3(ui, "camera pos", &mut state.camera.position, 0.01);
    drag_f32(ui, "camera yaw", &mut state.camera.yaw, 0.5, None);
    drag_f32(ui, "camera pitch", &mut state.camera.pitch, 0.5, Some((-89.0, 89.0)));
    ui.separator();
    if ui.button("reset camera").clicked() {
        state.camera.reset();
    }

    egui::CollapsingHeader::new("light")
        .default_open(true)
        .show(ui, |ui| {
            let light = &mut state.light;
            drag_vec3(ui, "l.position", &mut light.position, 0.01);
            drag_vec3(ui, "l.direction", &mut light.direction, 0.01);
            drag_f32(ui, "l.distance", &mut light.distance, 0.5, Some((0.0, 3000.0)));
            drag_vec2(ui, "l.cutoff", &mut light.cutoff, 0.5, (0.0, 180.0));
            color_rgb(ui, "l.ambient", &mut light.ambient);
            color_rgb(ui, "l.diffuse", &mut light.diffuse);
            color_rgb(ui, "l.specular", &mut light.specular);
            ui.checkbox(&mut state.flashlight, "flash light");
        });

    egui::ComboBox::from_label("render mode")
        .selected_text(state.mode.label())
        .show_ui(ui, |ui| {
            for mode in RenderMode::ALL {
                ui.selectable_value(&mut state.mode, mode, mode.label());
            }
        });
    if state.mode.uses_env_scale() {
        drag_f32(ui, "env_scale", &mut state.env_scale, 0.1, Some(ENV_SCALE_RANGE));
    }

    state.sanitize();
}

/// Shows the panel as a floating window.
pub fn show(ctx: &egui::Context, state: &mut SceneState) {
    egui::Window::new("sandbox")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| debug_panel(ui, state));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn run_frame(ctx: &egui::Context, state: &mut SceneState) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| show(ctx, state));
    }

    #[test]
    fn test_idle_frame_leaves_state_alone() {
        let ctx = egui::Context::default();
        let mut state = SceneState::new(&Config::default());
        let before = state.clone();
        for mode in RenderMode::ALL {
            state.mode = mode;
            run_frame(&ctx, &mut state);
        }
        assert_eq!(state.camera, before.camera);
        assert_eq!(state.light, before.light);
        assert_eq!(state.gamma, before.gamma);
        assert_eq!(state.clear_color, before.clear_color);
    }

    #[test]
    fn test_panel_sanitizes_out_of_range_values() {
        let ctx = egui::Context::default();
        let mut state = SceneState::new(&Config::default());
        state.camera.yaw = 400.0;
        state.light.cutoff = Vec2::new(190.0, 2.0);
        run_frame(&ctx, &mut state);
        assert!((state.camera.yaw - 40.0).abs() < 1e-4);
        assert_eq!(state.light.cutoff.x, 180.0);
    }
}
