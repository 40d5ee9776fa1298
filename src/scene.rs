//! Everything the render context tracks between frames, minus GPU objects.
//!
//! Input handling lives here: keyboard translation, mouse-drag rotation, the
//! camera-control toggle and resizing. None of it needs a GL context.

use glam::{Mat4, Vec2, Vec4};
use sdl2::mouse::MouseButton;

use crate::{
    camera::Camera,
    config::Config,
    input::{ButtonAction, KeyboardState, MoveInput},
    light::Light,
    shading::{FrameParams, RenderMode},
};

pub const GAMMA_RANGE: (f32, f32) = (0.0, 2.0);
pub const ENV_SCALE_RANGE: (f32, f32) = (1.0, 50.0);

/// Size of the window's drawable area in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: Camera,
    pub light: Light,
    pub flashlight: bool,
    pub mode: RenderMode,
    pub clear_color: Vec4,
    pub gamma: f32,
    pub env_scale: f32,
    viewport: Viewport,
    camera_control: bool,
    prev_mouse_pos: Vec2,
    camera_speed: f32,
    rotate_speed: f32,
}

impl SceneState {
    pub fn new(config: &Config) -> Self {
        Self {
            camera: Camera::default(),
            light: Light::default(),
            flashlight: false,
            mode: RenderMode::default(),
            clear_color: Vec4::new(0.1, 0.2, 0.3, 0.0),
            gamma: 1.0,
            env_scale: 1.0,
            viewport: Viewport {
                width: config.window.width.max(1),
                height: config.window.height.max(1),
            },
            camera_control: false,
            prev_mouse_pos: Vec2::ZERO,
            camera_speed: config.camera.speed,
            rotate_speed: config.camera.rotate_speed,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera_control(&self) -> bool {
        self.camera_control
    }

    /// Moves the camera for the movement keys held this frame. Does nothing
    /// unless the camera is being controlled.
    pub fn process_input(&mut self, keyboard: &KeyboardState) {
        if !self.camera_control {
            return;
        }
        let input = MoveInput::from_keyboard(keyboard);
        if !input.is_idle() {
            self.camera.translate(input, self.camera_speed);
        }
    }

    /// Rotates the camera by the cursor movement since the last event while
    /// the camera is being controlled.
    pub fn mouse_move(&mut self, pos: Vec2) {
        if !self.camera_control {
            return;
        }
        let delta = pos - self.prev_mouse_pos;
        self.camera.rotate(delta, self.rotate_speed);
        self.prev_mouse_pos = pos;
    }

    /// The right button grabs the camera while held; `pos` becomes the drag
    /// origin.
    pub fn mouse_button(&mut self, button: MouseButton, action: ButtonAction, pos: Vec2) {
        if button != MouseButton::Right {
            return;
        }
        match action {
            ButtonAction::Press => {
                self.prev_mouse_pos = pos;
                self.camera_control = true;
            }
            ButtonAction::Release => self.camera_control = false,
        }
    }

    /// Stores the new drawable size and returns it. Zero sizes, as reported
    /// for minimized windows, are raised to 1.
    pub fn reshape(&mut self, width: u32, height: u32) -> Viewport {
        self.viewport = Viewport {
            width: width.max(1),
            height: height.max(1),
        };
        self.viewport
    }

    /// Brings values edited in the debug panel back inside their ranges.
    pub fn sanitize(&mut self) {
        self.camera.normalize_angles();
        self.light.clamp_cutoff();
        self.light.distance = self.light.distance.max(0.0);
        self.gamma = self.gamma.clamp(GAMMA_RANGE.0, GAMMA_RANGE.1);
        self.env_scale = self.env_scale.clamp(ENV_SCALE_RANGE.0, ENV_SCALE_RANGE.1);
    }

    /// Refreshes the camera's front vector and gathers this frame's
    /// parameters.
    pub fn begin_frame(&mut self) -> FrameParams {
        self.camera.update_front();
        FrameParams {
            camera_position: self.camera.position,
            view: self.camera.view(),
            projection: self.camera.projection(self.viewport.aspect_ratio()),
            model: Mat4::IDENTITY,
            light: self.light,
            placement: self.light.placement(&self.camera, self.flashlight),
            flashlight: self.flashlight,
            env_scale: self.env_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use sdl2::keyboard::Keycode;

    use super::*;

    fn state() -> SceneState {
        SceneState::new(&Config::default())
    }

    fn holding(keys: &[Keycode]) -> KeyboardState {
        KeyboardState {
            down: keys.iter().copied().collect(),
        }
    }

    #[test]
    fn test_right_button_toggles_control() {
        let mut state = state();
        state.mouse_button(MouseButton::Left, ButtonAction::Press, Vec2::ZERO);
        assert!(!state.camera_control());
        state.mouse_button(MouseButton::Right, ButtonAction::Press, Vec2::new(10.0, 10.0));
        assert!(state.camera_control());
        state.mouse_button(MouseButton::Right, ButtonAction::Release, Vec2::new(10.0, 10.0));
        assert!(!state.camera_control());
    }

    #[test]
    fn test_drag_rotates_from_press_position() {
        let mut state = state();
        let before = state.camera;
        state.mouse_button(MouseButton::Right, ButtonAction::Press, Vec2::new(100.0, 100.0));
        state.mouse_move(Vec2::new(110.0, 90.0));
        // 10px right, 10px up at 0.3 degrees per pixel.
        assert!((state.camera.yaw - 357.0).abs() < 1e-4);
        assert!((state.camera.pitch - (before.pitch + 3.0)).abs() < 1e-4);
    }

    #[test]
    fn test_release_stops_rotation() {
        let mut state = state();
        state.mouse_button(MouseButton::Right, ButtonAction::Press, Vec2::ZERO);
        state.mouse_move(Vec2::new(5.0, 5.0));
        state.mouse_button(MouseButton::Right, ButtonAction::Release, Vec2::new(5.0, 5.0));
        let frozen = state.camera;
        state.mouse_move(Vec2::new(400.0, -300.0));
        state.mouse_move(Vec2::new(-50.0, 20.0));
        assert_eq!(state.camera, frozen);
    }

    #[test]
    fn test_movement_needs_control() {
        let mut state = state();
        let keyboard = holding(&[Keycode::W, Keycode::E]);
        let start = state.camera.position;
        state.process_input(&keyboard);
        assert_eq!(state.camera.position, start);

        state.mouse_button(MouseButton::Right, ButtonAction::Press, Vec2::ZERO);
        state.process_input(&keyboard);
        assert_ne!(state.camera.position, start);
        let moved = (state.camera.position - start).length();
        // One forward and one upward step of 0.01 on orthogonal axes.
        assert!((moved - 0.01 * 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_reshape_sets_exact_viewport() {
        let mut state = state();
        assert_eq!(
            state.viewport(),
            Viewport {
                width: 1280,
                height: 720
            }
        );
        let viewport = state.reshape(1024, 600);
        assert_eq!((viewport.width, viewport.height), (1024, 600));
        assert_eq!(state.viewport(), viewport);
        assert_eq!(state.reshape(0, 0), Viewport { width: 1, height: 1 });
    }

    #[test]
    fn test_flashlight_does_not_touch_light() {
        let mut state = state();
        state.flashlight = true;
        let frame = state.begin_frame();
        assert_eq!(frame.placement.position, state.camera.position);
        assert_eq!(frame.placement.direction, state.camera.front);
        assert_eq!(state.light, Light::default());

        state.flashlight = false;
        let frame = state.begin_frame();
        assert_eq!(frame.placement.position, Vec3::new(1.0, 4.0, 4.0));
    }

    #[test]
    fn test_sanitize_restores_invariants() {
        let mut state = state();
        state.camera.yaw = -30.0;
        state.camera.pitch = 120.0;
        state.light.cutoff = Vec2::new(200.0, -5.0);
        state.gamma = 9.0;
        state.env_scale = 0.0;
        state.sanitize();
        assert_eq!(state.camera.yaw, 330.0);
        assert_eq!(state.camera.pitch, 89.0);
        assert_eq!(state.light.cutoff, Vec2::new(180.0, 0.0));
        assert_eq!(state.gamma, 2.0);
        assert_eq!(state.env_scale, 1.0);
    }
}
