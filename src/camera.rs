//! The free-flying camera.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::input::MoveInput;

pub const PITCH_LIMIT: f32 = 89.0;
pub const FOV_DEGREES: f32 = 45.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Degrees around +Y, in `[0, 360)`. Zero looks down -Z.
    pub yaw: f32,
    /// Degrees around the camera's X axis, in `[-89, 89]`.
    pub pitch: f32,
    pub front: Vec3,
    pub up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 2.5, 8.0),
            yaw: 0.0,
            pitch: -20.0,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
        };
        camera.update_front();
        camera
    }
}

impl Camera {
    /// Recomputes `front` from yaw and pitch: yaw about +Y applied after
    /// pitch about +X, starting from -Z.
    pub fn update_front(&mut self) {
        let rotation = Quat::from_rotation_y(self.yaw.to_radians())
            * Quat::from_rotation_x(self.pitch.to_radians());
        self.front = rotation * Vec3::NEG_Z;
    }

    /// Wraps yaw and clamps pitch back into range.
    pub fn normalize_angles(&mut self) {
        self.yaw = wrap_degrees(self.yaw);
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn right(&self) -> Vec3 {
        self.up.cross(-self.front).normalize()
    }

    /// Up vector of the camera's own frame, perpendicular to `front`.
    pub fn local_up(&self) -> Vec3 {
        (-self.front).cross(self.right()).normalize()
    }

    /// Moves `speed` units along each requested axis of the camera frame.
    pub fn translate(&mut self, input: MoveInput, speed: f32) {
        let offset = self.front * input.forward
            + self.right() * input.right
            + self.local_up() * input.up;
        self.position += offset * speed;
    }

    /// Turns the camera by a cursor delta. Moving the cursor right or down
    /// decreases yaw or pitch by `sensitivity` degrees per pixel.
    pub fn rotate(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch -= delta.y * sensitivity;
        self.normalize_angles();
        self.update_front();
    }

    /// Puts the camera back at a neutral pose a few units in front of the
    /// origin.
    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.position = Vec3::new(0.0, 0.0, 3.0);
        self.update_front();
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(FOV_DEGREES.to_radians(), aspect_ratio, NEAR_PLANE, FAR_PLANE)
    }
}
