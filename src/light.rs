//! Spot light parameters and the math turning them into shader inputs.

use glam::{Vec2, Vec3, Vec4};

use crate::camera::Camera;

pub const MAX_CUTOFF: f32 = 180.0;

/// Smallest distance fed into the attenuation fit; it is a polynomial in
/// 1/distance.
const MIN_DISTANCE: f32 = 0.01;

/// Polynomial fits (in 1/d, constant term first) of the linear and quadratic
/// attenuation terms for a light with range d.
const LINEAR_FIT: Vec4 = Vec4::new(8.4523112e-05, 4.4712582e+00, -1.8516388e+00, 3.3955811e+01);
const QUADRATIC_FIT: Vec4 = Vec4::new(-7.6103583e-04, 9.0120201e+00, -1.1618500e+01, 1.0000000e+02);

/// Constant, linear and quadratic attenuation coefficients for a light that
/// should reach roughly `distance` units.
pub fn attenuation_coeff(distance: f32) -> Vec3 {
    let d = 1.0 / distance.max(MIN_DISTANCE);
    let powers = Vec4::new(1.0, d, d * d, d * d * d);
    let kl = LINEAR_FIT.dot(powers);
    let kq = QUADRATIC_FIT.dot(powers);
    Vec3::new(1.0, kl.max(0.0), (kq * kq).max(0.0))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub direction: Vec3,
    /// Inner cone angle and outer falloff offset, in degrees.
    pub cutoff: Vec2,
    pub distance: f32,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.0, 4.0, 4.0),
            direction: Vec3::new(-1.0, -1.0, -1.0),
            cutoff: Vec2::new(120.0, 5.0),
            distance: 128.0,
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(1.0),
        }
    }
}

/// Where the light is this frame, after flashlight mode is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightPlacement {
    pub position: Vec3,
    pub direction: Vec3,
}

impl Light {
    pub fn clamp_cutoff(&mut self) {
        self.cutoff = self.cutoff.clamp(Vec2::ZERO, Vec2::splat(MAX_CUTOFF));
    }

    /// Cosines of the inner cone angle and of the outer edge (inner + offset),
    /// the form the fragment shader compares against.
    pub fn cutoff_cosines(&self) -> Vec2 {
        Vec2::new(
            self.cutoff.x.to_radians().cos(),
            (self.cutoff.x + self.cutoff.y).to_radians().cos(),
        )
    }

    pub fn attenuation(&self) -> Vec3 {
        attenuation_coeff(self.distance)
    }

    /// Color of the marker cube drawn at the light's position.
    pub fn marker_color(&self) -> Vec4 {
        (self.ambient + self.diffuse).extend(1.0)
    }

    /// The light's stored placement, or the camera's when the light is used
    /// as a flashlight. The stored values are left untouched either way.
    pub fn placement(&self, camera: &Camera, flashlight: bool) -> LightPlacement {
        if flashlight {
            LightPlacement {
                position: camera.position,
                direction: camera.front,
            }
        } else {
            LightPlacement {
                position: self.position,
                direction: self.direction,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuation_is_non_negative() {
        for distance in [0.0, 0.5, 1.0, 7.0, 13.0, 50.0, 128.0, 600.0, 3000.0] {
            let k = attenuation_coeff(distance);
            assert_eq!(k.x, 1.0);
            assert!(k.y >= 0.0 && k.z >= 0.0, "{distance}: {k}");
            assert!(k.is_finite());
        }
    }

    #[test]
    fn test_attenuation_falls_with_range() {
        let near = attenuation_coeff(7.0);
        let far = attenuation_coeff(128.0);
        assert!(near.y > far.y);
        assert!(near.z > far.z);
    }

    #[test]
    fn test_cutoff_cosines() {
        let light = Light::default();
        let cosines = light.cutoff_cosines();
        assert!((cosines.x - (-0.5)).abs() < 1e-6);
        assert!((cosines.y - 125f32.to_radians().cos()).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_cutoff() {
        let mut light = Light {
            cutoff: Vec2::new(-10.0, 250.0),
            ..Default::default()
        };
        light.clamp_cutoff();
        assert_eq!(light.cutoff, Vec2::new(0.0, 180.0));
    }

    #[test]
    fn test_flashlight_follows_camera_without_mutation() {
        let light = Light::default();
        let camera = Camera::default();

        let fixed = light.placement(&camera, false);
        assert_eq!(fixed.position, light.position);
        assert_eq!(fixed.direction, light.direction);

        let flash = light.placement(&camera, true);
        assert_eq!(flash.position, camera.position);
        assert_eq!(flash.direction, camera.front);
        assert_eq!(light, Light::default());

        assert_eq!(light.placement(&camera, false), fixed);
    }
}
