//! Per-frame shading decisions.
//!
//! Nothing here touches OpenGL. Each draw in a frame is described by a
//! [`ShadingPass`]: the one program to activate and the exact uniforms to
//! assign. The render context only executes passes, so which program a mode
//! uses and which uniforms it receives is decided (and tested) here.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::{
    abs::{ShaderProgram, Uniform},
    light::{Light, LightPlacement},
};

/// Texture unit the skybox cube map is bound to. Units 0 and 1 belong to the
/// material samplers.
pub const SKYBOX_UNIT: u32 = 2;
/// Texture unit of the offscreen color buffer during the gamma pass.
pub const SCREEN_UNIT: u32 = 0;

const SKYBOX_SCALE: f32 = 50.0;
const LIGHT_MARKER_SCALE: f32 = 0.1;

/// How the model is shaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Blinn-Phong with the spot light and material maps.
    #[default]
    Lighting,
    /// Pure reflection of the skybox.
    EnvironmentReflection,
    /// Lighting plus a skybox reflection weighted by the specular map.
    EnvironmentLighting,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] = [
        RenderMode::Lighting,
        RenderMode::EnvironmentReflection,
        RenderMode::EnvironmentLighting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Lighting => "lighting",
            RenderMode::EnvironmentReflection => "env",
            RenderMode::EnvironmentLighting => "env + lighting",
        }
    }

    pub fn program(self) -> ProgramKind {
        match self {
            RenderMode::Lighting => ProgramKind::Lighting,
            RenderMode::EnvironmentReflection => ProgramKind::EnvMap,
            RenderMode::EnvironmentLighting => ProgramKind::EnvLighting,
        }
    }

    pub fn uses_env_scale(self) -> bool {
        self == RenderMode::EnvironmentLighting
    }
}

/// Every shader program the sandbox links.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Flat color, used for the light marker.
    Simple,
    Lighting,
    Skybox,
    EnvMap,
    EnvLighting,
    /// Draws the offscreen color buffer with gamma correction.
    Gamma,
}

impl ProgramKind {
    pub const ALL: [ProgramKind; 6] = [
        ProgramKind::Simple,
        ProgramKind::Lighting,
        ProgramKind::Skybox,
        ProgramKind::EnvMap,
        ProgramKind::EnvLighting,
        ProgramKind::Gamma,
    ];

    /// Vertex and fragment source files inside the shader directory.
    pub fn sources(self) -> (&'static str, &'static str) {
        match self {
            ProgramKind::Simple => ("simple.vs", "simple.fs"),
            ProgramKind::Lighting => ("lighting.vs", "lighting.fs"),
            ProgramKind::Skybox => ("skybox.vs", "skybox.fs"),
            ProgramKind::EnvMap => ("env_map.vs", "env_map.fs"),
            ProgramKind::EnvLighting => ("lighting.vs", "lighting_env_map.fs"),
            ProgramKind::Gamma => ("texture.vs", "gamma.fs"),
        }
    }
}

/// A uniform value of any type a pass may carry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl Uniform for UniformValue {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        match self {
            UniformValue::Int(v) => v.set_uniform(gl, program, name),
            UniformValue::Float(v) => v.set_uniform(gl, program, name),
            UniformValue::Vec2(v) => v.set_uniform(gl, program, name),
            UniformValue::Vec3(v) => v.set_uniform(gl, program, name),
            UniformValue::Vec4(v) => v.set_uniform(gl, program, name),
            UniformValue::Mat4(v) => v.set_uniform(gl, program, name),
        }
    }
}

/// One program plus the uniforms to assign before drawing with it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadingPass {
    pub program: ProgramKind,
    pub uniforms: Vec<(&'static str, UniformValue)>,
}

impl ShadingPass {
    fn new(program: ProgramKind) -> Self {
        Self {
            program,
            uniforms: Vec::new(),
        }
    }

    fn with(mut self, name: &'static str, value: UniformValue) -> Self {
        self.uniforms.push((name, value));
        self
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| *value)
    }

    /// Activates `program` and assigns every uniform of the pass to it.
    pub fn apply(&self, program: &ShaderProgram) {
        program.use_program();
        for (name, value) in &self.uniforms {
            program.set_uniform(name, value);
        }
    }
}

/// Everything the passes of one frame are derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub camera_position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub model: Mat4,
    pub light: Light,
    pub placement: LightPlacement,
    pub flashlight: bool,
    pub env_scale: f32,
}

impl FrameParams {
    fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// The skybox: the unit box scaled up and kept centered on the camera.
pub fn skybox_pass(frame: &FrameParams) -> ShadingPass {
    let model = Mat4::from_translation(frame.camera_position)
        * Mat4::from_scale(Vec3::splat(SKYBOX_SCALE));
    ShadingPass::new(ProgramKind::Skybox)
        .with("skybox", UniformValue::Int(SKYBOX_UNIT as i32))
        .with("transform", UniformValue::Mat4(frame.view_projection() * model))
}

/// A small cube at the light's position. There is none in flashlight mode,
/// since the light then sits inside the camera.
pub fn light_marker_pass(frame: &FrameParams) -> Option<ShadingPass> {
    if frame.flashlight {
        return None;
    }
    let model = Mat4::from_translation(frame.light.position)
        * Mat4::from_scale(Vec3::splat(LIGHT_MARKER_SCALE));
    Some(
        ShadingPass::new(ProgramKind::Simple)
            .with("color", UniformValue::Vec4(frame.light.marker_color()))
            .with("transform", UniformValue::Mat4(frame.view_projection() * model)),
    )
}

fn with_lighting(pass: ShadingPass, frame: &FrameParams) -> ShadingPass {
    let light = &frame.light;
    pass.with("viewPos", UniformValue::Vec3(frame.camera_position))
        .with("light.position", UniformValue::Vec3(frame.placement.position))
        .with("light.direction", UniformValue::Vec3(frame.placement.direction))
        .with("light.cutoff", UniformValue::Vec2(light.cutoff_cosines()))
        .with("light.attenuation", UniformValue::Vec3(light.attenuation()))
        .with("light.ambient", UniformValue::Vec3(light.ambient))
        .with("light.diffuse", UniformValue::Vec3(light.diffuse))
        .with("light.specular", UniformValue::Vec3(light.specular))
        .with("transform", UniformValue::Mat4(frame.view_projection() * frame.model))
        .with("modelTransform", UniformValue::Mat4(frame.model))
}

/// The model draw for `mode`.
pub fn model_pass(mode: RenderMode, frame: &FrameParams) -> ShadingPass {
    let pass = ShadingPass::new(mode.program());
    match mode {
        RenderMode::Lighting => with_lighting(pass, frame),
        RenderMode::EnvironmentReflection => pass
            .with("model", UniformValue::Mat4(frame.model))
            .with("view", UniformValue::Mat4(frame.view))
            .with("projection", UniformValue::Mat4(frame.projection))
            .with("cameraPos", UniformValue::Vec3(frame.camera_position))
            .with("skybox", UniformValue::Int(SKYBOX_UNIT as i32)),
        RenderMode::EnvironmentLighting => with_lighting(pass, frame)
            .with("env_scale", UniformValue::Float(frame.env_scale))
            .with("skybox", UniformValue::Int(SKYBOX_UNIT as i32)),
    }
}

/// Puts the offscreen color buffer on screen. The unit plane is scaled to
/// cover clip space.
pub fn gamma_pass(gamma: f32) -> ShadingPass {
    ShadingPass::new(ProgramKind::Gamma)
        .with(
            "transform",
            UniformValue::Mat4(Mat4::from_scale(Vec3::new(2.0, 2.0, 1.0))),
        )
        .with("tex", UniformValue::Int(SCREEN_UNIT as i32))
        .with("gamma", UniformValue::Float(gamma))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::camera::Camera;

    fn frame(flashlight: bool) -> FrameParams {
        let camera = Camera::default();
        let light = Light::default();
        FrameParams {
            camera_position: camera.position,
            view: camera.view(),
            projection: camera.projection(16.0 / 9.0),
            model: Mat4::IDENTITY,
            light,
            placement: light.placement(&camera, flashlight),
            flashlight,
            env_scale: 3.0,
        }
    }

    fn names(pass: &ShadingPass) -> HashSet<&'static str> {
        pass.uniforms.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn test_each_mode_uses_its_own_program() {
        let programs: HashSet<_> = RenderMode::ALL
            .iter()
            .map(|&mode| model_pass(mode, &frame(false)).program)
            .collect();
        assert_eq!(programs.len(), 3);
        assert!(!programs.contains(&ProgramKind::Simple));
        assert!(!programs.contains(&ProgramKind::Skybox));
    }

    #[test]
    fn test_lighting_pass_has_no_environment_uniforms() {
        let pass = model_pass(RenderMode::Lighting, &frame(false));
        assert_eq!(pass.program, ProgramKind::Lighting);
        let names = names(&pass);
        for name in ["skybox", "env_scale", "cameraPos", "view", "projection"] {
            assert!(!names.contains(name), "{name}");
        }
        assert!(names.contains("light.attenuation"));
        assert!(names.contains("modelTransform"));
    }

    #[test]
    fn test_reflection_pass_has_no_light_uniforms() {
        let pass = model_pass(RenderMode::EnvironmentReflection, &frame(false));
        assert_eq!(pass.program, ProgramKind::EnvMap);
        assert!(names(&pass).iter().all(|name| !name.starts_with("light.")));
        assert!(!names(&pass).contains("env_scale"));
        assert_eq!(
            pass.uniform("skybox"),
            Some(UniformValue::Int(SKYBOX_UNIT as i32))
        );
    }

    #[test]
    fn test_combined_pass_extends_lighting() {
        let frame = frame(false);
        let lighting = names(&model_pass(RenderMode::Lighting, &frame));
        let combined = model_pass(RenderMode::EnvironmentLighting, &frame);
        assert_eq!(combined.program, ProgramKind::EnvLighting);
        let combined_names = names(&combined);
        assert!(lighting.is_subset(&combined_names));
        assert_eq!(combined.uniform("env_scale"), Some(UniformValue::Float(3.0)));
        assert!(!combined_names.contains("cameraPos"));
    }

    #[test]
    fn test_no_duplicate_uniforms() {
        for mode in RenderMode::ALL {
            let pass = model_pass(mode, &frame(true));
            assert_eq!(names(&pass).len(), pass.uniforms.len(), "{mode:?}");
        }
    }

    #[test]
    fn test_flashlight_hides_marker_and_moves_light() {
        assert!(light_marker_pass(&frame(false)).is_some());
        assert!(light_marker_pass(&frame(true)).is_none());

        let camera = Camera::default();
        let pass = model_pass(RenderMode::Lighting, &frame(true));
        assert_eq!(
            pass.uniform("light.position"),
            Some(UniformValue::Vec3(camera.position))
        );
        assert_eq!(
            pass.uniform("light.direction"),
            Some(UniformValue::Vec3(camera.front))
        );
    }

    #[test]
    fn test_skybox_is_centered_on_camera() {
        let frame = frame(false);
        let Some(UniformValue::Mat4(transform)) = skybox_pass(&frame).uniform("transform") else {
            panic!("skybox pass has no transform");
        };
        let expected = frame.view_projection() * frame.camera_position.extend(1.0);
        let center = transform * Vec4::W;
        assert!(center.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_pass_uniforms_are_declared_in_sources() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("shader");
        let frame = frame(false);
        let mut passes: Vec<ShadingPass> = RenderMode::ALL
            .iter()
            .map(|&mode| model_pass(mode, &frame))
            .collect();
        passes.push(skybox_pass(&frame));
        passes.extend(light_marker_pass(&frame));
        passes.push(gamma_pass(1.0));

        for pass in passes {
            let (vs, fs) = pass.program.sources();
            let source = std::fs::read_to_string(dir.join(vs)).unwrap()
                + &std::fs::read_to_string(dir.join(fs)).unwrap();
            for (name, _) in &pass.uniforms {
                let field = name.rsplit('.').next().unwrap_or(name);
                assert!(
                    source.contains(&format!("{field};")),
                    "{:?} does not declare {name}",
                    pass.program
                );
            }
        }
    }

    #[test]
    fn test_program_sources_are_pairs() {
        for kind in ProgramKind::ALL {
            let (vs, fs) = kind.sources();
            assert!(vs.ends_with(".vs"));
            assert!(fs.ends_with(".fs"));
        }
        assert_eq!(
            ProgramKind::EnvLighting.sources().0,
            ProgramKind::Lighting.sources().0
        );
    }
}
