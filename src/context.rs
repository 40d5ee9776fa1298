//! The render context: GPU resources plus the [`SceneState`] they are drawn
//! from.

use std::sync::Arc;

use glam::Vec2;
use glow::HasContext;
use sdl2::mouse::MouseButton;

use crate::{
    abs::{CubeTexture, Framebuffer, Mesh, ShaderProgram, Texture},
    config::{AssetsConfig, Config},
    error::Result,
    input::{ButtonAction, KeyboardState},
    model::{MaterialDefaults, Model},
    panel,
    pixels::Image,
    scene::SceneState,
    shading::{self, ProgramKind, RenderMode, SCREEN_UNIT, SKYBOX_UNIT, ShadingPass},
};

/// Every linked program, indexed by [`ProgramKind`].
pub struct Programs {
    programs: Vec<ShaderProgram>,
}

impl Programs {
    pub fn load(gl: &Arc<glow::Context>, assets: &AssetsConfig) -> Result<Self> {
        let programs = ProgramKind::ALL
            .iter()
            .map(|kind| {
                let (vs, fs) = kind.sources();
                let program =
                    ShaderProgram::from_files(gl, &assets.shader(vs), &assets.shader(fs))?;
                log::debug!("{kind:?} program ready ({vs} + {fs})");
                Ok(program)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { programs })
    }

    pub fn get(&self, kind: ProgramKind) -> &ShaderProgram {
        &self.programs[kind as usize]
    }

    /// Activates the program of `pass` and assigns its uniforms.
    fn apply(&self, pass: &ShadingPass) -> &ShaderProgram {
        let program = self.get(pass.program);
        pass.apply(program);
        program
    }
}

fn offscreen_target(gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<Framebuffer> {
    let color = Texture::empty(gl, width, height, glow::RGBA)?;
    Framebuffer::new(gl, color)
}

pub struct Context {
    gl: Arc<glow::Context>,
    state: SceneState,
    programs: Programs,
    model: Model,
    defaults: MaterialDefaults,
    cube: Mesh,
    plane: Mesh,
    skybox: CubeTexture,
    framebuffer: Framebuffer,
}

impl Context {
    /// Loads every asset named by `config`. Any missing or broken asset is an
    /// error.
    pub fn new(gl: &Arc<glow::Context>, config: &Config) -> Result<Self> {
        unsafe {
            gl.enable(glow::MULTISAMPLE);
        }

        let state = SceneState::new(config);
        let programs = Programs::load(gl, &config.assets)?;
        let model = Model::load(gl, &config.assets.model)?;
        let defaults = MaterialDefaults::new(gl)?;

        let [right, left, top, bottom, front, back] = config
            .assets
            .skybox_faces()
            .map(|path| Image::load(&path, false));
        let skybox = CubeTexture::from_images(gl, &[right?, left?, top?, bottom?, front?, back?])?;
        log::info!("loaded skybox from {}", config.assets.skybox_dir.display());

        let viewport = state.viewport();
        let framebuffer = offscreen_target(gl, viewport.width, viewport.height)?;

        Ok(Self {
            gl: Arc::clone(gl),
            state,
            programs,
            model,
            defaults,
            cube: Mesh::cube(gl)?,
            plane: Mesh::plane(gl)?,
            skybox,
            framebuffer,
        })
    }

    pub fn process_input(&mut self, keyboard: &KeyboardState) {
        self.state.process_input(keyboard);
    }

    pub fn mouse_move(&mut self, pos: Vec2) {
        self.state.mouse_move(pos);
    }

    pub fn mouse_button(&mut self, button: MouseButton, action: ButtonAction, pos: Vec2) {
        self.state.mouse_button(button, action, pos);
    }

    /// Resizes the viewport and the offscreen target to the new drawable size.
    pub fn reshape(&mut self, width: u32, height: u32) -> Result<()> {
        let viewport = self.state.reshape(width, height);
        unsafe {
            self.gl
                .viewport(0, 0, viewport.width as i32, viewport.height as i32);
        }
        if (self.framebuffer.width(), self.framebuffer.height()) != (viewport.width, viewport.height)
        {
            self.framebuffer = offscreen_target(&self.gl, viewport.width, viewport.height)?;
        }
        log::debug!("reshaped to {}x{}", viewport.width, viewport.height);
        Ok(())
    }

    /// Builds the debug panel into `egui_ctx` and draws one frame to the
    /// default framebuffer. The panel itself is painted afterwards by the
    /// overlay.
    pub fn render(&mut self, egui_ctx: &egui::Context) {
        panel::show(egui_ctx, &mut self.state);

        let viewport = self.state.viewport();
        let clear = self.state.clear_color;
        unsafe {
            self.framebuffer.bind();
            self.gl
                .viewport(0, 0, viewport.width as i32, viewport.height as i32);
            self.gl.clear_color(clear.x, clear.y, clear.z, clear.w);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.depth_func(glow::LEQUAL);
        }

        let frame = self.state.begin_frame();

        self.skybox.bind(SKYBOX_UNIT);
        self.programs.apply(&shading::skybox_pass(&frame));
        self.cube.draw();

        if let Some(pass) = shading::light_marker_pass(&frame) {
            self.programs.apply(&pass);
            self.cube.draw();
        }

        let mode = self.state.mode;
        if mode != RenderMode::Lighting {
            self.skybox.bind(SKYBOX_UNIT);
        }
        let pass = shading::model_pass(mode, &frame);
        let program = self.programs.apply(&pass);
        self.model.draw(program, &self.defaults);

        unsafe {
            self.gl.enable(glow::BLEND);
            self.gl
                .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            Framebuffer::unbind(&self.gl);
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }

        self.framebuffer.texture().bind(SCREEN_UNIT);
        self.programs.apply(&shading::gamma_pass(self.state.gamma));
        self.plane.draw();
    }
}
