//! Module to work with OpenGL framebuffers.
//!
//! This module provides functionality to create, bind, and manage OpenGL framebuffers.
//! The scene is drawn into one and then resolved to the window by the gamma pass.

use std::sync::Arc;

use glow::HasContext;

use crate::{
    abs::Texture,
    error::{Error, Result},
};

/// Represents an OpenGL framebuffer with a color texture and a combined
/// depth/stencil renderbuffer.
pub struct Framebuffer {
    gl: Arc<glow::Context>,
    fbo: glow::Framebuffer,
    depth_stencil: glow::Renderbuffer,
    color_tex: Texture,
}

impl Framebuffer {
    /// Creates a new framebuffer rendering into `color_tex`. The depth/stencil
    /// attachment is sized to match it.
    pub fn new(gl: &Arc<glow::Context>, color_tex: Texture) -> Result<Self> {
        let (width, height) = (color_tex.width() as i32, color_tex.height() as i32);
        unsafe {
            let fbo = gl.create_framebuffer().map_err(Error::Gl)?;
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color_tex.raw()),
                0,
            );

            let depth_stencil = match gl.create_renderbuffer() {
                Ok(rbo) => rbo,
                Err(e) => {
                    gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                    gl.delete_framebuffer(fbo);
                    return Err(Error::Gl(e));
                }
            };
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth_stencil));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, width, height);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_STENCIL_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth_stencil),
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            // Built before the status check so Drop cleans up on failure.
            let framebuffer = Self {
                gl: Arc::clone(gl),
                fbo,
                depth_stencil,
                color_tex,
            };
            if status != glow::FRAMEBUFFER_COMPLETE {
                return Err(Error::Gl(format!(
                    "framebuffer {width}x{height} incomplete (status {status:#x})"
                )));
            }
            Ok(framebuffer)
        }
    }

    /// Binds the framebuffer for rendering.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
        }
    }

    /// Unbinds the framebuffer, reverting to the default framebuffer.
    pub fn unbind(gl: &glow::Context) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }

    /// Returns the color texture of the framebuffer.
    pub fn texture(&self) -> &Texture {
        &self.color_tex
    }

    pub fn width(&self) -> u32 {
        self.color_tex.width()
    }

    pub fn height(&self) -> u32 {
        self.color_tex.height()
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_framebuffer(self.fbo);
            self.gl.delete_renderbuffer(self.depth_stencil);
        }
    }
}
