//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{path::Path, sync::Arc};

use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;

use crate::error::{Error, Result};

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Reads a shader source file and compiles it as `shader_type`
    /// (`glow::VERTEX_SHADER` or `glow::FRAGMENT_SHADER`).
    pub fn from_file(gl: &Arc<glow::Context>, path: &Path, shader_type: u32) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(gl, shader_type, &source).map_err(|log| Error::ShaderCompile {
            path: path.to_path_buf(),
            log,
        })
    }

    /// Compiles a new shader from the given source code. On failure the
    /// driver's info log is returned.
    pub fn new(
        gl: &Arc<glow::Context>,
        shader_type: u32,
        source: &str,
    ) -> std::result::Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

/// Looks up `name`, returning `None` for uniforms the driver optimized away.
fn location(
    gl: &glow::Context,
    program: glow::Program,
    name: &str,
) -> Option<glow::UniformLocation> {
    unsafe { gl.get_uniform_location(program, name) }
}

impl Uniform for bool {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        (*self as i32).set_uniform(gl, program, name);
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        if let Some(loc) = location(gl, program, name) {
            unsafe { gl.uniform_1_i32(Some(&loc), *self) };
        }
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        if let Some(loc) = location(gl, program, name) {
            unsafe { gl.uniform_1_f32(Some(&loc), *self) };
        }
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        if let Some(loc) = location(gl, program, name) {
            unsafe { gl.uniform_2_f32(Some(&loc), self.x, self.y) };
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        if let Some(loc) = location(gl, program, name) {
            unsafe { gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z) };
        }
    }
}

impl Uniform for Vec4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        if let Some(loc) = location(gl, program, name) {
            unsafe { gl.uniform_4_f32(Some(&loc), self.x, self.y, self.z, self.w) };
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        if let Some(loc) = location(gl, program, name) {
            unsafe { gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref()) };
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        (*self).set_uniform(gl, program, name);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Compiles a vertex/fragment source pair and links them.
    pub fn from_files(gl: &Arc<glow::Context>, vertex: &Path, fragment: &Path) -> Result<Self> {
        let vert = Shader::from_file(gl, vertex, glow::VERTEX_SHADER)?;
        let frag = Shader::from_file(gl, fragment, glow::FRAGMENT_SHADER)?;
        let program = Self::new(gl, &[&vert, &frag])?;
        log::info!(
            "linked program {} + {}",
            vertex.display(),
            fragment.display()
        );
        Ok(program)
    }

    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self> {
        unsafe {
            let program = gl.create_program().map_err(Error::Gl)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(Error::ProgramLink(log));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
