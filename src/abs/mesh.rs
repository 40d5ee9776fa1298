//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side.
//! Vertices should implement the [`Vertex`] trait. [`ModelVertex`] is the one
//! layout every mesh in the sandbox uses: the loaded model, the skybox and
//! light-marker box, and the screen plane of the gamma pass.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use glow::HasContext;

use crate::error::{Error, Result};

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct ModelVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex for ModelVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<ModelVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Normal attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, size_of::<Vec3>() as i32);

            // Texture coordinate attribute
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(
                2,
                2,
                glow::FLOAT,
                false,
                stride,
                (2 * size_of::<Vec3>()) as i32,
            );
        }
    }
}

/// Vertices and indices of a unit box centered on the origin, 4 vertices per
/// face so every face gets its own normal and full `[0, 1]` UVs.
/// Triangles wind counter-clockwise seen from outside.
pub fn cube_geometry() -> (Vec<ModelVertex>, Vec<u32>) {
    // (normal, u axis); the v axis is normal x u.
    const FACES: [(Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_X, Vec3::Z),
        (Vec3::Y, Vec3::X),
        (Vec3::NEG_Y, Vec3::X),
        (Vec3::Z, Vec3::X),
        (Vec3::NEG_Z, Vec3::NEG_X),
    ];
    const CORNERS: [Vec2; 4] = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u) in FACES {
        let v = normal.cross(u);
        let base = vertices.len() as u32;
        for uv in CORNERS {
            let offset = u * (uv.x - 0.5) + v * (uv.y - 0.5);
            vertices.push(ModelVertex {
                position: normal * 0.5 + offset,
                normal,
                tex_coord: uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// A unit quad in the XY plane facing +Z.
pub fn plane_geometry() -> (Vec<ModelVertex>, Vec<u32>) {
    let vertices = [
        (-0.5, -0.5, 0.0, 0.0),
        (0.5, -0.5, 1.0, 0.0),
        (0.5, 0.5, 1.0, 1.0),
        (-0.5, 0.5, 0.0, 1.0),
    ]
    .map(|(x, y, s, t)| ModelVertex {
        position: Vec3::new(x, y, 0.0),
        normal: Vec3::Z,
        tex_coord: Vec2::new(s, t),
    })
    .to_vec();
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: usize,
}

impl Mesh {
    /// Creates a new mesh from the given vertex and index data.
    pub fn new<V: Vertex>(
        gl: &Arc<glow::Context>,
        vertices: &[V],
        indices: &[u32],
        draw_mode: u32,
    ) -> Result<Self> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Gl)?;
            let vbo = gl.create_buffer().map_err(Error::Gl)?;
            let ebo = gl.create_buffer().map_err(Error::Gl)?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    std::mem::size_of_val(vertices),
                ),
                glow::STATIC_DRAW,
            );

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    indices.as_ptr() as *const u8,
                    std::mem::size_of_val(indices),
                ),
                glow::STATIC_DRAW,
            );

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                draw_mode,
                vao,
                vbo,
                ebo,
                index_count: indices.len(),
            })
        }
    }

    /// The unit box used for the skybox and the light marker.
    pub fn cube(gl: &Arc<glow::Context>) -> Result<Self> {
        let (vertices, indices) = cube_geometry();
        Self::new(gl, &vertices, &indices, glow::TRIANGLES)
    }

    /// The unit quad used to put the framebuffer on screen.
    pub fn plane(gl: &Arc<glow::Context>) -> Result<Self> {
        let (vertices, indices) = plane_geometry();
        Self::new(gl, &vertices, &indices, glow::TRIANGLES)
    }

    /// Draws the mesh with whatever program is currently bound.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_elements(self.draw_mode, self.index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
