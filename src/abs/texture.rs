//! Structs and functions for handling textures.
//!
//! The module provides [`Texture`], a 2D texture stored on the GPU side, and
//! [`CubeTexture`], the six-faced texture used for the skybox and for
//! environment mapping. Both upload from a CPU [`Image`].

use std::sync::Arc;

use glow::HasContext;

use crate::{
    error::{Error, Result},
    pixels::Image,
};

/// Maps an image channel count to the `(internal format, format)` pair used
/// for the upload.
fn formats_for_channels(channels: u8) -> (i32, u32) {
    match channels {
        1 => (glow::R8 as i32, glow::RED),
        2 => (glow::RG8 as i32, glow::RG),
        3 => (glow::RGB8 as i32, glow::RGB),
        _ => (glow::RGBA8 as i32, glow::RGBA),
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Uploads `image` and generates its mipmaps.
    pub fn from_image(gl: &Arc<glow::Context>, image: &Image) -> Result<Self> {
        let (internal, format) = formats_for_channels(image.channels());
        unsafe {
            let texture = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // Rows of 1 and 3 channel images are not 4-byte aligned.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal,
                image.width() as i32,
                image.height() as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.data())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width: image.width(),
                height: image.height(),
            })
        }
    }

    /// Allocates uninitialized storage, for use as a render target.
    pub fn empty(gl: &Arc<glow::Context>, width: u32, height: u32, format: u32) -> Result<Self> {
        let (internal, ty) = match format {
            glow::RGBA => (glow::RGBA8 as i32, glow::UNSIGNED_BYTE),
            glow::RGB => (glow::RGB8 as i32, glow::UNSIGNED_BYTE),
            glow::RED => (glow::R32F as i32, glow::FLOAT),
            other => return Err(Error::Gl(format!("unsupported texture format {other:#x}"))),
        };
        unsafe {
            let texture = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal,
                width as i32,
                height as i32,
                0,
                format,
                ty,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub(super) fn raw(&self) -> glow::Texture {
        self.id
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

/// A cube map texture.
pub struct CubeTexture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
}

impl CubeTexture {
    /// Uploads six faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn from_images(gl: &Arc<glow::Context>, faces: &[Image; 6]) -> Result<Self> {
        unsafe {
            let texture = gl.create_texture().map_err(Error::Gl)?;
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_parameter_i32(
                glow::TEXTURE_CUBE_MAP,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_CUBE_MAP,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            for wrap in [
                glow::TEXTURE_WRAP_S,
                glow::TEXTURE_WRAP_T,
                glow::TEXTURE_WRAP_R,
            ] {
                gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, wrap, glow::CLAMP_TO_EDGE as i32);
            }

            for (i, face) in faces.iter().enumerate() {
                let (internal, format) = formats_for_channels(face.channels());
                gl.tex_image_2d(
                    glow::TEXTURE_CUBE_MAP_POSITIVE_X + i as u32,
                    0,
                    internal,
                    face.width() as i32,
                    face.height() as i32,
                    0,
                    format,
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(Some(face.data())),
                );
            }
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
            })
        }
    }

    /// Binds the cube map to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(self.id));
        }
    }
}

impl Drop for CubeTexture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_follow_channel_count() {
        assert_eq!(formats_for_channels(1).1, glow::RED);
        assert_eq!(formats_for_channels(2).1, glow::RG);
        assert_eq!(formats_for_channels(3), (glow::RGB8 as i32, glow::RGB));
        assert_eq!(formats_for_channels(4), (glow::RGBA8 as i32, glow::RGBA));
    }
}
