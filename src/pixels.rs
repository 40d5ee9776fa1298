//! CPU side pixel buffers.
//!
//! [`Image`] is what the texture wrappers upload. It is either decoded from a
//! file or filled with a single color.

use std::path::Path;

use glam::Vec4;
use image::{DynamicImage, GenericImageView};

use crate::error::{Error, Result};

/// A tightly packed 8-bit pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Image {
    /// Decodes an image file, keeping its channel count where it is 8-bit
    /// gray, gray-alpha, RGB or RGBA. Anything else is converted to RGBA.
    pub fn load(path: &Path, flip_vertical: bool) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = if flip_vertical {
            decoded.flipv()
        } else {
            decoded
        };
        let image = Self::from_dynamic(decoded);
        log::debug!(
            "loaded image {}: {}x{}, {} channels",
            path.display(),
            image.width,
            image.height,
            image.channels
        );
        Ok(image)
    }

    /// Creates a `width` x `height` RGBA image where every pixel is `color`.
    ///
    /// Color components are in `[0, 1]` and are clamped after scaling.
    pub fn single_color(width: u32, height: u32, color: Vec4) -> Self {
        let scaled = (color * 255.0).clamp(Vec4::ZERO, Vec4::splat(255.0));
        let rgba = [scaled.x as u8, scaled.y as u8, scaled.z as u8, scaled.w as u8];
        let data = rgba.repeat((width * height) as usize);
        Self {
            width,
            height,
            channels: 4,
            data,
        }
    }

    fn from_dynamic(decoded: DynamicImage) -> Self {
        let (width, height) = decoded.dimensions();
        let (channels, data) = match decoded {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
