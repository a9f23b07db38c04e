/// 2D texture loaded from an image file.
///
/// Images are decoded to RGBA8 and flipped vertically so that the first row
/// uploaded is the bottom of the picture, which is what texture coordinates
/// with the origin in the lower-left corner expect. The decoded pixels are
/// dropped once they are on the GPU; only `TextureInfo` is kept.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::DynamicImage;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Handle, TextureParams};
use crate::{engine_bail, engine_debug, engine_error};

/// Dimensions and pixel size of the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel of the decoded source, before RGBA8 conversion
    pub bytes_per_pixel: u8,
}

pub struct Texture {
    device: Rc<dyn GraphicsDevice>,
    handle: Handle,
    info: TextureInfo,
    label: String,
    path: Option<PathBuf>,
}

impl Texture {
    /// Decode `path` and upload it
    ///
    /// A missing file and an undecodable one both fail with
    /// `Error::ImageDecodeError`.
    pub fn from_file(device: &Rc<dyn GraphicsDevice>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            engine_error!("glint::Texture", "Could not load image {}: {}", path.display(), e);
            Error::ImageDecodeError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut texture = Self::from_image(device, &image, &path.display().to_string())?;
        texture.path = Some(path.to_path_buf());
        Ok(texture)
    }

    /// Upload an already decoded image
    ///
    /// `label` only appears in logs and `Debug` output.
    pub fn from_image(device: &Rc<dyn GraphicsDevice>, image: &DynamicImage, label: &str) -> Result<Self> {
        let info = TextureInfo {
            width: image.width(),
            height: image.height(),
            bytes_per_pixel: image.color().bytes_per_pixel(),
        };

        let mut pixels = image.to_rgba8();
        image::imageops::flip_vertical_in_place(&mut pixels);

        let handle = device.create_texture()?;
        device.bind_texture(Some(handle));
        device.texture_parameters(&TextureParams::default());
        device.texture_image_2d(info.width, info.height, pixels.as_raw());
        device.bind_texture(None);
        drop(pixels);

        engine_debug!(
            "glint::Texture",
            "Uploaded {} ({}x{}, {} bytes per pixel) as texture {}",
            label,
            info.width,
            info.height,
            info.bytes_per_pixel,
            handle.raw()
        );

        Ok(Self {
            device: Rc::clone(device),
            handle,
            info,
            label: label.to_string(),
            path: None,
        })
    }

    /// Bind to texture unit 0, the default unit
    pub fn bind(&self) {
        self.device.active_texture_unit(0);
        self.device.bind_texture(Some(self.handle));
    }

    /// Make texture unit `slot` active and bind this texture to it
    ///
    /// Fails with `Error::InvalidResource` if the device has no such unit.
    pub fn bind_to(&self, slot: u32) -> Result<()> {
        let units = self.device.max_texture_units();
        if slot >= units {
            engine_bail!(
                "glint::Texture",
                "Texture unit {} out of range for {} (device has {} units)",
                slot,
                self.label,
                units
            );
        }
        self.device.active_texture_unit(slot);
        self.device.bind_texture(Some(self.handle));
        Ok(())
    }

    /// Unbind from the active texture unit
    pub fn unbind(&self) {
        self.device.bind_texture(None);
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.info.bytes_per_pixel
    }

    pub fn info(&self) -> TextureInfo {
        self.info
    }

    /// Source file, if loaded with `from_file`
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("handle", &self.handle)
            .field("label", &self.label)
            .field("info", &self.info)
            .finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.device.delete_texture(self.handle);
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
