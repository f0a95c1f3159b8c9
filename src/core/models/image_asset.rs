use std::sync::Arc;

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};

use crate::core::errors::DecodeError;
use crate::core::models::Region;

/// An image as uploaded: its filename and the undecoded bytes.
#[derive(Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("file_name", &self.file_name)
            .field("byte_count", &self.bytes.len())
            .finish()
    }
}

impl UploadedImage {
    pub fn build_from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Pixel size read from the image header without decoding the pixels.
    pub fn read_dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(std::io::Cursor::new(self.bytes.as_slice()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

pub struct ImageAsset {
    pub file_name: String,
    pixels: DynamicImage,
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("file_name", &self.file_name)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

impl ImageAsset {
    pub fn decode(upload: &UploadedImage) -> Result<Self, DecodeError> {
        let pixels = image::load_from_memory(&upload.bytes).map_err(|error| DecodeError {
            file_name: upload.file_name.clone(),
            reason: error.to_string(),
        })?;

        log::debug!(
            "[IMAGE_ASSET] decoded '{}': {}x{}",
            upload.file_name,
            pixels.width(),
            pixels.height()
        );

        Ok(Self {
            file_name: upload.file_name.clone(),
            pixels,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Crops an already clamped region and encodes it as PNG.
    pub fn crop_region_to_png(&self, region: &Region) -> Result<Vec<u8>> {
        let (width, height) = self.dimensions();
        if region.clamp_to(width, height) != Some(*region) {
            anyhow::bail!("Crop region {} exceeds image bounds {}x{}", region, width, height);
        }

        let cropped =
            self.pixels
                .crop_imm(region.left(), region.top(), region.width(), region.height());

        encode_png(&cropped)
    }
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
        .context("Failed to convert image to PNG format")?;
    Ok(buffer)
}

#[cfg(test)]
pub(crate) mod test_images {
    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{encode_png, UploadedImage};

    pub fn solid_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
        encode_png(&DynamicImage::ImageRgba8(image)).unwrap()
    }

    pub fn uploaded_png(file_name: &str, width: u32, height: u32) -> UploadedImage {
        UploadedImage::build_from_bytes(file_name, solid_png(width, height))
    }
}
