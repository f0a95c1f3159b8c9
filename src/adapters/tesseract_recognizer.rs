use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use rusty_tesseract::{Args, Image as TesseractImage};

use crate::core::errors::RecognitionError;
use crate::core::interfaces::adapters::TextRecognizer;

pub struct TesseractRecognizer {
    language: String,
    grayscale: bool,
}

impl TesseractRecognizer {
    pub fn build(language: &str, grayscale: bool) -> Result<Self, RecognitionError> {
        log::info!(
            "[TESSERACT_OCR] Initializing Tesseract recognizer (language: {}, grayscale: {})",
            language,
            grayscale
        );

        let version = rusty_tesseract::get_tesseract_version().map_err(|error| {
            RecognitionError::BackendUnavailable(format!("tesseract not found: {}", error))
        })?;
        log::debug!("[TESSERACT_OCR] Found tesseract {}", version.trim());

        Ok(Self {
            language: language.to_string(),
            grayscale,
        })
    }

    fn prepare_region_image(region_image: &[u8], grayscale: bool) -> Result<DynamicImage> {
        let decoded =
            image::load_from_memory(region_image).context("Failed to decode region image")?;

        if grayscale {
            return Ok(DynamicImage::ImageLuma8(decoded.to_luma8()));
        }
        Ok(decoded)
    }

    fn run_tesseract(region_image: Vec<u8>, language: String, grayscale: bool) -> Result<String> {
        let prepared = Self::prepare_region_image(&region_image, grayscale)?;

        let tesseract_image = TesseractImage::from_dynamic_image(&prepared)
            .context("Failed to create Tesseract image")?;

        let args = Args {
            lang: language,
            ..Args::default()
        };

        rusty_tesseract::image_to_string(&tesseract_image, &args)
            .context("Failed to extract text from image")
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn backend_name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize_text(&self, region_image: &[u8]) -> Result<String, RecognitionError> {
        let region_image = region_image.to_vec();
        let language = self.language.clone();
        let grayscale = self.grayscale;

        let extracted_text = tokio::task::spawn_blocking(move || {
            Self::run_tesseract(region_image, language, grayscale)
        })
        .await
        .map_err(|error| RecognitionError::Engine(error.to_string()))?
        .map_err(|error| RecognitionError::Engine(format!("{:#}", error)))?;

        log::debug!(
            "[TESSERACT_OCR] Extracted {} characters",
            extracted_text.trim().len()
        );

        Ok(extracted_text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::test_images::solid_png;
    use image::GenericImageView;

    #[test]
    fn test_prepare_region_image_keeps_colour_without_grayscale() {
        let prepared = TesseractRecognizer::prepare_region_image(&solid_png(4, 4), false).unwrap();

        assert_eq!(prepared.dimensions(), (4, 4));
        assert_eq!(prepared.color(), image::ColorType::Rgba8);
    }

    #[test]
    fn test_prepare_region_image_converts_to_single_channel() {
        let prepared = TesseractRecognizer::prepare_region_image(&solid_png(6, 3), true).unwrap();

        assert_eq!(prepared.dimensions(), (6, 3));
        assert_eq!(prepared.color(), image::ColorType::L8);
    }

    #[test]
    fn test_prepare_region_image_rejects_garbage() {
        assert!(TesseractRecognizer::prepare_region_image(b"nope", false).is_err());
        assert!(TesseractRecognizer::prepare_region_image(b"nope", true).is_err());
    }
}
