mod google_vision_recognizer;
mod image_file_source;
mod ocrs_recognizer;
mod tesseract_recognizer;
mod xlsx_exporter;

use std::sync::Arc;

use crate::core::errors::RecognitionError;
use crate::core::interfaces::adapters::TextRecognizer;
use crate::core::models::{RecognizerBackend, UserSettings};

pub use google_vision_recognizer::GoogleVisionRecognizer;
pub use image_file_source::load_uploaded_images;
pub use ocrs_recognizer::OcrsRecognizer;
pub use tesseract_recognizer::TesseractRecognizer;
pub use xlsx_exporter::XlsxExporter;

#[cfg(test)]
pub(crate) use xlsx_exporter::xlsx_inspection;

pub async fn build_text_recognizer(
    settings: &UserSettings,
) -> Result<Arc<dyn TextRecognizer>, RecognitionError> {
    log::info!(
        "[ADAPTERS] Building {} recognizer",
        settings.active_backend()
    );

    let recognizer: Arc<dyn TextRecognizer> = match settings.active_backend() {
        RecognizerBackend::Tesseract => Arc::new(TesseractRecognizer::build(
            &settings.ocr_language,
            settings.grayscale_before_ocr,
        )?),
        RecognizerBackend::Ocrs => Arc::new(OcrsRecognizer::build().await?),
        RecognizerBackend::GoogleVision => Arc::new(GoogleVisionRecognizer::build(
            settings.google_vision_api_key.as_deref(),
        )?),
    };

    Ok(recognizer)
}
