use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ocrs::{OcrEngine, OcrEngineParams};
use rten::Model;

use crate::core::errors::RecognitionError;
use crate::core::interfaces::adapters::TextRecognizer;
use crate::global_constants;

const DETECTION_MODEL_FILE_NAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILE_NAME: &str = "text-recognition.rten";

pub struct OcrsRecognizer {
    engine: Arc<OcrEngine>,
}

impl OcrsRecognizer {
    pub async fn build() -> Result<Self, RecognitionError> {
        Self::build_with_models_directory(Self::models_directory())
            .await
            .map_err(|error| RecognitionError::BackendUnavailable(format!("{:#}", error)))
    }

    fn models_directory() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(global_constants::CONFIG_DIRECTORY_NAME)
            .join(global_constants::OCRS_MODELS_SUBDIRECTORY)
    }

    async fn build_with_models_directory(models_dir: PathBuf) -> Result<Self> {
        log::info!("[OCRS] Initializing OCRS recognizer");
        log::debug!("[OCRS] Models directory: {:?}", models_dir);

        tokio::fs::create_dir_all(&models_dir)
            .await
            .context("Failed to create models directory")?;

        let detection_model_path = models_dir.join(DETECTION_MODEL_FILE_NAME);
        let recognition_model_path = models_dir.join(RECOGNITION_MODEL_FILE_NAME);

        Self::ensure_model_exists(
            &detection_model_path,
            global_constants::OCRS_DETECTION_MODEL_URL,
        )
        .await?;
        Self::ensure_model_exists(
            &recognition_model_path,
            global_constants::OCRS_RECOGNITION_MODEL_URL,
        )
        .await?;

        let engine = tokio::task::spawn_blocking(move || {
            Self::load_engine(&detection_model_path, &recognition_model_path)
        })
        .await
        .context("Model loading task panicked")??;

        log::info!("[OCRS] Recognizer initialized successfully");
        Ok(Self {
            engine: Arc::new(engine),
        })
    }

    fn load_engine(detection_model_path: &Path, recognition_model_path: &Path) -> Result<OcrEngine> {
        log::debug!("[OCRS] Loading models...");
        let detection_model = Model::load_file(detection_model_path)
            .context("Failed to load text detection model")?;
        let recognition_model = Model::load_file(recognition_model_path)
            .context("Failed to load text recognition model")?;

        OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .context("Failed to create OCR engine")
    }

    async fn ensure_model_exists(path: &Path, url: &str) -> Result<()> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(());
        }

        log::info!("[OCRS] Downloading model from {} to {:?}", url, path);
        let response = reqwest::get(url)
            .await
            .context("Failed to download model")?
            .error_for_status()
            .context("Model download was refused")?;
        let bytes = response.bytes().await.context("Failed to get model bytes")?;
        tokio::fs::write(path, bytes)
            .await
            .context("Failed to write model file")?;
        log::info!("[OCRS] Model downloaded successfully");
        Ok(())
    }

    fn read_region(engine: &OcrEngine, region_image: &[u8]) -> Result<String, RecognitionError> {
        let rgb_image = image::load_from_memory(region_image)
            .map_err(|error| RecognitionError::InvalidImage(error.to_string()))?
            .to_rgb8();
        let (width, height) = rgb_image.dimensions();

        let image_source = ocrs::ImageSource::from_bytes(rgb_image.as_raw(), (width, height))
            .map_err(|error| RecognitionError::InvalidImage(error.to_string()))?;
        let ocr_input = engine
            .prepare_input(image_source)
            .map_err(|error| RecognitionError::Engine(error.to_string()))?;

        engine
            .get_text(&ocr_input)
            .map_err(|error| RecognitionError::Engine(error.to_string()))
    }
}

#[async_trait]
impl TextRecognizer for OcrsRecognizer {
    fn backend_name(&self) -> &'static str {
        "ocrs"
    }

    async fn recognize_text(&self, region_image: &[u8]) -> Result<String, RecognitionError> {
        let engine = Arc::clone(&self.engine);
        let region_image = region_image.to_vec();

        let text = tokio::task::spawn_blocking(move || Self::read_region(&engine, &region_image))
            .await
            .map_err(|error| RecognitionError::Engine(error.to_string()))??;

        log::debug!("[OCRS] Extracted {} characters", text.trim().len());
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_directory_is_application_scoped() {
        let models_dir = OcrsRecognizer::models_directory();

        assert!(models_dir.ends_with("screenshot-region-extractor/models/ocrs"));
    }

    #[tokio::test]
    async fn test_build_fails_on_unreadable_model_files() {
        let models_dir = std::env::temp_dir().join("screenshot-region-extractor-ocrs-test");
        std::fs::remove_dir_all(&models_dir).ok();
        std::fs::create_dir_all(&models_dir).unwrap();
        std::fs::write(models_dir.join(DETECTION_MODEL_FILE_NAME), b"not a model").unwrap();
        std::fs::write(models_dir.join(RECOGNITION_MODEL_FILE_NAME), b"not a model").unwrap();

        let result = OcrsRecognizer::build_with_models_directory(models_dir.clone()).await;

        assert!(result.is_err());
        std::fs::remove_dir_all(&models_dir).ok();
    }
}
