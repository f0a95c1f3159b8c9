use async_trait::async_trait;

use crate::core::errors::RecognitionError;

/// Turns the encoded image of a single cropped region into text.
///
/// Implementations return an empty string when nothing is recognized.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn recognize_text(&self, region_image: &[u8]) -> Result<String, RecognitionError>;
}
