use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::core::errors::RecognitionError;
use crate::core::interfaces::adapters::TextRecognizer;
use crate::global_constants;

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: RequestImage,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct RequestImage {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: &'static str,
}

#[derive(Deserialize, Default)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
    error: Option<ServiceStatus>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<ServiceStatus>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ServiceStatus {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

pub struct GoogleVisionRecognizer {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GoogleVisionRecognizer {
    pub fn build(api_key: Option<&str>) -> Result<Self, RecognitionError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RecognitionError::BackendUnavailable(format!(
                    "set {} to use Google Vision",
                    global_constants::ENV_GOOGLE_VISION_API_KEY
                ))
            })?;

        log::info!("[GOOGLE_VISION] Initializing Google Vision recognizer");

        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: global_constants::GOOGLE_VISION_ANNOTATE_URL.to_string(),
        })
    }

    fn build_request_body(region_image: &[u8]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: RequestImage {
                    content: base64::engine::general_purpose::STANDARD.encode(region_image),
                },
                features: vec![Feature {
                    feature_type: global_constants::GOOGLE_VISION_FEATURE_TYPE,
                }],
            }],
        }
    }

    fn build_annotate_request(&self, region_image: &[u8]) -> reqwest::RequestBuilder {
        self.client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::build_request_body(region_image))
    }
}

/// Text of the first annotation, which the service fills with the whole
/// detected block. No annotations means the region held no text.
fn parse_annotate_response(status: u16, body: &str) -> Result<String, RecognitionError> {
    let response: AnnotateResponse = serde_json::from_str(body).map_err(|error| {
        if (200..300).contains(&status) {
            RecognitionError::Engine(format!("unreadable Google Vision response: {}", error))
        } else {
            RecognitionError::Service {
                status,
                message: body.trim().to_string(),
            }
        }
    })?;

    if let Some(error) = response.error {
        return Err(RecognitionError::Service {
            status,
            message: error.message,
        });
    }

    if !(200..300).contains(&status) {
        return Err(RecognitionError::Service {
            status,
            message: body.trim().to_string(),
        });
    }

    let Some(image_response) = response.responses.into_iter().next() else {
        return Ok(String::new());
    };

    if let Some(error) = image_response.error {
        return Err(RecognitionError::Service {
            status: u16::try_from(error.code).unwrap_or(status),
            message: error.message,
        });
    }

    Ok(image_response
        .text_annotations
        .into_iter()
        .next()
        .map(|annotation| annotation.description.trim().to_string())
        .unwrap_or_default())
}

#[async_trait]
impl TextRecognizer for GoogleVisionRecognizer {
    fn backend_name(&self) -> &'static str {
        "google_vision"
    }

    async fn recognize_text(&self, region_image: &[u8]) -> Result<String, RecognitionError> {
        log::debug!(
            "[GOOGLE_VISION] Sending {} byte region for text detection",
            region_image.len()
        );

        let response = self
            .build_annotate_request(region_image)
            .send()
            .await
            .map_err(|error| RecognitionError::Transport(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| RecognitionError::Transport(error.to_string()))?;

        let text = parse_annotate_response(status, &body)?;
        log::debug!("[GOOGLE_VISION] Detected {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_api_key_is_unavailable() {
        assert!(matches!(
            GoogleVisionRecognizer::build(None),
            Err(RecognitionError::BackendUnavailable(_))
        ));
        assert!(matches!(
            GoogleVisionRecognizer::build(Some("   ")),
            Err(RecognitionError::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_build_with_api_key_uses_annotate_endpoint() {
        let recognizer = GoogleVisionRecognizer::build(Some(" key-123 ")).unwrap();

        assert_eq!(recognizer.api_key, "key-123");
        assert_eq!(recognizer.endpoint, global_constants::GOOGLE_VISION_ANNOTATE_URL);
        assert_eq!(recognizer.backend_name(), "google_vision");
    }

    #[test]
    fn test_annotate_request_posts_json_with_key_in_query() {
        let recognizer = GoogleVisionRecognizer::build(Some("key-123")).unwrap();

        let request = recognizer.build_annotate_request(b"png").build().unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/v1/images:annotate");
        assert_eq!(request.url().query(), Some("key=key-123"));
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[test]
    fn test_request_body_carries_base64_image_and_feature() {
        let body = serde_json::to_value(GoogleVisionRecognizer::build_request_body(b"png")).unwrap();

        assert_eq!(body["requests"][0]["image"]["content"], "cG5n");
        assert_eq!(body["requests"][0]["features"][0]["type"], "TEXT_DETECTION");
    }

    #[test]
    fn test_parse_takes_first_annotation_trimmed() {
        let body = r#"{
            "responses": [{
                "textAnnotations": [
                    {"description": "  Total 42\n"},
                    {"description": "Total"},
                    {"description": "42"}
                ]
            }]
        }"#;

        assert_eq!(parse_annotate_response(200, body).unwrap(), "Total 42");
    }

    #[test]
    fn test_parse_without_annotations_is_empty_text() {
        assert_eq!(parse_annotate_response(200, r#"{"responses": [{}]}"#).unwrap(), "");
        assert_eq!(parse_annotate_response(200, "{}").unwrap(), "");
    }

    #[test]
    fn test_parse_reports_per_image_error() {
        let body = r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#;

        match parse_annotate_response(200, body).unwrap_err() {
            RecognitionError::Service { status, message } => {
                assert_eq!(status, 3);
                assert_eq!(message, "Bad image data.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_reports_request_level_error() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid."}}"#;

        match parse_annotate_response(403, body).unwrap_err() {
            RecognitionError::Service { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_json_failure_keeps_status() {
        assert!(matches!(
            parse_annotate_response(502, "Bad Gateway"),
            Err(RecognitionError::Service { status: 502, .. })
        ));
    }
}
