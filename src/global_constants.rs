pub const APPLICATION_TITLE: &str = "Screenshot Region Extractor";
pub const CONFIG_DIRECTORY_NAME: &str = "screenshot-region-extractor";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const SOURCE_NAME_HEADER: &str = "Source Name";
pub const DATE_HEADER: &str = "Date";
pub const REGION_HEADER_PREFIX: &str = "Data";

pub const WORKSHEET_NAME: &str = "Extracted Data";
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "extracted_data.xlsx";
pub const SPREADSHEET_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub const FILENAME_DATE_PATTERN: &str = r"(\d{4}-\d{2}-\d{2})";

// (left, top, right, bottom) crop boxes of the reference screenshot layout.
pub const DEFAULT_CROP_BOXES: [(u32, u32, u32, u32); 5] = [
    (45, 29, 201, 72),
    (813, 877, 1011, 1000),
    (580, 1414, 752, 1472),
    (842, 1419, 996, 1474),
    (73, 1650, 218, 1731),
];

pub const DEFAULT_OCR_LANGUAGE: &str = "eng";
pub const DEFAULT_MAX_CONCURRENT_RECOGNITIONS: usize = 4;

pub const GOOGLE_VISION_ANNOTATE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const GOOGLE_VISION_FEATURE_TYPE: &str = "TEXT_DETECTION";

pub const ENV_GOOGLE_VISION_API_KEY: &str = "GOOGLE_VISION_API_KEY";
pub const ENV_RECOGNIZER_BACKEND: &str = "SCREENSHOT_EXTRACTOR_BACKEND";
pub const ENV_TESSDATA_PREFIX: &str = "TESSDATA_PREFIX";

pub const OCRS_DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
pub const OCRS_RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";
pub const OCRS_MODELS_SUBDIRECTORY: &str = "models/ocrs";
