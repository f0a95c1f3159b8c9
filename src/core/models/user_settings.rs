use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::models::Region;
use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Dark => write!(f, "Dark"),
            ThemeMode::Light => write!(f, "Light"),
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Dark
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecognizerBackend {
    #[default]
    Tesseract,
    Ocrs,
    GoogleVision,
}

impl RecognizerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecognizerBackend::Tesseract => "tesseract",
            RecognizerBackend::Ocrs => "ocrs",
            RecognizerBackend::GoogleVision => "google_vision",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "tesseract" => Some(RecognizerBackend::Tesseract),
            "ocrs" => Some(RecognizerBackend::Ocrs),
            "google_vision" | "google-vision" | "vision" => Some(RecognizerBackend::GoogleVision),
            _ => None,
        }
    }
}

impl fmt::Display for RecognizerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How fixed pixel regions are applied to images whose size differs from the
/// image the regions were defined on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResolutionPolicy {
    #[default]
    AssumeUniform,
    ScaleFromReference {
        width: u32,
        height: u32,
    },
    RejectMismatched {
        width: u32,
        height: u32,
        tolerance_px: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub recognizer_backend: RecognizerBackend,
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    #[serde(default)]
    pub grayscale_before_ocr: bool,
    #[serde(default = "default_true")]
    pub include_date_column: bool,
    #[serde(default = "default_max_concurrent_recognitions")]
    pub max_concurrent_recognitions: usize,
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
    #[serde(default)]
    pub theme_mode: ThemeMode,
    #[serde(default = "default_preset_regions")]
    pub preset_regions: Vec<Region>,
    #[serde(default)]
    pub resolution_policy: ResolutionPolicy,
    #[serde(skip)]
    pub google_vision_api_key: Option<String>,
    #[serde(skip)]
    pub backend_override: Option<RecognizerBackend>,
}

fn default_true() -> bool {
    true
}

fn default_ocr_language() -> String {
    global_constants::DEFAULT_OCR_LANGUAGE.to_string()
}

fn default_max_concurrent_recognitions() -> usize {
    global_constants::DEFAULT_MAX_CONCURRENT_RECOGNITIONS
}

fn default_output_file_name() -> String {
    global_constants::DEFAULT_OUTPUT_FILE_NAME.to_string()
}

pub fn default_preset_regions() -> Vec<Region> {
    global_constants::DEFAULT_CROP_BOXES
        .iter()
        .filter_map(|&(left, top, right, bottom)| {
            Region::from_crop_box(left, top, right, bottom).ok()
        })
        .collect()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            recognizer_backend: RecognizerBackend::default(),
            ocr_language: default_ocr_language(),
            grayscale_before_ocr: false,
            include_date_column: true,
            max_concurrent_recognitions: default_max_concurrent_recognitions(),
            output_file_name: default_output_file_name(),
            theme_mode: ThemeMode::default(),
            preset_regions: default_preset_regions(),
            resolution_policy: ResolutionPolicy::default(),
            google_vision_api_key: None,
            backend_override: None,
        }
    }
}

impl UserSettings {
    pub fn load() -> Self {
        let loaded = Self::get_settings_file_path()
            .and_then(|settings_path| Self::load_from_path(&settings_path));
        Self::from_loaded_or_default(loaded, |name| std::env::var(name).ok())
    }

    /// Falls back to defaults when the file could not be read; environment
    /// overrides apply either way.
    pub fn from_loaded_or_default(
        loaded: anyhow::Result<Self>,
        read_variable: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut settings = loaded.unwrap_or_else(|e| {
            log::warn!("[SETTINGS] Failed to load settings: {:#}, using defaults", e);
            Self::default()
        });
        settings.apply_environment_overrides(read_variable);
        settings
    }

    /// Backend to build at start-up: the environment override wins over the
    /// stored choice.
    pub fn active_backend(&self) -> RecognizerBackend {
        self.backend_override.unwrap_or(self.recognizer_backend)
    }

    pub fn load_from_path(settings_path: &Path) -> anyhow::Result<Self> {
        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            default_settings.save_to_path(settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(settings_path)?;
        let settings: UserSettings = serde_json::from_str(&contents)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!(
            "[SETTINGS] Backend: {}, language: {}, {} preset regions",
            settings.recognizer_backend,
            settings.ocr_language,
            settings.preset_regions.len()
        );

        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::get_settings_file_path()?;
        self.save_to_path(&settings_path)
    }

    pub fn save_to_path(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    /// Reads process-start credentials and overrides; never persisted.
    pub fn apply_environment_overrides(&mut self, read_variable: impl Fn(&str) -> Option<String>) {
        if let Some(api_key) = read_variable(global_constants::ENV_GOOGLE_VISION_API_KEY)
            .filter(|key| !key.trim().is_empty())
        {
            log::debug!("[SETTINGS] Google Vision API key found in environment");
            self.google_vision_api_key = Some(api_key.trim().to_string());
        }

        if let Some(raw_backend) = read_variable(global_constants::ENV_RECOGNIZER_BACKEND) {
            match RecognizerBackend::parse(&raw_backend) {
                Some(backend) => {
                    log::info!("[SETTINGS] Recognizer backend overridden to {}", backend);
                    self.backend_override = Some(backend);
                }
                None => {
                    log::warn!(
                        "[SETTINGS] Ignoring unknown recognizer backend '{}'",
                        raw_backend
                    );
                }
            }
        }

        if self.max_concurrent_recognitions == 0 {
            log::warn!("[SETTINGS] max_concurrent_recognitions was 0, using 1");
            self.max_concurrent_recognitions = 1;
        }
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::CONFIG_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
