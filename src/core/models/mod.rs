mod extraction;
mod image_asset;
mod region;
mod session_state;
mod user_settings;

pub use extraction::{ExtractionResult, ExtractionRow, ExtractionWarning};
pub use image_asset::{ImageAsset, UploadedImage};
pub use region::{DrawnRectangle, Region};
pub use session_state::{SessionEvent, SessionState};
pub use user_settings::{RecognizerBackend, ResolutionPolicy, ThemeMode, UserSettings};

#[cfg(test)]
pub(crate) use image_asset::test_images;
