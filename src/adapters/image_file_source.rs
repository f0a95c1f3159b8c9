use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::models::UploadedImage;
use crate::utils;

/// Reads the chosen files as uploads. Directories contribute their image
/// files in name order; other entries keep the order they were chosen in.
pub async fn load_uploaded_images(selected_paths: Vec<PathBuf>) -> Result<Vec<UploadedImage>> {
    let mut image_paths = Vec::new();

    for selected_path in selected_paths {
        if tokio::fs::metadata(&selected_path)
            .await
            .with_context(|| format!("Cannot access {:?}", selected_path))?
            .is_dir()
        {
            let directory = selected_path.clone();
            let found = tokio::task::spawn_blocking(move || utils::collect_image_paths(&directory))
                .await
                .context("Directory scan panicked")?
                .with_context(|| format!("Failed to list {:?}", selected_path))?;
            log::debug!(
                "[IMAGE_FILES] {} images found in {:?}",
                found.len(),
                selected_path
            );
            image_paths.extend(found);
        } else if utils::has_supported_image_extension(&selected_path) {
            image_paths.push(selected_path);
        } else {
            log::warn!(
                "[IMAGE_FILES] Ignoring {:?}: unsupported extension",
                selected_path
            );
        }
    }

    let mut uploads = Vec::with_capacity(image_paths.len());
    for image_path in image_paths {
        let bytes = tokio::fs::read(&image_path)
            .await
            .with_context(|| format!("Failed to read {:?}", image_path))?;
        uploads.push(UploadedImage::build_from_bytes(display_name(&image_path), bytes));
    }

    log::info!("[IMAGE_FILES] Loaded {} images", uploads.len());
    Ok(uploads)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
