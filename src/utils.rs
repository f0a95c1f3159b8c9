use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::global_constants;

fn filename_date_regex() -> Option<&'static Regex> {
    static DATE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    DATE_REGEX
        .get_or_init(|| match Regex::new(global_constants::FILENAME_DATE_PATTERN) {
            Ok(regex) => Some(regex),
            Err(error) => {
                log::error!("[UTILS] Invalid filename date pattern: {}", error);
                None
            }
        })
        .as_ref()
}

/// First `YYYY-MM-DD` token in a file name, if any.
pub fn extract_date_from_file_name(file_name: &str) -> Option<String> {
    filename_date_regex()?
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .map(|date| date.as_str().to_string())
}

pub fn has_supported_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            global_constants::SUPPORTED_IMAGE_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(extension))
        })
        .unwrap_or(false)
}

/// Image files directly inside `directory`, sorted by file name.
pub fn collect_image_paths(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut image_paths: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && has_supported_image_extension(path))
        .collect();

    image_paths.sort_by(|first, second| first.file_name().cmp(&second.file_name()));
    Ok(image_paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_from_file_name_finds_iso_date() {
        assert_eq!(
            extract_date_from_file_name("shot_2024-03-07.png"),
            Some("2024-03-07".to_string())
        );
    }

    #[test]
    fn test_extract_date_from_file_name_takes_first_match() {
        assert_eq!(
            extract_date_from_file_name("2023-12-31_to_2024-01-01.jpg"),
            Some("2023-12-31".to_string())
        );
    }

    #[test]
    fn test_extract_date_from_file_name_without_date_is_none() {
        assert_eq!(extract_date_from_file_name("screenshot.png"), None);
        assert_eq!(extract_date_from_file_name("shot_2024-3-7.png"), None);
    }

    #[test]
    fn test_supported_extensions_are_case_insensitive() {
        assert!(has_supported_image_extension(Path::new("a/B.PNG")));
        assert!(has_supported_image_extension(Path::new("photo.jpeg")));
        assert!(!has_supported_image_extension(Path::new("notes.txt")));
        assert!(!has_supported_image_extension(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_image_paths_filters_and_sorts() {
        let temp_dir = std::env::temp_dir().join("screenshot-region-extractor-collect-test");
        std::fs::remove_dir_all(&temp_dir).ok();
        std::fs::create_dir_all(&temp_dir).unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "c.JPEG"] {
            std::fs::write(temp_dir.join(name), b"x").unwrap();
        }

        let paths = collect_image_paths(&temp_dir).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.png", "c.JPEG"]);

        std::fs::remove_dir_all(&temp_dir).ok();
    }
}
