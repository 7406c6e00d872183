//! Image scanning and validation

use platelot_types::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions offered by the file picker and accepted for detection
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Check if a path is a supported image file
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Validate an image file exists and has a supported extension
pub fn validate_image(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    if !path.is_file() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if !is_supported_image(path) {
        return Err(Error::InvalidImageFormat(format!(
            "Unsupported image format: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Scan a directory for image files, sorted by file name
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::FileNotFound(dir.display().to_string()));
    }

    if !dir.is_dir() {
        return Err(Error::InvalidImageFormat(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_supported_image(path) {
            images.push(path.to_path_buf());
        }
    }

    // Batch processing order is file name order
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("test.jpg")));
        assert!(is_supported_image(Path::new("test.JPEG")));
        assert!(is_supported_image(Path::new("test.png")));
        assert!(is_supported_image(Path::new("car.Bmp")));
        assert!(!is_supported_image(Path::new("test.webp")));
        assert!(!is_supported_image(Path::new("test.txt")));
        assert!(!is_supported_image(Path::new("test")));
    }

    #[test]
    fn test_validate_image_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            validate_image(&dir.path().join("missing.jpg")),
            Err(Error::FileNotFound(_))
        ));
        assert!(matches!(
            validate_image(dir.path()),
            Err(Error::InvalidImageFormat(_))
        ));

        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "x").unwrap();
        assert!(matches!(
            validate_image(&notes),
            Err(Error::InvalidImageFormat(_))
        ));
    }

    #[test]
    fn test_scan_directory_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("gate");
        std::fs::create_dir(&nested).unwrap();
        for name in ["b.png", "a.jpg", "readme.md"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::write(nested.join("c.bmp"), b"").unwrap();

        let images = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.bmp"]);
    }
}
