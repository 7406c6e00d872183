//! Text reading from a prepared plate crop
//!
//! The default reader shells out to Tesseract. The command line is
//! configurable; `{image}` is replaced by the path of the crop, or the path
//! is appended when the placeholder is absent.

use std::process::Command;

use image::{GrayImage, ImageFormat};
use log::{debug, warn};
use platelot_types::{Error, Result};

/// Default OCR command line
pub const DEFAULT_OCR_COMMAND: &str = "tesseract {image} stdout";

const IMAGE_PLACEHOLDER: &str = "{image}";

/// Something that turns a plate crop into text.
///
/// Implementations never fail: unreadable input yields an empty string.
pub trait TextReader {
    fn read(&self, crop: &GrayImage) -> String;
}

/// Reads text by running an external OCR command on a temporary PNG
#[derive(Debug, Clone)]
pub struct TesseractReader {
    command: String,
}

impl Default for TesseractReader {
    fn default() -> Self {
        Self::new(DEFAULT_OCR_COMMAND)
    }
}

impl TesseractReader {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn try_read(&self, crop: &GrayImage) -> Result<String> {
        let file = tempfile::Builder::new()
            .prefix("platelot_crop_")
            .suffix(".png")
            .tempfile()?;
        crop.save_with_format(file.path(), ImageFormat::Png)?;

        let image_arg = file.path().display().to_string();
        let (program, args) = build_command_line(&self.command, &image_arg)?;

        debug!("Running: {} {:?}", program, args);
        let output = Command::new(&program).args(&args).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("{} exited with {}: {}", program, output.status, stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl TextReader for TesseractReader {
    fn read(&self, crop: &GrayImage) -> String {
        match self.try_read(crop) {
            Ok(text) => text,
            Err(e) => {
                warn!("OCR failed, using empty text: {}", e);
                String::new()
            }
        }
    }
}

/// Split `command` into program and arguments, substituting the image path
pub(crate) fn build_command_line(command: &str, image_path: &str) -> Result<(String, Vec<String>)> {
    let mut parts = shell_words::split(command)
        .map_err(|e| Error::Ocr(format!("invalid OCR command '{}': {}", command, e)))?;
    if parts.is_empty() {
        return Err(Error::Ocr("OCR command is empty".to_string()));
    }

    let mut substituted = false;
    for part in parts.iter_mut() {
        if part.contains(IMAGE_PLACEHOLDER) {
            *part = part.replace(IMAGE_PLACEHOLDER, image_path);
            substituted = true;
        }
    }
    if !substituted {
        parts.push(image_path.to_string());
    }

    let program = parts.remove(0);
    Ok((program, parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_substituted() {
        let (program, args) =
            build_command_line("tesseract {image} stdout --psm 7", "/tmp/a b.png").unwrap();
        assert_eq!(program, "tesseract");
        assert_eq!(args, vec!["/tmp/a b.png", "stdout", "--psm", "7"]);
    }

    #[test]
    fn test_path_is_appended_without_placeholder() {
        let (program, args) = build_command_line("\"/opt/ocr tool/run\" -l eng", "x.png").unwrap();
        assert_eq!(program, "/opt/ocr tool/run");
        assert_eq!(args, vec!["-l", "eng", "x.png"]);
    }

    #[test]
    fn test_empty_or_unbalanced_command_is_rejected() {
        assert!(matches!(build_command_line("   ", "x.png"), Err(Error::Ocr(_))));
        assert!(matches!(build_command_line("tesseract 'oops", "x.png"), Err(Error::Ocr(_))));
    }

    #[test]
    fn test_missing_program_reads_as_empty() {
        let reader = TesseractReader::new("platelot-no-such-ocr-binary {image}");
        assert_eq!(reader.read(&GrayImage::new(8, 4)), "");
    }
}
