//! Vision module - license plate localization and text reading
//!
//! The pipeline is: grayscale → [`PlateLocalizer`] finds one rectangular
//! region → the crop is binarized and denoised → [`TextReader`] returns the
//! raw text. Normalizing that text into a ledger key is left to the caller.

pub mod annotate;
pub mod localizer;
pub mod preprocess;
pub mod reader;

pub use annotate::{annotate_plate, LabelFont};
pub use localizer::{ContourPlateLocalizer, LocalizerConfig, PlateLocalizer};
pub use preprocess::prepare_plate_crop;
pub use reader::{TesseractReader, TextReader, DEFAULT_OCR_COMMAND};

use image::DynamicImage;
use log::{debug, info};
use serde::Serialize;

/// Axis-aligned bounding box of a detected plate, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlateRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PlateRegion {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Located plate and the text read from it, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateReading {
    pub region: PlateRegion,
    pub raw_text: String,
}

/// Locate a plate in `image` and read its text.
///
/// Returns `None` when no four-cornered contour was found; nothing should be
/// recorded for such an image.
pub fn read_plate(
    image: &DynamicImage,
    localizer: &dyn PlateLocalizer,
    reader: &dyn TextReader,
) -> Option<PlateReading> {
    let gray = image.to_luma8();

    let Some(region) = localizer.locate(&gray) else {
        debug!("No four-cornered contour found");
        return None;
    };
    debug!("Plate region: {:?}", region);

    let crop = prepare_plate_crop(&gray, region);
    let raw_text = reader.read(&crop).trim().to_string();
    info!("License Plate : {}", raw_text);

    Some(PlateReading { region, raw_text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_bounds() {
        let region = PlateRegion {
            x: 10,
            y: 20,
            width: 30,
            height: 5,
        };
        assert_eq!(region.right(), 40);
        assert_eq!(region.bottom(), 25);
        assert!(region.contains(10, 20));
        assert!(region.contains(39, 24));
        assert!(!region.contains(40, 24));
        assert!(!region.contains(9, 22));
    }
}
