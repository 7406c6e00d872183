//! Scan Service - core use case for one detection cycle
//!
//! 1. Validate and decode the image
//! 2. Locate the plate and read its text
//! 3. Normalize the text into a ledger key
//! 4. Apply the entry/exit transition
//! 5. Return the outcome with an annotated copy of the image
//!
//! An image without a four-cornered contour stops after step 2 and leaves
//! the ledger untouched.

use chrono::NaiveDateTime;
use image::RgbImage;
use log::{debug, info};
use platelot_domain::repository::LedgerRepository;
use platelot_domain::{normalize_plate, Ledger, Outcome};
use platelot_types::Error;
use platelot_vision::{
    annotate_plate, read_plate, ContourPlateLocalizer, LabelFont, PlateLocalizer, PlateReading,
    PlateRegion, TextReader,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Config;
use crate::scanner::validate_image;

/// Errors specific to the scan service
#[derive(Debug, Error)]
pub enum ScanServiceError {
    #[error("Image validation failed: {0}")]
    InvalidImage(String),

    #[error("Could not decode image: {0}")]
    Decode(String),

    #[error("Ledger update failed: {0}")]
    Ledger(#[source] Error),
}

impl From<Error> for ScanServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::FileNotFound(msg) | Error::InvalidImageFormat(msg) => {
                ScanServiceError::InvalidImage(msg)
            }
            Error::Image(e) => ScanServiceError::Decode(e.to_string()),
            _ => ScanServiceError::Ledger(err),
        }
    }
}

impl From<ScanServiceError> for Error {
    fn from(err: ScanServiceError) -> Self {
        match err {
            ScanServiceError::InvalidImage(msg) | ScanServiceError::Decode(msg) => {
                Error::InvalidImageFormat(msg)
            }
            ScanServiceError::Ledger(e) => e,
        }
    }
}

/// Plate localizer, text reader and label font used for every scan
pub struct Pipeline {
    localizer: Box<dyn PlateLocalizer>,
    reader: Box<dyn TextReader>,
    label_font: Option<LabelFont>,
}

impl Pipeline {
    pub fn new(localizer: Box<dyn PlateLocalizer>, reader: Box<dyn TextReader>) -> Self {
        Self {
            localizer,
            reader,
            label_font: None,
        }
    }

    /// Contour localizer and external OCR command from the configuration,
    /// with a system font for the plate label when one is installed
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Box::new(ContourPlateLocalizer::new(config.localizer_config())),
            Box::new(config.text_reader()),
        )
        .with_label_font(LabelFont::load_system())
    }

    pub fn with_label_font(mut self, font: Option<LabelFont>) -> Self {
        self.label_font = font;
        self
    }

    pub fn read(&self, image: &image::DynamicImage) -> Option<PlateReading> {
        read_plate(image, self.localizer.as_ref(), self.reader.as_ref())
    }

    /// Box the plate and write `plate` above it
    pub fn annotate(&self, image: &image::DynamicImage, region: PlateRegion, plate: &str) -> RgbImage {
        annotate_plate(image, region, plate, self.label_font.as_ref())
    }
}

/// A plate was found and applied to the ledger
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedScan {
    pub image_path: PathBuf,
    pub reading: PlateReading,
    /// Normalized key used by the ledger
    pub plate: String,
    pub outcome: Outcome,
    /// Source image with the plate boxed
    #[serde(skip)]
    pub annotated: RgbImage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResult {
    /// No plate-shaped contour; nothing was recorded
    NoPlate { image_path: PathBuf },
    Processed(ProcessedScan),
}

impl ScanResult {
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            ScanResult::NoPlate { .. } => None,
            ScanResult::Processed(scan) => Some(&scan.outcome),
        }
    }
}

/// Run one detection cycle on `image_path` at time `now`
pub fn scan_image<R: LedgerRepository>(
    image_path: &Path,
    ledger: &Ledger<R>,
    pipeline: &Pipeline,
    now: NaiveDateTime,
) -> Result<ScanResult, ScanServiceError> {
    validate_image(image_path)?;
    let image = image::open(image_path).map_err(Error::from)?;
    debug!("Decoded {} ({}x{})", image_path.display(), image.width(), image.height());

    let Some(reading) = pipeline.read(&image) else {
        info!("No plate found in {}", image_path.display());
        return Ok(ScanResult::NoPlate {
            image_path: image_path.to_path_buf(),
        });
    };

    let (plate, outcome) = process_plate_text(ledger, &reading.raw_text, now)?;
    let annotated = pipeline.annotate(&image, reading.region, &plate);

    Ok(ScanResult::Processed(ProcessedScan {
        image_path: image_path.to_path_buf(),
        reading,
        plate,
        outcome,
        annotated,
    }))
}

/// Normalize raw plate text and apply it to the ledger
pub fn process_plate_text<R: LedgerRepository>(
    ledger: &Ledger<R>,
    raw_text: &str,
    now: NaiveDateTime,
) -> Result<(String, Outcome), ScanServiceError> {
    let plate = normalize_plate(raw_text);
    let outcome = ledger.process_detection(&plate, now)?;
    Ok((plate, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use platelot_domain::repository::MemoryLedgerRepository;
    use platelot_domain::SlotId;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn test_error_mapping() {
        let err: ScanServiceError = Error::FileNotFound("a.jpg".to_string()).into();
        assert!(matches!(err, ScanServiceError::InvalidImage(_)));

        let err: ScanServiceError = Error::Ocr("x".to_string()).into();
        assert!(matches!(err, ScanServiceError::Ledger(_)));

        let back: Error = err.into();
        assert!(matches!(back, Error::Ocr(_)));
    }

    #[test]
    fn test_process_plate_text_normalizes() {
        let ledger = Ledger::new(MemoryLedgerRepository::with_slots(3));
        let (plate, outcome) = process_plate_text(&ledger, "A B-12!", now()).unwrap();
        assert_eq!(plate, "AB12");
        assert_eq!(outcome, Outcome::Entered { slot: SlotId(1) });

        let (_, outcome) = process_plate_text(&ledger, "AB 12", now()).unwrap();
        assert!(matches!(outcome, Outcome::Exited { .. }));
    }

    #[test]
    fn test_missing_image_is_invalid() {
        let ledger = Ledger::new(MemoryLedgerRepository::with_slots(3));
        let pipeline = Pipeline::from_config(&Config::default());
        let err = scan_image(Path::new("/nonexistent/car.jpg"), &ledger, &pipeline, now()).unwrap_err();
        assert!(matches!(err, ScanServiceError::InvalidImage(_)));
    }
}
