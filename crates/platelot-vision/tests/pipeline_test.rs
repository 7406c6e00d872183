//! End-to-end localization on synthetic images

use image::{DynamicImage, GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use platelot_vision::{read_plate, ContourPlateLocalizer, PlateLocalizer, TextReader};
use std::cell::Cell;

/// Reader returning fixed text and counting how often it was asked
struct FixedReader {
    text: &'static str,
    calls: Cell<usize>,
}

impl FixedReader {
    fn new(text: &'static str) -> Self {
        Self {
            text,
            calls: Cell::new(0),
        }
    }
}

impl TextReader for FixedReader {
    fn read(&self, _crop: &GrayImage) -> String {
        self.calls.set(self.calls.get() + 1);
        self.text.to_string()
    }
}

fn plate_scene() -> GrayImage {
    let mut gray = GrayImage::from_pixel(320, 240, Luma([0]));
    draw_filled_rect_mut(&mut gray, Rect::at(80, 60).of_size(160, 80), Luma([255]));
    gray
}

#[test]
fn test_bright_rectangle_is_located() {
    let region = ContourPlateLocalizer::default()
        .locate(&plate_scene())
        .expect("rectangle should be found");

    let tolerance = 6;
    assert!(region.x.abs_diff(80) <= tolerance, "{:?}", region);
    assert!(region.y.abs_diff(60) <= tolerance, "{:?}", region);
    assert!(region.right().abs_diff(240) <= tolerance, "{:?}", region);
    assert!(region.bottom().abs_diff(140) <= tolerance, "{:?}", region);
}

#[test]
fn test_read_plate_passes_crop_to_reader() {
    let image = DynamicImage::ImageLuma8(plate_scene());
    let reader = FixedReader::new("  AB 12\n");

    let reading = read_plate(&image, &ContourPlateLocalizer::default(), &reader).unwrap();
    assert_eq!(reading.raw_text, "AB 12");
    assert_eq!(reader.calls.get(), 1);
    assert!(reading.region.contains(160, 100));
}

#[test]
fn test_no_plate_skips_reader() {
    let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(120, 80, Luma([90])));
    let reader = FixedReader::new("SHOULD-NOT-READ");

    assert!(read_plate(&image, &ContourPlateLocalizer::default(), &reader).is_none());
    assert_eq!(reader.calls.get(), 0);
}
