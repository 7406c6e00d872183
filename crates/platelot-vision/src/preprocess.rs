//! Plate crop preparation for OCR

use image::{imageops, GrayImage, Luma};
use imageproc::filter::bilateral_filter;

use crate::PlateRegion;

const FIRST_THRESHOLD: u8 = 127;
const SECOND_THRESHOLD: u8 = 150;
const SECOND_MAX: u8 = 180;
const DENOISE_WINDOW: u32 = 11;
const DENOISE_SIGMA_COLOR: f32 = 17.0;
const DENOISE_SIGMA_SPATIAL: f32 = 17.0;

/// Crop the plate region, binarize it, smooth it with an edge-preserving
/// bilateral filter and binarize again so the text reader sees two flat
/// levels.
pub fn prepare_plate_crop(gray: &GrayImage, region: PlateRegion) -> GrayImage {
    let x = region.x.min(gray.width());
    let y = region.y.min(gray.height());
    let width = region.width.min(gray.width() - x);
    let height = region.height.min(gray.height() - y);

    let crop = imageops::crop_imm(gray, x, y, width, height).to_image();
    let binary = threshold_binary(&crop, FIRST_THRESHOLD, u8::MAX);
    let denoised = bilateral_filter(
        &binary,
        DENOISE_WINDOW,
        DENOISE_SIGMA_COLOR,
        DENOISE_SIGMA_SPATIAL,
    );
    threshold_binary(&denoised, SECOND_THRESHOLD, SECOND_MAX)
}

/// Pixels above `thresh` become `max_value`, the rest 0
pub fn threshold_binary(image: &GrayImage, thresh: u8, max_value: u8) -> GrayImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let Luma([v]) = *pixel;
        *pixel = Luma([if v > thresh { max_value } else { 0 }]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binary() {
        let image = GrayImage::from_raw(4, 1, vec![0, 127, 128, 255]).unwrap();
        let out = threshold_binary(&image, 127, 255);
        assert_eq!(out.into_raw(), vec![0, 0, 255, 255]);
    }

    #[test]
    fn test_prepared_crop_has_two_levels() {
        let mut gray = GrayImage::new(40, 20);
        for (x, _, pixel) in gray.enumerate_pixels_mut() {
            *pixel = Luma([if x < 20 { 30 } else { 220 }]);
        }
        let region = PlateRegion {
            x: 5,
            y: 5,
            width: 30,
            height: 10,
        };

        let crop = prepare_plate_crop(&gray, region);
        assert_eq!((crop.width(), crop.height()), (30, 10));
        assert!(crop.pixels().all(|p| p.0[0] == 0 || p.0[0] == SECOND_MAX));
        assert_eq!(crop.get_pixel(0, 5).0[0], 0);
        assert_eq!(crop.get_pixel(29, 5).0[0], SECOND_MAX);
    }

    #[test]
    fn test_region_past_the_edge_is_clamped() {
        let gray = GrayImage::new(10, 10);
        let region = PlateRegion {
            x: 6,
            y: 8,
            width: 20,
            height: 20,
        };
        let crop = prepare_plate_crop(&gray, region);
        assert_eq!((crop.width(), crop.height()), (4, 2));
    }
}
