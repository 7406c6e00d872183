//! Drawing the detected plate onto the source image

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::debug;

use crate::PlateRegion;

const PLATE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LINE_WIDTH: u32 = 3;
const LABEL_SCALE: f32 = 28.0;
const LABEL_GAP: i32 = 6;

/// Font used to write the plate text above the box
pub struct LabelFont(FontVec);

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        FontVec::try_from_vec(data).ok().map(Self)
    }

    /// First readable font from the usual system locations
    pub fn load_system() -> Option<Self> {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
            "/Library/Fonts/Arial Bold.ttf",
            "C:/Windows/Fonts/arialbd.ttf",
            "C:/Windows/Fonts/arial.ttf",
        ];

        for path in &font_paths {
            if let Ok(data) = std::fs::read(path) {
                if let Some(font) = Self::from_bytes(data) {
                    debug!("Plate label font: {}", path);
                    return Some(font);
                }
            }
        }
        debug!("No label font found, plate text will not be drawn");
        None
    }
}

/// Copy of `image` with a red box around `region` and, when a font is
/// given, `label` written above it
pub fn annotate_plate(
    image: &DynamicImage,
    region: PlateRegion,
    label: &str,
    font: Option<&LabelFont>,
) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for inset in 0..LINE_WIDTH {
        let width = region.width.saturating_sub(2 * inset);
        let height = region.height.saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32).of_size(width, height);
        draw_hollow_rect_mut(&mut canvas, rect, PLATE_COLOR);
    }

    if let Some(LabelFont(font)) = font {
        if !label.is_empty() {
            let scale = PxScale::from(LABEL_SCALE);
            let (_, text_height) = text_size(scale, font, label);
            let (x, y) = label_origin(region, text_height);
            draw_text_mut(&mut canvas, PLATE_COLOR, x, y, scale, font, label);
        }
    }
    canvas
}

/// Top-left corner for a label of `text_height` pixels: above the box, or
/// inside its top edge when the box touches the top of the image
fn label_origin(region: PlateRegion, text_height: u32) -> (i32, i32) {
    let above = region.y as i32 - text_height as i32 - LABEL_GAP;
    let y = if above >= 0 {
        above
    } else {
        (region.y + LINE_WIDTH) as i32
    };
    (region.x as i32, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> PlateRegion {
        PlateRegion {
            x: 10,
            y: 5,
            width: 20,
            height: 12,
        }
    }

    #[test]
    fn test_box_is_drawn_on_the_border_only() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(50, 30));
        let out = annotate_plate(&image, region(), "AB12", None);

        assert_eq!(*out.get_pixel(10, 5), PLATE_COLOR);
        assert_eq!(*out.get_pixel(12, 7), PLATE_COLOR);
        assert_eq!(*out.get_pixel(29, 16), PLATE_COLOR);
        assert_eq!(*out.get_pixel(20, 11), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_label_sits_above_the_box() {
        let plate = PlateRegion {
            x: 40,
            y: 100,
            width: 80,
            height: 30,
        };
        assert_eq!(label_origin(plate, 20), (40, 74));
    }

    #[test]
    fn test_label_moves_inside_at_the_top_edge() {
        assert_eq!(label_origin(region(), 20), (10, 8));
    }

    #[test]
    fn test_invalid_font_data_is_rejected() {
        assert!(LabelFont::from_bytes(vec![0, 1, 2, 3]).is_none());
    }

    #[test]
    fn test_label_is_drawn_above_with_system_font() {
        // Rendering needs a real font file; machines without one skip this
        let Some(font) = LabelFont::load_system() else {
            return;
        };
        let image = DynamicImage::ImageRgb8(RgbImage::new(200, 120));
        let plate = PlateRegion {
            x: 40,
            y: 70,
            width: 100,
            height: 40,
        };
        let out = annotate_plate(&image, plate, "AB12", Some(&font));

        let red_above = (0..plate.y)
            .flat_map(|y| (0..out.width()).map(move |x| (x, y)))
            .any(|(x, y)| out.get_pixel(x, y).0[0] > 0);
        assert!(red_above);
    }
}
