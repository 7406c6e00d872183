//! Plate localization from edge contours
//!
//! Canny edges are traced into contours, the largest ones (by enclosed
//! area) are simplified with Douglas-Peucker, and the first that reduces to
//! exactly four corners is taken as the plate.

use image::GrayImage;
use imageproc::contours::{find_contours, Contour};
use imageproc::edges::canny;
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;

use crate::PlateRegion;

/// Something that can find one plate-shaped region in a grayscale image
pub trait PlateLocalizer {
    fn locate(&self, gray: &GrayImage) -> Option<PlateRegion>;
}

/// Tuning for [`ContourPlateLocalizer`]
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizerConfig {
    pub canny_low: f32,
    pub canny_high: f32,
    /// How many of the largest contours are tried
    pub max_candidates: usize,
    /// Simplification tolerance as a fraction of the contour perimeter
    pub epsilon_ratio: f64,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            canny_low: 170.0,
            canny_high: 200.0,
            max_candidates: 30,
            epsilon_ratio: 0.01,
        }
    }
}

impl LocalizerConfig {
    /// Thresholds are stored low-then-high whatever order they come in
    pub fn with_canny(mut self, low: f32, high: f32) -> Self {
        self.canny_low = low.min(high);
        self.canny_high = low.max(high);
        self
    }

    pub fn with_max_candidates(mut self, count: usize) -> Self {
        self.max_candidates = count.max(1);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContourPlateLocalizer {
    config: LocalizerConfig,
}

impl ContourPlateLocalizer {
    pub fn new(config: LocalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }
}

impl PlateLocalizer for ContourPlateLocalizer {
    fn locate(&self, gray: &GrayImage) -> Option<PlateRegion> {
        if gray.width() < 3 || gray.height() < 3 {
            return None;
        }

        let edges = canny(gray, self.config.canny_low, self.config.canny_high);
        let contours: Vec<Contour<i32>> = find_contours(&edges);
        let outlines: Vec<Vec<Point<i32>>> = contours.into_iter().map(|c| c.points).collect();

        select_plate_contour(&outlines, self.config.max_candidates, self.config.epsilon_ratio)
            .map(|outline| bounding_region(outline))
    }
}

/// Pick the first of the `max_candidates` largest outlines that simplifies
/// to a quadrilateral
pub(crate) fn select_plate_contour(
    outlines: &[Vec<Point<i32>>],
    max_candidates: usize,
    epsilon_ratio: f64,
) -> Option<&[Point<i32>]> {
    let mut ranked: Vec<(f64, &Vec<Point<i32>>)> = outlines
        .iter()
        .filter(|points| points.len() >= 3)
        .map(|points| (contour_area(points), points))
        .collect();
    // Stable, so equal areas keep tracing order
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    ranked
        .into_iter()
        .take(max_candidates)
        .map(|(_, points)| points.as_slice())
        .find(|points| corner_count(points, epsilon_ratio) == 4)
}

fn corner_count(points: &[Point<i32>], epsilon_ratio: f64) -> usize {
    let epsilon = epsilon_ratio * arc_length(points, true);
    if epsilon <= 0.0 {
        return 0;
    }
    simplify_closed(points, epsilon).len()
}

/// Douglas-Peucker over a closed outline.
///
/// The outline is cut at its first point and at the point farthest from it,
/// and each half is simplified as an open curve, so the result never keeps
/// a spurious vertex where tracing happened to start and stop.
pub(crate) fn simplify_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let Some(&start) = points.first() else {
        return Vec::new();
    };

    let squared_distance = |p: &Point<i32>| {
        let dx = (p.x - start.x) as i64;
        let dy = (p.y - start.y) as i64;
        dx * dx + dy * dy
    };
    let mut far = 0;
    for (i, p) in points.iter().enumerate() {
        if squared_distance(p) > squared_distance(&points[far]) {
            far = i;
        }
    }
    if far == 0 {
        return vec![start];
    }

    let mut first_half = approximate_polygon_dp(&points[..=far], epsilon, false);
    let mut second: Vec<Point<i32>> = points[far..].to_vec();
    second.push(start);
    let mut second_half = approximate_polygon_dp(&second, epsilon, false);

    // Both halves share their end points
    first_half.pop();
    second_half.pop();
    first_half.append(&mut second_half);
    first_half
}

/// Smallest axis-aligned box holding every point
pub(crate) fn bounding_region(points: &[Point<i32>]) -> PlateRegion {
    let min_x = points.iter().map(|p| p.x).min().unwrap_or(0).max(0);
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let max_x = points.iter().map(|p| p.x).max().unwrap_or(0).max(min_x);
    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0).max(min_y);

    PlateRegion {
        x: min_x as u32,
        y: min_y as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    }
}
