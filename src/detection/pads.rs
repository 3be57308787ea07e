//! Contour-based pad detection
//!
//! Implements pad detection that:
//! - Masks near-white background in HSV (low saturation and high value)
//! - Labels 8-connected components of the remaining pixels
//! - Drops specks below a minimum area
//! - Keeps the six largest components and orders them along the strip
//!
//! Fewer than six pads is not an error; the caller sees the shorter list and
//! compensates with fallback estimates.

use image::RgbImage;
use tracing::debug;

use crate::color::ColorConverter;
use crate::constants::{extraction, strip::EXPECTED_PADS};
use crate::detection::region::Region;
use crate::detection::RegionExtractor;
use crate::Result;

const NEIGHBORS_C8: [(i64, i64); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Pad detector implementing background masking and component labeling
#[derive(Debug, Clone)]
pub struct ContourExtractor {
    converter: ColorConverter,
    white_max_saturation: f64,
    white_min_value: f64,
    min_area_ratio: f64,
    max_pads: usize,
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContourExtractor {
    /// Create a pad detector with default thresholds
    pub fn new() -> Self {
        Self::with_params(
            extraction::WHITE_MAX_SATURATION,
            extraction::WHITE_MIN_VALUE,
            extraction::MIN_PAD_AREA_RATIO,
        )
    }

    /// Create a pad detector with custom thresholds
    ///
    /// # Arguments
    ///
    /// * `white_max_saturation` - HSV saturation (0-1) at or below which a pixel may be background
    /// * `white_min_value` - HSV value (0-1) at or above which a pixel may be background
    /// * `min_area_ratio` - Minimum component area as fraction of the image
    pub fn with_params(white_max_saturation: f64, white_min_value: f64, min_area_ratio: f64) -> Self {
        Self {
            converter: ColorConverter::default(),
            white_max_saturation,
            white_min_value,
            min_area_ratio,
            max_pads: EXPECTED_PADS,
        }
    }

    /// Whether a pixel belongs to the near-white background
    pub fn is_background(&self, rgb: [u8; 3]) -> bool {
        let hsv = self.converter.rgb_to_hsv(rgb);
        hsv.saturation <= self.white_max_saturation && hsv.value >= self.white_min_value
    }

    /// Binary mask of pad candidates, row-major, `true` = colored
    fn colored_mask(&self, image: &RgbImage) -> Vec<bool> {
        image.pixels().map(|px| !self.is_background(px.0)).collect()
    }

    /// Label 8-connected components of the mask.
    ///
    /// Components are returned in scan order of their first pixel.
    fn connected_components(mask: &[bool], width: u32, height: u32) -> Vec<Vec<(u32, u32)>> {
        let (w, h) = (width as i64, height as i64);
        let mut seen = vec![false; mask.len()];
        let mut stack = Vec::new();
        let mut components = Vec::new();

        for start in 0..mask.len() {
            if !mask[start] || seen[start] {
                continue;
            }

            let mut component = Vec::new();
            seen[start] = true;
            stack.push(start);

            while let Some(p) = stack.pop() {
                let x = (p % width as usize) as i64;
                let y = (p / width as usize) as i64;
                component.push((x as u32, y as u32));

                for (dx, dy) in NEIGHBORS_C8 {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    let nb = (ny * w + nx) as usize;
                    if mask[nb] && !seen[nb] {
                        seen[nb] = true;
                        stack.push(nb);
                    }
                }
            }

            components.push(component);
        }

        components
    }

    /// Smallest component area kept for an image of `pixel_count` pixels
    fn min_area(&self, pixel_count: u64) -> usize {
        ((pixel_count as f64 * self.min_area_ratio).ceil() as usize).max(1)
    }
}

/// Sort regions along the strip and renumber them in pad order.
///
/// The strip axis is the one along which the region centers spread the most.
fn order_along_strip(regions: &mut [Region]) {
    let centers: Vec<(f64, f64)> = regions.iter().map(|r| r.bounds.center()).collect();
    let spread = |pick: fn(&(f64, f64)) -> f64| {
        let (lo, hi) = centers
            .iter()
            .map(pick)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        hi - lo
    };
    let vertical = spread(|c| c.1) >= spread(|c| c.0);

    regions.sort_by(|a, b| {
        let (ax, ay) = a.bounds.center();
        let (bx, by) = b.bounds.center();
        if vertical {
            ay.total_cmp(&by).then(ax.total_cmp(&bx))
        } else {
            ax.total_cmp(&bx).then(ay.total_cmp(&by))
        }
    });

    for (i, region) in regions.iter_mut().enumerate() {
        region.index = i;
    }
}

impl RegionExtractor for ContourExtractor {
    fn name(&self) -> &'static str {
        "contour"
    }

    fn extract(&self, image: &RgbImage) -> Result<Vec<Region>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }

        let mask = self.colored_mask(image);
        let min_area = self.min_area(width as u64 * height as u64);

        let mut components: Vec<Vec<(u32, u32)>> = Self::connected_components(&mask, width, height)
            .into_iter()
            .filter(|c| c.len() >= min_area)
            .collect();

        // Largest first; stable so equal areas keep scan order
        components.sort_by(|a, b| b.len().cmp(&a.len()));
        components.truncate(self.max_pads);

        let mut regions: Vec<Region> = components
            .into_iter()
            .enumerate()
            .filter_map(|(i, members)| Region::from_members(i, members))
            .collect();
        order_along_strip(&mut regions);

        debug!(
            pads = regions.len(),
            min_area,
            "contour extraction finished"
        );
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::region::BoundingBox;
    use image::Rgb;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn paint(image: &mut RgbImage, rect: BoundingBox, color: [u8; 3]) {
        for y in rect.y..rect.y + rect.height {
            for x in rect.x..rect.x + rect.width {
                image.put_pixel(x, y, Rgb(color));
            }
        }
    }

    #[test]
    fn test_background_classification() {
        let extractor = ContourExtractor::new();
        assert!(extractor.is_background([255, 255, 255]));
        assert!(extractor.is_background([230, 228, 225]));
        assert!(!extractor.is_background([255, 0, 0]));
        // Dark gray has low saturation but also low value
        assert!(!extractor.is_background([60, 60, 60]));
    }

    #[test]
    fn test_all_white_yields_nothing() {
        let image = RgbImage::from_pixel(30, 60, WHITE);
        let regions = ContourExtractor::new().extract(&image).unwrap();
        assert!(regions.is_empty());
    }

    #[test]
    fn test_separated_pads_in_strip_order() {
        let mut image = RgbImage::from_pixel(20, 70, WHITE);
        let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0], [0, 255, 255], [255, 0, 255]];
        for (i, color) in colors.iter().enumerate() {
            paint(&mut image, BoundingBox::new(5, 2 + i as u32 * 11, 10, 8), *color);
        }

        let regions = ContourExtractor::new().extract(&image).unwrap();
        assert_eq!(regions.len(), 6);
        for (i, region) in regions.iter().enumerate() {
            assert_eq!(region.index, i);
            assert_eq!(region.area, 80);
            assert_eq!(region.bounds, BoundingBox::new(5, 2 + i as u32 * 11, 10, 8));
            let mut first = None;
            region.for_each_pixel(&image, |px| {
                first.get_or_insert(px);
            });
            assert_eq!(first, Some(colors[i]));
        }
    }

    #[test]
    fn test_horizontal_strip_ordered_left_to_right() {
        let mut image = RgbImage::from_pixel(60, 10, WHITE);
        // Paint right to left so scan order differs from strip order
        paint(&mut image, BoundingBox::new(40, 2, 8, 6), [0, 0, 200]);
        paint(&mut image, BoundingBox::new(5, 3, 8, 6), [200, 0, 0]);
        paint(&mut image, BoundingBox::new(22, 1, 8, 6), [0, 200, 0]);

        let regions = ContourExtractor::new().extract(&image).unwrap();
        let xs: Vec<u32> = regions.iter().map(|r| r.bounds.x).collect();
        assert_eq!(xs, vec![5, 22, 40]);
    }

    #[test]
    fn test_keeps_six_largest_and_drops_specks() {
        let mut image = RgbImage::from_pixel(100, 100, WHITE);
        // Seven pads of decreasing size plus a single-pixel speck
        for i in 0..7u32 {
            let side = 12 - i;
            paint(&mut image, BoundingBox::new(2, 2 + i * 14, side, side), [200, 30, 30]);
        }
        image.put_pixel(90, 90, Rgb([0, 0, 0]));

        let extractor = ContourExtractor::with_params(30.0 / 255.0, 200.0 / 255.0, 0.001);
        let regions = extractor.extract(&image).unwrap();
        assert_eq!(regions.len(), 6);
        assert!(regions.iter().all(|r| r.area >= 49));
        assert!(regions.iter().all(|r| r.bounds.fits_within(100, 100)));
    }

    #[test]
    fn test_diagonal_pixels_are_connected() {
        let mask = vec![
            true, false, false, //
            false, true, false, //
            false, false, true,
        ];
        let components = ContourExtractor::connected_components(&mask, 3, 3);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 3);
    }
}
