//! Representative color extraction for pad regions
//!
//! Reduces a region's pixels to one color in the matching space:
//! - Distinct RGB values are counted once and converted once
//! - The mean is taken in the matching space (Lab by default), not in RGB
//! - Spread around the mean is reported as a diagnostic

use image::RgbImage;
use std::collections::HashMap;

use crate::color::conversion::{Channels, ColorConverter, ColorSpace};
use crate::detection::Region;
use crate::{AnalysisError, Result};

/// Representative color of one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionColor {
    /// Mean color in the matching space
    pub channels: Channels,
    /// Mean sRGB value, rounded, for diagnostics
    pub mean_rgb: [u8; 3],
    /// Number of pixels averaged
    pub pixel_count: u64,
    /// Root-mean-square distance of the pixels from the mean
    pub spread: f64,
}

/// Region colorizer bound to a matching space
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAnalyzer {
    converter: ColorConverter,
}

impl ColorAnalyzer {
    pub fn new(space: ColorSpace) -> Self {
        Self {
            converter: ColorConverter::new(space),
        }
    }

    pub fn converter(&self) -> &ColorConverter {
        &self.converter
    }

    /// Extract the representative color of a region
    ///
    /// # Arguments
    ///
    /// * `image` - Decoded RGB image the region was extracted from
    /// * `region` - Region whose member pixels are averaged
    ///
    /// # Errors
    ///
    /// Returns `ProcessingError` if the region covers no pixels of `image`
    pub fn extract_color(&self, image: &RgbImage, region: &Region) -> Result<RegionColor> {
        let mut histogram: HashMap<[u8; 3], u64> = HashMap::new();
        region.for_each_pixel(image, |rgb| *histogram.entry(rgb).or_insert(0) += 1);

        self.summarize(&histogram).ok_or_else(|| {
            AnalysisError::ProcessingError(format!("Region {} contains no pixels", region.index))
        })
    }

    /// Mean and spread of a color histogram, `None` when it is empty
    fn summarize(&self, histogram: &HashMap<[u8; 3], u64>) -> Option<RegionColor> {
        let total: u64 = histogram.values().sum();
        if total == 0 {
            return None;
        }
        let n = total as f64;

        // Most frequent color as pivot, ties broken by value for determinism
        let (&pivot_rgb, _) = histogram
            .iter()
            .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then(b.cmp(a)))?;
        let pivot = self.converter.to_channels(pivot_rgb);

        let converted: Vec<(Channels, [u8; 3], f64)> = histogram
            .iter()
            .map(|(&rgb, &count)| (self.converter.to_channels(rgb), rgb, count as f64))
            .collect();

        let mut offset = [0.0f64; 3];
        let mut rgb_sum = [0.0f64; 3];
        for (channels, rgb, count) in &converted {
            for c in 0..3 {
                offset[c] += count * (channels[c] - pivot[c]);
                rgb_sum[c] += count * rgb[c] as f64;
            }
        }
        let channels = [
            pivot[0] + offset[0] / n,
            pivot[1] + offset[1] / n,
            pivot[2] + offset[2] / n,
        ];

        let squared: f64 = converted
            .iter()
            .map(|(c, _, count)| {
                let d = self.converter.distance(c, &channels);
                count * d * d
            })
            .sum();

        Some(RegionColor {
            channels,
            mean_rgb: [
                (rgb_sum[0] / n).round() as u8,
                (rgb_sum[1] / n).round() as u8,
                (rgb_sum[2] / n).round() as u8,
            ],
            pixel_count: total,
            spread: (squared / n).sqrt(),
        })
    }
}
