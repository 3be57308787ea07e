//! Fixed-partition region extraction
//!
//! Splits the image into six equal bands in pad order. Always yields exactly
//! six regions, so it doubles as the fallback when contour extraction finds
//! nothing usable.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::constants::strip::EXPECTED_PADS;
use crate::detection::region::{BoundingBox, Region};
use crate::detection::RegionExtractor;
use crate::{AnalysisError, Result};

/// Direction along which the strip is cut into bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartitionAxis {
    /// Rows when the image is at least as tall as it is wide, otherwise columns
    #[default]
    Auto,
    /// Horizontal bands stacked top to bottom
    Rows,
    /// Vertical bands left to right
    Columns,
}

impl PartitionAxis {
    /// Concrete axis for an image of the given size
    pub fn resolve(self, width: u32, height: u32) -> PartitionAxis {
        match self {
            PartitionAxis::Auto if height >= width => PartitionAxis::Rows,
            PartitionAxis::Auto => PartitionAxis::Columns,
            other => other,
        }
    }
}

/// Extractor cutting the image into equal bands
#[derive(Debug, Clone, Copy)]
pub struct FixedPartitionExtractor {
    axis: PartitionAxis,
    bands: usize,
}

impl Default for FixedPartitionExtractor {
    fn default() -> Self {
        Self::new(PartitionAxis::Auto)
    }
}

impl FixedPartitionExtractor {
    pub fn new(axis: PartitionAxis) -> Self {
        Self {
            axis,
            bands: EXPECTED_PADS,
        }
    }

    /// Band rectangles for a `width` x `height` image.
    ///
    /// Each band spans floor(len / 6) pixels; the last band absorbs the
    /// remainder so the bands tile the image without gaps or overlaps.
    pub fn band_bounds(&self, width: u32, height: u32) -> Vec<BoundingBox> {
        let axis = self.axis.resolve(width, height);
        let length = match axis {
            PartitionAxis::Columns => width,
            _ => height,
        };
        let bands = self.bands as u32;
        let step = length / bands;

        (0..bands)
            .map(|i| {
                let start = i * step;
                let end = if i + 1 == bands { length } else { start + step };
                match axis {
                    PartitionAxis::Columns => BoundingBox::new(start, 0, end - start, height),
                    _ => BoundingBox::new(0, start, width, end - start),
                }
            })
            .collect()
    }
}

impl RegionExtractor for FixedPartitionExtractor {
    fn name(&self) -> &'static str {
        "fixedPartition"
    }

    fn extract(&self, image: &RgbImage) -> Result<Vec<Region>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::ProcessingError(
                "Cannot partition an empty image".into(),
            ));
        }

        Ok(self
            .band_bounds(width, height)
            .into_iter()
            .enumerate()
            .map(|(i, bounds)| Region::from_rect(i, bounds))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_tile_image_without_gaps() {
        let extractor = FixedPartitionExtractor::new(PartitionAxis::Rows);
        for height in [6u32, 7, 60, 61, 65, 100, 599] {
            let bands = extractor.band_bounds(40, height);
            assert_eq!(bands.len(), 6);

            let mut next_y = 0;
            for (i, band) in bands.iter().enumerate() {
                assert_eq!(band.x, 0);
                assert_eq!(band.width, 40);
                assert_eq!(band.y, next_y, "gap or overlap before band {i}");
                if i < 5 {
                    assert_eq!(band.height, height / 6);
                } else {
                    assert_eq!(band.height, height / 6 + height % 6);
                }
                next_y += band.height;
            }
            assert_eq!(next_y, height);
        }
    }

    #[test]
    fn test_columns_tile_image() {
        let extractor = FixedPartitionExtractor::new(PartitionAxis::Columns);
        let bands = extractor.band_bounds(125, 10);
        assert_eq!(bands.len(), 6);
        assert_eq!(bands[0], BoundingBox::new(0, 0, 20, 10));
        assert_eq!(bands[5], BoundingBox::new(100, 0, 25, 10));
    }

    #[test]
    fn test_auto_axis_follows_orientation() {
        assert_eq!(PartitionAxis::Auto.resolve(10, 60), PartitionAxis::Rows);
        assert_eq!(PartitionAxis::Auto.resolve(60, 60), PartitionAxis::Rows);
        assert_eq!(PartitionAxis::Auto.resolve(60, 10), PartitionAxis::Columns);
        assert_eq!(PartitionAxis::Columns.resolve(10, 60), PartitionAxis::Columns);
    }

    #[test]
    fn test_extract_always_six_regions() {
        let image = RgbImage::new(3, 2);
        let regions = FixedPartitionExtractor::default().extract(&image).unwrap();
        assert_eq!(regions.len(), 6);
        for (i, r) in regions.iter().enumerate() {
            assert_eq!(r.index, i);
        }
        // Fewer than six pixels along the axis: all but the last band are empty
        let total: u64 = regions.iter().map(|r| r.area).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_empty_image_is_an_error() {
        let image = RgbImage::new(0, 0);
        assert!(FixedPartitionExtractor::default().extract(&image).is_err());
    }
}
