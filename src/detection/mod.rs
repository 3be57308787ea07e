//! Pad region extraction module
//!
//! This module locates the six measurement pads of a test strip, either by
//! separating colored pads from the white strip body or by cutting the image
//! into fixed bands.

pub mod pads;
pub mod partition;
pub mod region;

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::constants::extraction;
use crate::Result;

pub use pads::ContourExtractor;
pub use partition::{FixedPartitionExtractor, PartitionAxis};
pub use region::{BoundingBox, PixelSet, Region};

/// A strategy for turning a strip photo into ordered pad regions
pub trait RegionExtractor: Send + Sync {
    /// Short name reported in analysis output
    fn name(&self) -> &'static str;

    /// Extract candidate regions, ordered along the strip
    fn extract(&self, image: &RgbImage) -> Result<Vec<Region>>;
}

/// Which extractor to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionStrategy {
    /// Contour extraction, falling back to fixed partition when it finds too little
    #[default]
    Auto,
    /// Contour extraction only
    Contour,
    /// Fixed partition only
    FixedPartition,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Auto => f.write_str("auto"),
            ExtractionStrategy::Contour => f.write_str("contour"),
            ExtractionStrategy::FixedPartition => f.write_str("fixedPartition"),
        }
    }
}

/// Regions found in an image together with the extractor that produced them
#[derive(Debug, Clone)]
pub struct Extraction {
    pub regions: Vec<Region>,
    /// Name of the extractor whose regions were kept
    pub strategy: &'static str,
}

/// Strategy selector combining both extractors
#[derive(Debug, Clone)]
pub struct RegionDetector {
    strategy: ExtractionStrategy,
    contour: ContourExtractor,
    partition: FixedPartitionExtractor,
    min_contour_regions: usize,
}

impl Default for RegionDetector {
    fn default() -> Self {
        Self::new(ExtractionStrategy::Auto)
    }
}

impl RegionDetector {
    /// Create a detector with default extractor settings
    pub fn new(strategy: ExtractionStrategy) -> Self {
        Self::with_extractors(
            strategy,
            ContourExtractor::new(),
            FixedPartitionExtractor::default(),
            extraction::MIN_CONTOUR_REGIONS,
        )
    }

    /// Create a detector from configured extractors
    ///
    /// # Arguments
    ///
    /// * `strategy` - Which extractor(s) to run
    /// * `contour` - Contour extractor settings
    /// * `partition` - Fixed partition settings
    /// * `min_contour_regions` - Under `Auto`, contour results with fewer regions are discarded
    pub fn with_extractors(
        strategy: ExtractionStrategy,
        contour: ContourExtractor,
        partition: FixedPartitionExtractor,
        min_contour_regions: usize,
    ) -> Self {
        Self {
            strategy,
            contour,
            partition,
            min_contour_regions,
        }
    }

    pub fn strategy(&self) -> ExtractionStrategy {
        self.strategy
    }

    /// Run the configured strategy on an image
    ///
    /// # Errors
    ///
    /// Propagates extractor failures (e.g. an empty image under fixed partition)
    pub fn detect(&self, image: &RgbImage) -> Result<Extraction> {
        match self.strategy {
            ExtractionStrategy::Contour => run(&self.contour, image),
            ExtractionStrategy::FixedPartition => run(&self.partition, image),
            ExtractionStrategy::Auto => {
                let found = run(&self.contour, image)?;
                if found.regions.len() >= self.min_contour_regions.max(1) {
                    return Ok(found);
                }
                warn!(
                    found = found.regions.len(),
                    required = self.min_contour_regions,
                    "contour extraction found too few pads, using fixed partition"
                );
                run(&self.partition, image)
            }
        }
    }
}

fn run(extractor: &dyn RegionExtractor, image: &RgbImage) -> Result<Extraction> {
    let regions = extractor.extract(image)?;
    debug!(strategy = extractor.name(), regions = regions.len(), "regions extracted");
    Ok(Extraction {
        regions,
        strategy: extractor.name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    #[test]
    fn test_auto_falls_back_on_blank_image() {
        let extraction = RegionDetector::default().detect(&white(20, 60)).unwrap();
        assert_eq!(extraction.strategy, "fixedPartition");
        assert_eq!(extraction.regions.len(), 6);
    }

    #[test]
    fn test_auto_keeps_contour_result() {
        let mut image = white(20, 60);
        for y in 10..20 {
            for x in 5..15 {
                image.put_pixel(x, y, Rgb([200, 0, 0]));
            }
        }
        let extraction = RegionDetector::default().detect(&image).unwrap();
        assert_eq!(extraction.strategy, "contour");
        assert_eq!(extraction.regions.len(), 1);
    }

    #[test]
    fn test_contour_only_may_return_nothing() {
        let detector = RegionDetector::new(ExtractionStrategy::Contour);
        let extraction = detector.detect(&white(20, 60)).unwrap();
        assert_eq!(extraction.strategy, "contour");
        assert!(extraction.regions.is_empty());
    }

    #[test]
    fn test_min_contour_regions_threshold() {
        let mut image = white(20, 60);
        image.put_pixel(10, 10, Rgb([0, 0, 200]));
        let detector = RegionDetector::with_extractors(
            ExtractionStrategy::Auto,
            ContourExtractor::new(),
            FixedPartitionExtractor::default(),
            6,
        );
        assert_eq!(detector.detect(&image).unwrap().strategy, "fixedPartition");
    }

    #[test]
    fn test_strategy_serialization() {
        let json = serde_json::to_string(&ExtractionStrategy::FixedPartition).unwrap();
        assert_eq!(json, "\"fixedPartition\"");
        let parsed: ExtractionStrategy = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, ExtractionStrategy::Auto);
    }
}
