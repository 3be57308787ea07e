//! Strip analysis orchestration
//!
//! [`StripAnalyzer`] runs the full pipeline on one image:
//! 1. Optional gray-world white balance
//! 2. Region extraction (contour, fixed partition or automatic fallback)
//! 3. One representative color per region
//! 4. Calibration matching per parameter, in pad order
//! 5. Fallback values for parameters without a credible measurement
//! 6. Quality, lighting and water-standard summaries
//!
//! The analyzer is immutable after construction. Calibration tables are
//! projected into the matching space once and shared by every call, so one
//! analyzer can serve many threads at once.

use image::RgbImage;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::calibration::{CalibrationMatcher, ReferenceTable, WhiteBalanceEstimator};
use crate::color::{ColorAnalyzer, RegionColor};
use crate::config::PipelineConfig;
use crate::constants::strip::EXPECTED_PADS;
use crate::detection::{ContourExtractor, FixedPartitionExtractor, RegionDetector};
use crate::image_loader::load_image;
use crate::parameter::Parameter;
use crate::quality::{ImageStatistics, LightingAssessment, QualityScorer};
use crate::report::{
    AnalysisReport, ColorChannels, EstimateSource, ParameterEstimate, ParameterReadings,
    RegionSummary,
};
use crate::{AnalysisError, Result};

/// Six-pad strip analyzer
#[derive(Debug, Clone)]
pub struct StripAnalyzer {
    config: PipelineConfig,
    detector: RegionDetector,
    colorizer: ColorAnalyzer,
    matcher: CalibrationMatcher,
    scorer: QualityScorer,
    /// Calibration tables in the matching space, in pad order
    references: Vec<ReferenceTable>,
}

impl StripAnalyzer {
    /// Build an analyzer from a configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid. Unusable
    /// calibration tables are not rejected here; they surface per analysis.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let space = config.matching.color_space;
        let e = &config.extraction;
        let detector = RegionDetector::with_extractors(
            e.strategy,
            ContourExtractor::with_params(e.white_max_saturation, e.white_min_value, e.min_pad_area_ratio),
            FixedPartitionExtractor::new(e.axis),
            e.min_contour_regions,
        );
        let colorizer = ColorAnalyzer::new(space);
        let matcher =
            CalibrationMatcher::with_scale(space, config.matching.effective_confidence_scale());
        let references = config.calibration.project(colorizer.converter());

        debug!(
            profile = %config.calibration.name,
            color_space = %space,
            strategy = %e.strategy,
            "strip analyzer ready"
        );

        Ok(Self {
            scorer: QualityScorer::new(config.quality.clone()),
            detector,
            colorizer,
            matcher,
            references,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load an image file and analyze it
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the strip photograph
    /// * `source` - Free-text water source label, used only for fallback values
    ///
    /// # Errors
    ///
    /// Returns `ImageLoadError` if the image cannot be loaded, otherwise as
    /// [`StripAnalyzer::analyze_image`]
    pub fn analyze_path(&self, path: &Path, source: Option<&str>) -> Result<AnalysisReport> {
        let image = load_image(path)?;
        self.analyze_image(&image, source)
    }

    /// Analyze a decoded strip image
    ///
    /// Every parameter is present in the returned report, measured or filled
    /// from the fallback profile of `source`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if:
    /// - The image has no pixels
    /// - A calibration table is unusable and `strict_calibration` is set
    pub fn analyze_image(&self, image: &RgbImage, source: Option<&str>) -> Result<AnalysisReport> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::ProcessingError("Image has no pixels".into()));
        }

        let image: Cow<'_, RgbImage> = if self.config.preprocessing.white_balance {
            Cow::Owned(WhiteBalanceEstimator::new().balance(image))
        } else {
            Cow::Borrowed(image)
        };

        let stats = ImageStatistics::compute(&image);
        let extraction = self.detector.detect(&image)?;
        let regions = &extraction.regions;
        let mut warnings = Vec::new();

        if regions.len() < EXPECTED_PADS {
            warn!(
                regions = regions.len(),
                expected = EXPECTED_PADS,
                "degraded region count"
            );
            warnings.push(format!(
                "Only {} of {} pads detected; missing parameters use fallback values",
                regions.len(),
                EXPECTED_PADS
            ));
        }

        let mut colors: Vec<Option<RegionColor>> = vec![None; EXPECTED_PADS];
        let mut summaries = Vec::with_capacity(regions.len());
        for region in regions.iter().take(EXPECTED_PADS) {
            match self.colorizer.extract_color(&image, region) {
                Ok(color) => {
                    summaries.push(RegionSummary::new(
                        region.index,
                        region.bounds,
                        region.area,
                        color.mean_rgb,
                    ));
                    if let Some(slot) = colors.get_mut(region.index) {
                        *slot = Some(color);
                    }
                }
                Err(e) => {
                    warn!(region = region.index, error = %e, "region skipped");
                    warnings.push(e.to_string());
                }
            }
        }

        let mut estimates = Vec::with_capacity(EXPECTED_PADS);
        for parameter in Parameter::ALL {
            let color = colors[parameter.pad_index()].as_ref();
            estimates.push(self.estimate_parameter(parameter, color, source, &mut warnings)?);
        }
        let estimates: [ParameterEstimate; 6] = estimates
            .try_into()
            .map_err(|_| AnalysisError::ProcessingError("Incomplete parameter set".into()))?;
        let readings = ParameterReadings::from_pad_order(estimates);

        let mean_colors: Vec<[u8; 3]> = colors.iter().flatten().map(|c| c.mean_rgb).collect();
        let overall_confidence = self.scorer.score(regions.len(), &stats);
        let assessment = self
            .config
            .standards
            .assess(readings.iter().map(|(p, e)| (p, e.value)));

        info!(
            regions = regions.len(),
            strategy = extraction.strategy,
            overall_confidence,
            quality = ?assessment.quality,
            "strip analysis complete"
        );

        Ok(AnalysisReport {
            readings,
            overall_confidence,
            regions_detected: regions.len(),
            image_size: [height, width],
            color_channels: ColorChannels::mean_of(&mean_colors),
            strategy: extraction.strategy.to_string(),
            color_space: self.config.matching.color_space,
            water_source: self.config.fallbacks.resolve_name(source).to_string(),
            lighting: LightingAssessment::assess(&stats),
            assessment,
            regions: summaries,
            warnings,
        })
    }

    /// Estimate one parameter from its pad color, or fall back
    fn estimate_parameter(
        &self,
        parameter: Parameter,
        color: Option<&RegionColor>,
        source: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> Result<ParameterEstimate> {
        let table = &self.references[parameter.pad_index()];
        if let Err(e) = table.check() {
            if self.config.matching.strict_calibration {
                return Err(e);
            }
            warn!(%parameter, error = %e, "calibration table unusable, using fallback");
            warnings.push(e.to_string());
            return Ok(self.fallback(parameter, source));
        }

        let Some(color) = color else {
            debug!(%parameter, "no pad region, using fallback");
            return Ok(self.fallback(parameter, source));
        };

        match self.matcher.estimate(&color.channels, table)? {
            m if m.confidence > self.config.matching.min_match_confidence => {
                debug!(%parameter, value = m.value, confidence = m.confidence, "pad matched");
                Ok(ParameterEstimate {
                    value: m.value,
                    confidence: m.confidence,
                    source: EstimateSource::Measured,
                    label: m.label,
                    status: self.config.standards.status(parameter, m.value),
                })
            }
            m => {
                warn!(%parameter, distance = m.nearest_distance, "pad color matches no reference");
                warnings.push(format!(
                    "{parameter} pad color is {:.1} from the nearest reference; using fallback value",
                    m.nearest_distance
                ));
                Ok(self.fallback(parameter, source))
            }
        }
    }

    fn fallback(&self, parameter: Parameter, source: Option<&str>) -> ParameterEstimate {
        let value = self.config.fallbacks.value(source, parameter);
        ParameterEstimate {
            value,
            confidence: 0.0,
            source: EstimateSource::Fallback,
            label: None,
            status: self.config.standards.status(parameter, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationTable;
    use crate::color::ColorSpace;
    use crate::detection::ExtractionStrategy;
    use image::Rgb;

    fn analyzer() -> StripAnalyzer {
        StripAnalyzer::new(PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StripAnalyzer>();
    }

    #[test]
    fn test_empty_image_rejected() {
        let err = analyzer().analyze_image(&RgbImage::new(0, 0), None).unwrap_err();
        assert!(matches!(err, AnalysisError::ProcessingError(_)));
    }

    #[test]
    fn test_single_pad_degrades_to_fallbacks() {
        let mut image = RgbImage::from_pixel(20, 120, Rgb([255, 255, 255]));
        for y in 5..15 {
            for x in 5..15 {
                image.put_pixel(x, y, Rgb([255, 255, 0]));
            }
        }

        let report = analyzer().analyze_image(&image, Some("Well Water")).unwrap();
        assert_eq!(report.regions_detected, 1);
        assert_eq!(report.strategy, "contour");
        assert_eq!(report.readings.ph.value, 7.0);
        assert_eq!(report.readings.ph.confidence, 100.0);
        assert_eq!(report.readings.ph.label.as_deref(), Some("Neutral"));

        // Remaining parameters come from the well water profile
        assert_eq!(report.readings.chlorine.value, 0.0);
        assert_eq!(report.readings.nitrates.value, 15.0);
        assert_eq!(report.readings.hardness.value, 180.0);
        assert_eq!(report.readings.hardness.source, EstimateSource::Fallback);
        assert_eq!(report.readings.hardness.confidence, 0.0);
        assert_eq!(report.water_source, "well_water");
        assert_eq!(report.measured_count(), 1);
        assert!(!report.warnings.is_empty());
        // 85, no strip bonus, small and low-contrast
        assert_eq!(report.overall_confidence, 85.0);
    }

    #[test]
    fn test_empty_table_non_strict_falls_back() {
        let mut config = PipelineConfig::default();
        config.extraction.strategy = ExtractionStrategy::FixedPartition;
        config.calibration.tables.insert(Parameter::Nitrates, CalibrationTable::default());
        let analyzer = StripAnalyzer::new(config).unwrap();

        let image = RgbImage::from_pixel(10, 60, Rgb([255, 255, 255]));
        let report = analyzer.analyze_image(&image, None).unwrap();
        assert_eq!(report.readings.nitrates.source, EstimateSource::Fallback);
        assert_eq!(report.readings.nitrates.value, 5.0);
        assert!(report.warnings.iter().any(|w| w.contains("nitrates")));
        // Other white pads still match their zero readings
        assert_eq!(report.readings.hardness.value, 0.0);
        assert_eq!(report.readings.hardness.confidence, 100.0);
    }

    #[test]
    fn test_missing_table_reported_without_pad() {
        let mut config = PipelineConfig::default();
        config.calibration.tables.remove(&Parameter::Bacteria);
        let analyzer = StripAnalyzer::new(config).unwrap();

        let mut image = RgbImage::from_pixel(20, 120, Rgb([255, 255, 255]));
        for y in 5..15 {
            for x in 5..15 {
                image.put_pixel(x, y, Rgb([255, 255, 0]));
            }
        }
        let report = analyzer.analyze_image(&image, None).unwrap();
        assert_eq!(report.regions_detected, 1);
        assert_eq!(report.readings.bacteria.source, EstimateSource::Fallback);
        assert!(report.warnings.iter().any(|w| w.contains("bacteria")));
        // Pads without a table problem fall back quietly
        assert!(!report.warnings.iter().any(|w| w.contains("hardness")));
    }

    #[test]
    fn test_empty_table_strict_aborts() {
        let mut config = PipelineConfig::default();
        config.matching.strict_calibration = true;
        config.calibration.tables.remove(&Parameter::Bacteria);
        let analyzer = StripAnalyzer::new(config).unwrap();

        let image = RgbImage::from_pixel(10, 60, Rgb([255, 255, 255]));
        match analyzer.analyze_image(&image, None) {
            Err(AnalysisError::ConfigurationError { parameter, .. }) => {
                assert_eq!(parameter, Some(Parameter::Bacteria));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_min_match_confidence_rejects_weak_matches() {
        let mut config = PipelineConfig::default();
        config.extraction.strategy = ExtractionStrategy::FixedPartition;
        config.matching.min_match_confidence = 100.0;
        let analyzer = StripAnalyzer::new(config).unwrap();

        let image = RgbImage::from_pixel(10, 60, Rgb([255, 255, 255]));
        let report = analyzer.analyze_image(&image, None).unwrap();
        assert_eq!(report.measured_count(), 0);
    }

    #[test]
    fn test_rgb_space_matches_exact_colors() {
        let mut config = PipelineConfig::default();
        config.extraction.strategy = ExtractionStrategy::FixedPartition;
        config.matching.color_space = ColorSpace::Rgb;
        let analyzer = StripAnalyzer::new(config).unwrap();

        let mut image = RgbImage::from_pixel(12, 60, Rgb([255, 255, 255]));
        for y in 0..10 {
            for x in 0..12 {
                image.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let report = analyzer.analyze_image(&image, None).unwrap();
        assert_eq!(report.color_space, ColorSpace::Rgb);
        assert_eq!(report.readings.ph.value, 8.0);
        assert_eq!(report.readings.ph.confidence, 100.0);
    }

    #[test]
    fn test_white_balance_preprocessing() {
        let mut config = PipelineConfig::default();
        config.preprocessing.white_balance = true;
        let analyzer = StripAnalyzer::new(config).unwrap();

        let image = RgbImage::from_pixel(10, 60, Rgb([250, 250, 250]));
        let report = analyzer.analyze_image(&image, None).unwrap();
        assert_eq!(report.strategy, "fixedPartition");
        assert_eq!(report.regions_detected, 6);
    }
}
