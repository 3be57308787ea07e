//! Configuration structures for the strip analysis pipeline.
//!
//! This module defines all tunable parameters for strip analysis,
//! organized into logical groups for preprocessing, extraction, matching
//! and quality scoring, together with the calibration and fallback data.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use strip_colorscan::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), strip_colorscan::AnalysisError>(())
//! ```
//!
//! Every section may be omitted from the JSON file; missing sections and
//! fields take their default values.
//!
//! # Configuration Sections
//!
//! - [`PreprocessingConfig`]: optional white balance
//! - [`ExtractionConfig`]: region extraction strategy and thresholds
//! - [`MatchingConfig`]: color space, confidence scale, error policy
//! - [`QualityConfig`]: overall confidence heuristic
//! - [`CalibrationProfile`]: reference color tables
//! - [`FallbackProfiles`]: water-source default readings
//! - [`WaterStandards`]: safe and critical ranges

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calibration::CalibrationProfile;
use crate::color::ColorSpace;
use crate::constants::{extraction, quality};
use crate::detection::{ExtractionStrategy, PartitionAxis};
use crate::fallback::FallbackProfiles;
use crate::standards::WaterStandards;
use crate::{AnalysisError, Result};

/// Complete pipeline configuration for strip analysis.
///
/// Contains all parameters needed to process an image from input to report.
/// Can be serialized to/from JSON for reproducible runs. The default value
/// reproduces the reference behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Preprocessing configuration
    pub preprocessing: PreprocessingConfig,

    /// Region extraction configuration
    pub extraction: ExtractionConfig,

    /// Calibration matching configuration
    pub matching: MatchingConfig,

    /// Overall confidence scoring
    pub quality: QualityConfig,

    /// Reference color tables
    pub calibration: CalibrationProfile,

    /// Water-source fallback readings
    pub fallbacks: FallbackProfiles,

    /// Drinking-water standards used for the assessment
    pub standards: WaterStandards,
}

/// Preprocessing applied before extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Apply gray-world white balance
    pub white_balance: bool,
}

/// Region extraction parameters.
///
/// Controls which extractor runs and how the contour extractor separates
/// colored pads from the white strip body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Extraction strategy
    pub strategy: ExtractionStrategy,

    /// HSV saturation (0-1) at or below which a bright pixel is background
    pub white_max_saturation: f64,

    /// HSV value (0-1) at or above which a low-saturation pixel is background
    pub white_min_value: f64,

    /// Minimum pad area as fraction of the image (0.0-1.0)
    pub min_pad_area_ratio: f64,

    /// Under `auto`, contour results with fewer regions fall back to partition
    pub min_contour_regions: usize,

    /// Band direction for fixed partition
    pub axis: PartitionAxis,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::Auto,
            white_max_saturation: extraction::WHITE_MAX_SATURATION,
            white_min_value: extraction::WHITE_MIN_VALUE,
            min_pad_area_ratio: extraction::MIN_PAD_AREA_RATIO,
            min_contour_regions: extraction::MIN_CONTOUR_REGIONS,
            axis: PartitionAxis::Auto,
        }
    }
}

/// Calibration matching parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Color space for averaging and matching
    pub color_space: ColorSpace,

    /// Confidence lost per unit distance; the color space's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_scale: Option<f64>,

    /// Matches at or below this confidence are replaced by fallback values
    pub min_match_confidence: f64,

    /// Abort the analysis on a calibration error instead of falling back
    pub strict_calibration: bool,
}

impl MatchingConfig {
    /// Confidence scale in effect
    pub fn effective_confidence_scale(&self) -> f64 {
        self.confidence_scale
            .unwrap_or_else(|| self.color_space.default_confidence_scale())
    }
}

/// Overall confidence heuristic.
///
/// Starting from a base score, bonuses are added for pad count, resolution
/// and contrast, then the total is capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub base_confidence: f64,
    /// Bonus when all six pads were found
    pub full_strip_bonus: f64,
    /// Bonus when at least `partial_strip_regions` pads were found
    pub partial_strip_bonus: f64,
    pub partial_strip_regions: usize,
    /// Pixel count above which the resolution bonus applies
    pub high_resolution_pixels: u64,
    pub high_resolution_bonus: f64,
    /// Luma variance above which the contrast bonus applies
    pub contrast_variance_threshold: f64,
    pub contrast_bonus: f64,
    pub max_confidence: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            base_confidence: quality::BASE_CONFIDENCE,
            full_strip_bonus: quality::FULL_STRIP_BONUS,
            partial_strip_bonus: quality::PARTIAL_STRIP_BONUS,
            partial_strip_regions: quality::PARTIAL_STRIP_REGIONS,
            high_resolution_pixels: quality::HIGH_RESOLUTION_PIXELS,
            high_resolution_bonus: quality::HIGH_RESOLUTION_BONUS,
            contrast_variance_threshold: quality::CONTRAST_VARIANCE_THRESHOLD,
            contrast_bonus: quality::CONTRAST_BONUS,
            max_confidence: quality::MAX_CONFIDENCE,
        }
    }
}

impl PipelineConfig {
    /// Check settings that would make every analysis meaningless.
    ///
    /// Calibration tables are not checked here: an unusable table only
    /// affects its own parameter and is handled per analysis.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` naming the offending setting
    pub fn validate(&self) -> Result<()> {
        let e = &self.extraction;
        for (name, value) in [
            ("white_max_saturation", e.white_max_saturation),
            ("white_min_value", e.white_min_value),
            ("min_pad_area_ratio", e.min_pad_area_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::configuration(
                    None,
                    format!("extraction.{name} must be within 0-1, got {value}"),
                ));
            }
        }

        let scale = self.matching.effective_confidence_scale();
        if !scale.is_finite() || scale < 0.0 {
            return Err(AnalysisError::configuration(
                None,
                format!("matching.confidence_scale must be a non-negative number, got {scale}"),
            ));
        }

        if !self.fallbacks.profiles.contains_key(&self.fallbacks.default_profile) {
            return Err(AnalysisError::configuration(
                None,
                format!(
                    "default fallback profile '{}' is not defined",
                    self.fallbacks.default_profile
                ),
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the file cannot be read or parsed
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::configuration(None, format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AnalysisError::configuration(None, format!("invalid configuration: {e}")))
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::ProcessingError(format!("Config serialization failed: {e}")))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::configuration(None, format!("cannot write {}: {e}", path.display()))
        })
    }
}
