//! Analysis output records
//!
//! The report serializes to a flat JSON object with one entry per parameter
//! plus diagnostics:
//!
//! ```json
//! { "ph": {"value": 7.0, "confidence": 100.0, "source": "measured", ...},
//!   ...,
//!   "overallConfidence": 90.0, "regionsDetected": 6, "imageSize": [600, 100], ... }
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{rgb_to_hex, ColorSpace};
use crate::detection::BoundingBox;
use crate::parameter::Parameter;
use crate::quality::LightingAssessment;
use crate::standards::{ParameterStatus, WaterAssessment};
use crate::{AnalysisError, Result};

/// Where an estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EstimateSource {
    /// Matched against the calibration table
    Measured,
    /// Taken from the water-source fallback profile
    Fallback,
}

/// Estimate for one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEstimate {
    pub value: f64,
    /// 0-100; always 0 for fallback estimates
    pub confidence: f64,
    pub source: EstimateSource,
    /// Reading of the nearest calibration point, measured estimates only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub status: ParameterStatus,
}

impl ParameterEstimate {
    pub fn is_measured(&self) -> bool {
        self.source == EstimateSource::Measured
    }
}

/// One estimate per parameter; a report cannot be built without all six
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterReadings {
    pub ph: ParameterEstimate,
    pub chlorine: ParameterEstimate,
    pub nitrates: ParameterEstimate,
    pub hardness: ParameterEstimate,
    pub alkalinity: ParameterEstimate,
    pub bacteria: ParameterEstimate,
}

impl ParameterReadings {
    /// Assemble from estimates in pad order
    pub fn from_pad_order(estimates: [ParameterEstimate; 6]) -> Self {
        let [ph, chlorine, nitrates, hardness, alkalinity, bacteria] = estimates;
        Self {
            ph,
            chlorine,
            nitrates,
            hardness,
            alkalinity,
            bacteria,
        }
    }

    pub fn get(&self, parameter: Parameter) -> &ParameterEstimate {
        match parameter {
            Parameter::Ph => &self.ph,
            Parameter::Chlorine => &self.chlorine,
            Parameter::Nitrates => &self.nitrates,
            Parameter::Hardness => &self.hardness,
            Parameter::Alkalinity => &self.alkalinity,
            Parameter::Bacteria => &self.bacteria,
        }
    }

    /// Estimates in pad order
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, &ParameterEstimate)> {
        Parameter::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// Mean RGB over all colorized regions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorChannels {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ColorChannels {
    /// Neutral mid-gray reported when no region was colorized
    pub const NEUTRAL: ColorChannels = ColorChannels {
        red: 128.0,
        green: 128.0,
        blue: 128.0,
    };

    pub fn mean_of(colors: &[[u8; 3]]) -> Self {
        if colors.is_empty() {
            return Self::NEUTRAL;
        }
        let n = colors.len() as f64;
        let sum = |c: usize| colors.iter().map(|rgb| rgb[c] as f64).sum::<f64>() / n;
        Self {
            red: sum(0),
            green: sum(1),
            blue: sum(2),
        }
    }
}

/// Diagnostic summary of one extracted region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub index: usize,
    /// Parameter the pad position maps to
    pub parameter: Option<Parameter>,
    pub bounds: BoundingBox,
    pub area: u64,
    pub mean_rgb: [u8; 3],
    pub hex: String,
}

impl RegionSummary {
    pub fn new(index: usize, bounds: BoundingBox, area: u64, mean_rgb: [u8; 3]) -> Self {
        Self {
            index,
            parameter: Parameter::from_pad_index(index),
            bounds,
            area,
            mean_rgb,
            hex: rgb_to_hex(mean_rgb),
        }
    }
}

/// Complete result of one strip analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub readings: ParameterReadings,
    pub overall_confidence: f64,
    pub regions_detected: usize,
    /// `[height, width]` in pixels
    pub image_size: [u32; 2],
    pub color_channels: ColorChannels,
    /// Extractor whose regions were used
    pub strategy: String,
    pub color_space: ColorSpace,
    /// Fallback profile the source label resolved to
    pub water_source: String,
    pub lighting: LightingAssessment,
    pub assessment: WaterAssessment,
    pub regions: Vec<RegionSummary>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn estimate(&self, parameter: Parameter) -> &ParameterEstimate {
        self.readings.get(parameter)
    }

    /// Number of parameters measured rather than filled from fallbacks
    pub fn measured_count(&self) -> usize {
        self.readings.iter().filter(|(_, e)| e.is_measured()).count()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::ProcessingError(format!("Report serialization failed: {e}")))
    }
}
