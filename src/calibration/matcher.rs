//! Calibration matching by two-point inverse-distance weighting
//!
//! Given one representative pad color and a parameter's reference table:
//! 1. Measure the distance to every reference color
//! 2. Take the nearest (d1, v1) and second-nearest (d2, v2) points
//! 3. Interpolate `v1 * d2 / (d1 + d2) + v2 * d1 / (d1 + d2)`
//! 4. Score confidence as `100 - k * d1`, clamped to 0-100
//!
//! This is not a table-wide interpolation: only the two nearest references
//! contribute, so the estimate slides between neighbouring readings.

use serde::{Deserialize, Serialize};

use crate::calibration::table::{ReferencePoint, ReferenceTable};
use crate::color::{Channels, ColorConverter, ColorSpace};
use crate::constants::matching;
use crate::Result;

/// Outcome of matching one color against one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Interpolated physical value
    pub value: f64,
    /// Match confidence, 0-100
    pub confidence: f64,
    /// Distance to the nearest reference color
    pub nearest_distance: f64,
    /// Label of the nearest reference point
    pub label: Option<String>,
}

/// Matcher converting colors to physical values
#[derive(Debug, Clone, Copy)]
pub struct CalibrationMatcher {
    converter: ColorConverter,
    confidence_scale: f64,
}

impl Default for CalibrationMatcher {
    fn default() -> Self {
        Self::new(ColorSpace::default())
    }
}

impl CalibrationMatcher {
    /// Create a matcher with the default confidence scale for `space`
    pub fn new(space: ColorSpace) -> Self {
        Self::with_scale(space, space.default_confidence_scale())
    }

    /// Create a matcher with a custom confidence scale
    ///
    /// # Arguments
    ///
    /// * `space` - Matching space of the colors and tables
    /// * `confidence_scale` - Confidence lost per unit distance to the nearest reference
    pub fn with_scale(space: ColorSpace, confidence_scale: f64) -> Self {
        Self {
            converter: ColorConverter::new(space),
            confidence_scale,
        }
    }

    pub fn confidence_scale(&self) -> f64 {
        self.confidence_scale
    }

    /// Confidence for a given distance to the nearest reference
    pub fn confidence_for(&self, distance: f64) -> f64 {
        (matching::MAX_CONFIDENCE - self.confidence_scale * distance)
            .clamp(0.0, matching::MAX_CONFIDENCE)
    }

    /// Estimate the physical value indicated by `color`
    ///
    /// # Arguments
    ///
    /// * `color` - Representative color in the matching space
    /// * `table` - The parameter's reference table in the same space
    ///
    /// # Returns
    ///
    /// `MatchResult` with the interpolated value and confidence
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the table is empty or malformed
    pub fn estimate(&self, color: &Channels, table: &ReferenceTable) -> Result<MatchResult> {
        table.check()?;

        let mut ranked: Vec<(f64, &ReferencePoint)> = table
            .points
            .iter()
            .map(|p| (self.converter.distance(color, &p.channels), p))
            .collect();
        // Stable: equidistant points keep table order
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (d1, nearest) = ranked[0];
        let value = match ranked.get(1) {
            Some(&(d2, second)) if d1 + d2 > 0.0 => {
                let total = d1 + d2;
                nearest.value * (d2 / total) + second.value * (d1 / total)
            }
            _ => nearest.value,
        };

        Ok(MatchResult {
            value,
            confidence: self.confidence_for(d1),
            nearest_distance: d1,
            label: nearest.label.clone(),
        })
    }
}
