//! Drinking-water standards and overall water assessment
//!
//! Each parameter has a safe range and a wider critical range. Estimates
//! are graded against them and summarized into a score out of 100:
//! - 15 points are deducted per parameter outside its safe range
//! - any parameter outside its critical range makes the water unsafe
//!
//! Like the quality score, this is a screening heuristic and not a
//! substitute for laboratory analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::assessment;
use crate::parameter::Parameter;

/// Safe and critical ranges for one parameter, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterStandard {
    pub safe: [f64; 2],
    pub critical: [f64; 2],
}

impl WaterStandard {
    pub const fn new(safe: [f64; 2], critical: [f64; 2]) -> Self {
        Self { safe, critical }
    }

    /// Grade a value against this standard
    pub fn status(&self, value: f64) -> ParameterStatus {
        let within = |range: [f64; 2]| value >= range[0] && value <= range[1];
        if within(self.safe) {
            ParameterStatus::Safe
        } else if within(self.critical) {
            ParameterStatus::OutOfRange
        } else {
            ParameterStatus::Critical
        }
    }
}

/// Grade of one estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStatus {
    Safe,
    OutOfRange,
    Critical,
}

/// Standards for every parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaterStandards {
    pub ranges: BTreeMap<Parameter, WaterStandard>,
}

impl Default for WaterStandards {
    fn default() -> Self {
        let ranges = [
            (Parameter::Ph, WaterStandard::new([6.5, 8.5], [5.0, 9.5])),
            (Parameter::Chlorine, WaterStandard::new([0.2, 2.0], [0.0, 5.0])),
            (Parameter::Nitrates, WaterStandard::new([0.0, 10.0], [0.0, 50.0])),
            (Parameter::Hardness, WaterStandard::new([60.0, 120.0], [0.0, 400.0])),
            (Parameter::Alkalinity, WaterStandard::new([80.0, 120.0], [0.0, 300.0])),
            (Parameter::Bacteria, WaterStandard::new([0.0, 0.0], [0.0, 1.0])),
        ];
        Self {
            ranges: ranges.into_iter().collect(),
        }
    }
}

/// Overall water quality grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Overall safety verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Safety {
    Safe,
    Caution,
    Unsafe,
}

/// Summary of all estimates against the standards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterAssessment {
    pub quality: WaterQuality,
    pub safety: Safety,
    pub score: f64,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}

impl WaterStandards {
    /// Status of one value; parameters without a standard are always safe
    pub fn status(&self, parameter: Parameter, value: f64) -> ParameterStatus {
        self.ranges
            .get(&parameter)
            .map_or(ParameterStatus::Safe, |s| s.status(value))
    }

    /// Assess a full set of readings
    pub fn assess<I>(&self, readings: I) -> WaterAssessment
    where
        I: IntoIterator<Item = (Parameter, f64)>,
    {
        let mut score = 100.0;
        let mut critical = 0usize;
        let mut alerts = Vec::new();
        let mut recommendations = Vec::new();

        for (parameter, value) in readings {
            match self.status(parameter, value) {
                ParameterStatus::Safe => {}
                ParameterStatus::OutOfRange => {
                    score -= assessment::OUT_OF_RANGE_PENALTY;
                    alerts.push(format!(
                        "{parameter} outside optimal range: {}",
                        parameter.format_value(value)
                    ));
                    recommendations.push(format!("Monitor {parameter} levels closely"));
                }
                ParameterStatus::Critical => {
                    score -= assessment::OUT_OF_RANGE_PENALTY;
                    critical += 1;
                    alerts.push(format!("Critical {parameter} level: {}", parameter.format_value(value)));
                    recommendations.push(format!("Immediate action required for {parameter}"));
                }
            }
        }

        let (quality, safety) = if critical > 0 {
            (WaterQuality::Poor, Safety::Unsafe)
        } else if score >= assessment::EXCELLENT_MIN {
            (WaterQuality::Excellent, Safety::Safe)
        } else if score >= assessment::GOOD_MIN {
            (WaterQuality::Good, Safety::Safe)
        } else if score >= assessment::FAIR_MIN {
            (WaterQuality::Fair, Safety::Caution)
        } else {
            (WaterQuality::Poor, Safety::Unsafe)
        };

        WaterAssessment {
            quality,
            safety,
            score,
            alerts,
            recommendations,
        }
    }
}
