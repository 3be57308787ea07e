//! Calibration tables mapping reference pad colors to physical values
//!
//! Tables are authored in sRGB so that one profile serves both matching
//! spaces. An analyzer projects each table into its matching space once, at
//! construction, producing read-only [`ReferenceTable`]s that are shared by
//! every analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::color::{Channels, ColorConverter};
use crate::parameter::Parameter;
use crate::{AnalysisError, Result};

/// One reference color with its known physical value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoint {
    /// Reference pad color (sRGB, 0-255)
    pub rgb: [u8; 3],
    /// Physical value this color indicates
    pub value: f64,
    /// Human-readable reading, e.g. "Neutral"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CalibrationPoint {
    pub fn new(rgb: [u8; 3], value: f64, label: &str) -> Self {
        Self {
            rgb,
            value,
            label: Some(label.to_string()),
        }
    }
}

/// Ordered reference points for one parameter.
///
/// Order only matters for tie-breaking between equidistant points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    pub points: Vec<CalibrationPoint>,
}

impl CalibrationTable {
    pub fn new(points: Vec<CalibrationPoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// A named set of calibration tables, e.g. one test-strip brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    pub name: String,
    pub tables: BTreeMap<Parameter, CalibrationTable>,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::reference_strip()
    }
}

impl CalibrationProfile {
    /// The reference six-pad strip
    pub fn reference_strip() -> Self {
        let white = [255, 255, 255];
        let mut tables = BTreeMap::new();

        tables.insert(
            Parameter::Ph,
            CalibrationTable::new(vec![
                CalibrationPoint::new([220, 20, 60], 4.0, "Very Acidic"),
                CalibrationPoint::new([255, 69, 0], 5.0, "Acidic"),
                CalibrationPoint::new([255, 140, 0], 6.0, "Slightly Acidic"),
                CalibrationPoint::new([255, 215, 0], 6.5, "Mildly Acidic"),
                CalibrationPoint::new([255, 255, 0], 7.0, "Neutral"),
                CalibrationPoint::new([173, 255, 47], 7.5, "Slightly Alkaline"),
                CalibrationPoint::new([0, 255, 0], 8.0, "Alkaline"),
                CalibrationPoint::new([0, 191, 255], 8.5, "Very Alkaline"),
                CalibrationPoint::new([0, 100, 255], 9.0, "Extremely Alkaline"),
            ]),
        );
        tables.insert(
            Parameter::Chlorine,
            CalibrationTable::new(vec![
                CalibrationPoint::new(white, 0.0, "No Chlorine"),
                CalibrationPoint::new([255, 240, 245], 0.5, "Very Low"),
                CalibrationPoint::new([255, 182, 193], 1.0, "Low"),
                CalibrationPoint::new([255, 105, 180], 2.0, "Normal"),
                CalibrationPoint::new([255, 20, 147], 3.0, "High"),
                CalibrationPoint::new([220, 20, 60], 4.0, "Very High"),
            ]),
        );
        tables.insert(
            Parameter::Nitrates,
            CalibrationTable::new(vec![
                CalibrationPoint::new(white, 0.0, "None"),
                CalibrationPoint::new([255, 228, 225], 5.0, "Very Low"),
                CalibrationPoint::new([255, 192, 203], 10.0, "Safe"),
                CalibrationPoint::new([255, 105, 180], 25.0, "Elevated"),
                CalibrationPoint::new([255, 69, 0], 50.0, "High"),
                CalibrationPoint::new([178, 34, 34], 100.0, "Dangerous"),
            ]),
        );
        tables.insert(
            Parameter::Hardness,
            CalibrationTable::new(vec![
                CalibrationPoint::new(white, 0.0, "Very Soft"),
                CalibrationPoint::new([240, 255, 240], 50.0, "Soft"),
                CalibrationPoint::new([144, 238, 144], 100.0, "Moderately Soft"),
                CalibrationPoint::new([0, 255, 0], 150.0, "Moderately Hard"),
                CalibrationPoint::new([0, 128, 0], 200.0, "Hard"),
                CalibrationPoint::new([0, 100, 0], 300.0, "Very Hard"),
            ]),
        );
        tables.insert(
            Parameter::Alkalinity,
            CalibrationTable::new(vec![
                CalibrationPoint::new(white, 0.0, "Very Low"),
                CalibrationPoint::new([240, 255, 255], 40.0, "Low"),
                CalibrationPoint::new([175, 238, 238], 80.0, "Normal"),
                CalibrationPoint::new([0, 255, 255], 120.0, "Good"),
                CalibrationPoint::new([0, 206, 209], 160.0, "High"),
                CalibrationPoint::new([0, 139, 139], 240.0, "Very High"),
            ]),
        );
        tables.insert(
            Parameter::Bacteria,
            CalibrationTable::new(vec![
                CalibrationPoint::new(white, 0.0, "Safe"),
                CalibrationPoint::new([255, 255, 224], 0.5, "Possible"),
                CalibrationPoint::new([255, 215, 0], 1.0, "Contaminated"),
            ]),
        );

        Self {
            name: "reference".to_string(),
            tables,
        }
    }

    /// Table for one parameter, if the profile defines it
    pub fn table(&self, parameter: Parameter) -> Option<&CalibrationTable> {
        self.tables.get(&parameter)
    }

    /// Check that every parameter has a usable table
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for the first parameter whose table is
    /// missing, empty or holds a non-finite value
    pub fn validate(&self) -> Result<()> {
        self.project(&ColorConverter::default())
            .iter()
            .try_for_each(ReferenceTable::check)
    }

    /// Project the tables into a matching space, one per parameter in pad order.
    ///
    /// Missing tables project to empty ones; the matcher rejects those when
    /// the parameter is estimated.
    pub fn project(&self, converter: &ColorConverter) -> Vec<ReferenceTable> {
        Parameter::ALL
            .iter()
            .map(|&parameter| {
                let points = self
                    .table(parameter)
                    .map(|t| t.points.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .map(|p| ReferencePoint {
                        channels: converter.to_channels(p.rgb),
                        value: p.value,
                        label: p.label.clone(),
                    })
                    .collect();
                ReferenceTable { parameter, points }
            })
            .collect()
    }
}

/// A calibration point projected into the matching space
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    pub channels: Channels,
    pub value: f64,
    pub label: Option<String>,
}

/// A parameter's calibration table in the matching space
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    pub parameter: Parameter,
    pub points: Vec<ReferencePoint>,
}

impl ReferenceTable {
    /// Reject tables the matcher cannot use
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the table is empty or holds a non-finite value
    pub fn check(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(AnalysisError::configuration(
                Some(self.parameter),
                "calibration table is empty",
            ));
        }
        if let Some(p) = self.points.iter().find(|p| !p.value.is_finite()) {
            return Err(AnalysisError::configuration(
                Some(self.parameter),
                format!("calibration value {} is not finite", p.value),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSpace;

    #[test]
    fn test_reference_strip_is_valid() {
        let profile = CalibrationProfile::reference_strip();
        assert!(profile.validate().is_ok());
        assert_eq!(profile.tables.len(), Parameter::COUNT);
        assert_eq!(profile.table(Parameter::Ph).unwrap().len(), 9);
        assert_eq!(profile.table(Parameter::Bacteria).unwrap().len(), 3);
    }

    #[test]
    fn test_validate_reports_parameter() {
        let mut profile = CalibrationProfile::reference_strip();
        profile.tables.insert(Parameter::Hardness, CalibrationTable::default());
        match profile.validate() {
            Err(AnalysisError::ConfigurationError { parameter, .. }) => {
                assert_eq!(parameter, Some(Parameter::Hardness));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }

        profile.tables.remove(&Parameter::Hardness);
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_projection_in_pad_order() {
        let mut profile = CalibrationProfile::reference_strip();
        profile.tables.remove(&Parameter::Nitrates);

        let tables = profile.project(&ColorConverter::new(ColorSpace::Rgb));
        assert_eq!(tables.len(), 6);
        for (i, table) in tables.iter().enumerate() {
            assert_eq!(table.parameter.pad_index(), i);
        }
        assert!(tables[2].points.is_empty());
        assert!(tables[2].check().is_err());
        assert_eq!(tables[1].points[0].channels, [255.0, 255.0, 255.0]);
        assert_eq!(tables[1].points[0].label.as_deref(), Some("No Chlorine"));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let table = ReferenceTable {
            parameter: Parameter::Ph,
            points: vec![ReferencePoint {
                channels: [0.0; 3],
                value: f64::NAN,
                label: None,
            }],
        };
        assert!(table.check().is_err());
    }

    #[test]
    fn test_profile_json_keys() {
        let json = serde_json::to_value(CalibrationProfile::reference_strip()).unwrap();
        let ph = &json["tables"]["ph"];
        assert_eq!(ph[4]["value"], 7.0);
        assert_eq!(ph[4]["label"], "Neutral");
        assert_eq!(ph[4]["rgb"][0], 255);

        let parsed: CalibrationProfile = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, CalibrationProfile::reference_strip());
    }
}
