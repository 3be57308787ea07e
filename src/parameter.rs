//! The fixed set of water parameters measured by a six-pad strip
//!
//! Pad order on the strip is the declaration order of [`Parameter`], which is
//! also the order used for region indices and report output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// One measured water parameter, in strip pad order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Ph,
    Chlorine,
    Nitrates,
    Hardness,
    Alkalinity,
    Bacteria,
}

impl Parameter {
    /// All parameters in pad order (index 0 is the first pad)
    pub const ALL: [Parameter; 6] = [
        Parameter::Ph,
        Parameter::Chlorine,
        Parameter::Nitrates,
        Parameter::Hardness,
        Parameter::Alkalinity,
        Parameter::Bacteria,
    ];

    /// Number of pads on a complete strip
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this parameter's pad on the strip
    pub fn pad_index(self) -> usize {
        self as usize
    }

    /// Parameter measured by the pad at `index`, if any
    pub fn from_pad_index(index: usize) -> Option<Parameter> {
        Self::ALL.get(index).copied()
    }

    /// Key used in configuration files and reports
    pub fn key(self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Chlorine => "chlorine",
            Parameter::Nitrates => "nitrates",
            Parameter::Hardness => "hardness",
            Parameter::Alkalinity => "alkalinity",
            Parameter::Bacteria => "bacteria",
        }
    }

    /// Unit of the physical value, empty for pH
    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Ph => "",
            Parameter::Chlorine | Parameter::Nitrates => "ppm",
            Parameter::Hardness | Parameter::Alkalinity => "mg/L",
            Parameter::Bacteria => "index",
        }
    }

    /// A value with its unit, e.g. "150 mg/L"
    pub fn format_value(self, value: f64) -> String {
        match self.unit() {
            "" => value.to_string(),
            unit => format!("{value} {unit}"),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Ph => f.write_str("pH"),
            other => f.write_str(other.key()),
        }
    }
}

impl FromStr for Parameter {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| AnalysisError::InvalidParameter {
                parameter: "parameter".to_string(),
                value: s.to_string(),
            })
    }
}
