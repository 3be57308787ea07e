//! Water-source fallback profiles
//!
//! Plausible default readings per water source, used for any parameter that
//! could not be measured credibly. Profiles are looked up by a free-text
//! source label; unknown labels use the default profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::parameter::Parameter;

/// Default values for the six parameters of one water source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackProfile {
    pub values: BTreeMap<Parameter, f64>,
}

impl FallbackProfile {
    /// Build a profile from values in pad order
    pub fn from_values(values: [f64; 6]) -> Self {
        Self {
            values: Parameter::ALL.into_iter().zip(values).collect(),
        }
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values.get(&parameter).copied()
    }
}

/// All known water-source profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackProfiles {
    /// Profile used when the source label is missing or unknown
    pub default_profile: String,
    pub profiles: BTreeMap<String, FallbackProfile>,
}

impl Default for FallbackProfiles {
    fn default() -> Self {
        let profiles = [
            ("tap_water", [7.2, 1.5, 5.0, 120.0, 100.0, 0.0]),
            ("well_water", [6.8, 0.0, 15.0, 180.0, 80.0, 0.0]),
            ("lake_pond", [7.5, 0.0, 8.0, 90.0, 70.0, 0.0]),
            ("river_stream", [7.0, 0.0, 12.0, 100.0, 85.0, 0.0]),
            ("swimming_pool", [7.4, 2.5, 2.0, 110.0, 120.0, 0.0]),
            ("bottled_water", [7.0, 0.0, 1.0, 60.0, 50.0, 0.0]),
        ]
        .into_iter()
        .map(|(name, values)| (name.to_string(), FallbackProfile::from_values(values)))
        .collect();

        Self {
            default_profile: "tap_water".to_string(),
            profiles,
        }
    }
}

/// Canonical profile key for a source label: "Lake/Pond " -> "lake_pond"
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '/' { '_' } else { c })
        .collect()
}

impl FallbackProfiles {
    /// Name of the profile a source label resolves to
    pub fn resolve_name(&self, source: Option<&str>) -> &str {
        source
            .map(normalize_label)
            .and_then(|key| self.profiles.get_key_value(&key).map(|(k, _)| k.as_str()))
            .unwrap_or(&self.default_profile)
    }

    /// Fallback value for one parameter.
    ///
    /// Falls through the resolved profile, then the default profile, then 0.
    pub fn value(&self, source: Option<&str>, parameter: Parameter) -> f64 {
        let resolved = self.resolve_name(source);
        self.profiles
            .get(resolved)
            .and_then(|p| p.get(parameter))
            .or_else(|| {
                self.profiles
                    .get(&self.default_profile)
                    .and_then(|p| p.get(parameter))
            })
            .unwrap_or(0.0)
    }
}
