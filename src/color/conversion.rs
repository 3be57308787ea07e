//! Color space conversion utilities
//!
//! Provides the conversions the pipeline needs:
//! - sRGB (0-255) to CIE Lab (D65) for perceptual matching
//! - sRGB to HSV for background masking
//! - Euclidean distance in the configured matching space
//! - Hex color representation for diagnostics

use palette::{encoding, white_point::D65, FromColor, Hsv, Lab, Srgb};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::matching;
use crate::AnalysisError;

/// Three channels of a color in the matching space
pub type Channels = [f64; 3];

/// Color space used for averaging and calibration matching.
///
/// `Lab` is the perceptually uniform default. `Rgb` matches raw sRGB
/// coordinates; it is a degraded mode, since equal RGB distances do not
/// correspond to equal perceived differences and interpolation weights are
/// biased toward channels the eye is less sensitive to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    #[default]
    Lab,
    Rgb,
}

impl ColorSpace {
    /// Default confidence loss per unit distance in this space
    pub fn default_confidence_scale(self) -> f64 {
        match self {
            ColorSpace::Lab => matching::LAB_CONFIDENCE_SCALE,
            ColorSpace::Rgb => matching::RGB_CONFIDENCE_SCALE,
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpace::Lab => f.write_str("lab"),
            ColorSpace::Rgb => f.write_str("rgb"),
        }
    }
}

impl FromStr for ColorSpace {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lab" => Ok(ColorSpace::Lab),
            "rgb" => Ok(ColorSpace::Rgb),
            _ => Err(AnalysisError::InvalidParameter {
                parameter: "color_space".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Color converter bound to one matching space
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter {
    space: ColorSpace,
}

impl ColorConverter {
    /// Create a converter projecting into `space`
    pub fn new(space: ColorSpace) -> Self {
        Self { space }
    }

    /// Matching space of this converter
    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Project an sRGB pixel into the matching space
    pub fn to_channels(&self, rgb: [u8; 3]) -> Channels {
        match self.space {
            ColorSpace::Lab => {
                let lab = self.rgb_to_lab(rgb);
                [lab.l, lab.a, lab.b]
            }
            ColorSpace::Rgb => [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64],
        }
    }

    /// Convert RGB (0-255) to Lab under D65
    pub fn rgb_to_lab(&self, rgb: [u8; 3]) -> Lab<D65, f64> {
        Lab::from_color(to_srgb(rgb))
    }

    /// Convert RGB (0-255) to HSV with saturation and value in 0-1
    pub fn rgb_to_hsv(&self, rgb: [u8; 3]) -> Hsv<encoding::Srgb, f64> {
        Hsv::from_color(to_srgb(rgb))
    }

    /// Euclidean distance between two colors in the matching space.
    ///
    /// In Lab this is CIE76 ΔE.
    pub fn distance(&self, a: &Channels, b: &Channels) -> f64 {
        let d0 = a[0] - b[0];
        let d1 = a[1] - b[1];
        let d2 = a[2] - b[2];
        (d0 * d0 + d1 * d1 + d2 * d2).sqrt()
    }
}

/// Hex string for an RGB triple (e.g. "#FF0000")
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
}

fn to_srgb(rgb: [u8; 3]) -> Srgb<f64> {
    Srgb::new(
        rgb[0] as f64 / 255.0,
        rgb[1] as f64 / 255.0,
        rgb[2] as f64 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_lab_black() {
        let converter = ColorConverter::new(ColorSpace::Lab);
        let lab = converter.rgb_to_lab([0, 0, 0]);
        assert!(lab.l < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_white() {
        let converter = ColorConverter::new(ColorSpace::Lab);
        let lab = converter.rgb_to_lab([255, 255, 255]);
        assert!(lab.l > 99.0);
        assert!(lab.a.abs() < 1.0);
        assert!(lab.b.abs() < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_red() {
        // Reference sRGB red: L* 53.2, a* 80.1, b* 67.2
        let lab = ColorConverter::new(ColorSpace::Lab).rgb_to_lab([255, 0, 0]);
        assert!((lab.l - 53.24).abs() < 0.5);
        assert!((lab.a - 80.09).abs() < 0.5);
        assert!((lab.b - 67.20).abs() < 0.5);
    }

    #[test]
    fn test_hsv_white_and_pure_hue() {
        let converter = ColorConverter::default();
        let white = converter.rgb_to_hsv([255, 255, 255]);
        let (saturation, value): (f64, f64) = (white.saturation, white.value);
        assert!(saturation < 1e-9 && value >= 200.0 / 255.0);
        assert!(white.saturation < 1e-9);
        assert!((white.value - 1.0).abs() < 1e-9);

        let green = converter.rgb_to_hsv([0, 255, 0]);
        assert!((green.saturation - 1.0).abs() < 1e-9);
        assert!((green.hue.into_positive_degrees() - 120.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_channels_are_raw() {
        let converter = ColorConverter::new(ColorSpace::Rgb);
        assert_eq!(converter.to_channels([10, 20, 30]), [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_distance() {
        let converter = ColorConverter::new(ColorSpace::Rgb);
        assert_eq!(converter.distance(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]), 0.0);
        assert!((converter.distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex([255, 0, 0]), "#FF0000");
        assert_eq!(rgb_to_hex([0, 128, 255]), "#0080FF");
    }

    #[test]
    fn test_color_space_parsing() {
        assert_eq!("LAB".parse::<ColorSpace>().unwrap(), ColorSpace::Lab);
        assert_eq!("rgb".parse::<ColorSpace>().unwrap(), ColorSpace::Rgb);
        assert!("hsl".parse::<ColorSpace>().is_err());
        assert_eq!(ColorSpace::default(), ColorSpace::Lab);
    }
}
