//! # Strip ColorScan
//!
//! A Rust crate for reading six-pad water test strips from digital photographs.
//!
//! This library provides calibrated strip readings by:
//! - Locating the six measurement pads (contour detection or fixed bands)
//! - Averaging each pad's color in CIE Lab (or RGB, as a degraded mode)
//! - Matching each color against a per-parameter calibration table with
//!   two-point inverse-distance weighting
//! - Filling parameters without a credible reading from water-source fallbacks
//! - Scoring overall confidence, lighting and water safety
//!
//! Measured parameters, in pad order: pH, chlorine, nitrates, hardness,
//! alkalinity and bacteria.
//!
//! ## Example
//!
//! ```rust,no_run
//! use strip_colorscan::analyze_strip;
//! use std::path::Path;
//!
//! let report = analyze_strip(Path::new("strip.jpg"), Some("Tap Water"))?;
//! println!("pH {:.2} ({:.0}%)", report.readings.ph.value, report.readings.ph.confidence);
//! # Ok::<(), strip_colorscan::AnalysisError>(())
//! ```

use std::path::Path;

pub mod batch;
pub mod calibration;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod fallback;
pub mod image_loader;
pub mod parameter;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod standards;

pub use batch::{analyze_batch, BatchEntry};
pub use calibration::{CalibrationPoint, CalibrationProfile, CalibrationTable};
pub use color::ColorSpace;
pub use config::PipelineConfig;
pub use detection::ExtractionStrategy;
pub use error::{AnalysisError, ErrorKind, ErrorRecord, Result};
pub use parameter::Parameter;
pub use pipeline::StripAnalyzer;
pub use report::{AnalysisReport, EstimateSource, ParameterEstimate};

/// Analyze a test strip photograph with the default configuration
///
/// This is the main entry point for one-off analysis. For repeated calls,
/// build a [`StripAnalyzer`] once and reuse it.
///
/// # Arguments
///
/// * `image_path` - Path to the image file
/// * `source` - Optional water source label ("Tap Water", "Lake/Pond", ...)
///   selecting the fallback profile for unmeasured parameters
///
/// # Returns
///
/// An `AnalysisReport` with an estimate for every parameter
///
/// # Errors
///
/// Returns `AnalysisError` if:
/// - Image cannot be loaded or is invalid format
/// - Image has no pixels
pub fn analyze_strip(image_path: &Path, source: Option<&str>) -> Result<AnalysisReport> {
    StripAnalyzer::new(PipelineConfig::default())?.analyze_path(image_path, source)
}
