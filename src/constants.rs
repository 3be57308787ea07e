//! Calibration constants and reference values for strip analysis
//!
//! Compile-time defaults for region extraction, calibration matching and
//! quality scoring. Every value here can be overridden through
//! [`crate::config::PipelineConfig`].

/// Strip geometry
pub mod strip {
    /// Number of measurement pads on a complete strip
    pub const EXPECTED_PADS: usize = 6;
}

/// Region extraction thresholds
pub mod extraction {
    /// Pixels with saturation at or below this are candidate background (0-1 scale, 30/255)
    pub const WHITE_MAX_SATURATION: f64 = 30.0 / 255.0;

    /// Pixels with value at or above this are candidate background (0-1 scale, 200/255)
    pub const WHITE_MIN_VALUE: f64 = 200.0 / 255.0;

    /// Components smaller than this fraction of the image are treated as noise
    pub const MIN_PAD_AREA_RATIO: f64 = 0.0005;

    /// Contour extraction yielding fewer regions than this triggers the partition fallback
    pub const MIN_CONTOUR_REGIONS: usize = 1;
}

/// Calibration matching
pub mod matching {
    /// Confidence lost per unit of Lab distance to the nearest reference
    pub const LAB_CONFIDENCE_SCALE: f64 = 2.5;

    /// Confidence lost per unit of RGB (0-255) distance to the nearest reference
    pub const RGB_CONFIDENCE_SCALE: f64 = 0.5;

    /// Maximum per-parameter confidence
    pub const MAX_CONFIDENCE: f64 = 100.0;
}

/// Overall quality scoring heuristic
pub mod quality {
    pub const BASE_CONFIDENCE: f64 = 85.0;
    pub const FULL_STRIP_BONUS: f64 = 5.0;
    pub const PARTIAL_STRIP_BONUS: f64 = 2.0;
    /// Regions needed for the partial bonus
    pub const PARTIAL_STRIP_REGIONS: usize = 4;
    pub const HIGH_RESOLUTION_PIXELS: u64 = 300_000;
    pub const HIGH_RESOLUTION_BONUS: f64 = 3.0;
    /// Grayscale intensity variance indicating a well-lit, high-contrast photo
    pub const CONTRAST_VARIANCE_THRESHOLD: f64 = 1000.0;
    pub const CONTRAST_BONUS: f64 = 2.0;
    pub const MAX_CONFIDENCE: f64 = 98.0;
}

/// Lighting assessment bands on mean luma (0-255)
pub mod lighting {
    pub const TOO_DARK_BELOW: f64 = 60.0;
    pub const TOO_BRIGHT_ABOVE: f64 = 200.0;
    pub const OPTIMAL_MIN: f64 = 120.0;
    pub const OPTIMAL_MAX: f64 = 160.0;
    pub const OPTIMAL_MAX_STD_DEV: f64 = 40.0;
    pub const UNEVEN_STD_DEV: f64 = 60.0;
}

/// Rec. 601 luma weights, as used for grayscale conversion
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// Water quality assessment scoring
pub mod assessment {
    /// Score deducted per parameter outside its safe range
    pub const OUT_OF_RANGE_PENALTY: f64 = 15.0;
    pub const EXCELLENT_MIN: f64 = 90.0;
    pub const GOOD_MIN: f64 = 75.0;
    pub const FAIR_MIN: f64 = 60.0;
}
