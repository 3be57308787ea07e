//! Image quality heuristics
//!
//! Two independent signals derived from the whole photograph:
//! - [`QualityScorer`]: the overall confidence reported with every analysis.
//!   It is a heuristic, monotonic score (more pads, more pixels and more
//!   contrast never lower it), not a statistically calibrated model.
//! - [`LightingAssessment`]: a coarse classification of exposure and
//!   evenness with a user-facing recommendation.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::config::QualityConfig;
use crate::constants::{lighting, strip::EXPECTED_PADS, LUMA_WEIGHTS};

/// Whole-image luma statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageStatistics {
    pub width: u32,
    pub height: u32,
    /// Mean luma, 0-255
    pub mean: f64,
    /// Population variance of luma
    pub variance: f64,
}

impl ImageStatistics {
    /// Compute luma statistics over every pixel
    pub fn compute(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let n = width as u64 * height as u64;
        if n == 0 {
            return Self {
                width,
                height,
                mean: 0.0,
                variance: 0.0,
            };
        }

        // Welford keeps the variance stable on large, bright images
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for (i, px) in image.pixels().enumerate() {
            let luma = LUMA_WEIGHTS[0] * px.0[0] as f64
                + LUMA_WEIGHTS[1] * px.0[1] as f64
                + LUMA_WEIGHTS[2] * px.0[2] as f64;
            let delta = luma - mean;
            mean += delta / (i + 1) as f64;
            m2 += delta * (luma - mean);
        }

        Self {
            width,
            height,
            mean,
            variance: m2 / n as f64,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Overall confidence scorer
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    config: QualityConfig,
}

impl QualityScorer {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Overall confidence for an analysis
    ///
    /// # Arguments
    ///
    /// * `regions_detected` - Regions actually extracted (six on a complete strip)
    /// * `stats` - Luma statistics of the analyzed image
    pub fn score(&self, regions_detected: usize, stats: &ImageStatistics) -> f64 {
        let c = &self.config;
        let mut score = c.base_confidence;

        if regions_detected >= EXPECTED_PADS {
            score += c.full_strip_bonus;
        } else if regions_detected >= c.partial_strip_regions {
            score += c.partial_strip_bonus;
        }
        if stats.pixel_count() > c.high_resolution_pixels {
            score += c.high_resolution_bonus;
        }
        if stats.variance > c.contrast_variance_threshold {
            score += c.contrast_bonus;
        }

        score.min(c.max_confidence)
    }
}

/// Exposure class of a photograph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LightingCondition {
    TooDark,
    TooBright,
    Optimal,
    Uneven,
    Good,
}

impl LightingCondition {
    /// Heuristic lighting score, 0-100
    pub fn score(self) -> f64 {
        match self {
            LightingCondition::TooDark => 40.0,
            LightingCondition::TooBright => 45.0,
            LightingCondition::Optimal => 95.0,
            LightingCondition::Uneven => 55.0,
            LightingCondition::Good => 75.0,
        }
    }
}

/// Lighting classification with a recommendation for the next photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingAssessment {
    pub condition: LightingCondition,
    pub score: f64,
    pub mean_brightness: f64,
    /// 100 minus the luma standard deviation, floored at 0
    pub uniformity: f64,
    pub recommendation: String,
}

impl LightingAssessment {
    /// Classify lighting from luma statistics
    pub fn assess(stats: &ImageStatistics) -> Self {
        let mean = stats.mean;
        let std_dev = stats.std_dev();

        let condition = if mean < lighting::TOO_DARK_BELOW {
            LightingCondition::TooDark
        } else if mean > lighting::TOO_BRIGHT_ABOVE {
            LightingCondition::TooBright
        } else if (lighting::OPTIMAL_MIN..=lighting::OPTIMAL_MAX).contains(&mean)
            && std_dev < lighting::OPTIMAL_MAX_STD_DEV
        {
            LightingCondition::Optimal
        } else if std_dev > lighting::UNEVEN_STD_DEV {
            LightingCondition::Uneven
        } else {
            LightingCondition::Good
        };

        let recommendation = match condition {
            LightingCondition::TooDark => "Increase lighting or move to a brighter area",
            LightingCondition::TooBright => "Reduce lighting or avoid direct sunlight",
            LightingCondition::Uneven => "Use more even lighting to reduce shadows",
            LightingCondition::Optimal | LightingCondition::Good => "Lighting conditions are good",
        };

        Self {
            condition,
            score: condition.score(),
            mean_brightness: mean,
            uniformity: (100.0 - std_dev).max(0.0),
            recommendation: recommendation.to_string(),
        }
    }
}
