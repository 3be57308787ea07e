//! White balance estimation and correction
//!
//! Gray-world correction: assumes the scene averages to neutral gray and
//! scales each channel so the channel means meet at their common mean.
//! Optional preprocessing, off by default.

use image::RgbImage;
use tracing::debug;

/// Per-channel multipliers produced by an estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelGains {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ChannelGains {
    pub const IDENTITY: ChannelGains = ChannelGains {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };
}

/// Gray-world white balance estimator
#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteBalanceEstimator;

impl WhiteBalanceEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate channel gains under the gray-world assumption.
    ///
    /// A channel whose mean is zero gets gain 1 so that black or
    /// single-hue images pass through untouched in that channel.
    pub fn estimate_gray_world(&self, image: &RgbImage) -> ChannelGains {
        let n = image.width() as u64 * image.height() as u64;
        if n == 0 {
            return ChannelGains::IDENTITY;
        }

        let mut sum = [0u64; 3];
        for px in image.pixels() {
            for c in 0..3 {
                sum[c] += px.0[c] as u64;
            }
        }
        let mean = sum.map(|s| s as f64 / n as f64);
        let gray = (mean[0] + mean[1] + mean[2]) / 3.0;
        let gain = |m: f64| if m > 0.0 { gray / m } else { 1.0 };

        ChannelGains {
            red: gain(mean[0]),
            green: gain(mean[1]),
            blue: gain(mean[2]),
        }
    }

    /// Apply channel gains, clamping to the 0-255 range
    pub fn apply_correction(&self, image: &RgbImage, gains: ChannelGains) -> RgbImage {
        let factors = [gains.red, gains.green, gains.blue];
        let mut corrected = image.clone();
        for px in corrected.pixels_mut() {
            for c in 0..3 {
                px.0[c] = (px.0[c] as f64 * factors[c]).round().clamp(0.0, 255.0) as u8;
            }
        }
        corrected
    }

    /// Estimate and apply gray-world correction in one step
    pub fn balance(&self, image: &RgbImage) -> RgbImage {
        let gains = self.estimate_gray_world(image);
        debug!(red = gains.red, green = gains.green, blue = gains.blue, "gray-world gains");
        self.apply_correction(image, gains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_neutral_image_unchanged() {
        let image = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
        let estimator = WhiteBalanceEstimator::new();
        assert_eq!(estimator.estimate_gray_world(&image), ChannelGains::IDENTITY);
        assert_eq!(estimator.balance(&image), image);
    }

    #[test]
    fn test_color_cast_removed() {
        // Warm cast: means 150 / 120 / 90, gray 120
        let image = RgbImage::from_pixel(3, 3, Rgb([150, 120, 90]));
        let estimator = WhiteBalanceEstimator::new();
        let gains = estimator.estimate_gray_world(&image);
        assert!((gains.red - 0.8).abs() < 1e-12);
        assert!((gains.green - 1.0).abs() < 1e-12);
        assert!((gains.blue - 120.0 / 90.0).abs() < 1e-12);

        let corrected = estimator.apply_correction(&image, gains);
        assert_eq!(corrected.get_pixel(1, 1).0, [120, 120, 120]);
    }

    #[test]
    fn test_zero_channel_and_clamping() {
        let mut image = RgbImage::from_pixel(2, 1, Rgb([200, 0, 10]));
        image.put_pixel(1, 0, Rgb([250, 0, 250]));
        let estimator = WhiteBalanceEstimator::new();
        let gains = estimator.estimate_gray_world(&image);
        assert_eq!(gains.green, 1.0);

        let corrected = estimator.apply_correction(&image, gains);
        assert_eq!(corrected.get_pixel(0, 0).0[1], 0);

        let boosted = estimator.apply_correction(
            &image,
            ChannelGains {
                red: 2.0,
                green: 1.0,
                blue: 1.0,
            },
        );
        assert_eq!(boosted.get_pixel(0, 0).0, [255, 0, 10]);
    }

    #[test]
    fn test_empty_image() {
        let image = RgbImage::new(0, 0);
        assert_eq!(
            WhiteBalanceEstimator::new().estimate_gray_world(&image),
            ChannelGains::IDENTITY
        );
    }
}
