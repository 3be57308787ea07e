//! Color analysis and conversion module
//!
//! This module handles color space conversions and the reduction of pad
//! regions to one representative color in the matching space.

pub mod analysis;
pub mod conversion;

pub use analysis::{ColorAnalyzer, RegionColor};
pub use conversion::{rgb_to_hex, Channels, ColorConverter, ColorSpace};
