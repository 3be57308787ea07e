//! Calibration and color correction module
//!
//! This module holds the reference color tables, the matcher that turns a
//! pad color into a physical value, and optional white balance correction
//! applied before extraction.

pub mod matcher;
pub mod table;
pub mod white_balance;

pub use matcher::{CalibrationMatcher, MatchResult};
pub use table::{CalibrationPoint, CalibrationProfile, CalibrationTable, ReferencePoint, ReferenceTable};
pub use white_balance::{ChannelGains, WhiteBalanceEstimator};
