//! Parallel analysis of many strip photos
//!
//! Each image is an independent unit of work; the analyzer is shared by
//! reference across rayon's worker threads without locking.

use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ErrorRecord;
use crate::pipeline::StripAnalyzer;
use crate::report::AnalysisReport;

/// Result for one input of a batch
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: crate::Result<AnalysisReport>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Serializable view of this entry
    pub fn to_record(&self) -> BatchRecord {
        match &self.outcome {
            Ok(report) => BatchRecord::Report {
                path: self.path.clone(),
                report: Box::new(report.clone()),
            },
            Err(e) => BatchRecord::Error {
                path: self.path.clone(),
                error: e.to_record(),
            },
        }
    }
}

/// JSON form of a batch entry
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchRecord {
    Report {
        path: PathBuf,
        report: Box<AnalysisReport>,
    },
    Error {
        path: PathBuf,
        #[serde(flatten)]
        error: ErrorRecord,
    },
}

/// Analyze images in parallel
///
/// # Arguments
///
/// * `analyzer` - Shared analyzer
/// * `paths` - Images to analyze
/// * `source` - Water source label applied to every image
///
/// # Returns
///
/// One entry per input path, in input order. A failure on one image never
/// affects the others.
pub fn analyze_batch<P>(analyzer: &StripAnalyzer, paths: &[P], source: Option<&str>) -> Vec<BatchEntry>
where
    P: AsRef<Path> + Sync,
{
    let entries: Vec<BatchEntry> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            BatchEntry {
                path: path.to_path_buf(),
                outcome: analyzer.analyze_path(path, source),
            }
        })
        .collect();

    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    info!(total = entries.len(), failed, "batch analysis complete");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::error::ErrorKind;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("strip_colorscan_batch_{}.png", std::process::id()));
        RgbImage::from_pixel(12, 60, Rgb([255, 255, 255])).save(&good).unwrap();
        let missing = dir.join("strip_colorscan_batch_missing.png");

        let analyzer = StripAnalyzer::new(PipelineConfig::default()).unwrap();
        let paths = vec![good.clone(), missing.clone(), good.clone()];
        let entries = analyze_batch(&analyzer, paths.as_slice(), None);
        std::fs::remove_file(&good).ok();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].path, missing);
        assert!(entries[0].is_ok() && entries[2].is_ok());
        match &entries[1].outcome {
            Err(e) => assert_eq!(e.kind(), ErrorKind::ImageLoad),
            Ok(_) => panic!("missing file analyzed"),
        }

        let record = serde_json::to_value(entries[1].to_record()).unwrap();
        assert_eq!(record["kind"], "imageLoad");
        let record = serde_json::to_value(entries[0].to_record()).unwrap();
        assert_eq!(record["report"]["regionsDetected"], 6);
    }
}
