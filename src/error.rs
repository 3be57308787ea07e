//! Error types for the strip_colorscan library

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parameter::Parameter;

/// Result type alias for strip_colorscan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for strip analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Calibration table or pipeline configuration is empty or malformed
    #[error("Configuration error{}: {reason}", .parameter.map(|p| format!(" for {p}")).unwrap_or_default())]
    ConfigurationError {
        parameter: Option<Parameter>,
        reason: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Generic processing error
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

/// Failure category reported in structured error records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    ImageLoad,
    Configuration,
    InvalidParameter,
    Processing,
}

/// Serializable failure output: `{"error": "...", "kind": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
    pub kind: ErrorKind,
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error, optionally scoped to one parameter
    pub fn configuration(parameter: Option<Parameter>, reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            parameter,
            reason: reason.into(),
        }
    }

    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::ImageLoadError { .. } => ErrorKind::ImageLoad,
            AnalysisError::ConfigurationError { .. } => ErrorKind::Configuration,
            AnalysisError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            AnalysisError::ProcessingError(_) => ErrorKind::Processing,
        }
    }

    /// Whether a caller-level retry could change the outcome.
    ///
    /// Only image I/O can; everything downstream of decoding is deterministic.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::ImageLoadError { .. })
    }

    /// Convert into the structured record written by the CLI
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            error: self.to_string(),
            kind: self.kind(),
        }
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            AnalysisError::ConfigurationError { parameter: Some(p), .. } => {
                format!("The calibration table for {p} is missing or invalid.")
            }
            AnalysisError::ConfigurationError { parameter: None, .. } => {
                "The analysis configuration is invalid.".to_string()
            }
            _ => "Strip analysis failed. Please try with a different image.".to_string(),
        }
    }
}
