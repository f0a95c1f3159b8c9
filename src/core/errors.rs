use thiserror::Error;

use crate::core::models::SessionState;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be a whole number, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} value {value} is too large")]
    OutOfRange { field: &'static str, value: i64 },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("could not decode image '{file_name}': {reason}")]
pub struct DecodeError {
    pub file_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Error)]
pub enum RecognitionError {
    #[error("recognizer not available: {0}")]
    BackendUnavailable(String),

    #[error("network request to recognition service failed: {0}")]
    Transport(String),

    #[error("recognition service returned an error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("recognition engine failed: {0}")]
    Engine(String),

    #[error("region image could not be read by the recognizer: {0}")]
    InvalidImage(String),
}

#[derive(Debug, Clone, Error)]
pub enum ExportError {
    #[error("failed to build spreadsheet: {0}")]
    Spreadsheet(String),
}

#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    #[error("no regions defined, nothing to extract")]
    NoRegions,

    #[error("failed to encode crop of '{file_name}' region {region_number}: {reason}")]
    CropEncoding {
        file_name: String,
        region_number: usize,
        reason: String,
    },

    #[error("recognition failed for '{file_name}' region {region_number}: {source}")]
    Recognition {
        file_name: String,
        region_number: usize,
        #[source]
        source: RecognitionError,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("'{trigger}' is not allowed while {state}")]
    InvalidTransition {
        state: SessionState,
        trigger: &'static str,
    },
}
