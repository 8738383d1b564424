//! Error types for the score-to-MIDI system

use std::fmt;

/// Custom error type for score-to-MIDI processing
#[derive(Debug, Clone)]
pub enum ScoreError {
    /// E001: Invalid or undecodable image format
    InvalidImageFormat(String),
    /// E002: Image file I/O error
    ImageFileError(String),
    /// E003: Configuration validation failed
    ConfigValidationFailed(String),
    /// E004: Fewer staff-line clusters than required for analysis
    StaffNotFound { found: usize, required: usize },
    /// E005: Analysis exceeded the configured wall-clock budget
    AnalysisTimeout { seconds: u64 },
    /// E006: MIDI encoding requested with zero valid notes
    NoValidNotes,
    /// E007: MIDI export error
    MidiExportError(String),
    /// E008: Analysis export error
    AnalysisExportError(String),
    /// E009: QA artifact generation error
    QaGenerationError(String),
    /// E010: Input validation error
    InputValidationError(String),
    /// E011: Internal pipeline-ordering error
    InternalError(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::InvalidImageFormat(msg) => {
                write!(f, "E001: Invalid image format - {}", msg)
            }
            ScoreError::ImageFileError(msg) => {
                write!(f, "E002: Image file I/O error - {}", msg)
            }
            ScoreError::ConfigValidationFailed(msg) => {
                write!(f, "E003: Configuration validation failed - {}", msg)
            }
            ScoreError::StaffNotFound { found, required } => {
                write!(
                    f,
                    "E004: Staff not found ({} line clusters detected, {} required)",
                    found, required
                )
            }
            ScoreError::AnalysisTimeout { seconds } => {
                write!(f, "E005: Analysis timed out after {} s", seconds)
            }
            ScoreError::NoValidNotes => {
                write!(f, "E006: No valid notes to encode")
            }
            ScoreError::MidiExportError(msg) => {
                write!(f, "E007: MIDI export error - {}", msg)
            }
            ScoreError::AnalysisExportError(msg) => {
                write!(f, "E008: Analysis export error - {}", msg)
            }
            ScoreError::QaGenerationError(msg) => {
                write!(f, "E009: QA artifact generation error - {}", msg)
            }
            ScoreError::InputValidationError(msg) => {
                write!(f, "E010: Input validation error - {}", msg)
            }
            ScoreError::InternalError(msg) => {
                write!(f, "E011: Internal error - {}", msg)
            }
        }
    }
}

impl std::error::Error for ScoreError {}

// From implementations for common error types
impl From<std::io::Error> for ScoreError {
    fn from(err: std::io::Error) -> Self {
        ScoreError::ImageFileError(format!("File I/O error: {}", err))
    }
}

impl From<serde_json::Error> for ScoreError {
    fn from(err: serde_json::Error) -> Self {
        ScoreError::AnalysisExportError(format!("JSON serialization error: {}", err))
    }
}

impl From<image::ImageError> for ScoreError {
    fn from(err: image::ImageError) -> Self {
        ScoreError::InvalidImageFormat(format!("Image decode error: {}", err))
    }
}

impl From<anyhow::Error> for ScoreError {
    fn from(err: anyhow::Error) -> Self {
        ScoreError::ConfigValidationFailed(format!("{}", err))
    }
}

/// Result type alias for score-to-MIDI operations
pub type Result<T> = std::result::Result<T, ScoreError>;
