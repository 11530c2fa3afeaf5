// ABOUTME: Error types for the feed-slides application
// ABOUTME: Provides structured error handling for prompt compilation, generation and export

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to reach remote service: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Service returned HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Image generation failed: {0}")]
    GenerationFailed(String),

    #[error("Failed to parse post structure: {0}")]
    StructureParseFailed(String),

    #[error("No API key configured. Run `feed-slides set-key` or set GEMINI_API_KEY.")]
    MissingCredential,

    #[error("A batch run is already in progress")]
    BatchInProgress,

    #[error("Slide {0} does not exist in this deck")]
    SlideNotFound(usize),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl From<anyhow::Error> for FeedError {
    fn from(err: anyhow::Error) -> Self {
        FeedError::UnknownError(err.to_string())
    }
}

impl From<zip::result::ZipError> for FeedError {
    fn from(err: zip::result::ZipError) -> Self {
        FeedError::ExportError(format!("ZIP operation failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
