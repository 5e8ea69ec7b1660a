//! Error types for media operations.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Coarse class of an extraction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailure {
    /// Media could not be loaded or has no usable video track
    Decode,
    /// No frame surface could be produced
    RenderSurface,
}

/// Errors that can occur during frame extraction.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Render surface unavailable: {0}")]
    RenderSurface(String),

    #[error("Failed to stage media: {0}")]
    Staging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a decode error for media that cannot be read.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::InvalidVideo(message.into())
    }

    /// Create a render surface error.
    pub fn render_surface(message: impl Into<String>) -> Self {
        Self::RenderSurface(message.into())
    }

    /// Classify the error as a decode or render surface failure.
    pub fn class(&self) -> ExtractionFailure {
        match self {
            MediaError::FfprobeFailed { .. }
            | MediaError::FfmpegFailed { .. }
            | MediaError::InvalidVideo(_)
            | MediaError::JsonParse(_) => ExtractionFailure::Decode,
            MediaError::FfmpegNotFound
            | MediaError::FfprobeNotFound
            | MediaError::RenderSurface(_)
            | MediaError::Staging(_)
            | MediaError::Io(_) => ExtractionFailure::RenderSurface,
        }
    }

    pub fn is_decode_error(&self) -> bool {
        self.class() == ExtractionFailure::Decode
    }

    pub fn is_render_surface_error(&self) -> bool {
        self.class() == ExtractionFailure::RenderSurface
    }
}
