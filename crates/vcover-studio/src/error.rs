//! Pipeline and session error types.

use std::fmt;

use thiserror::Error;
use vcover_genai::GenAiError;
use vcover_media::MediaError;
use vcover_models::FailureKind;

pub type PipelineResult<T> = Result<T, PipelineError>;
pub type SessionResult<T> = Result<T, SessionError>;

/// Where in the job a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extraction,
    Planning,
    Generation,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extraction => "extraction",
            Stage::Planning => "planning",
            Stage::Generation => "generation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Internal failure detail; callers see only [`FailureKind`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Frame extraction failed: {0}")]
    Extraction(#[from] MediaError),

    #[error("Planning stage failed: {0}")]
    Planning(GenAiError),

    #[error("Generation stage failed: {0}")]
    Generation(GenAiError),

    #[error("Generation returned no image")]
    EmptyResult,

    #[error("{stage} task aborted: {message}")]
    TaskAborted { stage: Stage, message: String },
}

impl PipelineError {
    /// Wrap a generation adapter error, separating out empty responses.
    pub fn from_generation(err: GenAiError) -> Self {
        if err.is_empty_result() {
            Self::EmptyResult
        } else {
            Self::Generation(err)
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Extraction(_) => Stage::Extraction,
            PipelineError::Planning(_) => Stage::Planning,
            PipelineError::Generation(_) | PipelineError::EmptyResult => Stage::Generation,
            PipelineError::TaskAborted { stage, .. } => *stage,
        }
    }

    /// User-facing classification.
    pub fn kind(&self) -> FailureKind {
        match self.stage() {
            Stage::Extraction => FailureKind::UnsupportedMedia,
            Stage::Planning | Stage::Generation => FailureKind::GenerationFailure,
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, PipelineError::EmptyResult)
    }
}

/// Errors from [`crate::CoverSession`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A job is already running")]
    Busy,

    #[error("No frame loaded")]
    NoFrame,

    #[error("No cover generated yet")]
    NoCover,

    #[error("Result discarded: a newer job started")]
    Superseded,

    #[error("{0}")]
    Job(#[from] PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// Failure class for job errors.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SessionError::Job(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Message to show the user, if this error came from a job.
    pub fn user_message(&self) -> Option<&'static str> {
        self.failure_kind().map(|k| k.user_message())
    }
}
