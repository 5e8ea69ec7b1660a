//! Cover job identifiers, states and outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::CoverImage;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-facing failure classes.
///
/// Extraction problems collapse into `UnsupportedMedia`; every remote-stage
/// problem collapses into `GenerationFailure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The video could not be turned into a still
    UnsupportedMedia,
    /// Planning or generation failed
    GenerationFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnsupportedMedia => "unsupported_media",
            FailureKind::GenerationFailure => "generation_failure",
        }
    }

    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::UnsupportedMedia => "素材格式不支持",
            FailureKind::GenerationFailure => "AI 引擎忙，请重新尝试",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State of the single active cover job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Nothing running
    #[default]
    Idle,
    /// Pulling a still out of the uploaded video
    ExtractingFrame,
    /// Waiting on the planning call
    PlanningLayout,
    /// Waiting on the generation call
    GeneratingImage,
    /// A cover was produced
    Succeeded,
    /// The job ended with a failure
    Failed(FailureKind),
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::ExtractingFrame => "extracting_frame",
            JobState::PlanningLayout => "planning_layout",
            JobState::GeneratingImage => "generating_image",
            JobState::Succeeded => "succeeded",
            JobState::Failed(_) => "failed",
        }
    }

    /// Whether a job is in flight.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobState::ExtractingFrame | JobState::PlanningLayout | JobState::GeneratingImage
        )
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed(_))
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one synthesis job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Success(CoverImage),
    Failure(FailureKind),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success(_))
    }

    /// The cover, if the job succeeded.
    pub fn cover(&self) -> Option<&CoverImage> {
        match self {
            JobOutcome::Success(cover) => Some(cover),
            JobOutcome::Failure(_) => None,
        }
    }

    /// The failure class, if the job failed.
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            JobOutcome::Success(_) => None,
            JobOutcome::Failure(kind) => Some(*kind),
        }
    }

    /// State the session settles in after this outcome.
    pub fn final_state(&self) -> JobState {
        match self {
            JobOutcome::Success(_) => JobState::Succeeded,
            JobOutcome::Failure(kind) => JobState::Failed(*kind),
        }
    }
}
