//! Structured logging for cover jobs.

use tracing::{error, info, Span};
use vcover_models::{CoverImage, ExtractedFrame, JobId};

use crate::error::{PipelineError, Stage};

/// Emits lifecycle events for one cover job, tagged with its id.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: JobId,
    operation: &'static str,
}

impl JobLogger {
    pub fn new(job_id: JobId, operation: &'static str) -> Self {
        Self { job_id, operation }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Span every event of this job is recorded under.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            operation = self.operation
        )
    }

    pub fn started(&self, frame: &ExtractedFrame, style: &str, instruction: &str) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            width = frame.width,
            height = frame.height,
            style,
            instruction_chars = instruction.chars().count(),
            "Cover job started"
        );
    }

    pub fn stage(&self, stage: Stage) {
        info!(
            job_id = %self.job_id,
            stage = stage.as_str(),
            "Entering {} stage", stage
        );
    }

    pub fn succeeded(&self, cover: &CoverImage) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            mime_type = %cover.image.mime_type,
            bytes = cover.image.len(),
            "Cover job completed"
        );
    }

    /// Logs the stage-level cause; callers only ever see the collapsed kind.
    pub fn failed(&self, err: &PipelineError) {
        error!(
            job_id = %self.job_id,
            operation = self.operation,
            stage = err.stage().as_str(),
            kind = err.kind().as_str(),
            "Cover job failed: {}", err
        );
    }
}
