//! Two-stage cover synthesis.
//!
//! Stage A asks the planning model for a layout plan; stage B feeds the same
//! frame, the style, that plan and the user's instruction to the image model.
//! Stage B never starts unless stage A produced a plan, and the plan lives
//! only for the duration of one call.

use std::sync::Arc;
use std::time::Instant;

use metrics::Label;
use tracing::Instrument;
use vcover_genai::{GeminiClient, GenerationCallAdapter, InferenceClient, PlanningCallAdapter};
use vcover_models::{CoverImage, ExtractedFrame, JobId, JobOutcome, JobState, StyleDescriptor};

use crate::config::StudioConfig;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::logging::JobLogger;

/// Orchestrates the planning and generation calls.
#[derive(Clone)]
pub struct CoverSynthesisPipeline {
    planner: PlanningCallAdapter,
    generator: GenerationCallAdapter,
}

impl CoverSynthesisPipeline {
    pub fn new(planner: PlanningCallAdapter, generator: GenerationCallAdapter) -> Self {
        Self { planner, generator }
    }

    /// Both stages over one client with the default models.
    pub fn with_client(client: Arc<dyn InferenceClient>) -> Self {
        Self::new(
            PlanningCallAdapter::new(client.clone()),
            GenerationCallAdapter::new(client),
        )
    }

    /// Gemini-backed pipeline.
    pub fn from_config(config: &StudioConfig) -> Self {
        let client: Arc<dyn InferenceClient> = Arc::new(GeminiClient::new(config.gemini.clone()));
        Self::new(
            PlanningCallAdapter::with_model(client.clone(), config.planning_model.clone()),
            GenerationCallAdapter::with_model(client, config.generation_model.clone()),
        )
    }

    /// Run both stages and classify the result.
    pub async fn synthesize(
        &self,
        frame: &ExtractedFrame,
        style: &StyleDescriptor,
        instruction: &str,
    ) -> JobOutcome {
        self.synthesize_with_progress(frame, style, instruction, |_| {})
            .await
    }

    /// Like [`synthesize`](Self::synthesize), reporting each stage as it starts.
    pub async fn synthesize_with_progress<F>(
        &self,
        frame: &ExtractedFrame,
        style: &StyleDescriptor,
        instruction: &str,
        on_stage: F,
    ) -> JobOutcome
    where
        F: Fn(JobState) + Send + Sync,
    {
        let logger = JobLogger::new(JobId::new(), "cover_synthesis");
        logger.started(frame, style.as_str(), instruction);

        let report = |state: JobState| {
            match state {
                JobState::PlanningLayout => logger.stage(Stage::Planning),
                JobState::GeneratingImage => logger.stage(Stage::Generation),
                _ => {}
            }
            on_stage(state);
        };
        let result = self
            .try_synthesize_with_progress(frame, style, instruction, report)
            .instrument(logger.span())
            .await;

        metrics::counter!("vcover_jobs_total", job_labels(&result)).increment(1);
        match result {
            Ok(cover) => {
                logger.succeeded(&cover);
                JobOutcome::Success(cover)
            }
            Err(e) => {
                logger.failed(&e);
                JobOutcome::Failure(e.kind())
            }
        }
    }

    /// Run both stages, keeping the detailed error.
    pub async fn try_synthesize(
        &self,
        frame: &ExtractedFrame,
        style: &StyleDescriptor,
        instruction: &str,
    ) -> PipelineResult<CoverImage> {
        self.try_synthesize_with_progress(frame, style, instruction, |_| {})
            .await
    }

    async fn try_synthesize_with_progress<F>(
        &self,
        frame: &ExtractedFrame,
        style: &StyleDescriptor,
        instruction: &str,
        on_stage: F,
    ) -> PipelineResult<CoverImage>
    where
        F: Fn(JobState) + Send + Sync,
    {
        on_stage(JobState::PlanningLayout);
        let started = Instant::now();
        let plan = self
            .planner
            .plan(frame, style)
            .await
            .map_err(PipelineError::Planning);
        record_stage(Stage::Planning, started);
        let plan = plan?;

        on_stage(JobState::GeneratingImage);
        let started = Instant::now();
        let image = self
            .generator
            .generate(frame, style, &plan, instruction)
            .await
            .map_err(PipelineError::from_generation);
        record_stage(Stage::Generation, started);

        Ok(CoverImage::new(image?))
    }
}

/// `outcome` is success or failure; failures also carry the failing `stage`.
fn job_labels(result: &PipelineResult<CoverImage>) -> Vec<Label> {
    match result {
        Ok(_) => vec![Label::new("outcome", "success")],
        Err(e) => vec![
            Label::new("outcome", "failure"),
            Label::new("stage", e.stage().as_str()),
        ],
    }
}

fn record_stage(stage: Stage, started: Instant) {
    metrics::histogram!("vcover_stage_duration_seconds", "stage" => stage.as_str())
        .record(started.elapsed().as_secs_f64());
}
