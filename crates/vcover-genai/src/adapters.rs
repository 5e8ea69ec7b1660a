//! Stage adapters over an [`InferenceClient`].
//!
//! Each adapter owns its model identifier, builds its multimodal request and
//! pulls the relevant payload out of the response.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};
use vcover_models::{AspectRatio, ExtractedFrame, ImagePayload, StyleDescriptor};

use crate::client::InferenceClient;
use crate::error::{GenAiError, GenAiResult};
use crate::prompts::{build_generation_prompt, build_planning_prompt};
use crate::types::GenerateContentRequest;

/// Model used for layout planning.
pub const PLANNING_MODEL: &str = "gemini-3-flash-preview";

/// Model used for cover generation.
pub const GENERATION_MODEL: &str = "gemini-2.5-flash-image";

/// Aspect ratio requested from the generation model.
pub const COVER_ASPECT_RATIO: AspectRatio = AspectRatio::PORTRAIT;

/// Free text returned by the planning call.
///
/// Never parsed; only interpolated into the generation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan(String);

impl LayoutPlan {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayoutPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stage A: derives a layout plan from the frame and style.
#[derive(Clone)]
pub struct PlanningCallAdapter {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl PlanningCallAdapter {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self::with_model(client, PLANNING_MODEL)
    }

    pub fn with_model(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the planning model for a layout plan.
    pub async fn plan(
        &self,
        frame: &ExtractedFrame,
        style: &StyleDescriptor,
    ) -> GenAiResult<LayoutPlan> {
        let request =
            GenerateContentRequest::image_and_text(&frame.image, build_planning_prompt(style));

        let response = self.client.invoke(&self.model, &request).await?;

        let text = response
            .text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenAiError::EmptyResult("layout plan text"))?;

        info!("Layout plan received from {} ({} chars)", self.model, text.len());
        Ok(LayoutPlan::new(text))
    }
}

/// Stage B: synthesizes the cover from the frame, style, plan and instruction.
#[derive(Clone)]
pub struct GenerationCallAdapter {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl GenerationCallAdapter {
    pub fn new(client: Arc<dyn InferenceClient>) -> Self {
        Self::with_model(client, GENERATION_MODEL)
    }

    pub fn with_model(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the image model for the cover; the first inline image wins.
    pub async fn generate(
        &self,
        frame: &ExtractedFrame,
        style: &StyleDescriptor,
        plan: &LayoutPlan,
        instruction: &str,
    ) -> GenAiResult<ImagePayload> {
        let prompt = build_generation_prompt(style, plan.as_str(), instruction);
        let request = GenerateContentRequest::image_and_text(&frame.image, prompt)
            .with_aspect_ratio(COVER_ASPECT_RATIO);

        let response = self.client.invoke(&self.model, &request).await?;

        let inline = response.first_inline_data().ok_or_else(|| {
            debug!(
                "Generation response without image (finish reason: {:?})",
                response.finish_reason()
            );
            GenAiError::EmptyResult("inline image")
        })?;

        let image = inline.to_payload()?;
        if image.is_empty() {
            return Err(GenAiError::EmptyResult("inline image"));
        }

        info!(
            "Cover received from {} ({}, {} bytes)",
            self.model,
            image.mime_type,
            image.len()
        );
        Ok(image)
    }
}
