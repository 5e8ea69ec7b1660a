//! Gemini planning and image generation adapters.
//!
//! This crate provides:
//! - `InferenceClient`, the seam between the pipeline and the remote service
//! - `GeminiClient`, the REST implementation
//! - `PlanningCallAdapter` / `GenerationCallAdapter`, one per remote stage
//! - Prompt composition for both stages

pub mod adapters;
pub mod client;
pub mod error;
pub mod prompts;
pub mod types;

pub use adapters::{
    GenerationCallAdapter, LayoutPlan, PlanningCallAdapter, COVER_ASPECT_RATIO, GENERATION_MODEL,
    PLANNING_MODEL,
};
pub use client::{GeminiClient, GeminiConfig, InferenceClient, DEFAULT_BASE_URL};
pub use error::{GenAiError, GenAiResult};
pub use types::{GenerateContentRequest, GenerateContentResponse, InlineData, Part};
