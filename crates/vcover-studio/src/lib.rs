//! Cover synthesis pipeline and session.
//!
//! This crate provides:
//! - `CoverSynthesisPipeline`: planning call, then generation call
//! - `CoverSession`: the single active job, its inputs, result and state
//! - Configuration and structured job logging

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod session;

pub use config::StudioConfig;
pub use error::{PipelineError, PipelineResult, SessionError, SessionResult, Stage};
pub use logging::JobLogger;
pub use pipeline::CoverSynthesisPipeline;
pub use session::CoverSession;
