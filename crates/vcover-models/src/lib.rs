//! Shared data models for V-Cover.
//!
//! This crate provides Serde-serializable types for:
//! - Video sources and extracted frames
//! - Self-describing image payloads and finished covers
//! - The design style preset catalog
//! - Job identifiers, states and outcomes

pub mod image;
pub mod job;
pub mod style;

// Re-export common types
pub use image::{
    CoverImage, ExtractedFrame, ImagePayload, PayloadError, VideoSource, MIME_JPEG, MIME_PNG,
};
pub use job::{FailureKind, JobId, JobOutcome, JobState};
pub use style::{AspectRatio, DesignPreset, DesignStyle, StyleDescriptor, StyleParseError};
