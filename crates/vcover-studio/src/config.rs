//! Studio configuration.

use std::path::PathBuf;

use vcover_genai::{GeminiConfig, GENERATION_MODEL, PLANNING_MODEL};
use vcover_media::ExtractorConfig;

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Remote service credential and endpoint
    pub gemini: GeminiConfig,
    /// Frame extraction settings
    pub extractor: ExtractorConfig,
    /// Model for the planning call
    pub planning_model: String,
    /// Model for the generation call
    pub generation_model: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            extractor: ExtractorConfig::default(),
            planning_model: PLANNING_MODEL.to_string(),
            generation_model: GENERATION_MODEL.to_string(),
        }
    }
}

impl StudioConfig {
    /// Defaults plus the credential from the environment.
    ///
    /// The credential is the only value read from the environment.
    pub fn from_env() -> Self {
        Self {
            gemini: GeminiConfig::from_env(),
            ..Default::default()
        }
    }

    /// Put scratch directories under `dir`.
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extractor.work_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StudioConfig::default();
        assert_eq!(config.planning_model, "gemini-3-flash-preview");
        assert_eq!(config.generation_model, "gemini-2.5-flash-image");
        assert!((config.extractor.quality - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_with_work_dir() {
        let config = StudioConfig::default().with_work_dir("/tmp/covers");
        assert_eq!(config.extractor.work_dir, PathBuf::from("/tmp/covers"));
    }
}
