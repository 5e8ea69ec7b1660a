//! Representative frame extraction.
//!
//! A video is staged into a private scratch directory, probed for its
//! duration and dimensions, seeked to one quarter of its length and a single
//! JPEG still is captured at native resolution. The scratch directory is
//! removed when the call finishes, whatever the outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use vcover_models::{ExtractedFrame, ImagePayload, VideoSource};

use crate::command::StillCaptureCommand;
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, VideoInfo};

/// Fraction of the duration at which the still is taken.
pub const SEEK_FRACTION: f64 = 0.25;

/// Default JPEG encoder quality (0.0-1.0).
pub const DEFAULT_FRAME_QUALITY: f32 = 0.8;

const FRAME_FILE_NAME: &str = "frame.jpg";

/// Parameters for a single capture.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Position to seek to, in seconds
    pub timestamp: f64,
    /// JPEG quality (0.0-1.0)
    pub quality: f32,
    /// Where the encoded still must be written
    pub output_path: PathBuf,
}

/// Media decoding backend.
///
/// `load_metadata` must complete before `capture_frame` is issued; the
/// extractor awaits each step in order.
#[async_trait]
pub trait MediaDecoder: Send + Sync {
    /// Read duration and dimensions.
    async fn load_metadata(&self, input: &Path) -> MediaResult<VideoInfo>;

    /// Seek and encode one still to `request.output_path`.
    async fn capture_frame(&self, input: &Path, request: &CaptureRequest) -> MediaResult<()>;
}

/// Decoder backed by the `ffprobe` and `ffmpeg` binaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegDecoder;

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaDecoder for FfmpegDecoder {
    async fn load_metadata(&self, input: &Path) -> MediaResult<VideoInfo> {
        probe_video(input).await
    }

    async fn capture_frame(&self, input: &Path, request: &CaptureRequest) -> MediaResult<()> {
        StillCaptureCommand::new(input, &request.output_path)
            .at(request.timestamp)
            .quality(request.quality)
            .run()
            .await
    }
}

/// Extractor configuration.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Parent directory for per-call scratch directories
    pub work_dir: PathBuf,
    /// JPEG quality (0.0-1.0)
    pub quality: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("vcover"),
            quality: DEFAULT_FRAME_QUALITY,
        }
    }
}

/// Turns an uploaded video into a single representative still.
#[derive(Clone)]
pub struct FrameExtractor {
    decoder: Arc<dyn MediaDecoder>,
    config: ExtractorConfig,
}

impl FrameExtractor {
    /// Create an extractor over the given decoder.
    pub fn new(decoder: Arc<dyn MediaDecoder>, config: ExtractorConfig) -> Self {
        Self { decoder, config }
    }

    /// Extractor using ffmpeg with default settings.
    pub fn ffmpeg() -> Self {
        Self::new(Arc::new(FfmpegDecoder::new()), ExtractorConfig::default())
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the still at one quarter of the video's duration.
    pub async fn extract(&self, video: VideoSource) -> MediaResult<ExtractedFrame> {
        if video.is_empty() {
            return Err(MediaError::decode("Empty media"));
        }

        let staged = self.stage(&video).await?;
        let result = self.extract_staged(&staged).await;
        staged.release();

        match &result {
            Ok(frame) => info!(
                "Extracted {}x{} frame at {:.3}s ({} bytes)",
                frame.width,
                frame.height,
                frame.source_timestamp,
                frame.image.len()
            ),
            Err(e) => warn!("Frame extraction failed: {}", e),
        }
        result
    }

    /// Copy the source bytes into a fresh scratch directory.
    async fn stage(&self, video: &VideoSource) -> MediaResult<StagedMedia> {
        tokio::fs::create_dir_all(&self.config.work_dir)
            .await
            .map_err(|e| MediaError::Staging(format!("{}: {}", self.config.work_dir.display(), e)))?;

        let dir = tempfile::Builder::new()
            .prefix("vcover-")
            .tempdir_in(&self.config.work_dir)
            .map_err(|e| MediaError::Staging(e.to_string()))?;

        let extension = video.extension().unwrap_or_else(|| "media".to_string());
        let input = dir.path().join(format!("source.{}", extension));
        tokio::fs::write(&input, video.data())
            .await
            .map_err(|e| MediaError::Staging(e.to_string()))?;

        debug!("Staged {} bytes at {}", video.len(), input.display());
        Ok(StagedMedia { dir, input })
    }

    async fn extract_staged(&self, staged: &StagedMedia) -> MediaResult<ExtractedFrame> {
        let info = self.decoder.load_metadata(&staged.input).await?;
        if info.width == 0 || info.height == 0 {
            return Err(MediaError::render_surface(format!(
                "Video reports {}x{} pixels",
                info.width, info.height
            )));
        }

        let request = CaptureRequest {
            timestamp: seek_position(info.duration),
            quality: self.config.quality,
            output_path: staged.dir.path().join(FRAME_FILE_NAME),
        };
        debug!(
            "Seeking to {:.3}s of {:.3}s",
            request.timestamp, info.duration
        );
        self.decoder
            .capture_frame(&staged.input, &request)
            .await?;

        let data = tokio::fs::read(&request.output_path)
            .await
            .map_err(|e| MediaError::render_surface(format!("No frame written: {}", e)))?;
        if data.is_empty() {
            return Err(MediaError::render_surface("Encoded frame is empty"));
        }

        Ok(ExtractedFrame {
            image: ImagePayload::jpeg(data),
            source_timestamp: request.timestamp,
            width: info.width,
            height: info.height,
        })
    }
}

/// Seek target for a video of the given duration.
pub fn seek_position(duration: f64) -> f64 {
    if duration.is_finite() && duration > 0.0 {
        duration * SEEK_FRACTION
    } else {
        0.0
    }
}

/// Scratch directory holding the staged source and the captured still.
///
/// Dropping it also removes the directory; `release` does so eagerly and
/// reports cleanup problems.
struct StagedMedia {
    dir: TempDir,
    input: PathBuf,
}

impl StagedMedia {
    fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Released {}", path.display()),
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}
