//! The single-job cover session.
//!
//! A session holds the current frame, style, instruction and latest cover,
//! and owns the [`JobState`] that presentation code observes through a watch
//! channel. Every new job bumps an epoch; results and stage updates from an
//! older epoch are dropped.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};
use vcover_media::FrameExtractor;
use vcover_models::{
    CoverImage, DesignStyle, ExtractedFrame, FailureKind, JobOutcome, JobState, VideoSource,
};

use crate::config::StudioConfig;
use crate::error::{PipelineError, SessionError, SessionResult, Stage};
use crate::pipeline::CoverSynthesisPipeline;

/// Epoch counter plus the published state.
///
/// The epoch and the watch value change together under `epoch`, so a stale
/// job can never overwrite a state published by a newer one.
struct JobTracker {
    epoch: StdMutex<u64>,
    state: watch::Sender<JobState>,
}

impl JobTracker {
    fn new() -> Self {
        let (state, _) = watch::channel(JobState::Idle);
        Self {
            epoch: StdMutex::new(0),
            state,
        }
    }

    fn current(&self) -> std::sync::MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a new epoch and publish its first state.
    fn begin(&self, state: JobState) -> u64 {
        let mut epoch = self.current();
        *epoch += 1;
        self.state.send_replace(state);
        *epoch
    }

    fn is_current(&self, epoch: u64) -> bool {
        *self.current() == epoch
    }

    /// Publish `state` if `epoch` is still current.
    fn publish(&self, epoch: u64, state: JobState) -> bool {
        let current = self.current();
        if *current != epoch {
            debug!("Ignoring {} from superseded job", state);
            return false;
        }
        self.state.send_replace(state);
        true
    }
}

#[derive(Default)]
struct SessionInner {
    frame: Option<Arc<ExtractedFrame>>,
    style: DesignStyle,
    instruction: String,
    cover: Option<CoverImage>,
    last_error: Option<FailureKind>,
}

/// Owns the one active cover job and its inputs and result.
pub struct CoverSession {
    extractor: FrameExtractor,
    pipeline: Arc<CoverSynthesisPipeline>,
    tracker: Arc<JobTracker>,
    inner: Mutex<SessionInner>,
}

impl CoverSession {
    pub fn new(extractor: FrameExtractor, pipeline: CoverSynthesisPipeline) -> Self {
        Self {
            extractor,
            pipeline: Arc::new(pipeline),
            tracker: Arc::new(JobTracker::new()),
            inner: Mutex::new(SessionInner::default()),
        }
    }

    /// ffmpeg extraction plus the Gemini pipeline.
    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(
            FrameExtractor::new(
                Arc::new(vcover_media::FfmpegDecoder::new()),
                config.extractor.clone(),
            ),
            CoverSynthesisPipeline::from_config(config),
        )
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.tracker.state.subscribe()
    }

    pub fn state(&self) -> JobState {
        *self.tracker.state.borrow()
    }

    pub async fn frame(&self) -> Option<Arc<ExtractedFrame>> {
        self.inner.lock().await.frame.clone()
    }

    pub async fn cover(&self) -> Option<CoverImage> {
        self.inner.lock().await.cover.clone()
    }

    pub async fn last_error(&self) -> Option<FailureKind> {
        self.inner.lock().await.last_error
    }

    pub async fn style(&self) -> DesignStyle {
        self.inner.lock().await.style
    }

    pub async fn select_style(&self, style: DesignStyle) {
        self.inner.lock().await.style = style;
    }

    pub async fn instruction(&self) -> String {
        self.inner.lock().await.instruction.clone()
    }

    pub async fn set_instruction(&self, instruction: impl Into<String>) {
        self.inner.lock().await.instruction = instruction.into();
    }

    /// Extract a frame from a new video, replacing the current frame and
    /// clearing the previous cover.
    ///
    /// Any job still in flight is superseded.
    pub async fn load_video(&self, video: VideoSource) -> SessionResult<Arc<ExtractedFrame>> {
        let epoch = {
            let _inner = self.inner.lock().await;
            self.tracker.begin(JobState::ExtractingFrame)
        };
        info!("Loading video ({} bytes)", video.len());

        let extractor = self.extractor.clone();
        let result = match tokio::spawn(async move { extractor.extract(video).await }).await {
            Ok(result) => result.map_err(PipelineError::from),
            Err(e) => {
                error!("Frame extraction task aborted: {}", e);
                Err(PipelineError::TaskAborted {
                    stage: Stage::Extraction,
                    message: e.to_string(),
                })
            }
        };

        let mut inner = self.inner.lock().await;
        if !self.tracker.is_current(epoch) {
            return Err(SessionError::Superseded);
        }

        match result {
            Ok(frame) => {
                let frame = Arc::new(frame);
                inner.frame = Some(frame.clone());
                inner.cover = None;
                inner.last_error = None;
                self.tracker.publish(epoch, JobState::Idle);
                Ok(frame)
            }
            Err(e) => {
                let kind = e.kind();
                inner.last_error = Some(kind);
                self.tracker.publish(epoch, JobState::Failed(kind));
                Err(e.into())
            }
        }
    }

    /// Generate a cover from the current frame, style and instruction.
    pub async fn generate(&self) -> SessionResult<JobOutcome> {
        let (epoch, frame, style, instruction) = {
            let mut inner = self.inner.lock().await;
            if self.state().is_active() {
                return Err(SessionError::Busy);
            }
            let frame = inner.frame.clone().ok_or(SessionError::NoFrame)?;
            inner.last_error = None;
            let epoch = self.tracker.begin(JobState::PlanningLayout);
            (epoch, frame, inner.style, inner.instruction.clone())
        };
        info!("Generating {} cover", style);

        let pipeline = self.pipeline.clone();
        let tracker = self.tracker.clone();
        let task = tokio::spawn(async move {
            pipeline
                .synthesize_with_progress(&frame, &style.descriptor(), &instruction, |state| {
                    tracker.publish(epoch, state);
                })
                .await
        });
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Cover synthesis task aborted: {}", e);
                JobOutcome::Failure(FailureKind::GenerationFailure)
            }
        };

        let mut inner = self.inner.lock().await;
        if !self.tracker.is_current(epoch) {
            info!("Discarding cover from superseded job");
            return Err(SessionError::Superseded);
        }

        match &outcome {
            JobOutcome::Success(cover) => {
                inner.cover = Some(cover.clone());
                inner.last_error = None;
            }
            JobOutcome::Failure(kind) => inner.last_error = Some(*kind),
        }
        self.tracker.publish(epoch, outcome.final_state());
        Ok(outcome)
    }

    /// Drop the frame and cover and return to idle.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        self.tracker.begin(JobState::Idle);
        inner.frame = None;
        inner.cover = None;
        inner.last_error = None;
    }

    /// Write the latest cover to `dir` under the fixed download name.
    pub async fn save_cover(&self, dir: impl AsRef<Path>) -> SessionResult<PathBuf> {
        let cover = self.cover().await.ok_or(SessionError::NoCover)?;
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(CoverImage::DOWNLOAD_FILE_NAME);
        tokio::fs::write(&path, cover.bytes()).await?;
        info!("Saved cover to {}", path.display());
        Ok(path)
    }
}
