//! Session state machine: loading, generating, superseding and saving.

mod common;

use std::sync::Arc;

use common::{png_reply, FakeDecoder, FakeInference, Reply, COVER_BYTES, FAKE_JPEG};
use tempfile::TempDir;
use tokio::sync::Notify;
use vcover_media::{ExtractorConfig, FrameExtractor};
use vcover_models::{CoverImage, DesignStyle, FailureKind, JobOutcome, JobState, VideoSource};
use vcover_studio::{CoverSession, CoverSynthesisPipeline, SessionError};

struct Harness {
    session: CoverSession,
    decoder: Arc<FakeDecoder>,
    inference: Arc<FakeInference>,
    _work: TempDir,
}

fn harness(decoder: FakeDecoder, inference: FakeInference) -> Harness {
    let work = TempDir::new().unwrap();
    let decoder = Arc::new(decoder);
    let inference = Arc::new(inference);
    let extractor = FrameExtractor::new(
        decoder.clone(),
        ExtractorConfig {
            work_dir: work.path().to_path_buf(),
            quality: 0.8,
        },
    );
    let session = CoverSession::new(
        extractor,
        CoverSynthesisPipeline::with_client(inference.clone()),
    );
    Harness {
        session,
        decoder,
        inference,
        _work: work,
    }
}

fn happy() -> FakeInference {
    FakeInference::new(Reply::Text("Title top-left".to_string()), png_reply())
}

fn video() -> VideoSource {
    VideoSource::new(vec![0u8; 64]).with_file_name("clip.mp4")
}

#[tokio::test]
async fn load_video_extracts_quarter_frame() {
    let h = harness(FakeDecoder::vertical(10.0), happy());

    let frame = h.session.load_video(video()).await.unwrap();

    assert_eq!(frame.source_timestamp, 2.5);
    assert_eq!((frame.width, frame.height), (1080, 1920));
    assert_eq!(frame.image.data, FAKE_JPEG);
    assert_eq!(*h.decoder.seeks.lock().unwrap(), vec![2.5]);
    assert_eq!(h.session.state(), JobState::Idle);
    assert!(h.session.frame().await.is_some());
}

#[tokio::test]
async fn unreadable_video_fails_as_unsupported_media() {
    let h = harness(FakeDecoder::unreadable(), happy());

    let err = h.session.load_video(video()).await.unwrap_err();

    assert!(matches!(err, SessionError::Job(_)));
    assert_eq!(err.failure_kind(), Some(FailureKind::UnsupportedMedia));
    assert_eq!(
        h.session.state(),
        JobState::Failed(FailureKind::UnsupportedMedia)
    );
    assert_eq!(
        h.session.last_error().await,
        Some(FailureKind::UnsupportedMedia)
    );
    assert!(h.session.frame().await.is_none());
    assert_eq!(h.inference.planning_calls(), 0);
}

#[tokio::test]
async fn generate_without_frame_is_rejected() {
    let h = harness(FakeDecoder::vertical(10.0), happy());

    let err = h.session.generate().await.unwrap_err();

    assert!(matches!(err, SessionError::NoFrame));
    assert_eq!(h.session.state(), JobState::Idle);
    assert_eq!(h.inference.planning_calls(), 0);
}

#[tokio::test]
async fn generate_stores_and_saves_cover() {
    let h = harness(FakeDecoder::vertical(8.0), happy());
    h.session.load_video(video()).await.unwrap();
    h.session.select_style(DesignStyle::Cyberpunk).await;
    h.session.set_instruction("neon title 'NIGHT'").await;

    let outcome = h.session.generate().await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(h.session.state(), JobState::Succeeded);
    let cover = h.session.cover().await.unwrap();
    assert_eq!(cover.bytes(), &COVER_BYTES);

    let prompt: String = h
        .inference
        .requests_for(vcover_genai::GENERATION_MODEL)[0]
        .texts()
        .collect();
    assert!(prompt.contains("neon title 'NIGHT'"));
    assert!(prompt.contains(DesignStyle::Cyberpunk.descriptor().as_str()));

    let out = TempDir::new().unwrap();
    let path = h.session.save_cover(out.path()).await.unwrap();
    assert_eq!(path, out.path().join(CoverImage::DOWNLOAD_FILE_NAME));
    assert_eq!(std::fs::read(&path).unwrap(), COVER_BYTES);
}

#[tokio::test]
async fn failed_generation_is_retryable() {
    let h = harness(
        FakeDecoder::vertical(10.0),
        FakeInference::new(Reply::TransportError, png_reply()),
    );
    h.session.load_video(video()).await.unwrap();

    let outcome = h.session.generate().await.unwrap();
    assert_eq!(outcome, JobOutcome::Failure(FailureKind::GenerationFailure));
    assert_eq!(
        h.session.state(),
        JobState::Failed(FailureKind::GenerationFailure)
    );
    assert!(h.session.cover().await.is_none());

    // The frame survives, so another attempt runs.
    h.session.generate().await.unwrap();
    assert_eq!(h.inference.planning_calls(), 2);
}

#[tokio::test]
async fn save_without_cover_is_rejected() {
    let h = harness(FakeDecoder::vertical(10.0), happy());
    let out = TempDir::new().unwrap();

    let err = h.session.save_cover(out.path()).await.unwrap_err();

    assert!(matches!(err, SessionError::NoCover));
    assert!(!out.path().join(CoverImage::DOWNLOAD_FILE_NAME).exists());
}

#[tokio::test]
async fn second_generate_while_running_is_busy() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakeDecoder::vertical(10.0), happy().gated(gate.clone()));
    h.session.load_video(video()).await.unwrap();
    let session = Arc::new(h.session);
    let mut states = session.subscribe();

    let running = tokio::spawn({
        let session = session.clone();
        async move { session.generate().await }
    });
    states
        .wait_for(|s| *s == JobState::GeneratingImage)
        .await
        .unwrap();

    let err = session.generate().await.unwrap_err();
    assert!(matches!(err, SessionError::Busy));

    gate.notify_one();
    let outcome = running.await.unwrap().unwrap();
    assert!(outcome.is_success());
    assert_eq!(h.inference.generation_calls(), 1);
    assert_eq!(session.state(), JobState::Succeeded);
}

#[tokio::test]
async fn reset_discards_in_flight_result() {
    let gate = Arc::new(Notify::new());
    let h = harness(FakeDecoder::vertical(10.0), happy().gated(gate.clone()));
    h.session.load_video(video()).await.unwrap();
    let session = Arc::new(h.session);
    let mut states = session.subscribe();

    let running = tokio::spawn({
        let session = session.clone();
        async move { session.generate().await }
    });
    states
        .wait_for(|s| *s == JobState::GeneratingImage)
        .await
        .unwrap();

    session.reset().await;
    gate.notify_one();

    let result = running.await.unwrap();
    assert!(matches!(result, Err(SessionError::Superseded)));
    assert!(session.cover().await.is_none());
    assert!(session.frame().await.is_none());
    assert_eq!(session.state(), JobState::Idle);
}

#[tokio::test]
async fn new_video_clears_previous_cover() {
    let h = harness(FakeDecoder::vertical(10.0), happy());
    h.session.load_video(video()).await.unwrap();
    h.session.generate().await.unwrap();
    assert!(h.session.cover().await.is_some());

    h.session.load_video(video()).await.unwrap();

    assert!(h.session.cover().await.is_none());
    assert_eq!(h.session.state(), JobState::Idle);
}

#[tokio::test]
async fn panicking_inference_is_generation_failure() {
    let h = harness(
        FakeDecoder::vertical(10.0),
        FakeInference::new(Reply::Text("Title top-left".to_string()), Reply::Panic),
    );
    h.session.load_video(video()).await.unwrap();

    let outcome = h.session.generate().await.unwrap();

    assert_eq!(outcome, JobOutcome::Failure(FailureKind::GenerationFailure));
    assert_eq!(
        h.session.state(),
        JobState::Failed(FailureKind::GenerationFailure)
    );
    assert_eq!(
        h.session.last_error().await,
        Some(FailureKind::GenerationFailure)
    );
    assert!(h.session.cover().await.is_none());
}

#[tokio::test]
async fn panicking_decoder_is_unsupported_media() {
    let h = harness(FakeDecoder::panicking(), happy());

    let err = h.session.load_video(video()).await.unwrap_err();

    assert_eq!(err.failure_kind(), Some(FailureKind::UnsupportedMedia));
    assert_eq!(
        err.user_message(),
        Some(FailureKind::UnsupportedMedia.user_message())
    );
    assert_eq!(
        h.session.state(),
        JobState::Failed(FailureKind::UnsupportedMedia)
    );
    assert!(h.session.frame().await.is_none());
}

#[tokio::test]
async fn failed_reload_keeps_previous_frame() {
    let h = harness(FakeDecoder::vertical(10.0), happy());
    let first = h.session.load_video(video()).await.unwrap();

    // An empty upload cannot be decoded.
    let err = h
        .session
        .load_video(VideoSource::new(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(err.failure_kind(), Some(FailureKind::UnsupportedMedia));
    assert_eq!(
        h.session.state(),
        JobState::Failed(FailureKind::UnsupportedMedia)
    );

    let kept = h.session.frame().await.expect("previous frame kept");
    assert!(Arc::ptr_eq(&kept, &first));

    // The kept frame still feeds a new job.
    assert!(h.session.generate().await.unwrap().is_success());
}
