//! Frame extraction against real ffmpeg/ffprobe binaries.
//!
//! Skipped when the binaries are not on PATH.

use std::path::Path;
use std::process::Command;

use vcover_media::{check_ffmpeg, check_ffprobe, ExtractorConfig, FfmpegDecoder, FrameExtractor};
use vcover_models::VideoSource;

fn tools_available() -> bool {
    check_ffmpeg().is_ok() && check_ffprobe().is_ok()
}

fn render_test_video(path: &Path, seconds: u32) {
    let status = Command::new("ffmpeg")
        .args(["-y", "-v", "error", "-f", "lavfi", "-i"])
        .arg(format!("testsrc=size=360x640:rate=25:duration={}", seconds))
        .args(["-pix_fmt", "yuv420p", "-c:v", "mpeg4"])
        .arg(path)
        .status()
        .expect("spawn ffmpeg");
    assert!(status.success(), "ffmpeg could not render the fixture");
}

fn extractor(work_dir: &Path) -> FrameExtractor {
    FrameExtractor::new(
        std::sync::Arc::new(FfmpegDecoder::new()),
        ExtractorConfig {
            work_dir: work_dir.to_path_buf(),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn extracts_jpeg_at_quarter_of_ten_second_video() {
    if !tools_available() {
        eprintln!("ffmpeg/ffprobe not found, skipping");
        return;
    }

    let fixtures = tempfile::tempdir().unwrap();
    let video_path = fixtures.path().join("vertical.mp4");
    render_test_video(&video_path, 10);

    let work = tempfile::tempdir().unwrap();
    let bytes = std::fs::read(&video_path).unwrap();
    let frame = extractor(work.path())
        .extract(VideoSource::new(bytes).with_file_name("vertical.mp4"))
        .await
        .unwrap();

    assert!((frame.source_timestamp - 2.5).abs() < 0.1);
    assert_eq!((frame.width, frame.height), (360, 640));
    assert!(frame.is_vertical());
    assert_eq!(frame.image.mime_type, "image/jpeg");
    assert_eq!(&frame.image.data[..2], &[0xFF, 0xD8]);
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn corrupt_file_is_decode_error() {
    if !tools_available() {
        eprintln!("ffmpeg/ffprobe not found, skipping");
        return;
    }

    let work = tempfile::tempdir().unwrap();
    let garbage: Vec<u8> = (0u32..4096).map(|i| (i.wrapping_mul(7919) % 251) as u8).collect();

    for _ in 0..3 {
        let err = extractor(work.path())
            .extract(VideoSource::new(garbage.clone()))
            .await
            .unwrap_err();
        assert!(err.is_decode_error(), "unexpected error: {err}");
    }
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}
