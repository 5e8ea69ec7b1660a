//! FFmpeg CLI wrapper for frame extraction.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - FFprobe metadata parsing (duration, rotated dimensions)
//! - The `FrameExtractor` that turns an uploaded video into one JPEG still

pub mod command;
pub mod error;
pub mod frame;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, jpeg_qscale, StillCaptureCommand};
pub use error::{ExtractionFailure, MediaError, MediaResult};
pub use frame::{
    seek_position, CaptureRequest, ExtractorConfig, FfmpegDecoder, FrameExtractor, MediaDecoder,
    DEFAULT_FRAME_QUALITY, SEEK_FRACTION,
};
pub use probe::{probe_video, VideoInfo};
