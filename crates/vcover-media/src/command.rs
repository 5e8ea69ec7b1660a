//! ffmpeg invocation for single-still capture.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Arguments for grabbing one encoded still out of a video.
///
/// The seek is placed before `-i` so ffmpeg seeks the demuxer, then decodes
/// forward to the exact position.
#[derive(Debug, Clone)]
pub struct StillCaptureCommand {
    input: PathBuf,
    output: PathBuf,
    seek: Option<f64>,
    qscale: Option<u8>,
    log_level: &'static str,
}

impl StillCaptureCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            seek: None,
            qscale: None,
            log_level: "error",
        }
    }

    /// Position of the still, in seconds.
    pub fn at(mut self, seconds: f64) -> Self {
        self.seek = Some(seconds.max(0.0));
        self
    }

    /// Encoder quality in 0.0-1.0, mapped to `-q:v`.
    pub fn quality(mut self, quality: f32) -> Self {
        self.qscale = Some(jpeg_qscale(quality));
        self
    }

    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-hide_banner", "-v", self.log_level]
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(seek) = self.seek {
            args.push("-ss".into());
            args.push(format!("{:.3}", seek));
        }
        args.push("-i".into());
        args.push(self.input.to_string_lossy().into_owned());

        // One video frame, nothing else.
        args.extend(["-map", "0:v:0", "-frames:v", "1", "-an", "-sn", "-dn"].map(String::from));
        args.push("-c:v".into());
        args.push("mjpeg".into());
        if let Some(q) = self.qscale {
            args.push("-q:v".into());
            args.push(q.to_string());
        }

        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Run ffmpeg to completion, surfacing its stderr on failure.
    pub async fn run(&self) -> MediaResult<()> {
        check_ffmpeg()?;

        let args = self.args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(MediaError::ffmpeg_failed(
            format!("still capture from {} failed", self.input.display()),
            (!stderr.is_empty()).then_some(stderr),
            output.status.code(),
        ))
    }
}

/// Map a 0.0-1.0 encoder quality to an mjpeg qscale (2 best, 31 worst).
pub fn jpeg_qscale(quality: f32) -> u8 {
    let quality = if quality.is_finite() {
        quality.clamp(0.0, 1.0)
    } else {
        1.0
    };
    (2.0 + ((1.0 - quality) * 29.0).round()) as u8
}

pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
