//! Container and stream metadata via ffprobe.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// What the extractor needs to know before seeking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Seconds; 0.0 when the container does not report one
    pub duration: f64,
    /// Display width in pixels (rotation applied)
    pub width: u32,
    /// Display height in pixels (rotation applied)
    pub height: u32,
    pub codec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    format: Option<ProbeFormat>,
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    codec_name: Option<String>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    duration: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

impl ProbeStream {
    fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    /// Display matrix rotation, falling back to the legacy `rotate` tag.
    fn rotation(&self) -> i64 {
        let degrees = self
            .side_data_list
            .iter()
            .find_map(|sd| sd.rotation)
            .or_else(|| self.tags.get("rotate").and_then(|r| r.parse().ok()))
            .unwrap_or(0.0);
        (degrees.round() as i64).rem_euclid(360)
    }

    /// Frame size as displayed, which is what a captured still ends up as.
    fn display_size(&self) -> (u32, u32) {
        match self.rotation() {
            90 | 270 => (self.height, self.width),
            _ => (self.width, self.height),
        }
    }
}

/// Read duration and display dimensions of the first video stream.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::decode(format!(
            "Input does not exist: {}",
            path.display()
        )));
    }
    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args(["-v", "error", "-of", "json", "-show_format", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(MediaError::FfprobeFailed {
            message: format!("cannot read {}", path.display()),
            stderr: (!stderr.is_empty()).then_some(stderr),
        });
    }

    let info = parse_probe_output(&output.stdout)?;
    debug!(
        "Probed {}: {}x{}, {:.3}s, codec {:?}",
        path.display(),
        info.width,
        info.height,
        info.duration,
        info.codec
    );
    Ok(info)
}

fn parse_probe_output(stdout: &[u8]) -> MediaResult<VideoInfo> {
    let report: ProbeReport = serde_json::from_slice(stdout)?;

    let stream = report
        .streams
        .iter()
        .find(|s| s.is_video())
        .ok_or_else(|| MediaError::decode("No video track in input"))?;

    let duration = report
        .format
        .and_then(|f| f.duration)
        .or_else(|| stream.duration.clone())
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(0.0);

    let (width, height) = stream.display_size();
    Ok(VideoInfo {
        duration,
        width,
        height,
        codec: stream.codec_name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vertical_video() {
        let json = br#"{
            "streams": [
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264", "width": 1080, "height": 1920}
            ],
            "format": {"duration": "10.000000"}
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
        assert!((info.duration - 10.0).abs() < 1e-9);
        assert_eq!(info.codec.as_deref(), Some("h264"));
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080,
                 "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}
            ],
            "format": {"duration": "4.2"}
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
    }

    #[test]
    fn test_rotate_tag_is_honored() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 1280, "height": 720, "tags": {"rotate": "270"}}
            ]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!((info.width, info.height), (720, 1280));
    }

    #[test]
    fn test_stream_duration_fallback() {
        let json = br#"{"streams": [{"codec_type": "video", "width": 2, "height": 2, "duration": "6.5"}]}"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.duration, 6.5);
    }

    #[test]
    fn test_missing_video_stream_is_decode_error() {
        let json = br#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "3.0"}}"#;
        let err = parse_probe_output(json).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_garbage_output_is_decode_error() {
        let err = parse_probe_output(b"not json").unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_missing_duration_defaults_to_zero() {
        let json = br#"{"streams": [{"codec_type": "video", "width": 2, "height": 2}]}"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.duration, 0.0);
    }
}
