//! Image and media payload types.
//!
//! Frames and covers travel between the extractor, the inference service and
//! callers as self-describing payloads: a MIME type plus the encoded bytes.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// MIME type of extracted frames.
pub const MIME_JPEG: &str = "image/jpeg";

/// MIME type assumed for generated covers when the service omits one.
pub const MIME_PNG: &str = "image/png";

/// Errors when decoding an encoded payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Not a data URL")]
    NotDataUrl,

    #[error("Data URL is not base64 encoded")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Encoded image bytes tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// MIME type (e.g. `image/jpeg`)
    pub mime_type: String,
    /// Encoded image bytes, base64 in serialized form
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl ImagePayload {
    /// Create a payload from a MIME type and encoded bytes.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// JPEG payload.
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self::new(MIME_JPEG, data)
    }

    /// PNG payload.
    pub fn png(data: Vec<u8>) -> Self {
        Self::new(MIME_PNG, data)
    }

    /// Decode a payload from standard base64.
    pub fn from_base64(mime_type: impl Into<String>, encoded: &str) -> Result<Self, PayloadError> {
        let data = STANDARD.decode(encoded.trim())?;
        Ok(Self::new(mime_type, data))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, PayloadError> {
        let rest = url.strip_prefix("data:").ok_or(PayloadError::NotDataUrl)?;
        let (header, encoded) = rest.split_once(',').ok_or(PayloadError::NotDataUrl)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(PayloadError::NotBase64)?;
        Self::from_base64(mime_type, encoded)
    }

    /// Standard base64 of the bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Whether the payload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Size of the encoded bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the MIME type names an image.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

/// User-supplied video bytes, consumed once by frame extraction.
///
/// No format validation happens here; unsupported media is rejected by the
/// decoder.
#[derive(Clone)]
pub struct VideoSource {
    data: Vec<u8>,
    file_name: Option<String>,
}

impl VideoSource {
    /// Wrap raw media bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            file_name: None,
        }
    }

    /// Attach the original file name (used for the staged file extension).
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Original file name, if known.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Extension of the original file name, lowercased.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSource")
            .field("len", &self.data.len())
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// A single still taken from a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFrame {
    /// Encoded still image
    pub image: ImagePayload,
    /// Position in the source video, in seconds
    pub source_timestamp: f64,
    /// Width in pixels (native to the video)
    pub width: u32,
    /// Height in pixels (native to the video)
    pub height: u32,
}

impl ExtractedFrame {
    /// Whether the frame is taller than it is wide.
    pub fn is_vertical(&self) -> bool {
        self.height > self.width
    }
}

/// The finished cover produced by the generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    /// Encoded cover image
    pub image: ImagePayload,
    /// When the cover was received
    pub created_at: DateTime<Utc>,
}

impl CoverImage {
    /// File name offered when the cover is saved.
    pub const DOWNLOAD_FILE_NAME: &'static str = "vcover.png";

    /// Wrap a generated image.
    pub fn new(image: ImagePayload) -> Self {
        Self {
            image,
            created_at: Utc::now(),
        }
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.image.data
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
