//! Fakes shared by the studio integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use vcover_genai::{
    GenAiError, GenAiResult, GenerateContentRequest, GenerateContentResponse, InferenceClient,
    InlineData, Part, GENERATION_MODEL, PLANNING_MODEL,
};
use vcover_media::{CaptureRequest, MediaDecoder, MediaError, MediaResult, VideoInfo};
use vcover_models::{ExtractedFrame, ImagePayload};

/// Scripted reply for one stage.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Image { mime_type: String, base64: String },
    NoParts,
    TransportError,
    /// The client itself panics mid-call.
    Panic,
}

/// In-memory inference service that records every request.
pub struct FakeInference {
    planning: Reply,
    generation: Reply,
    planning_calls: AtomicUsize,
    generation_calls: AtomicUsize,
    requests: Mutex<Vec<(String, GenerateContentRequest)>>,
    generation_gate: Option<Arc<Notify>>,
}

impl FakeInference {
    pub fn new(planning: Reply, generation: Reply) -> Self {
        Self {
            planning,
            generation,
            planning_calls: AtomicUsize::new(0),
            generation_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            generation_gate: None,
        }
    }

    /// Hold generation replies until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.generation_gate = Some(gate);
        self
    }

    pub fn planning_calls(&self) -> usize {
        self.planning_calls.load(Ordering::SeqCst)
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }

    pub fn requests_for(&self, model: &str) -> Vec<GenerateContentRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == model)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn respond(reply: &Reply) -> GenAiResult<GenerateContentResponse> {
        match reply {
            Reply::Text(text) => Ok(GenerateContentResponse::from_parts(vec![Part::text(
                text.clone(),
            )])),
            Reply::Image { mime_type, base64 } => {
                Ok(GenerateContentResponse::from_parts(vec![
                    Part::text("Here is the cover"),
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: mime_type.clone(),
                            data: base64.clone(),
                        }),
                        ..Default::default()
                    },
                ]))
            }
            Reply::NoParts => Ok(GenerateContentResponse::from_parts(vec![])),
            Reply::TransportError => Err(GenAiError::request_failed("connection reset by peer")),
            Reply::Panic => panic!("inference client bug"),
        }
    }
}

#[async_trait]
impl InferenceClient for FakeInference {
    async fn invoke(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenAiResult<GenerateContentResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        if model == PLANNING_MODEL {
            self.planning_calls.fetch_add(1, Ordering::SeqCst);
            Self::respond(&self.planning)
        } else if model == GENERATION_MODEL {
            self.generation_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.generation_gate {
                gate.notified().await;
            }
            Self::respond(&self.generation)
        } else {
            Err(GenAiError::Api {
                status: 404,
                body: format!("unknown model {}", model),
            })
        }
    }
}

/// Decoder that reports a fixed video and writes a fixed JPEG.
pub struct FakeDecoder {
    pub info: Option<VideoInfo>,
    pub seeks: Mutex<Vec<f64>>,
    pub panics: bool,
}

impl FakeDecoder {
    pub fn vertical(duration: f64) -> Self {
        Self {
            info: Some(VideoInfo {
                duration,
                width: 1080,
                height: 1920,
                codec: Some("h264".to_string()),
            }),
            seeks: Mutex::new(Vec::new()),
            panics: false,
        }
    }

    pub fn unreadable() -> Self {
        Self {
            info: None,
            seeks: Mutex::new(Vec::new()),
            panics: false,
        }
    }

    /// Panics while reading metadata.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::vertical(10.0)
        }
    }
}

pub const FAKE_JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

#[async_trait]
impl MediaDecoder for FakeDecoder {
    async fn load_metadata(&self, _input: &Path) -> MediaResult<VideoInfo> {
        if self.panics {
            panic!("decoder bug");
        }
        self.info
            .clone()
            .ok_or_else(|| MediaError::decode("Invalid data found when processing input"))
    }

    async fn capture_frame(&self, _input: &Path, request: &CaptureRequest) -> MediaResult<()> {
        self.seeks.lock().unwrap().push(request.timestamp);
        tokio::fs::write(&request.output_path, FAKE_JPEG).await?;
        Ok(())
    }
}

pub fn frame() -> ExtractedFrame {
    ExtractedFrame {
        image: ImagePayload::jpeg(FAKE_JPEG.to_vec()),
        source_timestamp: 2.5,
        width: 1080,
        height: 1920,
    }
}

/// "PNG" magic as base64, and its bytes.
pub const COVER_BASE64: &str = "iVBORw0KGgo=";
pub const COVER_BYTES: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub fn png_reply() -> Reply {
    Reply::Image {
        mime_type: "image/png".to_string(),
        base64: COVER_BASE64.to_string(),
    }
}
