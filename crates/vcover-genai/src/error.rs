//! Inference client error types.

use thiserror::Error;
use vcover_models::PayloadError;

pub type GenAiResult<T> = Result<T, GenAiError>;

#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Gemini API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response contained no {0}")]
    EmptyResult(&'static str),

    #[error("Invalid image payload: {0}")]
    Payload(#[from] PayloadError),
}

impl GenAiError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// The call went through but the response had nothing usable.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, GenAiError::EmptyResult(_))
    }

    /// Transport or HTTP-level failure.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GenAiError::RequestFailed(_) | GenAiError::Api { .. }
        )
    }
}
