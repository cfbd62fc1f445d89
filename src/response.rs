//! Response emission.

use crate::config::CachePolicy;
use crate::error::OgError;

pub const PNG_CONTENT_TYPE: &str = "image/png";
pub const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const NO_STORE: &str = "no-store";

/// What the HTTP layer sends back: status, headers and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: String,
    pub body: Vec<u8>,
}

impl OgResponse {
    /// `200 image/png` with the configured cache policy.
    pub fn image(png: Vec<u8>, cache: &CachePolicy) -> Self {
        Self {
            status: 200,
            content_type: PNG_CONTENT_TYPE,
            cache_control: cache.header_value(),
            body: png,
        }
    }

    /// `500 text/plain` carrying the error message, never cached.
    pub fn error(err: &OgError) -> Self {
        Self {
            status: 500,
            content_type: ERROR_CONTENT_TYPE,
            cache_control: NO_STORE.to_string(),
            body: err.to_string().into_bytes(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Turns a pipeline outcome into a response.
pub fn emit(outcome: Result<Vec<u8>, OgError>, cache: &CachePolicy) -> OgResponse {
    match outcome {
        Ok(png) => OgResponse::image(png, cache),
        Err(err) => {
            tracing::warn!(error = %err, "render failed");
            OgResponse::error(&err)
        }
    }
}
