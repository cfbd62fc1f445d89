//! Error types for the rendering pipeline.
//!
//! Only failures that make a correct image impossible are represented by
//! [`OgError`]. Asset-fetch problems are reported as [`FetchError`] to the
//! component that issued the fetch, which degrades to a fallback instead of
//! propagating them.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, OgError>;

/// Fatal errors: the request cannot produce an image.
#[derive(Error, Debug)]
pub enum OgError {
    /// The generated scene markup could not be parsed as SVG.
    #[error("scene markup rejected: {0}")]
    Svg(String),

    /// The raster surface could not be allocated or drawn.
    #[error("rasterization failed: {0}")]
    Raster(String),

    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The blocking render task panicked or was cancelled.
    #[error("render task failed: {0}")]
    Task(String),

    /// Invalid configuration document.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The outbound asset client could not be constructed.
    #[error("asset client unavailable: {0}")]
    Client(#[from] FetchError),
}

impl OgError {
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }
}

/// Errors raised by an [`AssetFetcher`](crate::fetch::AssetFetcher).
///
/// These never reach the caller of the pipeline.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream returned an empty body")]
    Empty,

    #[error("undecodable payload: {0}")]
    Decode(String),
}
