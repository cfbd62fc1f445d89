//! og-renderer: Dynamic Open Graph image rendering
//!
//! This crate turns a handful of request parameters (title, subtitle, icon,
//! theme, custom color, emoji) into a 1200×630 PNG social preview card in a
//! fixed terminal-style visual language.
//!
//! # Example
//!
//! ```no_run
//! use og_renderer::{OgConfig, OgService};
//!
//! # async fn run() -> og_renderer::Result<()> {
//! let service = OgService::new(OgConfig::default())?;
//!
//! let response = service
//!     .handle_query("title=Hello%20World&theme=custom&color=00ff00&icon=rocket")
//!     .await;
//! assert_eq!(response.content_type, "image/png");
//! # Ok(())
//! # }
//! ```
//!
//! # Degraded Operation
//!
//! Remote assets are optional. A font or icon host that is unreachable,
//! slow, or returns garbage never fails a request: the font falls back to
//! the system monospace family and the icon to a built-in question mark.
//! Use [`OgConfig::offline`] to skip remote assets entirely:
//!
//! ```no_run
//! use og_renderer::{OgConfig, OgService, RenderRequest};
//!
//! # async fn run() -> og_renderer::Result<()> {
//! let service = OgService::new(OgConfig::offline())?;
//! let png = service.render(&RenderRequest::default()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod fetch;
mod font;
mod icon;
mod layout;
mod raster;
mod request;
mod response;
mod scene;
mod service;
mod theme;

pub use config::{CachePolicy, IconSourceConfig, OgConfig};
pub use error::{FetchError, OgError, Result};
pub use fetch::{AssetFetcher, HttpFetcher};
pub use font::{FontAsset, FontCache, LoadedFont};
pub use icon::{
    GlyphResolver, IconResolver, IconSlot, IconSource, ResolvedGlyph, canonical_key, icon_keys,
};
pub use layout::{compose, estimate_width, wrap_title};
pub use raster::{Rasterizer, encode_png};
pub use raster::svg::render_svg;
pub use request::RenderRequest;
pub use response::{OgResponse, emit};
pub use scene::{
    Anchor, Frame, Glow, Group, Node, Paint, Scene, Stroke, TextRun, TextSpan, ZLayer,
};
pub use service::OgService;
pub use theme::{Palette, Translucent, default_palette, parse_hex, resolve_palette, theme_names};
