//! Request pipeline.
//!
//! [`OgService`] owns the process-wide collaborators (font cache, glyph
//! resolver, rasterizer) and runs one request through
//! palette → assets → layout → raster → response.

use std::sync::Arc;

use crate::config::OgConfig;
use crate::error::{OgError, Result};
use crate::fetch::{AssetFetcher, HttpFetcher};
use crate::font::FontCache;
use crate::icon::{GlyphResolver, IconResolver, IconSlot};
use crate::layout::compose;
use crate::raster::Rasterizer;
use crate::request::RenderRequest;
use crate::response::{OgResponse, emit};
use crate::theme::resolve_palette;

/// Renders Open Graph images. Create one per process and share it.
pub struct OgService {
    config: OgConfig,
    glyphs: Arc<dyn GlyphResolver>,
    fonts: FontCache,
    rasterizer: Rasterizer,
}

impl OgService {
    /// Creates a service that reaches remote assets over HTTP.
    pub fn new(config: OgConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates a service using `fetcher` for every remote asset.
    pub fn with_fetcher(config: OgConfig, fetcher: Arc<dyn AssetFetcher>) -> Self {
        let timeout = config.fetch_timeout();
        let fonts = match &config.font_url {
            Some(url) => FontCache::new(url.clone(), fetcher.clone(), timeout),
            None => FontCache::disabled(fetcher.clone()),
        };
        let glyphs = Arc::new(IconResolver::new(
            config.icon_source.clone(),
            fetcher,
            timeout,
        ));

        Self {
            config,
            glyphs,
            fonts,
            rasterizer: Rasterizer::new(),
        }
    }

    /// Replaces the glyph resolver.
    pub fn with_glyph_resolver(mut self, glyphs: Arc<dyn GlyphResolver>) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn config(&self) -> &OgConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Renders one request to PNG bytes.
    #[tracing::instrument(
        skip_all,
        fields(icon = %request.icon_key, theme = %request.theme_key, emoji = request.emoji.is_some())
    )]
    pub async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let palette = resolve_palette(&request.theme_key, request.custom_color_hex.as_deref());

        let (slot, font) = match &request.emoji {
            Some(emoji) => (IconSlot::Emoji(emoji.clone()), self.fonts.get().await),
            None => {
                let (glyph, font) = tokio::join!(
                    self.glyphs.resolve(&request.icon_key, palette.primary()),
                    self.fonts.get()
                );
                tracing::debug!(?glyph, "icon resolved");
                (IconSlot::Glyph(glyph), font)
            }
        };

        let scene = compose(request, &palette, slot);
        let rasterizer = self.rasterizer.clone();
        tokio::task::spawn_blocking(move || rasterizer.render(&scene, &font))
            .await
            .map_err(|e| OgError::Task(e.to_string()))?
    }

    /// Renders a request and wraps the outcome as a response.
    pub async fn respond(&self, request: &RenderRequest) -> OgResponse {
        emit(self.render(request).await, &self.config.cache)
    }

    /// Handles a parsed parameter map or any iterator of key/value pairs.
    pub async fn handle<I, K, V>(&self, params: I) -> OgResponse
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.respond(&RenderRequest::from_pairs(params)).await
    }

    /// Handles a raw URL query string.
    pub async fn handle_query(&self, query: &str) -> OgResponse {
        self.respond(&RenderRequest::from_query(query)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use palette::Srgb;

    use super::*;
    use crate::error::FetchError;
    use crate::icon::ResolvedGlyph;

    struct Offline;

    impl AssetFetcher for Offline {
        fn fetch<'a>(&'a self, _url: &'a str) -> BoxFuture<'a, std::result::Result<Vec<u8>, FetchError>> {
            futures::future::ready(Err(FetchError::Status(503))).boxed()
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl GlyphResolver for Counting {
        fn resolve<'a>(&'a self, _icon_key: &'a str, _primary: Srgb<u8>) -> BoxFuture<'a, ResolvedGlyph> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(ResolvedGlyph::Fallback).boxed()
        }
    }

    fn offline_service() -> OgService {
        OgService::with_fetcher(OgConfig::offline(), Arc::new(Offline))
    }

    #[tokio::test]
    async fn emoji_skips_icon_resolution() {
        let counting = Arc::new(Counting::default());
        let service = offline_service().with_glyph_resolver(counting.clone());

        let response = service.handle([("emoji", "🚀"), ("icon", "rocket")]).await;
        assert!(response.is_success());
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

        service.handle([("icon", "rocket")]).await;
        assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn offline_config_never_fetches_fonts() {
        let service = offline_service();
        assert!(service.fonts().peek().is_some_and(|f| f.is_fallback()));
        let response = service.handle_query("?title=hello&theme=cyan").await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, "image/png");
    }

    #[tokio::test]
    async fn cache_policy_comes_from_config() {
        let config = OgConfig::offline().with_cache(crate::config::CachePolicy::immutable());
        let service = OgService::with_fetcher(config, Arc::new(Offline));
        let response = service.handle_query("").await;
        assert_eq!(response.cache_control, "public, max-age=31536000, immutable");
    }
}
