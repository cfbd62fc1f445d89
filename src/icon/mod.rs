//! Icon resolution.
//!
//! [`IconResolver`] turns an icon key into a [`ResolvedGlyph`]:
//!
//! 1. Normalize the key and resolve aliases ([`registry::canonical_key`]).
//! 2. Local path in the registry → returned without I/O.
//! 3. Otherwise, with a remote icon source configured and a plain kebab-case
//!    name, fetch the glyph colorized to the palette primary.
//! 4. Any failure, or no remote source → the built-in fallback glyph.
//!
//! Resolution is total; errors are logged and absorbed.

pub mod registry;

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use palette::Srgb;

use crate::config::IconSourceConfig;
use crate::error::FetchError;
use crate::fetch::{AssetFetcher, fetch_with_timeout};
use crate::raster::svg::{parse_svg, recolor_current_color};
use crate::theme::to_hex;

pub use registry::{FALLBACK_PATH, IconSource, canonical_key, icon_keys};

/// The graphic placed in the icon box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedGlyph {
    /// Local 24×24 path data, stroked in the primary color.
    Vector { path: &'static str },
    /// SVG markup fetched from the icon host, already colorized.
    Remote { svg: String },
    /// The built-in "unknown icon" mark, stroked in the primary color.
    Fallback,
}

impl ResolvedGlyph {
    /// Stroke path for vector and fallback glyphs.
    pub fn stroke_path(&self) -> Option<&'static str> {
        match self {
            Self::Vector { path } => Some(path),
            Self::Fallback => Some(FALLBACK_PATH),
            Self::Remote { .. } => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Contents of the icon slot: exactly one of a glyph or an emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSlot {
    Glyph(ResolvedGlyph),
    Emoji(String),
}

/// Resolves icon keys to glyphs. Implementations must never fail.
pub trait GlyphResolver: Send + Sync {
    fn resolve<'a>(&'a self, icon_key: &'a str, primary: Srgb<u8>) -> BoxFuture<'a, ResolvedGlyph>;
}

// ============================================================================
// IconResolver
// ============================================================================

/// Registry-first resolver with optional remote lookup.
pub struct IconResolver {
    source: Option<IconSourceConfig>,
    fetcher: Arc<dyn AssetFetcher>,
    timeout: Duration,
}

impl IconResolver {
    pub fn new(
        source: Option<IconSourceConfig>,
        fetcher: Arc<dyn AssetFetcher>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            fetcher,
            timeout,
        }
    }

    /// Resolver that only consults the local registry.
    pub fn local_only(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self::new(None, fetcher, Duration::ZERO)
    }

    async fn resolve_key(&self, icon_key: &str, primary: Srgb<u8>) -> ResolvedGlyph {
        let canonical = canonical_key(icon_key);

        let lookup_key = match registry::lookup(&canonical) {
            Some(IconSource::Path(path)) => return ResolvedGlyph::Vector { path },
            Some(IconSource::Remote(key)) => key.to_string(),
            None if is_icon_name(&canonical) => canonical,
            None => {
                tracing::debug!(icon = %icon_key, "not a valid icon name, using fallback");
                return ResolvedGlyph::Fallback;
            }
        };

        let Some(source) = &self.source else {
            tracing::debug!(icon = %icon_key, "no local glyph and no icon source, using fallback");
            return ResolvedGlyph::Fallback;
        };

        let hex = to_hex(primary);
        let url = source.glyph_url(&lookup_key, &hex);
        match self.fetch_glyph(&url, &hex).await {
            Ok(svg) => ResolvedGlyph::Remote { svg },
            Err(err) => {
                tracing::warn!(icon = %icon_key, %url, error = %err, "remote glyph unavailable, using fallback");
                ResolvedGlyph::Fallback
            }
        }
    }

    async fn fetch_glyph(&self, url: &str, hex: &str) -> Result<String, FetchError> {
        let body = fetch_with_timeout(self.fetcher.as_ref(), url, self.timeout).await?;
        let svg = String::from_utf8(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        let svg = recolor_current_color(&svg, hex);
        if parse_svg(&svg).is_none() {
            return Err(FetchError::Decode("payload is not a valid svg".into()));
        }
        Ok(svg)
    }
}

/// Unregistered keys must be plain kebab-case names before they reach the
/// icon host: no collection prefix, no path or query characters.
fn is_icon_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl GlyphResolver for IconResolver {
    fn resolve<'a>(&'a self, icon_key: &'a str, primary: Srgb<u8>) -> BoxFuture<'a, ResolvedGlyph> {
        self.resolve_key(icon_key, primary).boxed()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records requested URLs and replies with a fixed outcome.
    struct Scripted {
        urls: Mutex<Vec<String>>,
        reply: Result<&'static str, u16>,
    }

    impl Scripted {
        fn new(reply: Result<&'static str, u16>) -> Arc<Self> {
            Arc::new(Self {
                urls: Mutex::new(Vec::new()),
                reply,
            })
        }

        fn urls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    impl AssetFetcher for Scripted {
        fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, FetchError>> {
            self.urls.lock().unwrap().push(url.to_string());
            let reply = match self.reply {
                Ok(body) => Ok(body.as_bytes().to_vec()),
                Err(status) => Err(FetchError::Status(status)),
            };
            futures::future::ready(reply).boxed()
        }
    }

    const MAGENTA: Srgb<u8> = Srgb::new(255, 0, 255);
    const GLYPH: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path fill="currentColor" d="M0 0h24v24H0z"/></svg>"##;

    fn remote(fetcher: Arc<Scripted>) -> IconResolver {
        let source = IconSourceConfig {
            base_url: "http://icons.test".into(),
            default_collection: "lucide".into(),
        };
        IconResolver::new(Some(source), fetcher, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn local_glyph_needs_no_io() {
        let fetcher = Scripted::new(Err(500));
        let resolver = remote(fetcher.clone());
        let glyph = resolver.resolve("Code", MAGENTA).await;
        assert!(matches!(glyph, ResolvedGlyph::Vector { .. }));
        assert!(fetcher.urls().is_empty());
    }

    #[tokio::test]
    async fn aliases_resolve_locally() {
        let resolver = IconResolver::local_only(Scripted::new(Err(500)));
        let glyph = resolver.resolve("Gamepad2", MAGENTA).await;
        assert_eq!(glyph.stroke_path(), registry::lookup("gamepad").and_then(|s| match s {
            IconSource::Path(p) => Some(p),
            IconSource::Remote(_) => None,
        }));
    }

    #[tokio::test]
    async fn unknown_keys_fall_back_without_source() {
        let resolver = IconResolver::local_only(Scripted::new(Ok(GLYPH)));
        for key in ["doesnotexist123", "", "   ", "💥"] {
            assert!(resolver.resolve(key, MAGENTA).await.is_fallback(), "key {key:?}");
        }
    }

    #[tokio::test]
    async fn remote_glyph_is_fetched_colorized() {
        let fetcher = Scripted::new(Ok(GLYPH));
        let resolver = remote(fetcher.clone());
        let glyph = resolver.resolve("rocket-launch", MAGENTA).await;

        let ResolvedGlyph::Remote { svg } = glyph else {
            panic!("expected remote glyph");
        };
        assert!(svg.contains("#ff00ff"));
        assert!(!svg.contains("currentColor"));
        assert_eq!(
            fetcher.urls(),
            vec!["http://icons.test/lucide/rocket-launch.svg?color=%23ff00ff".to_string()]
        );
    }

    #[tokio::test]
    async fn registry_remote_entries_use_their_lookup_key() {
        let fetcher = Scripted::new(Ok(GLYPH));
        let resolver = remote(fetcher.clone());
        resolver.resolve("Twitter", MAGENTA).await;
        assert_eq!(
            fetcher.urls(),
            vec!["http://icons.test/simple-icons/x.svg?color=%23ff00ff".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_or_invalid_fetch_falls_back() {
        let resolver = remote(Scripted::new(Err(404)));
        assert!(resolver.resolve("doesnotexist123", MAGENTA).await.is_fallback());

        let resolver = remote(Scripted::new(Ok("<html>not found</html>")));
        assert!(resolver.resolve("doesnotexist123", MAGENTA).await.is_fallback());
    }

    #[tokio::test]
    async fn unsafe_keys_never_reach_the_icon_host() {
        let fetcher = Scripted::new(Ok(GLYPH));
        let resolver = remote(fetcher.clone());
        for key in ["../../admin/secret?x=1#", "evil:collection", "a/b", "name#frag", "💥"] {
            assert!(resolver.resolve(key, MAGENTA).await.is_fallback(), "key {key:?}");
        }
        assert!(fetcher.urls().is_empty());

        resolver.resolve("Rocket-Launch", MAGENTA).await;
        assert_eq!(
            fetcher.urls(),
            vec!["http://icons.test/lucide/rocket-launch.svg?color=%23ff00ff".to_string()]
        );
    }

    #[test]
    fn icon_names_are_kebab_case() {
        assert!(is_icon_name("rocket-launch-2"));
        assert!(!is_icon_name(""));
        assert!(!is_icon_name("a.b"));
        assert!(!is_icon_name("simple-icons:x"));
    }

    #[test]
    fn fallback_glyph_strokes_the_help_mark() {
        assert_eq!(ResolvedGlyph::Fallback.stroke_path(), Some(FALLBACK_PATH));
        assert_eq!(
            ResolvedGlyph::Remote { svg: String::new() }.stroke_path(),
            None
        );
    }
}
