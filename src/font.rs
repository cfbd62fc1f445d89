//! Process-wide font asset cache.
//!
//! The bold monospace face is fetched at most once per [`FontCache`]. The
//! first caller starts the fetch on a background task; every caller,
//! including ones that arrive after an earlier caller gave up, awaits that
//! same load. A failed fetch is remembered as [`FontAsset::Fallback`] and
//! never retried.

use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use resvg::usvg::fontdb::{Database, Source};

use crate::error::FetchError;
use crate::fetch::{AssetFetcher, fetch_with_timeout};

/// Family stack used when no custom face is available.
pub const FALLBACK_FAMILY: &str = "'DejaVu Sans Mono', 'Liberation Mono', monospace";

static SYSTEM_FONTS: LazyLock<Arc<Database>> = LazyLock::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system fonts");
    Arc::new(db)
});

/// A successfully fetched and decoded font face.
pub struct LoadedFont {
    family: String,
    data: Arc<Vec<u8>>,
    db: Arc<Database>,
}

impl LoadedFont {
    /// Decodes raw font bytes into a copy of the system font database, so
    /// glyphs the face does not cover still resolve. Blocking.
    pub fn decode(data: Vec<u8>) -> Result<Self, FetchError> {
        let data = Arc::new(data);
        let mut db = Database::clone(&SYSTEM_FONTS);
        let source: Arc<dyn AsRef<[u8]> + Send + Sync> = data.clone();
        let ids = db.load_font_source(Source::Binary(source));
        let family = ids
            .first()
            .and_then(|id| db.face(*id))
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| FetchError::Decode("payload contains no font faces".into()))?;

        Ok(Self {
            family,
            data,
            db: Arc::new(db),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The font a render uses.
pub enum FontAsset {
    Loaded(LoadedFont),
    /// System default monospace, no custom payload.
    Fallback,
}

impl FontAsset {
    /// CSS family list for SVG text runs.
    pub fn family_list(&self) -> String {
        match self {
            Self::Loaded(font) => format!("'{}', {}", font.family, FALLBACK_FAMILY),
            Self::Fallback => FALLBACK_FAMILY.to_string(),
        }
    }

    /// Font database for the rasterizer. Shared, never copied per request.
    pub fn database(&self) -> Arc<Database> {
        match self {
            Self::Loaded(font) => font.db.clone(),
            Self::Fallback => SYSTEM_FONTS.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(font) => f
                .debug_struct("Loaded")
                .field("family", &font.family)
                .field("bytes", &font.data.len())
                .finish(),
            Self::Fallback => f.write_str("Fallback"),
        }
    }
}

// ============================================================================
// FontCache
// ============================================================================

type PendingFont = Shared<BoxFuture<'static, Arc<FontAsset>>>;

/// Single-flight, load-once font cache.
pub struct FontCache {
    url: Option<String>,
    fetcher: Arc<dyn AssetFetcher>,
    timeout: Duration,
    settled: OnceLock<Arc<FontAsset>>,
    pending: OnceLock<PendingFont>,
}

impl FontCache {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn AssetFetcher>, timeout: Duration) -> Self {
        Self {
            url: Some(url.into()),
            fetcher,
            timeout,
            settled: OnceLock::new(),
            pending: OnceLock::new(),
        }
    }

    /// A cache already settled on the fallback font; never fetches.
    pub fn disabled(fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            url: None,
            fetcher,
            timeout: Duration::ZERO,
            settled: OnceLock::from(Arc::new(FontAsset::Fallback)),
            pending: OnceLock::new(),
        }
    }

    /// Returns the cached font, loading it on first use.
    ///
    /// The load runs on its own task: a caller dropped mid-fetch does not
    /// cancel it, and later callers join the same load.
    pub async fn get(&self) -> Arc<FontAsset> {
        if let Some(font) = self.settled.get() {
            return font.clone();
        }
        let pending = self.pending.get_or_init(|| self.start()).clone();
        let font = pending.await;
        self.settled.get_or_init(|| font).clone()
    }

    /// Returns the font if loading already finished.
    pub fn peek(&self) -> Option<Arc<FontAsset>> {
        self.settled
            .get()
            .cloned()
            .or_else(|| self.pending.get().and_then(|p| p.peek().cloned()))
    }

    fn start(&self) -> PendingFont {
        let task = tokio::spawn(load(self.url.clone(), self.fetcher.clone(), self.timeout));
        async move {
            task.await.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "font task failed, using system fallback");
                Arc::new(FontAsset::Fallback)
            })
        }
        .boxed()
        .shared()
    }
}

async fn load(
    url: Option<String>,
    fetcher: Arc<dyn AssetFetcher>,
    timeout: Duration,
) -> Arc<FontAsset> {
    let Some(url) = url else {
        return Arc::new(FontAsset::Fallback);
    };

    let loaded = match fetch_with_timeout(fetcher.as_ref(), &url, timeout).await {
        // Decoding scans the system font directories.
        Ok(bytes) => tokio::task::spawn_blocking(move || LoadedFont::decode(bytes))
            .await
            .unwrap_or_else(|e| Err(FetchError::Decode(e.to_string()))),
        Err(err) => Err(err),
    };

    let asset = match loaded {
        Ok(font) => {
            tracing::info!(family = %font.family, bytes = font.data.len(), "font cached");
            FontAsset::Loaded(font)
        }
        Err(err) => {
            tracing::warn!(%url, error = %err, "font unavailable, using system fallback");
            FontAsset::Fallback
        }
    };
    Arc::new(asset)
}
