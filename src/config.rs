//! Serializable service configuration.
//!
//! An [`OgConfig`] names the remote asset hosts, the fetch timeout and the
//! cache policy stamped on successful responses. It round-trips through JSON
//! so deployments can keep it next to the binary.
//!
//! # Example
//!
//! ```
//! use og_renderer::{CachePolicy, OgConfig};
//!
//! let config = OgConfig::offline().with_cache(CachePolicy::immutable());
//! let json = config.to_json().unwrap();
//! let restored = OgConfig::from_json(&json).unwrap();
//! assert!(restored.font_url.is_none());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Bold monospace face fetched for the title and subtitle runs.
pub const DEFAULT_FONT_URL: &str =
    "https://github.com/JetBrains/JetBrainsMono/raw/master/fonts/ttf/JetBrainsMono-ExtraBold.ttf";

/// Icon host answering `/{collection}/{name}.svg?color=...`.
pub const DEFAULT_ICON_BASE_URL: &str = "https://api.iconify.design";

pub const DEFAULT_ICON_COLLECTION: &str = "lucide";

pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// Icon Source
// ============================================================================

/// Remote icon host used when a key is not in the local registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSourceConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,

    /// Collection used for keys that carry no `collection:` prefix.
    #[serde(default = "default_collection")]
    pub default_collection: String,
}

impl Default for IconSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ICON_BASE_URL.to_string(),
            default_collection: default_collection(),
        }
    }
}

impl IconSourceConfig {
    /// Builds the glyph URL for a `collection:name` or bare `name` lookup key,
    /// asking the host to colorize the glyph with `hex` (`#rrggbb`).
    pub fn glyph_url(&self, lookup_key: &str, hex: &str) -> String {
        let (collection, name) = lookup_key
            .split_once(':')
            .unwrap_or((self.default_collection.as_str(), lookup_key));
        format!(
            "{}/{}/{}.svg?color={}",
            self.base_url.trim_end_matches('/'),
            encode(collection),
            encode(name),
            encode(hex)
        )
    }
}

/// Percent-encodes one URL component; `/`, `?`, `#` and `:` cannot survive.
fn encode(component: &str) -> String {
    url::form_urlencoded::byte_serialize(component.as_bytes()).collect()
}

fn default_collection() -> String {
    DEFAULT_ICON_COLLECTION.to_string()
}

// ============================================================================
// Cache Policy
// ============================================================================

/// `Cache-Control` policy for successful image responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachePolicy {
    /// Browser max-age in seconds.
    pub max_age: u64,

    /// Shared-cache max-age in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_max_age: Option<u64>,

    /// Marks the response immutable (for deployments with a frozen config).
    #[serde(default)]
    pub immutable: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age: 3_600,
            s_max_age: Some(86_400),
            immutable: false,
        }
    }
}

impl CachePolicy {
    /// One year, immutable.
    pub fn immutable() -> Self {
        Self {
            max_age: 31_536_000,
            s_max_age: None,
            immutable: true,
        }
    }

    /// Renders the policy as a `Cache-Control` header value.
    pub fn header_value(&self) -> String {
        let mut value = format!("public, max-age={}", self.max_age);
        if let Some(s_max_age) = self.s_max_age {
            value.push_str(&format!(", s-maxage={s_max_age}"));
        }
        if self.immutable {
            value.push_str(", immutable");
        }
        value
    }
}

// ============================================================================
// OgConfig
// ============================================================================

/// Configuration for an [`OgService`](crate::OgService).
///
/// # JSON Format
///
/// ```json
/// {
///   "fontUrl": "https://example.com/Mono-Bold.ttf",
///   "iconSource": { "baseUrl": "https://api.iconify.design", "defaultCollection": "lucide" },
///   "fetchTimeoutMs": 5000,
///   "cache": { "maxAge": 3600, "sMaxAge": 86400, "immutable": false }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgConfig {
    /// Font to fetch once per process. `null` renders with the system font;
    /// an omitted field means [`DEFAULT_FONT_URL`].
    #[serde(default = "default_font_url")]
    pub font_url: Option<String>,

    /// Remote icon host. `null` disables remote glyph lookup; an omitted
    /// field means the default host.
    #[serde(default = "default_icon_source")]
    pub icon_source: Option<IconSourceConfig>,

    /// Upper bound for every outbound fetch.
    #[serde(default = "default_timeout_ms")]
    pub fetch_timeout_ms: u64,

    #[serde(default)]
    pub cache: CachePolicy,
}

impl Default for OgConfig {
    fn default() -> Self {
        Self {
            font_url: Some(DEFAULT_FONT_URL.to_string()),
            icon_source: Some(IconSourceConfig::default()),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            cache: CachePolicy::default(),
        }
    }
}

impl OgConfig {
    /// A configuration that never touches the network.
    pub fn offline() -> Self {
        Self {
            font_url: None,
            icon_source: None,
            ..Self::default()
        }
    }

    pub fn with_font_url(mut self, url: impl Into<String>) -> Self {
        self.font_url = Some(url.into());
        self
    }

    pub fn with_icon_source(mut self, source: IconSourceConfig) -> Self {
        self.icon_source = Some(source);
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn default_font_url() -> Option<String> {
    Some(DEFAULT_FONT_URL.to_string())
}

fn default_icon_source() -> Option<IconSourceConfig> {
    Some(IconSourceConfig::default())
}

fn default_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

// ============================================================================
// Tests
// ============================================================================
