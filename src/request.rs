//! Request parameters for one rendered image.

use std::collections::HashMap;

pub const DEFAULT_TITLE: &str = "PCSTYLE";
pub const DEFAULT_SUBTITLE: &str = "pcstyle.dev";
pub const DEFAULT_ICON: &str = "code";
pub const DEFAULT_THEME: &str = "magenta";

/// Fully defaulted render parameters.
///
/// Every field has a safe default, so no input can make construction fail.
/// Empty or whitespace-only values count as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub title: String,
    pub subtitle: String,
    pub icon_key: String,
    pub theme_key: String,
    pub custom_color_hex: Option<String>,
    pub emoji: Option<String>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            icon_key: DEFAULT_ICON.to_string(),
            theme_key: DEFAULT_THEME.to_string(),
            custom_color_hex: None,
            emoji: None,
        }
    }
}

impl RenderRequest {
    /// Builds a request from `(key, value)` pairs. Later duplicates win;
    /// unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let Some(value) = present(value.as_ref()) else {
                continue;
            };
            match key.as_ref() {
                "title" => request.title = value,
                "subtitle" => request.subtitle = value,
                "icon" => request.icon_key = value,
                "theme" => request.theme_key = value,
                "color" => request.custom_color_hex = Some(value),
                "emoji" => request.emoji = Some(value),
                _ => {}
            }
        }
        request
    }

    /// Builds a request from an already-parsed query map.
    pub fn from_map(params: &HashMap<String, String>) -> Self {
        Self::from_pairs(params.iter())
    }

    /// Builds a request from a raw query string (with or without the `?`).
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Encodes the request back into a query string, omitting defaults.
    pub fn to_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if self.title != DEFAULT_TITLE {
            query.append_pair("title", &self.title);
        }
        if self.subtitle != DEFAULT_SUBTITLE {
            query.append_pair("subtitle", &self.subtitle);
        }
        if self.icon_key != DEFAULT_ICON {
            query.append_pair("icon", &self.icon_key);
        }
        if self.theme_key != DEFAULT_THEME {
            query.append_pair("theme", &self.theme_key);
        }
        if let Some(color) = &self.custom_color_hex {
            query.append_pair("color", color);
        }
        if let Some(emoji) = &self.emoji {
            query.append_pair("emoji", emoji);
        }
        query.finish()
    }
}

fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
