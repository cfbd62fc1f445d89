//! Theme palettes.
//!
//! [`resolve_palette`] maps a theme key (or a custom hex color) to a concrete
//! [`Palette`]. Resolution is total: unknown keys and unparsable colors fall
//! back to the magenta palette.

use palette::{Alpha, Hsl, IntoColor, Srgb};

/// Alpha of the translucent secondary color.
pub const SECONDARY_ALPHA: f32 = 0.2;

/// Alpha used for glow effects (frame, icon box, title shadow).
pub const GLOW_ALPHA: f32 = 0.4;

/// Lightness of the near-black panel fill behind the icon.
const PANEL_LIGHTNESS: f32 = 0.03;

pub const CUSTOM_THEME: &str = "custom";

/// An opaque primary color at a translucent alpha.
pub type Translucent = Alpha<Srgb<u8>, f32>;

/// Colors used by one rendered image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    primary: Srgb<u8>,
    secondary: Translucent,
    pub accent_glow: Option<Srgb<u8>>,
}

impl Palette {
    /// Creates a palette whose secondary color is derived from `primary`.
    pub fn new(primary: Srgb<u8>, accent_glow: Option<Srgb<u8>>) -> Self {
        Self {
            primary,
            secondary: Alpha {
                color: primary,
                alpha: SECONDARY_ALPHA,
            },
            accent_glow,
        }
    }

    pub fn primary(&self) -> Srgb<u8> {
        self.primary
    }

    pub fn secondary(&self) -> Translucent {
        self.secondary
    }

    /// Glow color: the theme override if any, otherwise the primary.
    pub fn glow(&self) -> Srgb<u8> {
        self.accent_glow.unwrap_or(self.primary)
    }

    /// The primary color darkened to near-black, keeping its hue.
    pub fn panel_fill(&self) -> Srgb<u8> {
        let rgb: Srgb = self.primary.into_format();
        let mut hsl: Hsl = rgb.into_color();
        hsl.lightness = hsl.lightness.min(PANEL_LIGHTNESS);
        let darkened: Srgb = hsl.into_color();
        darkened.into_format()
    }

    pub fn primary_hex(&self) -> String {
        to_hex(self.primary)
    }
}

/// Formats a color as `#rrggbb`.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

// ============================================================================
// Named Themes
// ============================================================================

struct ThemeDef {
    name: &'static str,
    primary: (u8, u8, u8),
    glow: Option<(u8, u8, u8)>,
}

const THEMES: &[ThemeDef] = &[
    ThemeDef { name: "magenta", primary: (0xff, 0x00, 0xff), glow: None },
    ThemeDef { name: "cyan", primary: (0x00, 0xff, 0xff), glow: None },
    ThemeDef { name: "emerald", primary: (0x10, 0xb9, 0x81), glow: Some((0x34, 0xd3, 0x99)) },
    ThemeDef { name: "violet", primary: (0x8b, 0x5c, 0xf6), glow: None },
    ThemeDef { name: "roxi", primary: (0xff, 0x4f, 0xa3), glow: Some((0xff, 0x7a, 0xb8)) },
];

impl ThemeDef {
    fn palette(&self) -> Palette {
        let (r, g, b) = self.primary;
        Palette::new(
            Srgb::new(r, g, b),
            self.glow.map(|(r, g, b)| Srgb::new(r, g, b)),
        )
    }
}

/// Names of the built-in themes, default first.
pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|t| t.name)
}

/// The default (magenta) palette.
pub fn default_palette() -> Palette {
    THEMES[0].palette()
}

/// Resolves a theme key and optional custom color to a palette.
pub fn resolve_palette(theme_key: &str, custom_color_hex: Option<&str>) -> Palette {
    let key = theme_key.trim().to_ascii_lowercase();

    if key == CUSTOM_THEME {
        return match custom_color_hex.and_then(parse_hex) {
            Some(primary) => Palette::new(primary, None),
            None => {
                tracing::debug!(color = ?custom_color_hex, "custom theme without usable color, using default");
                default_palette()
            }
        };
    }

    match THEMES.iter().find(|t| t.name == key) {
        Some(theme) => theme.palette(),
        None => {
            tracing::debug!(theme = %key, "unknown theme, using default");
            default_palette()
        }
    }
}

/// Parses `rgb`, `rrggbb`, `#rgb` or `#rrggbb`.
pub fn parse_hex(raw: &str) -> Option<Srgb<u8>> {
    let raw = raw.trim();
    let normalized = if raw.starts_with('#') {
        raw.to_string()
    } else {
        format!("#{raw}")
    };
    normalized.parse::<Srgb<u8>>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_themes_fall_back_to_magenta() {
        for key in ["", "nope", "MAGENTAA", "123", "custom-ish"] {
            assert_eq!(resolve_palette(key, None), default_palette(), "key {key:?}");
        }
        assert_eq!(default_palette().primary_hex(), "#ff00ff");
    }

    #[test]
    fn named_themes_are_case_insensitive() {
        assert_eq!(resolve_palette("CYAN", None).primary_hex(), "#00ffff");
        assert_eq!(resolve_palette(" violet ", None).primary_hex(), "#8b5cf6");
    }

    #[test]
    fn custom_hex_with_or_without_hash() {
        for color in ["00ff00", "#00ff00"] {
            let palette = resolve_palette("custom", Some(color));
            assert_eq!(palette.primary(), Srgb::new(0, 255, 0));
            assert_eq!(palette.secondary().color, Srgb::new(0, 255, 0));
            assert_eq!(palette.secondary().alpha, SECONDARY_ALPHA);
            assert_eq!(palette.glow(), palette.primary());
        }
    }

    #[test]
    fn custom_short_hex_expands() {
        assert_eq!(resolve_palette("custom", Some("0f0")).primary_hex(), "#00ff00");
    }

    #[test]
    fn custom_without_valid_color_uses_default() {
        assert_eq!(resolve_palette("custom", None), default_palette());
        assert_eq!(resolve_palette("custom", Some("zzzzzz")), default_palette());
    }

    #[test]
    fn color_is_ignored_for_named_themes() {
        assert_eq!(resolve_palette("cyan", Some("00ff00")).primary_hex(), "#00ffff");
    }

    #[test]
    fn theme_glow_overrides_are_kept() {
        let emerald = resolve_palette("emerald", None);
        assert_ne!(emerald.glow(), emerald.primary());
        assert_eq!(to_hex(emerald.glow()), "#34d399");

        let roxi = resolve_palette("roxi", None);
        assert_eq!(to_hex(roxi.glow()), "#ff7ab8");
    }

    #[test]
    fn secondary_tracks_primary() {
        for name in theme_names() {
            let palette = resolve_palette(name, None);
            let secondary = palette.secondary();
            assert_eq!(secondary.color, palette.primary(), "theme {name}");
            assert!(secondary.alpha > 0.0 && secondary.alpha < 1.0);
        }
    }

    #[test]
    fn panel_fill_is_near_black() {
        let fill = resolve_palette("cyan", None).panel_fill();
        assert!(fill.red < 24 && fill.green < 24 && fill.blue < 24);
    }
}
