//! SVG utilities using resvg/usvg.
//!
//! Shared by the rasterizer (standalone glyphs and emoji) and the icon
//! resolver (validating remote glyph payloads).

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

// ============================================================================
// Emoji
// ============================================================================

/// Looks up the twemoji artwork for an emoji, retrying without variation
/// selectors.
#[cfg(feature = "twemoji")]
pub fn emoji_svg(emoji: &str) -> Option<&'static str> {
    use twemoji_assets::svg::SvgTwemojiAsset;

    let emoji = emoji.trim();
    let asset = SvgTwemojiAsset::from_emoji(emoji).or_else(|| {
        let stripped: String = emoji.chars().filter(|c| *c != '\u{fe0f}').collect();
        SvgTwemojiAsset::from_emoji(&stripped)
    })?;
    Some(asset.as_ref())
}

#[cfg(not(feature = "twemoji"))]
pub fn emoji_svg(_emoji: &str) -> Option<&'static str> {
    None
}

// ============================================================================
// Parsing and Rendering
// ============================================================================

/// Parses SVG markup with default options (no fonts).
pub fn parse_svg(svg_data: &str) -> Option<Tree> {
    Tree::from_str(svg_data, &Options::default()).ok()
}

/// Renders SVG markup into a `size × size` pixmap, scaled to fit and centered.
///
/// Returns `None` if the SVG cannot be parsed or the size is zero.
pub fn render_svg(svg_data: &str, size: u32) -> Option<Pixmap> {
    let tree = parse_svg(svg_data)?;

    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let dx = (size as f32 - svg_size.width() * scale) / 2.0;
    let dy = (size as f32 - svg_size.height() * scale) / 2.0;

    let mut pixmap = Pixmap::new(size, size)?;
    let transform = Transform::from_scale(scale, scale).post_translate(dx, dy);
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Some(pixmap)
}

/// Replaces `currentColor` paints with a concrete `#rrggbb` color.
pub fn recolor_current_color(svg_data: &str, hex: &str) -> String {
    svg_data.replace("currentColor", hex)
}

/// Escapes text for inclusion in SVG character data or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Pixel Conversion
// ============================================================================

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        let x = i as u32 % width;
        let y = i as u32 / width;
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect width="100" height="50" fill="currentColor"/></svg>"##;

    #[test]
    fn render_fits_and_centers() {
        let pixmap = render_svg(SIMPLE_SVG, 40).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 40));
        // 100x50 scaled to 40x20, centered vertically
        assert_eq!(pixmap.pixel(20, 2).unwrap().alpha(), 0);
        assert_eq!(pixmap.pixel(20, 20).unwrap().alpha(), 255);
    }

    #[test]
    fn render_rejects_garbage() {
        assert!(render_svg("not svg", 40).is_none());
        assert!(parse_svg("<html></html>").is_none());
    }

    #[test]
    fn current_color_is_replaced() {
        let recolored = recolor_current_color(SIMPLE_SVG, "#00ff00");
        assert!(recolored.contains(r##"fill="#00ff00""##));
        let img = pixmap_to_rgba_image(&render_svg(&recolored, 40).unwrap());
        assert_eq!(img.get_pixel(20, 20).0, [0, 255, 0, 255]);
    }

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_xml("tab\there"), "tabhere");
    }

    #[test]
    fn unpremultiply_restores_channels() {
        assert_eq!(unpremultiply(51, 0, 0, 51), (255, 0, 0, 51));
        assert_eq!(unpremultiply(10, 10, 10, 0), (0, 0, 0, 0));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn emoji_resolves_to_renderable_svg() {
        let svg = emoji_svg("🦆").unwrap();
        assert!(svg.contains("<svg"));
        assert!(render_svg(svg, 64).is_some());
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn variation_selector_is_ignored() {
        assert_eq!(emoji_svg("\u{2764}\u{fe0f}").is_some(), emoji_svg("\u{2764}").is_some());
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn unknown_emoji_does_not_resolve() {
        assert!(emoji_svg("not-an-emoji").is_none());
    }
}
