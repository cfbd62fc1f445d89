//! Scene rasterization.
//!
//! Groups are painted back to front onto one 1200×630 pixmap. Runs of vector
//! nodes are serialized into a single SVG document and rendered with resvg;
//! fetched glyph markup and emoji artwork are rasterized on their own and
//! drawn at their frame. The result is PNG-encoded with the `image` crate.

pub mod svg;

use std::fmt::Write as _;
use std::io::Cursor;

use image::ImageFormat;
use resvg::tiny_skia::{Pixmap, PixmapPaint, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{OgError, Result};
use crate::font::FontAsset;
use crate::icon::ResolvedGlyph;
use crate::scene::{Anchor, Frame, Node, Paint, Scene, Stroke, TextRun, TextSpan};

use svg::{emoji_svg, escape_xml, pixmap_to_rgba_image, render_svg};

/// Units of the local glyph viewbox.
const GLYPH_VIEWBOX: f32 = crate::icon::registry::PATH_VIEWBOX;

/// Stroke width of local glyphs, in viewbox units.
const GLYPH_STROKE: f32 = 2.0;

/// Share of the frame used by the text stand-in for unsupported emoji.
const EMOJI_TEXT_SCALE: f32 = 0.8;

/// Renders scenes to PNG.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer;

impl Rasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a scene to PNG bytes.
    pub fn render(&self, scene: &Scene, font: &FontAsset) -> Result<Vec<u8>> {
        let pixmap = self.rasterize(scene, font)?;
        encode_png(&pixmap)
    }

    /// Renders a scene to a premultiplied pixmap.
    pub fn rasterize(&self, scene: &Scene, font: &FontAsset) -> Result<Pixmap> {
        let mut pixmap = Pixmap::new(scene.width(), scene.height())
            .ok_or_else(|| OgError::raster("cannot allocate canvas"))?;

        let options = Options {
            fontdb: font.database(),
            font_family: default_family(font),
            ..Options::default()
        };
        let family = font.family_list();
        let mut batch = SvgBatch::new(scene.width(), scene.height(), &family);

        for node in scene.nodes() {
            if node.is_vector() {
                batch.push(node);
                continue;
            }
            match node {
                Node::Glyph {
                    frame,
                    glyph: ResolvedGlyph::Remote { svg: markup },
                    ..
                } => {
                    batch.flush(&mut pixmap, &options)?;
                    draw_markup(&mut pixmap, markup, frame);
                }
                Node::Emoji { frame, emoji } => match emoji_svg(emoji) {
                    Some(art) => {
                        batch.flush(&mut pixmap, &options)?;
                        draw_markup(&mut pixmap, art, frame);
                    }
                    None => {
                        tracing::debug!(%emoji, "no emoji artwork, drawing as text");
                        batch.push(&emoji_text(frame, emoji));
                    }
                },
                other => batch.push(other),
            }
        }
        batch.flush(&mut pixmap, &options)?;

        Ok(pixmap)
    }
}

/// Family used for text without an explicit `font-family`.
fn default_family(font: &FontAsset) -> String {
    match font {
        FontAsset::Loaded(loaded) => loaded.family().to_string(),
        FontAsset::Fallback => "monospace".to_string(),
    }
}

/// Encodes a pixmap as PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    let image = pixmap_to_rgba_image(pixmap);
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Scales standalone markup into `frame` and composites it.
fn draw_markup(pixmap: &mut Pixmap, markup: &str, frame: &Frame) {
    let size = frame.size.round().max(1.0) as u32;
    let Some(art) = render_svg(markup, size) else {
        tracing::warn!("artwork could not be rasterized, skipping");
        return;
    };
    pixmap.draw_pixmap(
        frame.x.round() as i32,
        frame.y.round() as i32,
        art.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn emoji_text(frame: &Frame, emoji: &str) -> Node {
    let (cx, cy) = frame.center();
    let size = frame.size * EMOJI_TEXT_SCALE;
    Node::Text(TextRun {
        x: cx,
        y: cy + size * 0.35,
        size,
        weight: 400,
        letter_spacing: 0.0,
        anchor: Anchor::Middle,
        spans: vec![TextSpan::new(emoji, palette::Srgb::new(255, 255, 255))],
        glow: None,
    })
}

// ============================================================================
// SvgBatch
// ============================================================================

/// Accumulates vector nodes into one SVG document.
struct SvgBatch<'a> {
    width: u32,
    height: u32,
    family: &'a str,
    body: String,
    filters: usize,
}

impl<'a> SvgBatch<'a> {
    fn new(width: u32, height: u32, family: &'a str) -> Self {
        Self {
            width,
            height,
            family,
            body: String::new(),
            filters: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Renders pending nodes onto `pixmap` and clears the batch.
    fn flush(&mut self, pixmap: &mut Pixmap, options: &Options) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let document = self.document();
        self.body.clear();

        let tree = Tree::from_str(&document, options).map_err(|e| OgError::svg(e.to_string()))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }

    fn document(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }

    fn push(&mut self, node: &Node) {
        match node {
            Node::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
                blur,
            } => {
                let filter = self.filter(*blur);
                let _ = write!(
                    self.body,
                    r#"<rect x="{x}" y="{y}" width="{width}" height="{height}"{}{}{filter}/>"#,
                    fill_attrs(fill.as_ref()),
                    stroke_attrs(stroke.as_ref()),
                );
            }
            Node::Ellipse {
                cx,
                cy,
                rx,
                ry,
                fill,
                stroke,
                blur,
            } => {
                let filter = self.filter(*blur);
                let _ = write!(
                    self.body,
                    r#"<ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}"{}{}{filter}/>"#,
                    fill_attrs(fill.as_ref()),
                    stroke_attrs(stroke.as_ref()),
                );
            }
            Node::Path { d, fill, stroke } => {
                let _ = write!(
                    self.body,
                    r#"<path d="{}"{}{}/>"#,
                    escape_xml(d),
                    fill_attrs(fill.as_ref()),
                    stroke_attrs(stroke.as_ref()),
                );
            }
            Node::Glyph {
                frame,
                glyph,
                color,
            } => {
                // Remote glyphs never reach the batch.
                let Some(d) = glyph.stroke_path() else {
                    return;
                };
                let scale = frame.size / GLYPH_VIEWBOX;
                let stroke = Stroke::new(*color, GLYPH_STROKE);
                let _ = write!(
                    self.body,
                    r#"<g transform="translate({} {}) scale({scale})"><path d="{}" fill="none"{} stroke-linecap="round" stroke-linejoin="round"/></g>"#,
                    frame.x,
                    frame.y,
                    escape_xml(d),
                    stroke_attrs(Some(&stroke)),
                );
            }
            Node::Emoji { .. } => {}
            Node::Text(run) => self.push_text(run),
        }
    }

    fn push_text(&mut self, run: &TextRun) {
        if let Some(glow) = run.glow {
            let filter = self.filter(glow.blur);
            let halo: Vec<TextSpan> = run
                .spans
                .iter()
                .map(|s| TextSpan::new(s.text.as_str(), glow.paint))
                .collect();
            self.write_text(run, &halo, &filter);
        }
        self.write_text(run, &run.spans, "");
    }

    fn write_text(&mut self, run: &TextRun, spans: &[TextSpan], filter: &str) {
        let _ = write!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" letter-spacing="{}" text-anchor="{}"{filter}>"#,
            run.x,
            run.y,
            escape_xml(self.family),
            run.size,
            run.weight,
            run.letter_spacing,
            run.anchor.as_svg(),
        );
        for span in spans {
            let _ = write!(
                self.body,
                "<tspan{}>{}</tspan>",
                fill_attrs(Some(&span.paint)),
                escape_xml(&span.text)
            );
        }
        self.body.push_str("</text>");
    }

    /// Defines a blur filter and returns the attribute referencing it.
    fn filter(&mut self, blur: f32) -> String {
        if blur <= 0.0 {
            return String::new();
        }
        self.filters += 1;
        let id = format!("blur{}", self.filters);
        let _ = write!(
            self.body,
            r#"<defs><filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{blur}"/></filter></defs>"#,
        );
        format!(r#" filter="url(#{id})""#)
    }
}

fn fill_attrs(paint: Option<&Paint>) -> String {
    match paint {
        None => r#" fill="none""#.to_string(),
        Some(p) if p.is_opaque() => format!(r#" fill="{}""#, p.hex()),
        Some(p) => format!(r#" fill="{}" fill-opacity="{}""#, p.hex(), p.opacity),
    }
}

fn stroke_attrs(stroke: Option<&Stroke>) -> String {
    match stroke {
        None => String::new(),
        Some(s) if s.paint.is_opaque() => {
            format!(r#" stroke="{}" stroke-width="{}""#, s.paint.hex(), s.width)
        }
        Some(s) => format!(
            r#" stroke="{}" stroke-opacity="{}" stroke-width="{}""#,
            s.paint.hex(),
            s.paint.opacity,
            s.width
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use palette::Srgb;

    use super::*;
    use crate::scene::{HEIGHT, WIDTH, ZLayer};

    const GREEN: Srgb<u8> = Srgb::new(0, 255, 0);

    fn rect(fill: Paint) -> Node {
        Node::Rect {
            x: 10.0,
            y: 10.0,
            width: 20.0,
            height: 20.0,
            fill: Some(fill),
            stroke: None,
            blur: 0.0,
        }
    }

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).unwrap().demultiply();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    #[test]
    fn empty_scene_is_transparent_canvas() {
        let pixmap = Rasterizer::new()
            .rasterize(&Scene::new(), &FontAsset::Fallback)
            .unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (WIDTH, HEIGHT));
        assert_eq!(pixel(&pixmap, 0, 0)[3], 0);
    }

    #[test]
    fn vector_nodes_paint_in_order() {
        let mut scene = Scene::new();
        scene.push(ZLayer::Content, rect(Paint::solid(GREEN)));
        scene.push(ZLayer::Background, rect(Paint::solid(Srgb::new(255, 0, 0))));

        let pixmap = Rasterizer::new().rasterize(&scene, &FontAsset::Fallback).unwrap();
        assert_eq!(pixel(&pixmap, 20, 20), [0, 255, 0, 255]);
        assert_eq!(pixel(&pixmap, 5, 5)[3], 0);
    }

    #[test]
    fn remote_glyph_is_drawn_at_its_frame() {
        let art = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="24" height="24" fill="#00ff00"/></svg>"##;
        let mut scene = Scene::new();
        scene.push(
            ZLayer::Content,
            Node::Glyph {
                frame: Frame::new(100.0, 100.0, 40.0),
                glyph: ResolvedGlyph::Remote { svg: art.into() },
                color: GREEN,
            },
        );

        let pixmap = Rasterizer::new().rasterize(&scene, &FontAsset::Fallback).unwrap();
        assert_eq!(pixel(&pixmap, 120, 120), [0, 255, 0, 255]);
        assert_eq!(pixel(&pixmap, 95, 120)[3], 0);
    }

    #[test]
    fn glyph_after_remote_art_keeps_order() {
        let art = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect width="24" height="24" fill="#ff0000"/></svg>"##;
        let mut scene = Scene::new();
        scene.push(
            ZLayer::Content,
            Node::Glyph {
                frame: Frame::new(10.0, 10.0, 20.0),
                glyph: ResolvedGlyph::Remote { svg: art.into() },
                color: GREEN,
            },
        );
        scene.push(ZLayer::Overlay, rect(Paint::solid(GREEN)));

        let pixmap = Rasterizer::new().rasterize(&scene, &FontAsset::Fallback).unwrap();
        assert_eq!(pixel(&pixmap, 20, 20), [0, 255, 0, 255]);
    }

    #[test]
    fn translucent_fill_blends() {
        let mut scene = Scene::new();
        scene.push(ZLayer::Background, rect(Paint::solid(Srgb::new(255, 255, 255))));
        scene.push(ZLayer::Overlay, rect(Paint::translucent(Srgb::new(0, 0, 0), 0.5)));

        let pixmap = Rasterizer::new().rasterize(&scene, &FontAsset::Fallback).unwrap();
        let [r, g, b, a] = pixel(&pixmap, 20, 20);
        assert_eq!(a, 255);
        assert!((126..=129).contains(&r) && r == g && g == b);
    }

    #[test]
    fn text_markup_is_escaped() {
        let mut batch = SvgBatch::new(10, 10, "'Mono', monospace");
        batch.push(&Node::Text(TextRun {
            x: 0.0,
            y: 5.0,
            size: 5.0,
            weight: 400,
            letter_spacing: 0.0,
            anchor: Anchor::Start,
            spans: vec![TextSpan::new("<a & b>", GREEN)],
            glow: None,
        }));
        let doc = batch.document();
        assert!(doc.contains("&lt;a &amp; b&gt;"));
        assert!(doc.contains("font-family=\"&apos;Mono&apos;, monospace\""));
        assert!(Tree::from_str(&doc, &Options::default()).is_ok());
    }

    #[test]
    fn blur_filters_get_unique_ids() {
        let mut batch = SvgBatch::new(10, 10, "monospace");
        assert_eq!(batch.filter(0.0), "");
        assert!(batch.filter(2.0).contains("url(#blur1)"));
        assert!(batch.filter(2.0).contains("url(#blur2)"));
    }

    #[test]
    fn png_output_has_scene_dimensions() {
        let png = Rasterizer::new()
            .render(&Scene::new(), &FontAsset::Fallback)
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
    }
}
