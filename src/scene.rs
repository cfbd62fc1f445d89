//! Renderer-agnostic scene graph.
//!
//! A [`Scene`] is an ordered list of z-layer [`Group`]s, each holding drawing
//! [`Node`]s in paint order. It carries no font data and no markup; the
//! rasterizer decides how each node becomes pixels.

use palette::Srgb;

use crate::icon::ResolvedGlyph;
use crate::theme::{Translucent, to_hex};

/// Output width in pixels.
pub const WIDTH: u32 = 1200;

/// Output height in pixels.
pub const HEIGHT: u32 = 630;

// ============================================================================
// Geometry
// ============================================================================

/// A square box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self { x, y, size }
    }

    /// A `size × size` box centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, size: f32) -> Self {
        Self::new(cx - size / 2.0, cy - size / 2.0, size)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

// ============================================================================
// Paint
// ============================================================================

/// A solid color with opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Srgb<u8>,
    pub opacity: f32,
}

impl Paint {
    pub fn solid(color: Srgb<u8>) -> Self {
        Self::translucent(color, 1.0)
    }

    pub fn translucent(color: Srgb<u8>, opacity: f32) -> Self {
        Self {
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn hex(&self) -> String {
        to_hex(self.color)
    }

    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }
}

impl From<Srgb<u8>> for Paint {
    fn from(color: Srgb<u8>) -> Self {
        Self::solid(color)
    }
}

impl From<Translucent> for Paint {
    fn from(color: Translucent) -> Self {
        Self::translucent(color.color, color.alpha)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
}

impl Stroke {
    pub fn new(paint: impl Into<Paint>, width: f32) -> Self {
        Self {
            paint: paint.into(),
            width,
        }
    }
}

// ============================================================================
// Text
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    Start,
    #[default]
    Middle,
    End,
}

impl Anchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A piece of a text run painted in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub paint: Paint,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, paint: impl Into<Paint>) -> Self {
        Self {
            text: text.into(),
            paint: paint.into(),
        }
    }
}

/// A single line of text anchored at a baseline point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: u16,
    /// Extra advance per character, in pixels.
    pub letter_spacing: f32,
    pub anchor: Anchor,
    pub spans: Vec<TextSpan>,
    /// Blurred halo painted beneath the run.
    pub glow: Option<Glow>,
}

impl TextRun {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub paint: Paint,
    pub blur: f32,
}

// ============================================================================
// Nodes
// ============================================================================

/// A drawable element.
///
/// `blur` is a Gaussian standard deviation in pixels; zero disables it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
        blur: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
        blur: f32,
    },
    Path {
        d: String,
        fill: Option<Paint>,
        stroke: Option<Stroke>,
    },
    /// Icon glyph scaled into `frame`.
    Glyph {
        frame: Frame,
        glyph: ResolvedGlyph,
        color: Srgb<u8>,
    },
    /// Emoji artwork scaled into `frame`.
    Emoji { frame: Frame, emoji: String },
    Text(TextRun),
}

impl Node {
    /// Whether the node can be drawn as plain vector markup in the scene
    /// document, as opposed to separately rasterized artwork.
    pub fn is_vector(&self) -> bool {
        match self {
            Self::Glyph { glyph, .. } => glyph.stroke_path().is_some(),
            Self::Emoji { .. } => false,
            _ => true,
        }
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Paint order, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZLayer {
    Background,
    Frame,
    Content,
    Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub layer: ZLayer,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    width: u32,
    height: u32,
    groups: Vec<Group>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty scene at the fixed output size.
    pub fn new() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            groups: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Appends a node to its layer, keeping groups sorted back to front.
    pub fn push(&mut self, layer: ZLayer, node: Node) {
        match self.groups.binary_search_by(|g| g.layer.cmp(&layer)) {
            Ok(i) => self.groups[i].nodes.push(node),
            Err(i) => self.groups.insert(
                i,
                Group {
                    layer,
                    nodes: vec![node],
                },
            ),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn layer(&self, layer: ZLayer) -> Option<&Group> {
        self.groups.iter().find(|g| g.layer == layer)
    }

    /// All nodes in paint order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.groups.iter().flat_map(|g| g.nodes.iter())
    }

    /// Text runs in paint order.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.nodes().filter_map(|n| match n {
            Node::Text(run) => Some(run),
            _ => None,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dot() -> Node {
        Node::Path {
            d: "M0 0h1v1H0z".into(),
            fill: Some(Paint::solid(Srgb::new(0, 0, 0))),
            stroke: None,
        }
    }

    #[test]
    fn groups_stay_in_paint_order() {
        let mut scene = Scene::new();
        scene.push(ZLayer::Overlay, dot());
        scene.push(ZLayer::Background, dot());
        scene.push(ZLayer::Content, dot());
        scene.push(ZLayer::Background, dot());

        let layers: Vec<ZLayer> = scene.groups().iter().map(|g| g.layer).collect();
        assert_eq!(
            layers,
            vec![ZLayer::Background, ZLayer::Content, ZLayer::Overlay]
        );
        assert_eq!(scene.layer(ZLayer::Background).unwrap().nodes.len(), 2);
        assert!(scene.layer(ZLayer::Frame).is_none());
        assert_eq!(scene.nodes().count(), 4);
    }

    #[test]
    fn scene_size_is_fixed() {
        let scene = Scene::default();
        assert_eq!((scene.width(), scene.height()), (1200, 630));
    }

    #[test]
    fn frame_geometry() {
        let frame = Frame::centered(100.0, 50.0, 20.0);
        assert_eq!((frame.x, frame.y), (90.0, 40.0));
        assert_eq!(frame.size, 20.0);
        assert_eq!(frame.center(), (100.0, 50.0));
    }

    #[test]
    fn translucent_palette_colors_become_paints() {
        let secondary = Translucent {
            color: Srgb::new(255, 0, 255),
            alpha: 0.2,
        };
        let paint = Paint::from(secondary);
        assert_eq!(paint.hex(), "#ff00ff");
        assert!((paint.opacity - 0.2).abs() < f32::EPSILON);
        assert!(!paint.is_opaque());
        assert!(Paint::translucent(paint.color, 3.0).is_opaque());
    }

    #[test]
    fn remote_glyphs_and_emoji_are_not_vector() {
        let frame = Frame::new(0.0, 0.0, 10.0);
        let color = Srgb::new(1, 2, 3);
        let vector = Node::Glyph {
            frame,
            glyph: ResolvedGlyph::Fallback,
            color,
        };
        let remote = Node::Glyph {
            frame,
            glyph: ResolvedGlyph::Remote { svg: "<svg/>".into() },
            color,
        };
        let emoji = Node::Emoji {
            frame,
            emoji: "🦆".into(),
        };
        assert!(vector.is_vector());
        assert!(!remote.is_vector());
        assert!(!emoji.is_vector());
        assert!(dot().is_vector());
    }
}
