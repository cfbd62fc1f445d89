//! Layout composition.
//!
//! [`compose`] places every element of the card into a [`Scene`]. It is pure:
//! the same request, palette and icon slot always produce the same scene.
//!
//! The card is a single centered column (icon box, title, subtitle) inside an
//! inset glowing frame, over a grid background, under a scanline overlay.

use std::fmt::Write as _;

use palette::Srgb;

use crate::icon::IconSlot;
use crate::request::RenderRequest;
use crate::scene::{
    Anchor, Frame, Glow, HEIGHT, Node, Paint, Scene, Stroke, TextRun, TextSpan, WIDTH, ZLayer,
};
use crate::theme::{GLOW_ALPHA, Palette};

const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);
const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);
const WATERMARK_GRAY: Srgb<u8> = Srgb::new(0x44, 0x44, 0x44);

const CENTER_X: f32 = WIDTH as f32 / 2.0;
const CENTER_Y: f32 = HEIGHT as f32 / 2.0;

// Background
const GRID_SPACING: usize = 21;
const GRID_OPACITY: f32 = 0.12;
const GLOW_RX: f32 = 420.0;
const GLOW_RY: f32 = 220.0;
const GLOW_BLUR: f32 = 60.0;

// Frame
pub const FRAME_INSET: f32 = 32.0;
pub const FRAME_BORDER: f32 = 2.0;
const FRAME_GLOW_WIDTH: f32 = 6.0;
const FRAME_GLOW_BLUR: f32 = 6.0;
const BRACKET_INSET: f32 = 16.0;
const BRACKET_ARM: f32 = 20.0;
const BRACKET_WIDTH: f32 = 3.0;

// Content column
pub const ICON_BOX: f32 = 120.0;
const ICON_BORDER: f32 = 3.0;
pub const GLYPH_SIZE: f32 = 60.0;
pub const EMOJI_SIZE: f32 = 72.0;
const COLUMN_GAP: f32 = 30.0;

pub const TITLE_SIZE: f32 = 64.0;
const TITLE_WEIGHT: u16 = 800;
const TITLE_TRACKING_EM: f32 = 0.05;
const TITLE_LINE_HEIGHT: f32 = 72.0;
pub const TITLE_MAX_WIDTH: f32 = 1000.0;
const TITLE_GLOW_BLUR: f32 = 10.0;

const SUBTITLE_SIZE: f32 = 24.0;
const SUBTITLE_WEIGHT: u16 = 400;
const SUBTITLE_TRACKING_EM: f32 = 0.15;
const SUBTITLE_LINE_HEIGHT: f32 = 30.0;

const WATERMARK_SIZE: f32 = 18.0;
const WATERMARK_TRACKING_EM: f32 = 0.2;
const WATERMARK_MARGIN: f32 = 52.0;

// Overlay
const SCANLINE_PERIOD: usize = 4;
const SCANLINE_HEIGHT: usize = 2;
const SCANLINE_OPACITY: f32 = 0.15;

/// Advance of one monospace character, in ems.
const MONO_ADVANCE_EM: f32 = 0.6;

/// Baseline position within a glyph box, in ems from the top.
const ASCENT_EM: f32 = 0.8;

/// Builds the scene for one request.
pub fn compose(request: &RenderRequest, palette: &Palette, icon: IconSlot) -> Scene {
    let mut scene = Scene::new();
    background(&mut scene, palette);
    frame(&mut scene, palette);
    content(&mut scene, request, palette, icon);
    watermark(&mut scene, palette);
    scanlines(&mut scene);
    scene
}

// ============================================================================
// Layers
// ============================================================================

fn background(scene: &mut Scene, palette: &Palette) {
    scene.push(
        ZLayer::Background,
        Node::Rect {
            x: 0.0,
            y: 0.0,
            width: WIDTH as f32,
            height: HEIGHT as f32,
            fill: Some(Paint::solid(BLACK)),
            stroke: None,
            blur: 0.0,
        },
    );

    let mut grid = String::new();
    for y in (GRID_SPACING..HEIGHT as usize).step_by(GRID_SPACING) {
        let _ = write!(grid, "M0 {y}.5H{WIDTH}");
    }
    scene.push(
        ZLayer::Background,
        Node::Path {
            d: grid,
            fill: None,
            stroke: Some(Stroke::new(
                Paint::translucent(palette.primary(), GRID_OPACITY),
                1.0,
            )),
        },
    );

    scene.push(
        ZLayer::Background,
        Node::Ellipse {
            cx: CENTER_X,
            cy: CENTER_Y,
            rx: GLOW_RX,
            ry: GLOW_RY,
            fill: Some(palette.secondary().into()),
            stroke: None,
            blur: GLOW_BLUR,
        },
    );
}

fn frame(scene: &mut Scene, palette: &Palette) {
    // The border covers exactly FRAME_INSET..FRAME_INSET + FRAME_BORDER.
    let offset = FRAME_INSET + FRAME_BORDER / 2.0;
    let width = WIDTH as f32 - 2.0 * offset;
    let height = HEIGHT as f32 - 2.0 * offset;
    let border = |stroke: Stroke, blur: f32| Node::Rect {
        x: offset,
        y: offset,
        width,
        height,
        fill: None,
        stroke: Some(stroke),
        blur,
    };

    scene.push(
        ZLayer::Frame,
        border(
            Stroke::new(Paint::translucent(palette.glow(), GLOW_ALPHA), FRAME_GLOW_WIDTH),
            FRAME_GLOW_BLUR,
        ),
    );
    scene.push(
        ZLayer::Frame,
        border(Stroke::new(palette.primary(), FRAME_BORDER), 0.0),
    );

    for d in bracket_paths() {
        scene.push(
            ZLayer::Frame,
            Node::Path {
                d,
                fill: None,
                stroke: Some(Stroke::new(palette.primary(), BRACKET_WIDTH)),
            },
        );
    }
}

/// L-shaped corner marks, clockwise from top-left.
fn bracket_paths() -> [String; 4] {
    let (l, t) = (BRACKET_INSET, BRACKET_INSET);
    let r = WIDTH as f32 - BRACKET_INSET;
    let b = HEIGHT as f32 - BRACKET_INSET;
    let a = BRACKET_ARM;
    [
        format!("M{l} {}V{t}H{}", t + a, l + a),
        format!("M{} {t}H{r}V{}", r - a, t + a),
        format!("M{r} {}V{b}H{}", b - a, r - a),
        format!("M{} {b}H{l}V{}", l + a, b - a),
    ]
}

fn content(scene: &mut Scene, request: &RenderRequest, palette: &Palette, icon: IconSlot) {
    let title_tracking = TITLE_SIZE * TITLE_TRACKING_EM;
    let lines = wrap_title(
        &request.title.to_uppercase(),
        TITLE_SIZE,
        title_tracking,
        TITLE_MAX_WIDTH,
    );

    let column = ICON_BOX
        + COLUMN_GAP
        + lines.len() as f32 * TITLE_LINE_HEIGHT
        + COLUMN_GAP
        + SUBTITLE_LINE_HEIGHT;
    let top = (HEIGHT as f32 - column) / 2.0;

    // Icon box
    let icon_cy = top + ICON_BOX / 2.0;
    scene.push(
        ZLayer::Content,
        Node::Ellipse {
            cx: CENTER_X,
            cy: icon_cy,
            rx: ICON_BOX / 2.0,
            ry: ICON_BOX / 2.0,
            fill: None,
            stroke: Some(Stroke::new(
                Paint::translucent(palette.glow(), GLOW_ALPHA),
                ICON_BORDER * 3.0,
            )),
            blur: TITLE_GLOW_BLUR,
        },
    );
    scene.push(
        ZLayer::Content,
        Node::Ellipse {
            cx: CENTER_X,
            cy: icon_cy,
            rx: ICON_BOX / 2.0,
            ry: ICON_BOX / 2.0,
            fill: Some(Paint::solid(palette.panel_fill())),
            stroke: Some(Stroke::new(palette.primary(), ICON_BORDER)),
            blur: 0.0,
        },
    );
    let node = match icon {
        IconSlot::Emoji(emoji) => Node::Emoji {
            frame: Frame::centered(CENTER_X, icon_cy, EMOJI_SIZE),
            emoji,
        },
        IconSlot::Glyph(glyph) => Node::Glyph {
            frame: Frame::centered(CENTER_X, icon_cy, GLYPH_SIZE),
            glyph,
            color: palette.primary(),
        },
    };
    scene.push(ZLayer::Content, node);

    // Title
    let title_top = top + ICON_BOX + COLUMN_GAP;
    let glow = Glow {
        paint: Paint::translucent(palette.glow(), GLOW_ALPHA),
        blur: TITLE_GLOW_BLUR,
    };
    for (i, line) in lines.into_iter().enumerate() {
        let line_top = title_top + i as f32 * TITLE_LINE_HEIGHT;
        scene.push(
            ZLayer::Content,
            Node::Text(TextRun {
                x: CENTER_X,
                y: baseline(line_top, TITLE_LINE_HEIGHT, TITLE_SIZE),
                size: TITLE_SIZE,
                weight: TITLE_WEIGHT,
                letter_spacing: title_tracking,
                anchor: Anchor::Middle,
                spans: vec![TextSpan::new(line, WHITE)],
                glow: Some(glow),
            }),
        );
    }

    // Subtitle
    let subtitle_top = top + column - SUBTITLE_LINE_HEIGHT;
    scene.push(
        ZLayer::Content,
        Node::Text(TextRun {
            x: CENTER_X,
            y: baseline(subtitle_top, SUBTITLE_LINE_HEIGHT, SUBTITLE_SIZE),
            size: SUBTITLE_SIZE,
            weight: SUBTITLE_WEIGHT,
            letter_spacing: SUBTITLE_SIZE * SUBTITLE_TRACKING_EM,
            anchor: Anchor::Middle,
            spans: vec![TextSpan::new(request.subtitle.as_str(), palette.primary())],
            glow: None,
        }),
    );
}

fn watermark(scene: &mut Scene, palette: &Palette) {
    scene.push(
        ZLayer::Content,
        Node::Text(TextRun {
            x: WIDTH as f32 - WATERMARK_MARGIN,
            y: HEIGHT as f32 - WATERMARK_MARGIN,
            size: WATERMARK_SIZE,
            weight: 700,
            letter_spacing: WATERMARK_SIZE * WATERMARK_TRACKING_EM,
            anchor: Anchor::End,
            spans: vec![
                TextSpan::new("pc", palette.primary()),
                TextSpan::new("style", WATERMARK_GRAY),
            ],
            glow: None,
        }),
    );
}

fn scanlines(scene: &mut Scene) {
    let mut d = String::new();
    for y in (SCANLINE_PERIOD - SCANLINE_HEIGHT..HEIGHT as usize).step_by(SCANLINE_PERIOD) {
        let _ = write!(d, "M0 {y}H{WIDTH}V{}H0Z", y + SCANLINE_HEIGHT);
    }
    scene.push(
        ZLayer::Overlay,
        Node::Path {
            d,
            fill: Some(Paint::translucent(BLACK, SCANLINE_OPACITY)),
            stroke: None,
        },
    );
}

// ============================================================================
// Text Metrics
// ============================================================================

fn baseline(line_top: f32, line_height: f32, size: f32) -> f32 {
    line_top + (line_height - size) / 2.0 + size * ASCENT_EM
}

/// Estimated width of `chars` monospace characters at `size` with tracking.
pub fn estimate_width(chars: usize, size: f32, letter_spacing: f32) -> f32 {
    chars as f32 * (size * MONO_ADVANCE_EM + letter_spacing)
}

/// Greedy word wrap using the monospace advance estimate.
///
/// Words wider than a full line are broken at the character limit. Nothing
/// is ever dropped.
pub fn wrap_title(text: &str, size: f32, letter_spacing: f32, max_width: f32) -> Vec<String> {
    let advance = estimate_width(1, size, letter_spacing);
    let max_chars = ((max_width / advance).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        if chars.is_empty() {
            continue;
        }

        if current_len == 0 {
            current_len = chars.len();
            current = chars.into_iter().collect();
        } else if current_len + 1 + chars.len() <= max_chars {
            current_len += 1 + chars.len();
            current.push(' ');
            current.extend(chars);
        } else {
            lines.push(std::mem::replace(&mut current, chars.iter().collect()));
            current_len = chars.len();
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

// ============================================================================
// Tests
// ============================================================================
