//! Render description for the caption preview.
//!
//! Produces toolkit-neutral layers: each caption is anchored by its center
//! at `(left%, top%)` of the container, limited to 90% of the container
//! width, and wraps only between words.

use serde::Serialize;

use super::caption::{CaptionSlot, CaptionStyle, Color};
use super::engine::BaseImage;

/// Maximum caption width as a share of the container.
pub const CAPTION_WIDTH_PERCENT: f64 = 90.0;

/// Font stack used for every caption.
pub const CAPTION_FONT_FAMILY: &str = "Impact, Arial Black, sans-serif";

/// Average glyph advance of Impact relative to its font size.
const GLYPH_ASPECT: f64 = 0.6;

/// Everything needed to draw the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub base_image: BaseImage,
    /// Visible captions, top first.
    pub layers: Vec<CaptionLayer>,
    /// Center crosshair, present only while dragging.
    pub guides: Option<Guides>,
}

/// Alignment crosshair through the container center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Guides {
    pub vertical_x_percent: f64,
    pub horizontal_y_percent: f64,
}

impl Guides {
    #[must_use]
    pub fn centered() -> Self {
        Self {
            vertical_x_percent: 50.0,
            horizontal_y_percent: 50.0,
        }
    }
}

/// One caption as it should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionLayer {
    pub slot: CaptionSlot,
    pub text: String,
    pub left_percent: f64,
    pub top_percent: f64,
    pub max_width_percent: f64,
    pub text_color: Color,
    pub stroke_color: Color,
    pub stroke_width_px: f64,
    pub font_size: String,
    pub opacity_percent: f64,
    pub letter_spacing_px: f64,
    /// Transient pixel offset of an in-progress drag.
    pub drag_offset_px: (f64, f64),
}

impl CaptionLayer {
    #[must_use]
    pub fn new(slot: CaptionSlot, style: &CaptionStyle, drag_offset_px: (f64, f64)) -> Self {
        Self {
            slot,
            text: style.text.clone(),
            left_percent: style.pos_x_percent,
            top_percent: style.pos_y_percent,
            max_width_percent: CAPTION_WIDTH_PERCENT,
            text_color: style.text_color,
            stroke_color: style.stroke_color,
            stroke_width_px: style.stroke_width_px,
            font_size: style.font_size_css.clone(),
            opacity_percent: style.opacity_percent,
            letter_spacing_px: style.letter_spacing_px,
            drag_offset_px,
        }
    }

    /// Inline style declarations, in the order a browser would apply them.
    #[must_use]
    pub fn style_declarations(&self) -> Vec<(&'static str, String)> {
        let (dx, dy) = self.drag_offset_px;
        let mut transform = "translate(-50%, -50%)".to_string();
        if dx != 0.0 || dy != 0.0 {
            transform.push_str(&format!(" translate({dx}px, {dy}px)"));
        }

        vec![
            ("position", "absolute".to_string()),
            ("left", format!("{}%", self.left_percent)),
            ("top", format!("{}%", self.top_percent)),
            ("transform", transform),
            ("width", format!("{}%", self.max_width_percent)),
            ("text-align", "center".to_string()),
            ("color", self.text_color.to_string()),
            (
                "-webkit-text-stroke",
                format!("{}px {}", self.stroke_width_px, self.stroke_color),
            ),
            ("font-size", self.font_size.clone()),
            ("font-weight", "bold".to_string()),
            ("font-family", CAPTION_FONT_FAMILY.to_string()),
            ("opacity", format!("{}%", self.opacity_percent)),
            ("letter-spacing", format!("{}px", self.letter_spacing_px)),
            ("word-break", "keep-all".to_string()),
            ("overflow-wrap", "normal".to_string()),
        ]
    }

    /// Declarations joined into a `style` attribute value.
    #[must_use]
    pub fn inline_style(&self) -> String {
        self.style_declarations()
            .into_iter()
            .map(|(k, v)| format!("{k}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Break the caption into lines for a container `container_width_px` wide.
    #[must_use]
    pub fn lines(&self, container_width_px: f64, root_font_px: f64) -> Vec<String> {
        let font_px = font_size_px(&self.font_size, root_font_px).unwrap_or(root_font_px);
        let advance = font_px * GLYPH_ASPECT + self.letter_spacing_px;
        let available = container_width_px * self.max_width_percent / 100.0;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let max_chars = if advance > 0.0 && available.is_finite() {
            (available / advance).floor().max(1.0) as usize
        } else {
            usize::MAX
        };

        wrap_words(&self.text, max_chars)
    }
}

/// Resolve a CSS font size to pixels. Supports `px`, `rem`/`em` and `pt`.
#[must_use]
pub fn font_size_px(css: &str, root_font_px: f64) -> Option<f64> {
    let css = css.trim();
    let (number, scale) = if let Some(n) = css.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = css.strip_suffix("rem") {
        (n, root_font_px)
    } else if let Some(n) = css.strip_suffix("em") {
        (n, root_font_px)
    } else if let Some(n) = css.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else {
        return None;
    };

    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n * scale)
}

/// Greedy word wrap that never splits a word.
///
/// A word longer than `max_chars` gets a line of its own. Existing line
/// breaks in `text` are kept.
#[must_use]
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_line.is_empty() {
                current_line = word.to_string();
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_chars {
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
                current_len = word_len;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    lines
}
