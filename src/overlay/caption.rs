//! Caption styling for the two text layers.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Which caption a style or gesture refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSlot {
    Top,
    Bottom,
}

impl CaptionSlot {
    pub const BOTH: [CaptionSlot; 2] = [CaptionSlot::Top, CaptionSlot::Bottom];
}

impl fmt::Display for CaptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        })
    }
}

impl FromStr for CaptionSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => bail!("unknown caption slot: {other}"),
        }
    }
}

/// An RGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("invalid color: {s}");
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).with_context(|| format!("invalid color: {s}"))
        };

        match hex.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => {
                // #abc expands to #aabbcc
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            _ => bail!("invalid color: {s}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Independent style and position of one caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionStyle {
    pub text: String,
    pub text_color: Color,
    pub stroke_color: Color,
    pub stroke_width_px: f64,
    /// CSS font size, e.g. `"48px"` or `"2rem"`.
    pub font_size_css: String,
    /// Center of the caption as a percentage of container width, `[0, 100]`.
    pub pos_x_percent: f64,
    /// Center of the caption as a percentage of container height, `[0, 100]`.
    pub pos_y_percent: f64,
    pub opacity_percent: f64,
    pub letter_spacing_px: f64,
}

impl CaptionStyle {
    /// Defaults for `slot`: white Impact-style text with a black outline,
    /// horizontally centered near the top or bottom edge.
    #[must_use]
    pub fn for_slot(slot: CaptionSlot) -> Self {
        let pos_y_percent = match slot {
            CaptionSlot::Top => 10.0,
            CaptionSlot::Bottom => 90.0,
        };

        Self {
            text: String::new(),
            text_color: Color::WHITE,
            stroke_color: Color::BLACK,
            stroke_width_px: 2.0,
            font_size_css: "48px".to_string(),
            pos_x_percent: 50.0,
            pos_y_percent,
            opacity_percent: 100.0,
            letter_spacing_px: 0.0,
        }
    }

    /// Whether the caption has anything to draw.
    pub fn is_visible(&self) -> bool {
        !self.text.is_empty()
    }

    /// Apply one style-control input.
    pub fn apply(&mut self, edit: StyleEdit) {
        match edit {
            StyleEdit::Text(text) => self.text = text,
            StyleEdit::TextColor(color) => self.text_color = color,
            StyleEdit::StrokeColor(color) => self.stroke_color = color,
            StyleEdit::StrokeWidth(px) => self.stroke_width_px = non_negative(px),
            StyleEdit::FontSize(css) => self.font_size_css = css,
            StyleEdit::Opacity(percent) => self.opacity_percent = clamp_percent(percent),
            StyleEdit::LetterSpacing(px) => {
                if px.is_finite() {
                    self.letter_spacing_px = px;
                }
            }
            StyleEdit::Position { x, y } => self.set_position(x, y),
        }
    }

    /// Move the caption center, clamping both axes to `[0, 100]`.
    pub fn set_position(&mut self, x_percent: f64, y_percent: f64) {
        self.pos_x_percent = clamp_percent(x_percent);
        self.pos_y_percent = clamp_percent(y_percent);
    }
}

/// One change coming from the style controls.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    Text(String),
    TextColor(Color),
    StrokeColor(Color),
    StrokeWidth(f64),
    FontSize(String),
    Opacity(f64),
    LetterSpacing(f64),
    Position { x: f64, y: f64 },
}

/// Both captions. Neither shares state with the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Captions {
    pub top: CaptionStyle,
    pub bottom: CaptionStyle,
}

impl Default for Captions {
    fn default() -> Self {
        Self {
            top: CaptionStyle::for_slot(CaptionSlot::Top),
            bottom: CaptionStyle::for_slot(CaptionSlot::Bottom),
        }
    }
}

impl Captions {
    pub fn get(&self, slot: CaptionSlot) -> &CaptionStyle {
        match slot {
            CaptionSlot::Top => &self.top,
            CaptionSlot::Bottom => &self.bottom,
        }
    }

    pub fn get_mut(&mut self, slot: CaptionSlot) -> &mut CaptionStyle {
        match slot {
            CaptionSlot::Top => &mut self.top,
            CaptionSlot::Bottom => &mut self.bottom,
        }
    }
}

/// Clamp to `[0, 100]`; NaN becomes 0.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
