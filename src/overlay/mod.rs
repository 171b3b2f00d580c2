//! Caption overlay editor.
//!
//! Draws a base image with two independently styled captions and lets the
//! user drag each one into place.
//!
//! # Features
//!
//! - **Independent captions** - top and bottom each carry their own text, colors,
//!   stroke, font size, opacity, letter spacing and position
//! - **Normalized positions** - stored as percentages so they survive container resizes
//! - **Drag protocol** - [`DragHandler`] adapts any toolkit's pointer events
//! - **Render description** - [`OverlayFrame`] layers with inline styles and word wrapping
//!
//! # Example
//!
//! ```rust
//! use memeforge::overlay::{BaseImage, CaptionSlot, DragHandler, OverlayEngine, Rect, StyleEdit};
//!
//! let mut engine = OverlayEngine::new(BaseImage::Url("https://i.imgflip.com/30b1gx.jpg".into()));
//! engine.edit(CaptionSlot::Top, StyleEdit::Text("RUST".into()));
//!
//! engine.on_drag_start(CaptionSlot::Top);
//! engine.on_drag_end(
//!     CaptionSlot::Top,
//!     Rect::new(150.0, 40.0, 100.0, 20.0),
//!     Some(Rect::new(0.0, 0.0, 400.0, 400.0)),
//! );
//! assert_eq!(engine.caption(CaptionSlot::Top).pos_x_percent, 50.0);
//! ```

pub mod caption;
pub mod engine;
pub mod layout;

pub use caption::{CaptionSlot, CaptionStyle, Captions, Color, StyleEdit};
pub use engine::{percent_position, BaseImage, DragHandler, OverlayEngine, Rect};
pub use layout::{wrap_words, CaptionLayer, Guides, OverlayFrame};
