//! Interactive caption placement.
//!
//! Any toolkit's pointer events can drive the engine through [`DragHandler`].
//! Live movement is tracked only as a transient pixel offset; the stored
//! position changes once, on drag end, when the caption's final center is
//! converted to container percentages.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use super::caption::{clamp_percent, CaptionSlot, CaptionStyle, Captions, StyleEdit};
use super::layout::{CaptionLayer, Guides, OverlayFrame};
use crate::catalog::SelectedTemplate;

/// Image the captions are drawn over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum BaseImage {
    Url(String),
    /// User-supplied local file.
    Local(PathBuf),
}

/// Axis-aligned box in pixels, as reported by the UI toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// A container we can divide by.
    fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Convert a pixel point to clamped percentages of `container`.
///
/// Returns `None` when the container has no usable area.
#[must_use]
pub fn percent_position(point: (f64, f64), container: &Rect) -> Option<(f64, f64)> {
    if !container.has_area() {
        return None;
    }
    let x = (point.0 - container.left) / container.width * 100.0;
    let y = (point.1 - container.top) / container.height * 100.0;
    Some((clamp_percent(x), clamp_percent(y)))
}

/// Pointer-gesture capability a UI toolkit calls into.
pub trait DragHandler {
    fn on_drag_start(&mut self, slot: CaptionSlot);

    /// Pointer moved by `(dx, dy)` pixels since the last move.
    fn on_drag_move(&mut self, slot: CaptionSlot, dx: f64, dy: f64);

    /// Drag finished with the caption occupying `element`.
    ///
    /// `container` is `None` when the toolkit cannot measure the preview.
    fn on_drag_end(&mut self, slot: CaptionSlot, element: Rect, container: Option<Rect>);
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    slot: CaptionSlot,
    offset: (f64, f64),
}

/// Editor state: base image, both captions, and the in-progress drag.
#[derive(Debug, Clone)]
pub struct OverlayEngine {
    base_image: BaseImage,
    title: Option<String>,
    captions: Captions,
    drag: Option<ActiveDrag>,
}

impl OverlayEngine {
    /// Open the editor over `base_image` with default captions.
    #[must_use]
    pub fn new(base_image: BaseImage) -> Self {
        Self {
            base_image,
            title: None,
            captions: Captions::default(),
            drag: None,
        }
    }

    /// Open the editor on a template picked in the catalog.
    #[must_use]
    pub fn from_selection(selection: SelectedTemplate) -> Self {
        let mut engine = Self::new(BaseImage::Url(selection.url));
        engine.title = Some(selection.name);
        engine
    }

    pub fn base_image(&self) -> &BaseImage {
        &self.base_image
    }

    /// Swap in a different image, e.g. a user upload. Captions are kept.
    pub fn set_base_image(&mut self, base_image: BaseImage) {
        self.base_image = base_image;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn captions(&self) -> &Captions {
        &self.captions
    }

    pub fn caption(&self, slot: CaptionSlot) -> &CaptionStyle {
        self.captions.get(slot)
    }

    /// Apply a style-control input to one caption.
    pub fn edit(&mut self, slot: CaptionSlot, edit: StyleEdit) {
        self.captions.get_mut(slot).apply(edit);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Accumulated pixel offset of the caption being dragged, if it is `slot`.
    pub fn drag_offset(&self, slot: CaptionSlot) -> Option<(f64, f64)> {
        self.drag.filter(|d| d.slot == slot).map(|d| d.offset)
    }

    /// Describe what to draw right now.
    pub fn render(&self) -> OverlayFrame {
        let layers = CaptionSlot::BOTH
            .into_iter()
            .filter(|slot| self.captions.get(*slot).is_visible())
            .map(|slot| {
                CaptionLayer::new(
                    slot,
                    self.captions.get(slot),
                    self.drag_offset(slot).unwrap_or((0.0, 0.0)),
                )
            })
            .collect();

        OverlayFrame {
            base_image: self.base_image.clone(),
            layers,
            guides: self.is_dragging().then(Guides::centered),
        }
    }
}

impl DragHandler for OverlayEngine {
    fn on_drag_start(&mut self, slot: CaptionSlot) {
        debug!("Drag started on {slot} caption");
        self.drag = Some(ActiveDrag {
            slot,
            offset: (0.0, 0.0),
        });
    }

    fn on_drag_move(&mut self, slot: CaptionSlot, dx: f64, dy: f64) {
        if let Some(drag) = self.drag.as_mut().filter(|d| d.slot == slot) {
            drag.offset.0 += dx;
            drag.offset.1 += dy;
        }
    }

    fn on_drag_end(&mut self, slot: CaptionSlot, element: Rect, container: Option<Rect>) {
        self.drag = None;

        let Some(container) = container else {
            debug!("Drag ended on {slot} caption without container geometry");
            return;
        };

        match percent_position(element.center(), &container) {
            Some((x, y)) => {
                debug!("Moved {slot} caption to ({x:.1}%, {y:.1}%)");
                self.captions.get_mut(slot).set_position(x, y);
            }
            None => debug!("Container for {slot} caption has no area"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_text() -> OverlayEngine {
        let mut engine = OverlayEngine::new(BaseImage::Url("https://i.imgflip.com/30b1gx.jpg".into()));
        engine.edit(CaptionSlot::Top, StyleEdit::Text("TOP".into()));
        engine.edit(CaptionSlot::Bottom, StyleEdit::Text("BOTTOM".into()));
        engine
    }

    fn container() -> Rect {
        Rect::new(100.0, 50.0, 400.0, 200.0)
    }

    #[test]
    fn drag_end_stores_center_as_percentages() {
        let mut engine = engine_with_text();
        engine.on_drag_start(CaptionSlot::Top);
        // center at (300, 100): 50% across, 25% down
        engine.on_drag_end(
            CaptionSlot::Top,
            Rect::new(250.0, 90.0, 100.0, 20.0),
            Some(container()),
        );

        let top = engine.caption(CaptionSlot::Top);
        assert!((top.pos_x_percent - 50.0).abs() < 1e-9);
        assert!((top.pos_y_percent - 25.0).abs() < 1e-9);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn drag_end_clamps_out_of_bounds() {
        let mut engine = engine_with_text();
        // raw x = -10%, raw y = 110%
        let element = Rect::new(55.0, 265.0, 10.0, 10.0);
        assert_eq!(element.center(), (60.0, 270.0));

        engine.on_drag_start(CaptionSlot::Bottom);
        engine.on_drag_end(CaptionSlot::Bottom, element, Some(container()));

        let bottom = engine.caption(CaptionSlot::Bottom);
        assert_eq!(bottom.pos_x_percent, 0.0);
        assert_eq!(bottom.pos_y_percent, 100.0);
    }

    #[test]
    fn drag_end_leaves_other_fields_and_caption_alone() {
        let mut engine = engine_with_text();
        let before_top = engine.caption(CaptionSlot::Top).clone();
        let before_bottom = engine.caption(CaptionSlot::Bottom).clone();

        engine.on_drag_start(CaptionSlot::Top);
        engine.on_drag_end(
            CaptionSlot::Top,
            Rect::new(380.0, 180.0, 40.0, 40.0),
            Some(container()),
        );

        let mut expected = before_top;
        expected.pos_x_percent = 75.0;
        expected.pos_y_percent = 75.0;
        assert_eq!(engine.caption(CaptionSlot::Top), &expected);
        assert_eq!(engine.caption(CaptionSlot::Bottom), &before_bottom);
    }

    #[test]
    fn missing_container_exits_dragging_without_moving() {
        let mut engine = engine_with_text();
        let before = engine.captions().clone();

        engine.on_drag_start(CaptionSlot::Top);
        assert!(engine.is_dragging());
        engine.on_drag_end(CaptionSlot::Top, Rect::new(0.0, 0.0, 10.0, 10.0), None);

        assert!(!engine.is_dragging());
        assert_eq!(engine.captions(), &before);
    }

    #[test]
    fn zero_area_container_is_treated_as_missing() {
        let mut engine = engine_with_text();
        let before = engine.captions().clone();

        engine.on_drag_start(CaptionSlot::Top);
        engine.on_drag_end(
            CaptionSlot::Top,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Some(Rect::new(0.0, 0.0, 0.0, 300.0)),
        );

        assert!(!engine.is_dragging());
        assert_eq!(engine.captions(), &before);
    }

    #[test]
    fn moves_accumulate_only_for_dragged_caption() {
        let mut engine = engine_with_text();
        engine.on_drag_start(CaptionSlot::Top);
        engine.on_drag_move(CaptionSlot::Top, 5.0, -2.0);
        engine.on_drag_move(CaptionSlot::Top, 1.0, 1.0);
        engine.on_drag_move(CaptionSlot::Bottom, 100.0, 100.0);

        assert_eq!(engine.drag_offset(CaptionSlot::Top), Some((6.0, -1.0)));
        assert_eq!(engine.drag_offset(CaptionSlot::Bottom), None);
        assert_eq!(engine.caption(CaptionSlot::Top).pos_x_percent, 50.0);
    }

    #[test]
    fn guides_show_only_while_dragging() {
        let mut engine = engine_with_text();
        assert!(engine.render().guides.is_none());

        engine.on_drag_start(CaptionSlot::Bottom);
        let frame = engine.render();
        let guides = frame.guides.unwrap();
        assert_eq!((guides.vertical_x_percent, guides.horizontal_y_percent), (50.0, 50.0));

        engine.on_drag_end(CaptionSlot::Bottom, Rect::new(0.0, 0.0, 1.0, 1.0), None);
        assert!(engine.render().guides.is_none());
    }

    #[test]
    fn empty_captions_are_not_rendered() {
        let mut engine = OverlayEngine::new(BaseImage::Local(PathBuf::from("/tmp/upload.png")));
        assert!(engine.render().layers.is_empty());

        engine.edit(CaptionSlot::Bottom, StyleEdit::Text("ONLY ME".into()));
        let frame = engine.render();
        assert_eq!(frame.layers.len(), 1);
        assert_eq!(frame.layers[0].slot, CaptionSlot::Bottom);
    }

    #[test]
    fn from_selection_uses_template_url() {
        let engine = OverlayEngine::from_selection(SelectedTemplate {
            name: "Drake Hotline Bling".into(),
            url: "https://i.imgflip.com/30b1gx.jpg".into(),
        });
        assert_eq!(
            engine.base_image(),
            &BaseImage::Url("https://i.imgflip.com/30b1gx.jpg".into())
        );
        assert_eq!(engine.title(), Some("Drake Hotline Bling"));
    }

    #[test]
    fn percent_position_handles_offset_containers() {
        let pos = percent_position((150.0, 100.0), &Rect::new(100.0, 50.0, 100.0, 100.0));
        assert_eq!(pos, Some((50.0, 50.0)));
        assert_eq!(percent_position((0.0, 0.0), &Rect::new(0.0, 0.0, f64::NAN, 1.0)), None);
    }
}
