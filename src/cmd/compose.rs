use anyhow::{bail, Context, Result};
use serde_json::json;

use memeforge::overlay::{Color, StyleEdit};
use memeforge::{BaseImage, CaptionSlot, DragHandler, OverlayEngine, Rect};

/// Root font size used to resolve `rem`/`em` caption sizes.
const ROOT_FONT_PX: f64 = 16.0;

/// Size of the stand-in caption box used for simulated drags.
const DRAG_BOX_PX: f64 = 10.0;

pub struct ComposeOptions {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<String>,
    pub container: String,
    pub drags: Vec<String>,
}

pub fn cmd_compose(image: BaseImage, options: &ComposeOptions) -> Result<()> {
    let (width, height) = parse_container(&options.container)?;
    let container = Rect::new(0.0, 0.0, width, height);

    let mut engine = OverlayEngine::new(image);

    for (slot, text) in [(CaptionSlot::Top, &options.top), (CaptionSlot::Bottom, &options.bottom)] {
        if let Some(text) = text {
            engine.edit(slot, StyleEdit::Text(text.clone()));
        }
    }

    if let Some(color) = &options.color {
        let color: Color = color.parse()?;
        for slot in CaptionSlot::BOTH {
            engine.edit(slot, StyleEdit::TextColor(color));
        }
    }

    if let Some(size) = &options.font_size {
        for slot in CaptionSlot::BOTH {
            engine.edit(slot, StyleEdit::FontSize(size.clone()));
        }
    }

    for drag in &options.drags {
        let (slot, (x, y)) = parse_drag(drag)?;
        let half = DRAG_BOX_PX / 2.0;
        engine.on_drag_start(slot);
        engine.on_drag_end(
            slot,
            Rect::new(x - half, y - half, DRAG_BOX_PX, DRAG_BOX_PX),
            Some(container),
        );
    }

    let frame = engine.render();
    let layers: Vec<_> = frame
        .layers
        .iter()
        .map(|layer| {
            json!({
                "layer": layer,
                "style": layer.inline_style(),
                "lines": layer.lines(width, ROOT_FONT_PX),
            })
        })
        .collect();

    let output = json!({
        "baseImage": frame.base_image,
        "container": { "width": width, "height": height },
        "layers": layers,
        "guides": frame.guides,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Parse `WIDTHxHEIGHT` in pixels.
fn parse_container(input: &str) -> Result<(f64, f64)> {
    let (w, h) = input
        .trim()
        .split_once(['x', 'X'])
        .with_context(|| format!("container must look like 600x400, got {input}"))?;
    let width: f64 = w.trim().parse().with_context(|| format!("invalid container width: {w}"))?;
    let height: f64 = h.trim().parse().with_context(|| format!("invalid container height: {h}"))?;
    if width <= 0.0 || height <= 0.0 {
        bail!("container must have a positive size, got {input}");
    }
    Ok((width, height))
}

/// Parse `SLOT=X,Y` with pixel coordinates relative to the container.
fn parse_drag(input: &str) -> Result<(CaptionSlot, (f64, f64))> {
    let (slot, point) = input
        .split_once('=')
        .with_context(|| format!("drag must look like top=300,40, got {input}"))?;
    let slot: CaptionSlot = slot.parse()?;
    let (x, y) = point
        .split_once(',')
        .with_context(|| format!("drag point must be X,Y, got {point}"))?;
    let x: f64 = x.trim().parse().with_context(|| format!("invalid drag x: {x}"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("invalid drag y: {y}"))?;
    Ok((slot, (x, y)))
}
