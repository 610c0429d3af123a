use crate::compose::kinds::{ContentCtx, renderer_for};
use crate::compose::layer::{
    BackgroundImage, Guide, Layer, LayerContent, LayerName, LayerTree, NoteItem, RenderMode,
    Shape, SlidePosition, WatermarkItem,
};
use crate::foundation::core::{Point, Rect, Rgba8, Size};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::config::{BackgroundType, DesignConfig, FrameStyle, OverlayType};
use crate::model::slide::SlideContent;
use crate::model::style::{FontWeight, StyleRole};
use crate::style::resolve::{Anchor, ConcreteStyle, Shadow, resolve_role};

/// Inner padding of the content area and watermark inset, at scale 1.
pub const CONTENT_PADDING: f64 = 64.0;
pub const FRAME_INSET: f64 = 32.0;
const SIMPLE_STROKE: f64 = 2.0;
const BOLD_STROKE: f64 = 6.0;
const CORNER_LENGTH: f64 = 60.0;
const CORNER_THICKNESS: f64 = 3.0;
const CINEMA_INSET_FACTOR: f64 = 1.5;
const CINEMA_STROKE: f64 = 2.0;

const WATERMARK_SIZE: f64 = 20.0;
const WATERMARK_ALPHA: f32 = 0.6;

const PROGRESS_BOTTOM: f64 = 40.0;
const PROGRESS_HEIGHT: f64 = 4.0;
const PROGRESS_RADIUS: f64 = 2.0;
const PROGRESS_LEFT: f64 = 0.1;
const PROGRESS_WIDTH: f64 = 0.8;
const PROGRESS_TRACK_ALPHA: f32 = 0.2;

const BLUR_OVERSCALE: f64 = 1.05;
const CONTENT_GUIDE_ALPHA: f32 = 0.15;
const NOTE_GUIDE_ALPHA: f32 = 0.3;

/// Build the layer tree for one slide.
///
/// `scale` maps the config's base pixels onto the output; preview and export differ only
/// in scale and in `mode`, so their geometry is proportional. A config that fails
/// [`DesignConfig::validate`] is rejected.
#[tracing::instrument(skip(slide, config), fields(slide = %slide.id, kind = slide.kind.as_str()))]
pub fn compose(
    slide: &SlideContent,
    config: &DesignConfig,
    position: SlidePosition,
    scale: f64,
    mode: RenderMode,
) -> SocialflowResult<LayerTree> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(SocialflowError::validation(
            "compose scale must be finite and > 0",
        ));
    }
    config.validate()?;
    let size = config.canvas()?.scaled(scale);

    let mut layers = Vec::with_capacity(7);
    layers.push(background_layer(config, scale));
    layers.push(overlay_layer(config));
    if let Some(frame) = frame_layer(config, size, scale) {
        layers.push(frame);
    }
    if let Some(wm) = watermark_layer(config, size, scale) {
        layers.push(wm);
    }
    if let Some(progress) = progress_layer(config, position, size, scale) {
        layers.push(progress);
    }
    if let Some(note) = note_layer(slide, config, size, scale, mode) {
        layers.push(note);
    }

    let pad = CONTENT_PADDING * scale;
    let area = Rect::new(pad, pad, (size.width - pad).max(pad), (size.height - pad).max(pad));
    let ctx = ContentCtx {
        slide,
        config,
        scale,
        area,
        guide: guide_for(mode, CONTENT_GUIDE_ALPHA),
    };
    let block = renderer_for(slide.kind).content(&ctx);
    layers.push(Layer::new(LayerName::Content, LayerContent::Content(block)));

    Ok(LayerTree {
        slide_id: slide.id.clone(),
        kind: slide.kind,
        size,
        scale,
        mode,
        layers,
    })
}

fn guide_for(mode: RenderMode, alpha: f32) -> Option<Guide> {
    mode.is_interactive().then(|| Guide {
        color: Rgba8::WHITE.with_alpha(alpha),
        width: 1.0,
    })
}

fn background_layer(config: &DesignConfig, scale: f64) -> Layer {
    let image = match config.bg_type {
        BackgroundType::Color => None,
        BackgroundType::Image => config
            .bg_image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty()),
    };
    let content = match (config.bg_type, image) {
        (BackgroundType::Color, _) => LayerContent::Fill(config.bg_color),
        (BackgroundType::Image, None) => LayerContent::Fill(Rgba8::BLACK),
        (BackgroundType::Image, Some(source)) => {
            let blur = (config.bg_blur.max(0.0)) * scale;
            LayerContent::Image(BackgroundImage {
                source: source.to_string(),
                size: config.bg_size,
                position: config.bg_position,
                blur,
                overscale: if blur > 0.0 { BLUR_OVERSCALE } else { 1.0 },
            })
        }
    };
    Layer::new(LayerName::Background, content)
}

fn overlay_layer(config: &DesignConfig) -> Layer {
    match config.overlay_type.color() {
        Some(color) => Layer::new(LayerName::Overlay, LayerContent::Fill(color))
            .with_opacity(config.overlay_opacity as f32),
        None => Layer::new(LayerName::Overlay, LayerContent::Fill(Rgba8::TRANSPARENT))
            .with_opacity(0.0)
            .hidden(),
    }
}

/// Frame geometry in scaled pixels; empty for [`FrameStyle::None`].
pub fn frame_shapes(style: FrameStyle, color: Rgba8, size: Size, scale: f64) -> Vec<Shape> {
    let inset = FRAME_INSET * scale;
    let (x0, y0, x1, y1) = (inset, inset, size.width - inset, size.height - inset);
    let border = |w: f64| {
        vec![
            Shape::rect(Rect::new(x0, y0, x1, y0 + w), color),
            Shape::rect(Rect::new(x0, y1 - w, x1, y1), color),
            Shape::rect(Rect::new(x0, y0 + w, x0 + w, y1 - w), color),
            Shape::rect(Rect::new(x1 - w, y0 + w, x1, y1 - w), color),
        ]
    };

    match style {
        FrameStyle::None => Vec::new(),
        FrameStyle::Simple => border(SIMPLE_STROKE * scale),
        FrameStyle::Bold => border(BOLD_STROKE * scale),
        FrameStyle::Corners => {
            let l = CORNER_LENGTH * scale;
            let t = CORNER_THICKNESS * scale;
            vec![
                Shape::rect(Rect::new(x0, y0, x0 + l, y0 + t), color),
                Shape::rect(Rect::new(x0, y0, x0 + t, y0 + l), color),
                Shape::rect(Rect::new(x1 - l, y0, x1, y0 + t), color),
                Shape::rect(Rect::new(x1 - t, y0, x1, y0 + l), color),
                Shape::rect(Rect::new(x0, y1 - t, x0 + l, y1), color),
                Shape::rect(Rect::new(x0, y1 - l, x0 + t, y1), color),
                Shape::rect(Rect::new(x1 - l, y1 - t, x1, y1), color),
                Shape::rect(Rect::new(x1 - t, y1 - l, x1, y1), color),
            ]
        }
        FrameStyle::Cinema => {
            let bar = inset * CINEMA_INSET_FACTOR;
            let t = CINEMA_STROKE * scale;
            vec![
                Shape::rect(Rect::new(0.0, bar, size.width, bar + t), color),
                Shape::rect(
                    Rect::new(0.0, size.height - bar - t, size.width, size.height - bar),
                    color,
                ),
            ]
        }
    }
}

fn frame_layer(config: &DesignConfig, size: Size, scale: f64) -> Option<Layer> {
    let shapes = frame_shapes(config.frame_style, config.frame_color, size, scale);
    (!shapes.is_empty()).then(|| Layer::new(LayerName::Frame, LayerContent::Shapes(shapes)))
}

/// Text color for chrome drawn over the overlay: dark on a white scrim, light otherwise.
fn chrome_color(overlay: OverlayType) -> Rgba8 {
    match overlay {
        OverlayType::White => Rgba8::BLACK,
        _ => Rgba8::WHITE,
    }
}

fn watermark_layer(config: &DesignConfig, size: Size, scale: f64) -> Option<Layer> {
    if config.watermark.trim().is_empty() {
        return None;
    }
    let body = &config.body_style;
    let style = ConcreteStyle {
        font_size: WATERMARK_SIZE * scale,
        family: body.font_family,
        weight: FontWeight::MEDIUM,
        color: chrome_color(config.overlay_type).with_alpha(WATERMARK_ALPHA),
        line_height: 1.0,
        align: crate::model::style::TextAlign::Right,
        anchor: Anchor::End,
        shadow: body
            .enable_shadow
            .then(|| Shadow::scaled(1.0, 4.0, 0.3, scale)),
        decoration: None,
    };
    let pad = CONTENT_PADDING * scale;
    Some(Layer::new(
        LayerName::Watermark,
        LayerContent::Watermark(WatermarkItem {
            text: config.watermark.clone(),
            style,
            anchor: Point::new(size.width - pad, pad),
        }),
    ))
}

/// Progress track and fill; `None` when disabled or for single-slide carousels.
pub fn progress_shapes(
    overlay: OverlayType,
    position: SlidePosition,
    size: Size,
    scale: f64,
) -> Option<[Shape; 2]> {
    if position.total <= 1 {
        return None;
    }
    let fill_color = chrome_color(overlay);
    let track_color = fill_color.with_alpha(PROGRESS_TRACK_ALPHA);
    let x0 = size.width * PROGRESS_LEFT;
    let width = size.width * PROGRESS_WIDTH;
    let y1 = size.height - PROGRESS_BOTTOM * scale;
    let y0 = y1 - PROGRESS_HEIGHT * scale;
    let radius = PROGRESS_RADIUS * scale;
    Some([
        Shape {
            rect: Rect::new(x0, y0, x0 + width, y1),
            radius,
            color: track_color,
        },
        Shape {
            rect: Rect::new(x0, y0, x0 + width * position.progress(), y1),
            radius,
            color: fill_color,
        },
    ])
}

fn progress_layer(
    config: &DesignConfig,
    position: SlidePosition,
    size: Size,
    scale: f64,
) -> Option<Layer> {
    if !config.show_progress_bar {
        return None;
    }
    let shapes = progress_shapes(config.overlay_type, position, size, scale)?;
    Some(Layer::new(
        LayerName::Progress,
        LayerContent::Shapes(shapes.to_vec()),
    ))
}

fn note_layer(
    slide: &SlideContent,
    config: &DesignConfig,
    size: Size,
    scale: f64,
    mode: RenderMode,
) -> Option<Layer> {
    if slide.note.is_empty() {
        return None;
    }
    let position = slide
        .note_position
        .unwrap_or_else(|| config.note_anchor())
        .clamped();
    let center = Point::new(
        size.width * position.x / 100.0,
        size.height * position.y / 100.0,
    );
    Some(Layer::new(
        LayerName::Note,
        LayerContent::Note(NoteItem {
            text: slide.note.clone(),
            style: resolve_role(config.style(StyleRole::Note), StyleRole::Note, scale),
            position,
            center,
            draggable: mode.is_interactive(),
            guide: guide_for(mode, NOTE_GUIDE_ALPHA),
        }),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
