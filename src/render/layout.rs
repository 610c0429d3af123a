use crate::assets::fonts::FontBook;
use crate::assets::store::PreparedAssets;
use crate::compose::layer::{
    BackgroundImage, ContentBlock, Guide, LayerContent, LayerName, LayerTree, NoteItem, Shape,
    WatermarkItem,
};
use crate::foundation::core::{Affine, Point, Rect, Rgba8, Size, Vec2};
use crate::model::config::BackgroundSize;
use crate::render::text::{ShapedText, TextEngine};
use crate::style::resolve::ConcreteStyle;

const GUIDE_DASH: f64 = 4.0;
const GUIDE_GAP: f64 = 4.0;
pub const MAX_GUIDE_DASHES: usize = 1024;

#[derive(Clone, Debug)]
/// A layer tree measured and flattened into paintable primitives.
pub struct SlideLayout {
    pub size: Size,
    /// Back to front.
    pub layers: Vec<LaidLayer>,
    /// Outer box of the note, the region a pointer must hit to start a drag.
    pub note_bounds: Option<Rect>,
}

#[derive(Clone, Debug)]
pub struct LaidLayer {
    pub name: LayerName,
    pub opacity: f32,
    pub stages: Vec<Stage>,
}

#[derive(Clone, Debug, Default)]
/// Primitives painted together, then optionally blurred as a group.
pub struct Stage {
    pub prims: Vec<Prim>,
    /// Gaussian sigma in layout pixels.
    pub blur_sigma: Option<f64>,
}

impl Stage {
    fn sharp(prims: Vec<Prim>) -> Self {
        Self {
            prims,
            blur_sigma: None,
        }
    }

    /// Union of the primitive bounds, `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.prims
            .iter()
            .map(Prim::bounds)
            .reduce(|a, b| a.union(b))
    }
}

#[derive(Clone, Debug)]
pub enum Prim {
    Fill(Shape),
    Image {
        source: String,
        /// Maps image pixels into layout pixels.
        transform: Affine,
        width: u32,
        height: u32,
    },
    Text {
        shaped: ShapedText,
        /// Top-left of the text box.
        origin: Point,
        color: Rgba8,
    },
}

impl Prim {
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Fill(shape) => shape.rect,
            Self::Image {
                transform,
                width,
                height,
                ..
            } => transform.transform_rect_bbox(Rect::new(
                0.0,
                0.0,
                f64::from(*width),
                f64::from(*height),
            )),
            // Ink can overhang the line boxes.
            Self::Text { shaped, origin, .. } => {
                let overhang = f64::from(shaped.font_size) * 0.5;
                Rect::from_origin_size(*origin, Size::new(shaped.width, shaped.height))
                    .inflate(overhang, overhang)
            }
        }
    }
}

/// Measure every text item of `tree` and flatten its painted layers.
#[tracing::instrument(skip_all, fields(slide = %tree.slide_id))]
pub fn layout(
    tree: &LayerTree,
    assets: &PreparedAssets,
    fonts: &mut FontBook,
    engine: &mut TextEngine,
) -> SlideLayout {
    let mut out = SlideLayout {
        size: tree.size,
        layers: Vec::new(),
        note_bounds: None,
    };
    for layer in tree.paint_order() {
        let stages = match &layer.content {
            LayerContent::Fill(color) => vec![Stage::sharp(vec![Prim::Fill(Shape::rect(
                tree.bounds(),
                *color,
            ))])],
            LayerContent::Image(image) => background_stages(image, tree.size, assets),
            LayerContent::Shapes(shapes) => {
                vec![Stage::sharp(shapes.iter().copied().map(Prim::Fill).collect())]
            }
            LayerContent::Watermark(wm) => watermark_stages(wm, fonts, engine),
            LayerContent::Note(note) => {
                let (stages, bounds) = note_stages(note, tree.size, fonts, engine);
                out.note_bounds = Some(bounds);
                stages
            }
            LayerContent::Content(block) => content_stages(block, fonts, engine),
        };
        out.layers.push(LaidLayer {
            name: layer.name,
            opacity: layer.opacity,
            stages,
        });
    }
    out
}

/// Black container, then the image placed by size and position keywords.
fn background_stages(image: &BackgroundImage, size: Size, assets: &PreparedAssets) -> Vec<Stage> {
    let container = Stage::sharp(vec![Prim::Fill(Shape::rect(
        Rect::from_origin_size(Point::ORIGIN, size),
        Rgba8::BLACK,
    ))]);
    let Some(decoded) = assets.image(&image.source) else {
        tracing::warn!(source = %image.source, "background image not prepared");
        return vec![container];
    };
    let transform = background_transform(
        Size::new(f64::from(decoded.width), f64::from(decoded.height)),
        size,
        image,
    );
    let picture = Stage {
        prims: vec![Prim::Image {
            source: image.source.clone(),
            transform,
            width: decoded.width,
            height: decoded.height,
        }],
        blur_sigma: (image.blur > 0.0).then_some(image.blur),
    };
    vec![container, picture]
}

/// Affine placing an `image`-sized picture into a `frame` per CSS `background-size` and
/// `background-position`, zoomed about the frame center by the overscale.
pub fn background_transform(image: Size, frame: Size, bg: &BackgroundImage) -> Affine {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Affine::IDENTITY;
    }
    let sx = frame.width / image.width;
    let sy = frame.height / image.height;
    let s = match bg.size {
        BackgroundSize::Cover => sx.max(sy),
        BackgroundSize::Contain => sx.min(sy),
    };
    let (ax, ay) = bg.position.anchor();
    let placed = Vec2::new(
        (frame.width - image.width * s) * ax,
        (frame.height - image.height * s) * ay,
    );
    let center = Vec2::new(frame.width * 0.5, frame.height * 0.5);
    Affine::translate(center)
        * Affine::scale(bg.overscale)
        * Affine::translate(-center)
        * Affine::translate(placed)
        * Affine::scale(s)
}

/// Text plus its decorations, collected so many boxes share stages.
#[derive(Default)]
struct TextStages {
    under: Vec<Prim>,
    shadows: Vec<Stage>,
    glyphs: Vec<Prim>,
}

impl TextStages {
    fn push_box(
        &mut self,
        style: &ConcreteStyle,
        shaped: ShapedText,
        outer: Rect,
        guide: Option<Guide>,
    ) {
        let pad = padding(style);
        if let Some(deco) = style.decoration {
            self.under.push(Prim::Fill(Shape {
                rect: outer,
                radius: deco.radius,
                color: deco.color,
            }));
        }
        if let Some(guide) = guide {
            self.under
                .extend(dashed_outline(outer, guide).into_iter().map(Prim::Fill));
        }
        let origin = outer.origin() + pad;
        if !shaped.is_drawable() {
            return;
        }
        if let Some(shadow) = style.shadow {
            let sigma = shadow.blur * 0.5;
            let prim = Prim::Text {
                shaped: shaped.clone(),
                origin: origin + shadow.offset,
                color: shadow.color,
            };
            let blur_sigma = (sigma > 0.0).then_some(sigma);
            match self.shadows.last_mut() {
                Some(stage) if stage.blur_sigma == blur_sigma => stage.prims.push(prim),
                _ => self.shadows.push(Stage {
                    prims: vec![prim],
                    blur_sigma,
                }),
            }
        }
        self.glyphs.push(Prim::Text {
            shaped,
            origin,
            color: style.color,
        });
    }

    fn into_stages(self) -> Vec<Stage> {
        let mut out = Vec::with_capacity(self.shadows.len() + 2);
        if !self.under.is_empty() {
            out.push(Stage::sharp(self.under));
        }
        out.extend(self.shadows);
        if !self.glyphs.is_empty() {
            out.push(Stage::sharp(self.glyphs));
        }
        out
    }
}

fn padding(style: &ConcreteStyle) -> Vec2 {
    style
        .decoration
        .map(|d| d.padding)
        .unwrap_or(Vec2::ZERO)
}

/// Shape `text` into a box no wider than `max_outer`, padding included.
fn measure(
    text: &str,
    style: &ConcreteStyle,
    max_outer: f64,
    fonts: &mut FontBook,
    engine: &mut TextEngine,
) -> (ShapedText, Size) {
    let pad = padding(style);
    let face = fonts.resolve(style.family, style.weight);
    let shaped = engine.shape(text, style, face, (max_outer - 2.0 * pad.x).max(0.0));
    let outer = Size::new(shaped.width + 2.0 * pad.x, shaped.height + 2.0 * pad.y);
    (shaped, outer)
}

fn watermark_stages(
    wm: &WatermarkItem,
    fonts: &mut FontBook,
    engine: &mut TextEngine,
) -> Vec<Stage> {
    let (shaped, outer) = measure(&wm.text, &wm.style, wm.anchor.x, fonts, engine);
    let rect = Rect::from_origin_size(Point::new(wm.anchor.x - outer.width, wm.anchor.y), outer);
    let mut stages = TextStages::default();
    stages.push_box(&wm.style, shaped, rect, None);
    stages.into_stages()
}

/// The note shrinks to fit the room right of its center, then centers on it.
fn note_stages(
    note: &NoteItem,
    size: Size,
    fonts: &mut FontBook,
    engine: &mut TextEngine,
) -> (Vec<Stage>, Rect) {
    let available = (size.width - note.center.x).max(0.0);
    let (shaped, outer) = measure(&note.text, &note.style, available, fonts, engine);
    let rect = Rect::from_center_size(note.center, outer);
    let mut stages = TextStages::default();
    stages.push_box(&note.style, shaped, rect, note.guide);
    (stages.into_stages(), rect)
}

fn content_stages(
    block: &ContentBlock,
    fonts: &mut FontBook,
    engine: &mut TextEngine,
) -> Vec<Stage> {
    let column = block.area.width().max(0.0);
    let measured: Vec<(ShapedText, Size)> = block
        .items
        .iter()
        .map(|item| measure(&item.text, &item.style, column, fonts, engine))
        .collect();
    let gaps = block.gap * measured.len().saturating_sub(1) as f64;
    let total: f64 = measured.iter().map(|(_, outer)| outer.height).sum::<f64>() + gaps;

    let slack = block.area.height() - total;
    let mut y = if slack < 0.0 && !block.center_overflow {
        block.area.y0
    } else {
        block.area.y0 + slack * 0.5
    };
    let mut stages = TextStages::default();
    for (item, (shaped, outer)) in block.items.iter().zip(measured) {
        let x = block.area.x0 + item.anchor(block.align).offset(column, outer.width);
        let rect = Rect::from_origin_size(Point::new(x, y), outer);
        stages.push_box(&item.style, shaped, rect, item.guide);
        y += outer.height + block.gap;
    }
    stages.into_stages()
}

/// Dashes along the inside edges of `rect`. An edge carries at most [`MAX_GUIDE_DASHES`];
/// longer edges stretch the dash pattern to fit.
pub fn dashed_outline(rect: Rect, guide: Guide) -> Vec<Shape> {
    let w = guide.width.max(0.0);
    let (rw, rh) = (rect.width(), rect.height());
    if w == 0.0 || !(rw.is_finite() && rh.is_finite() && rw > 0.0 && rh > 0.0) {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (start, len) in dash_spans(rw) {
        let (x0, x1) = (rect.x0 + start, rect.x0 + start + len);
        out.push(Shape::rect(Rect::new(x0, rect.y0, x1, rect.y0 + w), guide.color));
        out.push(Shape::rect(Rect::new(x0, rect.y1 - w, x1, rect.y1), guide.color));
    }
    for (start, len) in dash_spans(rh) {
        let (y0, y1) = (rect.y0 + start, rect.y0 + start + len);
        out.push(Shape::rect(Rect::new(rect.x0, y0, rect.x0 + w, y1), guide.color));
        out.push(Shape::rect(Rect::new(rect.x1 - w, y0, rect.x1, y1), guide.color));
    }
    out
}

/// `(offset, length)` of each dash along an edge `edge` px long.
fn dash_spans(edge: f64) -> impl Iterator<Item = (f64, f64)> {
    let step = GUIDE_DASH + GUIDE_GAP;
    let natural = (edge / step).ceil();
    let (count, step) = if natural > MAX_GUIDE_DASHES as f64 {
        (MAX_GUIDE_DASHES, edge / MAX_GUIDE_DASHES as f64)
    } else {
        (natural as usize, step)
    };
    let dash = GUIDE_DASH * step / (GUIDE_DASH + GUIDE_GAP);
    (0..count).map(move |i| {
        let start = i as f64 * step;
        (start, dash.min(edge - start))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
