use crate::foundation::core::{Point, Rect, Rgba8, Size};
use crate::model::config::{BackgroundPosition, BackgroundSize};
use crate::model::slide::{NotePosition, SlideKind};
use crate::model::style::StyleRole;
use crate::style::resolve::{Anchor, ConcreteStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether a tree is built for the interactive editor or for a clean export.
pub enum RenderMode {
    /// Editable: guide borders are drawn and the note can be dragged.
    Preview,
    /// Static output with no interactive decorations.
    Export,
}

impl RenderMode {
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Preview)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A slide's place in its carousel.
pub struct SlidePosition {
    pub index: usize,
    pub total: usize,
}

impl SlidePosition {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// Fraction shown by the progress bar, `(index + 1) / total`.
    pub fn progress(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        ((self.index + 1) as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerName {
    Background,
    Overlay,
    Frame,
    Watermark,
    Progress,
    Note,
    Content,
}

impl LayerName {
    /// Stacking index. Ties keep tree order.
    pub fn z(self) -> i32 {
        match self {
            Self::Background => 0,
            Self::Overlay => 1,
            Self::Frame | Self::Content => 2,
            Self::Watermark => 3,
            Self::Progress => 5,
            Self::Note => 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// The visual tree for one slide at one scale. All geometry is in scaled pixels.
pub struct LayerTree {
    pub slide_id: String,
    pub kind: SlideKind,
    pub size: Size,
    pub scale: f64,
    pub mode: RenderMode,
    pub layers: Vec<Layer>,
}

impl LayerTree {
    pub fn layer(&self, name: LayerName) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Visible layers sorted back to front. Stable for equal z.
    pub fn paint_order(&self) -> Vec<&Layer> {
        let mut out: Vec<&Layer> = self.layers.iter().filter(|l| l.is_painted()).collect();
        out.sort_by_key(|l| l.z);
        out
    }

    /// True if any layer carries a guide border.
    pub fn has_guides(&self) -> bool {
        self.layers.iter().any(|l| match &l.content {
            LayerContent::Note(n) => n.guide.is_some(),
            LayerContent::Content(c) => c.items.iter().any(|i| i.guide.is_some()),
            _ => false,
        })
    }

    /// Whether the note layer accepts drags; false when the slide has no note.
    pub fn note_draggable(&self) -> bool {
        self.layers.iter().any(|l| matches!(&l.content, LayerContent::Note(n) if n.draggable))
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: LayerName,
    pub z: i32,
    pub opacity: f32,
    pub visible: bool,
    pub content: LayerContent,
}

impl Layer {
    pub fn new(name: LayerName, content: LayerContent) -> Self {
        Self {
            name,
            z: name.z(),
            opacity: 1.0,
            visible: true,
            content,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_painted(&self) -> bool {
        self.visible && self.opacity > 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayerContent {
    /// Full-bleed solid color.
    Fill(Rgba8),
    Image(BackgroundImage),
    Shapes(Vec<Shape>),
    Watermark(WatermarkItem),
    Note(NoteItem),
    Content(ContentBlock),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundImage {
    /// Asset reference as stored in the config.
    pub source: String,
    pub size: BackgroundSize,
    pub position: BackgroundPosition,
    /// CSS blur radius in scaled pixels; 0 disables blur.
    pub blur: f64,
    /// Uniform zoom about the center, > 1 when blurred to hide soft edges.
    pub overscale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Filled, optionally rounded rectangle.
pub struct Shape {
    pub rect: Rect,
    pub radius: f64,
    pub color: Rgba8,
}

impl Shape {
    pub fn rect(rect: Rect, color: Rgba8) -> Self {
        Self {
            rect,
            radius: 0.0,
            color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Dashed editor outline around a text box. Width is in device pixels and does not scale.
pub struct Guide {
    pub color: Rgba8,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WatermarkItem {
    pub text: String,
    pub style: ConcreteStyle,
    /// Top-right corner of the text box.
    pub anchor: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteItem {
    pub text: String,
    pub style: ConcreteStyle,
    /// Percent position the note is centered on.
    pub position: NotePosition,
    /// `position` in scaled pixels.
    pub center: Point,
    pub draggable: bool,
    pub guide: Option<Guide>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub role: StyleRole,
    pub text: String,
    pub style: ConcreteStyle,
    pub guide: Option<Guide>,
}

impl TextItem {
    pub fn anchor(&self, block_override: Option<Anchor>) -> Anchor {
        block_override.unwrap_or(self.style.anchor)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Vertically centered column of text items inside the padded slide area.
pub struct ContentBlock {
    pub area: Rect,
    /// Space between consecutive items.
    pub gap: f64,
    /// When set, places every item instead of its own style anchor.
    pub align: Option<Anchor>,
    /// A block taller than `area` stays centered and spills past both edges; otherwise it
    /// starts at the top of `area`.
    pub center_overflow: bool,
    pub items: Vec<TextItem>,
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layer.rs"]
mod tests;
