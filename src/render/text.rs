use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::fonts::FontFace;
use crate::model::style::TextAlign;
use crate::style::resolve::{Anchor, ConcreteStyle};

/// Advance per character, in em, when no face is available.
const APPROX_ADVANCE_EM: f64 = 0.55;

/// Text laid out inside its own box, origin at the top-left of the text.
#[derive(Clone, Debug)]
pub struct ShapedText {
    /// `None` when measured approximately; such text is never drawn.
    pub face: Option<Arc<FontFace>>,
    pub font_size: f32,
    pub glyphs: Arc<Vec<vello_cpu::Glyph>>,
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

impl ShapedText {
    pub fn is_drawable(&self) -> bool {
        self.face.is_some() && !self.glyphs.is_empty()
    }
}

/// Shapes text with Parley. Each face gets its own font context holding only that face, so
/// the family named in a style always resolves to the face picked for it.
pub struct TextEngine {
    contexts: HashMap<FaceKey, parley::FontContext>,
    layout_ctx: parley::LayoutContext<()>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    weight: u16,
    index: u32,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            contexts: HashMap::new(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` wrapping at `max_width`.
    ///
    /// Lines are aligned within the full `max_width` when `style.anchor` stretches, else
    /// within the widest line (the box shrinks to fit). Line boxes are `line_height_px`
    /// tall with the glyphs vertically centered in them.
    pub fn shape(
        &mut self,
        text: &str,
        style: &ConcreteStyle,
        face: Option<Arc<FontFace>>,
        max_width: f64,
    ) -> ShapedText {
        let max_width = max_width.max(0.0);
        if text.is_empty() || style.font_size <= 0.0 {
            return ShapedText {
                face,
                font_size: style.font_size as f32,
                glyphs: Arc::new(Vec::new()),
                width: 0.0,
                height: 0.0,
                line_count: 0,
            };
        }
        match face {
            Some(face) => self.shape_with_face(text, style, face, max_width),
            None => approximate(text, style, max_width),
        }
    }

    fn shape_with_face(
        &mut self,
        text: &str,
        style: &ConcreteStyle,
        face: Arc<FontFace>,
        max_width: f64,
    ) -> ShapedText {
        let key = FaceKey {
            family: face.family_name.clone(),
            weight: face.weight,
            index: face.index,
        };
        let font_ctx = self.contexts.entry(key).or_insert_with(|| {
            let mut ctx = parley::FontContext::default();
            ctx.collection
                .register_fonts(parley::fontique::Blob::from(face.data.as_ref().clone()), None);
            ctx
        });

        let size_px = style.font_size as f32;
        let line_px = style.line_height_px() as f32;

        let mut builder = self.layout_ctx.ranged_builder(font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(Some(max_width as f32));

        let natural = layout
            .lines()
            .map(|l| f64::from(l.metrics().advance))
            .fold(0.0f64, f64::max)
            .min(max_width);
        let container = if style.anchor == Anchor::Stretch {
            max_width
        } else {
            natural
        };
        layout.align(
            Some(container as f32),
            alignment(style.align),
            parley::AlignmentOptions::default(),
        );

        let mut glyphs = Vec::new();
        let mut line_count = 0usize;
        for (i, line) in layout.lines().enumerate() {
            line_count += 1;
            let m = line.metrics();
            let half_leading = (line_px - (m.ascent + m.descent)) * 0.5;
            let baseline = i as f32 * line_px + half_leading + m.ascent;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                for g in run.glyphs() {
                    glyphs.push(vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: baseline - g.y,
                    });
                    x += g.advance;
                }
            }
        }

        ShapedText {
            face: Some(face),
            font_size: size_px,
            glyphs: Arc::new(glyphs),
            width: container,
            height: line_count as f64 * f64::from(line_px),
            line_count,
        }
    }
}

fn alignment(align: TextAlign) -> parley::Alignment {
    match align {
        TextAlign::Left => parley::Alignment::Start,
        TextAlign::Center => parley::Alignment::Center,
        TextAlign::Right => parley::Alignment::End,
        TextAlign::Justify => parley::Alignment::Justify,
    }
}

/// Fixed-advance measurement: hard breaks split lines and long lines wrap by character.
fn approximate(text: &str, style: &ConcreteStyle, max_width: f64) -> ShapedText {
    let advance = style.font_size * APPROX_ADVANCE_EM;
    let per_line = if advance > 0.0 && max_width > 0.0 {
        ((max_width / advance).floor() as usize).max(1)
    } else {
        usize::MAX
    };
    let mut widest = 0.0f64;
    let mut line_count = 0usize;
    for line in text.split('\n') {
        let chars = line.chars().count();
        let wrapped = chars.div_ceil(per_line).max(1);
        line_count += wrapped;
        widest = widest.max(chars.min(per_line) as f64 * advance);
    }
    let width = if style.anchor == Anchor::Stretch {
        max_width
    } else {
        widest.min(max_width)
    };
    ShapedText {
        face: None,
        font_size: style.font_size as f32,
        glyphs: Arc::new(Vec::new()),
        width,
        height: line_count as f64 * style.line_height_px(),
        line_count,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
