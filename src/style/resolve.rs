use crate::foundation::core::{Rgba8, Vec2};
use crate::model::style::{FontFamily, FontWeight, StyleRole, TextAlign, TextStyle};

/// Line height used when neither the style nor the caller supplies one.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

const SHADOW_OFFSET_Y: f64 = 2.0;
const SHADOW_BLUR: f64 = 10.0;
const SHADOW_ALPHA: f32 = 0.5;
const HIGHLIGHT_PAD_X: f64 = 16.0;
const HIGHLIGHT_PAD_Y: f64 = 8.0;
const HIGHLIGHT_RADIUS: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where a text block sits on the cross axis of its column.
pub enum Anchor {
    Start,
    Center,
    End,
    /// Fills the full column width.
    Stretch,
}

impl Anchor {
    /// Left offset of a child of width `child` inside a column of width `column`.
    pub fn offset(self, column: f64, child: f64) -> f64 {
        let rem = (column - child).max(0.0);
        match self {
            Self::Start | Self::Stretch => 0.0,
            Self::Center => rem * 0.5,
            Self::End => rem,
        }
    }
}

impl From<TextAlign> for Anchor {
    fn from(value: TextAlign) -> Self {
        match value {
            TextAlign::Left => Self::Start,
            TextAlign::Center => Self::Center,
            TextAlign::Right => Self::End,
            TextAlign::Justify => Self::Stretch,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Drop shadow in absolute pixels. `blur` is a CSS blur radius.
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f64,
    pub color: Rgba8,
}

impl Shadow {
    pub fn scaled(offset_y: f64, blur: f64, alpha: f32, scale: f64) -> Self {
        Self {
            offset: Vec2::new(0.0, offset_y * scale),
            blur: blur * scale,
            color: Rgba8::BLACK.with_alpha(alpha),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Highlight box painted behind a text block.
pub struct BoxDecoration {
    pub color: Rgba8,
    pub padding: Vec2,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// A [`TextStyle`] with every length in absolute pixels for one scale.
pub struct ConcreteStyle {
    pub font_size: f64,
    pub family: FontFamily,
    pub weight: FontWeight,
    pub color: Rgba8,
    /// Multiple of `font_size`.
    pub line_height: f64,
    pub align: TextAlign,
    pub anchor: Anchor,
    pub shadow: Option<Shadow>,
    pub decoration: Option<BoxDecoration>,
}

impl ConcreteStyle {
    pub fn line_height_px(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// Resolve `style` at `scale`. Every length is multiplied by `scale`, so the result at
/// any scale is a uniform resize of the result at scale 1.
pub fn resolve(style: &TextStyle, scale: f64) -> ConcreteStyle {
    resolve_with_line_height(style, scale, DEFAULT_LINE_HEIGHT)
}

/// Like [`resolve`], with the role's own line-height default.
pub fn resolve_role(style: &TextStyle, role: StyleRole, scale: f64) -> ConcreteStyle {
    resolve_with_line_height(style, scale, role.default_line_height())
}

fn resolve_with_line_height(style: &TextStyle, scale: f64, fallback_lh: f64) -> ConcreteStyle {
    let decoration = style.has_background.then(|| BoxDecoration {
        color: style.background_color,
        padding: Vec2::new(HIGHLIGHT_PAD_X * scale, HIGHLIGHT_PAD_Y * scale),
        radius: HIGHLIGHT_RADIUS * scale,
    });
    let shadow = style
        .enable_shadow
        .then(|| Shadow::scaled(SHADOW_OFFSET_Y, SHADOW_BLUR, SHADOW_ALPHA, scale));

    ConcreteStyle {
        font_size: style.font_size * scale,
        family: style.font_family,
        weight: style.font_weight,
        color: style.color,
        line_height: style
            .line_height
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(fallback_lh),
        align: style.text_align,
        anchor: style.text_align.into(),
        shadow,
        decoration,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/resolve.rs"]
mod tests;
