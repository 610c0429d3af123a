use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::slide::NotePosition;
use crate::model::style::{MAX_FONT_SIZE, MAX_LINE_HEIGHT, StyleRole, TextStyle};

/// Base width shared by every fixed aspect ratio.
pub const BASE_WIDTH: u32 = 1080;
/// Largest accepted background blur radius, in px at scale 1.
pub const MAX_BG_BLUR: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Output aspect ratio.
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[default]
    #[serde(rename = "4:5")]
    Portrait,
    #[serde(rename = "9:16")]
    Story,
    /// Uses `customWidth` × `customHeight`.
    #[serde(rename = "custom")]
    Custom,
}

impl AspectRatio {
    /// Fixed pixel size, or `None` for [`AspectRatio::Custom`].
    pub fn fixed_size(self) -> Option<(u32, u32)> {
        match self {
            Self::Square => Some((BASE_WIDTH, 1080)),
            Self::Portrait => Some((BASE_WIDTH, 1350)),
            Self::Story => Some((BASE_WIDTH, 1920)),
            Self::Custom => None,
        }
    }

    pub fn parse(s: &str) -> SocialflowResult<Self> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "4:5" => Ok(Self::Portrait),
            "9:16" => Ok(Self::Story),
            "custom" => Ok(Self::Custom),
            other => Err(SocialflowError::validation(format!(
                "unknown aspect ratio '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Color,
    Image,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// CSS `background-size` for image backgrounds.
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// CSS `background-position` keyword for image backgrounds.
pub enum BackgroundPosition {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl BackgroundPosition {
    /// Normalized anchor `(ax, ay)` in `[0, 1]` used to place the image in its box.
    pub fn anchor(self) -> (f64, f64) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::Top => (0.5, 0.0),
            Self::Bottom => (0.5, 1.0),
            Self::Left => (0.0, 0.5),
            Self::Right => (1.0, 0.5),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Full-bleed legibility scrim above the background.
pub enum OverlayType {
    None,
    #[default]
    Black,
    White,
}

impl OverlayType {
    pub fn color(self) -> Option<Rgba8> {
        match self {
            Self::None => None,
            Self::Black => Some(Rgba8::BLACK),
            Self::White => Some(Rgba8::WHITE),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStyle {
    #[default]
    None,
    Simple,
    Bold,
    Corners,
    Cinema,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Everything that styles a carousel, shared by all of its slides.
pub struct DesignConfig {
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default = "default_custom_width")]
    pub custom_width: u32,
    #[serde(default = "default_custom_height")]
    pub custom_height: u32,

    /// Account handle stamped top-right on every slide. Empty disables it.
    #[serde(default)]
    pub watermark: String,
    /// Where notes sit when a slide has no override of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_note_position: Option<NotePosition>,

    #[serde(default)]
    pub bg_type: BackgroundType,
    pub bg_color: Rgba8,
    /// Asset reference (relative path) of the background image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_image: Option<String>,
    #[serde(default)]
    pub bg_size: BackgroundSize,
    #[serde(default)]
    pub bg_position: BackgroundPosition,
    /// CSS blur radius in px at scale 1.
    #[serde(default)]
    pub bg_blur: f64,

    #[serde(default)]
    pub overlay_type: OverlayType,
    #[serde(default)]
    pub overlay_opacity: f64,

    #[serde(default)]
    pub frame_style: FrameStyle,
    #[serde(default = "default_frame_color")]
    pub frame_color: Rgba8,

    #[serde(default)]
    pub show_progress_bar: bool,

    pub title_style: TextStyle,
    pub subtitle_style: TextStyle,
    pub body_style: TextStyle,
    pub note_style: TextStyle,
    /// Falls back to `subtitle_style` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_title_style: Option<TextStyle>,
    /// Falls back to `body_style` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_body_style: Option<TextStyle>,
}

fn default_custom_width() -> u32 {
    BASE_WIDTH
}

fn default_custom_height() -> u32 {
    1350
}

fn default_frame_color() -> Rgba8 {
    Rgba8::WHITE
}

impl DesignConfig {
    /// Pixel size of one slide at scale 1.
    pub fn canvas(&self) -> SocialflowResult<Canvas> {
        let (w, h) = self
            .aspect_ratio
            .fixed_size()
            .unwrap_or((self.custom_width, self.custom_height));
        Canvas::new(w, h)
    }

    /// Effective style for a role, resolving end-slide fallbacks.
    pub fn style(&self, role: StyleRole) -> &TextStyle {
        match role {
            StyleRole::Title => &self.title_style,
            StyleRole::Subtitle => &self.subtitle_style,
            StyleRole::Body => &self.body_style,
            StyleRole::Note => &self.note_style,
            StyleRole::EndTitle => self.end_title_style.as_ref().unwrap_or(&self.subtitle_style),
            StyleRole::EndBody => self.end_body_style.as_ref().unwrap_or(&self.body_style),
        }
    }

    /// Mutable slot for a role. An unset end style is materialized from its fallback first.
    pub fn style_mut(&mut self, role: StyleRole) -> &mut TextStyle {
        match role {
            StyleRole::Title => &mut self.title_style,
            StyleRole::Subtitle => &mut self.subtitle_style,
            StyleRole::Body => &mut self.body_style,
            StyleRole::Note => &mut self.note_style,
            StyleRole::EndTitle => {
                let fallback = &self.subtitle_style;
                self.end_title_style.get_or_insert_with(|| fallback.clone())
            }
            StyleRole::EndBody => {
                let fallback = &self.body_style;
                self.end_body_style.get_or_insert_with(|| fallback.clone())
            }
        }
    }

    pub fn note_anchor(&self) -> NotePosition {
        self.global_note_position.unwrap_or(NotePosition::FALLBACK)
    }

    /// Switch background type. An image background never goes without an overlay:
    /// `none` becomes `black`. Going back to `color` leaves the overlay alone.
    pub fn set_background_type(&mut self, bg_type: BackgroundType) {
        self.bg_type = bg_type;
        if bg_type == BackgroundType::Image && self.overlay_type == OverlayType::None {
            self.overlay_type = OverlayType::Black;
        }
    }

    /// Set overlay opacity (clamped to `[0, 1]`). Adjusting opacity while the overlay is
    /// `none` turns on the black overlay.
    pub fn set_overlay_opacity(&mut self, opacity: f64) {
        self.overlay_opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if self.overlay_type == OverlayType::None {
            self.overlay_type = OverlayType::Black;
        }
    }

    /// Validate config invariants that serde cannot express.
    pub fn validate(&self) -> SocialflowResult<()> {
        self.canvas()?;
        if !self.overlay_opacity.is_finite() || !(0.0..=1.0).contains(&self.overlay_opacity) {
            return Err(SocialflowError::validation(
                "overlayOpacity must be finite and within [0, 1]",
            ));
        }
        if !self.bg_blur.is_finite() || !(0.0..=MAX_BG_BLUR).contains(&self.bg_blur) {
            return Err(SocialflowError::validation(format!(
                "bgBlur must be finite and within [0, {MAX_BG_BLUR}]"
            )));
        }
        if self.bg_type == BackgroundType::Image && self.overlay_type == OverlayType::None {
            return Err(SocialflowError::validation(
                "image backgrounds require an overlay",
            ));
        }
        for role in StyleRole::ALL {
            let s = self.style(role);
            if !s.font_size.is_finite() || !(0.0..=MAX_FONT_SIZE).contains(&s.font_size) {
                return Err(SocialflowError::validation(format!(
                    "{} style fontSize must be finite and within [0, {MAX_FONT_SIZE}]",
                    role.key()
                )));
            }
            if let Some(lh) = s.line_height
                && (!lh.is_finite() || lh <= 0.0 || lh > MAX_LINE_HEIGHT)
            {
                return Err(SocialflowError::validation(format!(
                    "{} style lineHeight must be finite and within (0, {MAX_LINE_HEIGHT}] when set",
                    role.key()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/config.rs"]
mod tests;
