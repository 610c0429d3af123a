use std::fmt;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::foundation::math::parse_float_or;

/// Largest accepted font size, in px at scale 1.
pub const MAX_FONT_SIZE: f64 = 1000.0;
/// Largest accepted line height, as a multiple of the font size.
pub const MAX_LINE_HEIGHT: f64 = 10.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Font families the editor offers. Serialized by display name.
pub enum FontFamily {
    #[default]
    #[serde(rename = "Noto Sans TC")]
    NotoSansTc,
    #[serde(rename = "Noto Serif TC")]
    NotoSerifTc,
    #[serde(rename = "Shippori Mincho")]
    ShipporiMincho,
    #[serde(rename = "Dela Gothic One")]
    DelaGothicOne,
    #[serde(rename = "Anton")]
    Anton,
    #[serde(rename = "M PLUS Rounded 1c")]
    MPlusRounded1c,
    #[serde(rename = "Rampart One")]
    RampartOne,
    #[serde(rename = "Klee One")]
    KleeOne,
    #[serde(rename = "DotGothic16")]
    DotGothic16,
    #[serde(rename = "Montserrat")]
    Montserrat,
    #[serde(rename = "Playfair Display")]
    PlayfairDisplay,
}

impl FontFamily {
    pub const ALL: [Self; 11] = [
        Self::NotoSansTc,
        Self::NotoSerifTc,
        Self::ShipporiMincho,
        Self::DelaGothicOne,
        Self::Anton,
        Self::MPlusRounded1c,
        Self::RampartOne,
        Self::KleeOne,
        Self::DotGothic16,
        Self::Montserrat,
        Self::PlayfairDisplay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::NotoSansTc => "Noto Sans TC",
            Self::NotoSerifTc => "Noto Serif TC",
            Self::ShipporiMincho => "Shippori Mincho",
            Self::DelaGothicOne => "Dela Gothic One",
            Self::Anton => "Anton",
            Self::MPlusRounded1c => "M PLUS Rounded 1c",
            Self::RampartOne => "Rampart One",
            Self::KleeOne => "Klee One",
            Self::DotGothic16 => "DotGothic16",
            Self::Montserrat => "Montserrat",
            Self::PlayfairDisplay => "Playfair Display",
        }
    }

    /// Exact display-name lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name.trim())
    }

    /// The heavy-stroke display face. It has no usable bold variant, so any style
    /// using it is pinned to [`FontWeight::REGULAR`].
    pub fn is_heavy_display(self) -> bool {
        matches!(self, Self::DelaGothicOne)
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric CSS font weight (100..=900). Serialized as a string, e.g. `"700"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const REGULAR: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const BOLD: Self = Self(700);

    /// Accepts numeric weights and the keywords `normal` / `bold`.
    pub fn parse(s: &str) -> SocialflowResult<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "normal" => return Ok(Self::REGULAR),
            "bold" => return Ok(Self::BOLD),
            _ => {}
        }
        let v: u16 = s
            .parse()
            .map_err(|_| SocialflowError::validation(format!("invalid font weight '{s}'")))?;
        if !(1..=1000).contains(&v) {
            return Err(SocialflowError::validation(format!(
                "font weight {v} out of range 1..=1000"
            )));
        }
        Ok(Self(v))
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl serde::Serialize for FontWeight {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for FontWeight {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u16),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(v) => Ok(Self(v)),
            Raw::Str(s) => Self::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn parse(s: &str) -> SocialflowResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            "justify" => Ok(Self::Justify),
            other => Err(SocialflowError::validation(format!(
                "unknown text alignment '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Typography for one semantic role.
pub struct TextStyle {
    /// Size in px at scale 1.
    pub font_size: f64,
    pub font_family: FontFamily,
    pub color: Rgba8,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub has_background: bool,
    /// Highlight color drawn behind the text when `has_background` is set.
    #[serde(default = "default_text_background")]
    pub background_color: Rgba8,
    #[serde(default)]
    pub text_align: TextAlign,
    /// Multiple of the font size. `None` uses the resolver default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub enable_shadow: bool,
}

fn default_text_background() -> Rgba8 {
    Rgba8::BLACK
}

impl TextStyle {
    /// Plain style used as a starting point by the built-in defaults.
    pub fn plain(font_size: f64, color: Rgba8, weight: u16, align: TextAlign) -> Self {
        Self {
            font_size,
            font_family: FontFamily::NotoSansTc,
            color,
            font_weight: FontWeight(weight),
            has_background: false,
            background_color: Rgba8::BLACK,
            text_align: align,
            line_height: None,
            enable_shadow: false,
        }
    }

    /// Apply a single field edit.
    ///
    /// Choosing the heavy display family also drops the weight to regular. A non-finite or
    /// negative size, or a non-positive line height, keeps the previous value; values past
    /// [`MAX_FONT_SIZE`] and [`MAX_LINE_HEIGHT`] are clamped.
    pub fn apply(&mut self, edit: TextStyleEdit) {
        match edit {
            TextStyleEdit::FontSize(v) => {
                if v.is_finite() && v >= 0.0 {
                    self.font_size = v.min(MAX_FONT_SIZE);
                }
            }
            TextStyleEdit::FontFamily(f) => {
                self.font_family = f;
                if f.is_heavy_display() {
                    self.font_weight = FontWeight::REGULAR;
                }
            }
            TextStyleEdit::Color(c) => self.color = c,
            TextStyleEdit::FontWeight(w) => self.font_weight = w,
            TextStyleEdit::HasBackground(b) => self.has_background = b,
            TextStyleEdit::BackgroundColor(c) => self.background_color = c,
            TextStyleEdit::TextAlign(a) => self.text_align = a,
            TextStyleEdit::LineHeight(v) => {
                if v.is_finite() && v > 0.0 {
                    self.line_height = Some(v.min(MAX_LINE_HEIGHT));
                }
            }
            TextStyleEdit::EnableShadow(b) => self.enable_shadow = b,
        }
    }

    /// Overlay the fields present in `patch`.
    pub fn merge(&mut self, patch: &StylePatch) {
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.font_family {
            self.font_family = v;
        }
        if let Some(v) = patch.color {
            self.color = v;
        }
        if let Some(v) = patch.font_weight {
            self.font_weight = v;
        }
        if let Some(v) = patch.has_background {
            self.has_background = v;
        }
        if let Some(v) = patch.background_color {
            self.background_color = v;
        }
        if let Some(v) = patch.text_align {
            self.text_align = v;
        }
        if let Some(v) = patch.line_height {
            self.line_height = Some(v);
        }
        if let Some(v) = patch.enable_shadow {
            self.enable_shadow = v;
        }
    }
}

/// One edit to a [`TextStyle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextStyleEdit {
    FontSize(f64),
    FontFamily(FontFamily),
    Color(Rgba8),
    FontWeight(FontWeight),
    HasBackground(bool),
    BackgroundColor(Rgba8),
    TextAlign(TextAlign),
    LineHeight(f64),
    EnableShadow(bool),
}

impl TextStyleEdit {
    /// Build an edit from a form field name (camelCase, as serialized) and raw input.
    ///
    /// Numeric fields never fail: unparsable input keeps `current`'s value. Enumerated
    /// fields reject unknown values.
    pub fn parse(field: &str, raw: &str, current: &TextStyle) -> SocialflowResult<Self> {
        let flag = |raw: &str| match raw.trim() {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" | "" => Ok(false),
            other => Err(SocialflowError::validation(format!("not a boolean: '{other}'"))),
        };
        Ok(match field.trim() {
            "fontSize" => Self::FontSize(parse_float_or(raw, current.font_size)),
            "fontFamily" => Self::FontFamily(FontFamily::from_name(raw).ok_or_else(|| {
                SocialflowError::validation(format!("unknown font family '{}'", raw.trim()))
            })?),
            "color" => Self::Color(Rgba8::from_hex(raw)?),
            "fontWeight" => Self::FontWeight(FontWeight::parse(raw)?),
            "hasBackground" => Self::HasBackground(flag(raw)?),
            "backgroundColor" => Self::BackgroundColor(Rgba8::from_hex(raw)?),
            "textAlign" => Self::TextAlign(TextAlign::parse(raw)?),
            "lineHeight" => Self::LineHeight(parse_float_or(
                raw,
                current.line_height.unwrap_or(crate::style::resolve::DEFAULT_LINE_HEIGHT),
            )),
            "enableShadow" => Self::EnableShadow(flag(raw)?),
            other => {
                return Err(SocialflowError::validation(format!(
                    "unknown text style field '{other}'"
                )));
            }
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Partial [`TextStyle`]; `None` fields leave the target untouched.
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Rgba8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_shadow: Option<bool>,
}

impl StylePatch {
    /// Patch setting family, color and alignment.
    pub fn typeface(family: FontFamily, color: Rgba8, align: TextAlign) -> Self {
        Self {
            font_family: Some(family),
            color: Some(color),
            text_align: Some(align),
            ..Self::default()
        }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.font_weight = Some(FontWeight(weight));
        self
    }

    pub fn background(mut self, on: bool) -> Self {
        self.has_background = Some(on);
        self
    }

    pub fn background_color(mut self, color: Rgba8) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn shadow(mut self, on: bool) -> Self {
        self.enable_shadow = Some(on);
        self
    }

    pub fn line_height(mut self, lh: f64) -> Self {
        self.line_height = Some(lh);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The six independent style slots of a design config.
pub enum StyleRole {
    Title,
    Subtitle,
    Body,
    Note,
    EndTitle,
    EndBody,
}

impl StyleRole {
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Subtitle,
        Self::Body,
        Self::Note,
        Self::EndTitle,
        Self::EndBody,
    ];

    /// Roles that take a palette's title color.
    pub const HEADINGS: [Self; 3] = [Self::Title, Self::Subtitle, Self::EndTitle];
    /// Roles that take a palette's body color.
    pub const TEXTS: [Self; 3] = [Self::Body, Self::Note, Self::EndBody];

    /// Line height a caller applies when the style carries none.
    pub fn default_line_height(self) -> f64 {
        match self {
            Self::Body | Self::EndBody => 1.6,
            _ => 1.2,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Subtitle => "subtitle",
            Self::Body => "body",
            Self::Note => "note",
            Self::EndTitle => "end-title",
            Self::EndBody => "end-body",
        }
    }
}

impl std::str::FromStr for StyleRole {
    type Err = SocialflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|r| r.key() == norm)
            .ok_or_else(|| SocialflowError::validation(format!("unknown style role '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/style.rs"]
mod tests;
