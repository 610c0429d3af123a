use crate::foundation::math::clamp_percent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Semantic role of a slide within a carousel.
pub enum SlideKind {
    /// Opening hook slide.
    Cover,
    /// Interior slide.
    #[default]
    Content,
    /// Closing call-to-action slide.
    End,
}

impl SlideKind {
    /// Kind implied by a slide's position in a sequence of `len` slides.
    ///
    /// The first slide is always `Cover` (so a single slide is a cover), the last is `End`.
    pub fn positional(index: usize, len: usize) -> Self {
        if index == 0 {
            Self::Cover
        } else if index + 1 == len {
            Self::End
        } else {
            Self::Content
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Content => "content",
            Self::End => "end",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A point expressed as percentages of the slide box, `x` and `y` in `[0, 100]`.
pub struct NotePosition {
    pub x: f64,
    pub y: f64,
}

impl NotePosition {
    /// Used when a config carries no global note position.
    pub const FALLBACK: Self = Self { x: 50.0, y: 92.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }.clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }
}

impl Default for NotePosition {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Text content of one slide.
pub struct SlideContent {
    /// Unique within a document.
    pub id: String,
    /// Stored as `type` on the wire.
    #[serde(rename = "type")]
    pub kind: SlideKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Footer/caption text. Empty means no note layer.
    #[serde(default)]
    pub note: String,
    /// Per-slide override of the config's global note position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_position: Option<NotePosition>,
}

impl SlideContent {
    pub fn new(id: impl Into<String>, kind: SlideKind) -> Self {
        Self {
            id: id.into(),
            kind,
            title: String::new(),
            body: String::new(),
            note: String::new(),
            note_position: None,
        }
    }

    pub fn with_text(
        mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self.body = body.into();
        self.note = note.into();
        self
    }

    /// Replace one text field.
    pub fn set_field(&mut self, field: SlideField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SlideField::Title => self.title = value,
            SlideField::Body => self.body = value,
            SlideField::Note => self.note = value,
        }
    }

    pub fn field(&self, field: SlideField) -> &str {
        match field {
            SlideField::Title => &self.title,
            SlideField::Body => &self.body,
            SlideField::Note => &self.note,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Editable text fields of a slide.
pub enum SlideField {
    Title,
    Body,
    Note,
}

impl std::str::FromStr for SlideField {
    type Err = crate::foundation::error::SocialflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "body" => Ok(Self::Body),
            "note" => Ok(Self::Note),
            other => Err(crate::foundation::error::SocialflowError::validation(
                format!("unknown slide field '{other}'"),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/slide.rs"]
mod tests;
