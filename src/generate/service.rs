//! Content-generation collaborator seam.
//!
//! The collaborator itself is opaque: it receives a prompt and a page count and answers
//! with JSON text. Everything after that text arrives (parsing, positional kinds, theme
//! application) happens here and is deterministic.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::catalog::fonts::match_font;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::config::{BackgroundType, DesignConfig};
use crate::model::slide::{SlideContent, SlideKind};
use crate::model::style::StyleRole;
use crate::style::normalize::normalize;

pub const MIN_PAGE_COUNT: u32 = 1;
pub const MAX_PAGE_COUNT: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    prompt: String,
    page_count: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, page_count: u32) -> SocialflowResult<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(SocialflowError::validation("generation prompt is empty"));
        }
        if !(MIN_PAGE_COUNT..=MAX_PAGE_COUNT).contains(&page_count) {
            return Err(SocialflowError::validation(format!(
                "page count must be in {MIN_PAGE_COUNT}..={MAX_PAGE_COUNT}, got {page_count}"
            )));
        }
        Ok(Self { prompt, page_count })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
/// One slide as the collaborator labelled it. The label is advisory.
pub struct GeneratedSlide {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSuggestion {
    pub bg_color: Rgba8,
    pub title_color: Rgba8,
    pub body_color: Rgba8,
    /// Free-form; matched against the font catalog on application.
    pub font_family: String,
    #[serde(default)]
    pub mood: String,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub slides: Vec<GeneratedSlide>,
    #[serde(default)]
    pub theme_suggestion: Option<ThemeSuggestion>,
}

impl GenerationResponse {
    /// Convert to document slides. Kinds are re-derived from position and ids are
    /// `<prefix><index>`, so they are unique within one generation.
    pub fn into_slides(self, id_prefix: &str) -> Vec<SlideContent> {
        let len = self.slides.len();
        self.slides
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                SlideContent::new(format!("{id_prefix}{i}"), SlideKind::positional(i, len))
                    .with_text(s.title, s.body, s.note)
            })
            .collect()
    }
}

/// Parse collaborator output. Empty text, malformed JSON, and an empty slide list are all
/// generation failures.
pub fn parse_response(text: &str) -> SocialflowResult<GenerationResponse> {
    if text.trim().is_empty() {
        return Err(SocialflowError::generation("empty response from generator"));
    }
    let resp: GenerationResponse = serde_json::from_str(text)
        .map_err(|e| SocialflowError::generation(format!("malformed response: {e}")))?;
    if resp.slides.is_empty() {
        return Err(SocialflowError::generation("response contains no slides"));
    }
    Ok(resp)
}

/// Apply a theme suggestion: colour background, heading colour on the heading roles, text
/// colour on the text roles, and one catalog family on every role.
pub fn apply_theme(config: &DesignConfig, theme: &ThemeSuggestion) -> DesignConfig {
    let mut out = config.clone();
    out.set_background_type(BackgroundType::Color);
    out.bg_color = theme.bg_color;
    let family = match_font(&theme.font_family);
    if family.name() != theme.font_family.trim() {
        tracing::warn!(
            suggested = %theme.font_family,
            using = family.name(),
            "suggested font is not in the catalog"
        );
    }
    for role in StyleRole::HEADINGS {
        out.style_mut(role).color = theme.title_color;
    }
    for role in StyleRole::TEXTS {
        out.style_mut(role).color = theme.body_color;
    }
    for role in StyleRole::ALL {
        out.style_mut(role).font_family = family;
    }
    normalize(&out)
}

/// Something that turns a prompt into JSON carousel text.
pub trait ContentGenerator {
    fn generate_raw(&self, request: &GenerationRequest) -> SocialflowResult<String>;

    fn generate(&self, request: &GenerationRequest) -> SocialflowResult<GenerationResponse> {
        let text = self.generate_raw(request)?;
        parse_response(&text)
    }
}

impl<F> ContentGenerator for F
where
    F: Fn(&GenerationRequest) -> SocialflowResult<String>,
{
    fn generate_raw(&self, request: &GenerationRequest) -> SocialflowResult<String> {
        self(request)
    }
}

/// Replays a response captured to disk. The prompt is ignored.
#[derive(Clone, Debug)]
pub struct JsonFileGenerator {
    path: PathBuf,
}

impl JsonFileGenerator {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ContentGenerator for JsonFileGenerator {
    fn generate_raw(&self, request: &GenerationRequest) -> SocialflowResult<String> {
        tracing::debug!(pages = request.page_count(), path = %self.path.display(), "replaying response");
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read generation response '{}'", self.path.display()))
            .map_err(|e| SocialflowError::generation(format!("{e:#}")))?;
        Ok(text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/service.rs"]
mod tests;
