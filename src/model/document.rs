use std::collections::BTreeSet;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::config::{
    AspectRatio, BackgroundPosition, BackgroundSize, BackgroundType, DesignConfig, FrameStyle,
    OverlayType,
};
use crate::model::slide::{NotePosition, SlideContent, SlideKind};
use crate::model::style::{TextAlign, TextStyle};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// The whole editable state: ordered slides plus the shared design.
///
/// Slide order is display and export order.
pub struct Document {
    pub slides: Vec<SlideContent>,
    pub config: DesignConfig,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            slides: default_slides(),
            config: default_design(),
        }
    }
}

impl Document {
    pub fn from_json_str(s: &str) -> SocialflowResult<Self> {
        let doc: Self = serde_json::from_str(s)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn to_json_string(&self) -> SocialflowResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn slide(&self, id: &str) -> Option<&SlideContent> {
        self.slides.iter().find(|s| s.id == id)
    }

    pub fn slide_mut(&mut self, id: &str) -> Option<&mut SlideContent> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// Validate document-level invariants (unique ids, well-formed config).
    pub fn validate(&self) -> SocialflowResult<()> {
        let mut seen = BTreeSet::new();
        for s in &self.slides {
            if s.id.trim().is_empty() {
                return Err(SocialflowError::validation("slide id must be non-empty"));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(SocialflowError::validation(format!(
                    "duplicate slide id '{}'",
                    s.id
                )));
            }
        }
        self.config.validate()
    }
}

/// Built-in design used on first start and after a reset.
pub fn default_design() -> DesignConfig {
    let style = |size: f64, color: Rgba8, weight: u16, align: TextAlign, lh: f64| TextStyle {
        line_height: Some(lh),
        ..TextStyle::plain(size, color, weight, align)
    };

    let mut note_style = style(30.0, Rgba8::WHITE, 500, TextAlign::Center, 1.2);
    note_style.has_background = true;

    DesignConfig {
        aspect_ratio: AspectRatio::Portrait,
        custom_width: 1080,
        custom_height: 1350,
        watermark: "@YourHandle".to_string(),
        global_note_position: Some(NotePosition { x: 85.0, y: 92.0 }),
        bg_type: BackgroundType::Color,
        bg_color: Rgba8::rgb(0x3b, 0x82, 0xf6),
        bg_image: None,
        bg_size: BackgroundSize::Cover,
        bg_position: BackgroundPosition::Center,
        bg_blur: 0.0,
        overlay_type: OverlayType::Black,
        overlay_opacity: 0.3,
        frame_style: FrameStyle::None,
        frame_color: Rgba8::WHITE,
        show_progress_bar: true,
        title_style: style(120.0, Rgba8::WHITE, 900, TextAlign::Left, 1.2),
        subtitle_style: style(90.0, Rgba8::WHITE, 700, TextAlign::Left, 1.2),
        body_style: style(50.0, Rgba8::rgb(0xf1, 0xf5, 0xf9), 400, TextAlign::Left, 1.6),
        note_style,
        end_title_style: Some(style(80.0, Rgba8::WHITE, 900, TextAlign::Center, 1.3)),
        end_body_style: Some(style(
            45.0,
            Rgba8::rgb(0xe2, 0xe8, 0xf0),
            400,
            TextAlign::Center,
            1.6,
        )),
    }
}

pub fn default_slides() -> Vec<SlideContent> {
    vec![
        SlideContent::new("1", SlideKind::Cover).with_text(
            "你的大標題在這裡",
            "這是一個副標題或引言，吸引讀者向右滑動。",
            "01",
        ),
        SlideContent::new("2", SlideKind::Content).with_text(
            "重點一：內容標題",
            "這裡是主要內容區域。AI 會自動幫你將長篇文章摘要成精簡的重點。你可以自由調整字體大小和顏色。",
            "02",
        ),
        SlideContent::new("3", SlideKind::End).with_text(
            "喜歡這篇貼文嗎？",
            "收藏、分享、或是留言告訴我你的想法！",
            "LINK IN BIO",
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/model/document.rs"]
mod tests;
