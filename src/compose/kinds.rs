use crate::compose::layer::{ContentBlock, Guide, TextItem};
use crate::foundation::core::Rect;
use crate::model::config::DesignConfig;
use crate::model::slide::{SlideContent, SlideKind};
use crate::model::style::StyleRole;
use crate::style::resolve::{Anchor, resolve_role};

/// Base gap between heading and body at scale 1.
pub const CONTENT_GAP: f64 = 50.0;

/// Inputs shared by every per-kind renderer.
pub struct ContentCtx<'a> {
    pub slide: &'a SlideContent,
    pub config: &'a DesignConfig,
    pub scale: f64,
    pub area: Rect,
    pub guide: Option<Guide>,
}

/// Builds the content block for one slide kind.
pub trait KindRenderer {
    fn heading_role(&self) -> StyleRole;
    fn body_role(&self) -> StyleRole;

    /// Block-level alignment override. `None` lets each item follow its own style.
    fn block_align(&self, _config: &DesignConfig) -> Option<Anchor> {
        None
    }

    fn centers_overflow(&self) -> bool {
        false
    }

    fn content(&self, ctx: &ContentCtx<'_>) -> ContentBlock {
        let item = |role: StyleRole, text: &str| TextItem {
            role,
            text: text.to_string(),
            style: resolve_role(ctx.config.style(role), role, ctx.scale),
            guide: ctx.guide,
        };
        ContentBlock {
            area: ctx.area,
            gap: CONTENT_GAP * ctx.scale,
            align: self.block_align(ctx.config),
            center_overflow: self.centers_overflow(),
            items: vec![
                item(self.heading_role(), &ctx.slide.title),
                item(self.body_role(), &ctx.slide.body),
            ],
        }
    }
}

pub struct CoverRenderer;
pub struct ContentRenderer;
pub struct EndRenderer;

impl KindRenderer for CoverRenderer {
    fn heading_role(&self) -> StyleRole {
        StyleRole::Title
    }

    fn body_role(&self) -> StyleRole {
        StyleRole::Body
    }
}

impl KindRenderer for ContentRenderer {
    fn heading_role(&self) -> StyleRole {
        StyleRole::Subtitle
    }

    fn body_role(&self) -> StyleRole {
        StyleRole::Body
    }
}

impl KindRenderer for EndRenderer {
    fn heading_role(&self) -> StyleRole {
        StyleRole::EndTitle
    }

    fn body_role(&self) -> StyleRole {
        StyleRole::EndBody
    }

    fn centers_overflow(&self) -> bool {
        true
    }

    /// End slides line every item up with the end title. Justify counts as start.
    fn block_align(&self, config: &DesignConfig) -> Option<Anchor> {
        Some(match Anchor::from(config.style(StyleRole::EndTitle).text_align) {
            Anchor::Stretch => Anchor::Start,
            a => a,
        })
    }
}

pub fn renderer_for(kind: SlideKind) -> &'static dyn KindRenderer {
    match kind {
        SlideKind::Cover => &CoverRenderer,
        SlideKind::Content => &ContentRenderer,
        SlideKind::End => &EndRenderer,
    }
}
