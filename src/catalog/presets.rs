use crate::foundation::core::Rgba8;
use crate::model::config::{BackgroundType, DesignConfig, OverlayType};
use crate::model::style::{FontFamily, StylePatch, StyleRole, TextAlign};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A curated background/title/body color triple.
pub struct Palette {
    pub bg: Rgba8,
    pub title: Rgba8,
    pub body: Rgba8,
    pub label: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// The subset of a [`DesignConfig`] a preset overrides.
pub struct PresetConfig {
    pub bg_type: BackgroundType,
    pub bg_color: Rgba8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_type: Option<OverlayType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_blur: Option<f64>,
    pub title: StylePatch,
    pub subtitle: StylePatch,
    pub body: StylePatch,
    pub note: StylePatch,
    pub end_title: StylePatch,
    pub end_body: StylePatch,
}

impl PresetConfig {
    pub fn patch(&self, role: StyleRole) -> &StylePatch {
        match role {
            StyleRole::Title => &self.title,
            StyleRole::Subtitle => &self.subtitle,
            StyleRole::Body => &self.body,
            StyleRole::Note => &self.note,
            StyleRole::EndTitle => &self.end_title,
            StyleRole::EndBody => &self.end_body,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A named bundle of style defaults plus compatible palettes.
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub palettes: Vec<Palette>,
    pub config: PresetConfig,
}

impl Preset {
    /// Merge this preset over `config`, field by field.
    ///
    /// The preset wins on background type/color, overlay, blur and every style field it
    /// names. Aspect ratio, custom size, watermark, note position, frame, progress bar and
    /// the chosen background image are always kept from `config`.
    pub fn merge_into(&self, config: &DesignConfig) -> DesignConfig {
        let p = &self.config;
        let mut out = config.clone();
        out.bg_color = p.bg_color;
        if let Some(v) = p.overlay_type {
            out.overlay_type = v;
        }
        if let Some(v) = p.overlay_opacity {
            out.overlay_opacity = v;
        }
        if let Some(v) = p.bg_blur {
            out.bg_blur = v;
        }
        out.set_background_type(p.bg_type);
        for role in StyleRole::ALL {
            out.style_mut(role).merge(p.patch(role));
        }
        out
    }
}

/// Overwrite colors from a palette: color background, heading roles take the title color,
/// text roles take the body color. Families and alignment are untouched.
pub fn apply_palette(config: &DesignConfig, palette: &Palette) -> DesignConfig {
    let mut out = config.clone();
    out.set_background_type(BackgroundType::Color);
    out.bg_color = palette.bg;
    for role in StyleRole::HEADINGS {
        out.style_mut(role).color = palette.title;
    }
    for role in StyleRole::TEXTS {
        out.style_mut(role).color = palette.body;
    }
    out
}

#[derive(Clone, Debug)]
/// Read-only preset reference data, built once and shared.
pub struct Catalog {
    presets: Vec<Preset>,
}

impl Catalog {
    pub fn new(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_presets())
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Id of the preset marked active on a fresh session.
pub const DEFAULT_PRESET_ID: &str = "power";

const fn rgb(v: u32) -> Rgba8 {
    Rgba8::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

fn palette(bg: u32, title: u32, body: u32, label: &'static str) -> Palette {
    Palette {
        bg: rgb(bg),
        title: rgb(title),
        body: rgb(body),
        label,
    }
}

fn face(family: FontFamily, color: u32, align: TextAlign) -> StylePatch {
    StylePatch::typeface(family, rgb(color), align)
}

fn builtin_presets() -> Vec<Preset> {
    use FontFamily::*;
    use TextAlign::{Center, Left};

    vec![
        Preset {
            id: "power",
            name: "核心信息",
            description: "瑞士極簡風，清爽有力，強調重點",
            palettes: vec![
                palette(0xFFFFFF, 0x000000, 0x171717, "經典黑白"),
                palette(0xFDE047, 0x000000, 0x171717, "警示黃"),
                palette(0x000000, 0x22D3EE, 0xFFFFFF, "電光藍"),
                palette(0x000000, 0xF472B6, 0xFFFFFF, "螢光粉"),
                palette(0xEF4444, 0xFFFFFF, 0xFEF2F2, "Supreme紅"),
                palette(0x2563EB, 0xFFFFFF, 0xEFF6FF, "寶藍"),
                palette(0x111827, 0x34D399, 0xECFDF5, "駭客綠"),
                palette(0x4C1D95, 0xA78BFA, 0xF5F3FF, "迷幻紫"),
            ],
            config: PresetConfig {
                bg_type: BackgroundType::Color,
                bg_color: rgb(0xFFFFFF),
                overlay_type: Some(OverlayType::None),
                title: face(Anton, 0x000000, Left)
                    .weight(400)
                    .background(false)
                    .shadow(false)
                    .line_height(1.1),
                subtitle: face(Anton, 0x000000, Left)
                    .weight(400)
                    .background(false)
                    .shadow(false),
                body: face(NotoSansTc, 0x171717, Left)
                    .weight(500)
                    .background(false)
                    .shadow(false),
                note: face(NotoSansTc, 0xDC2626, Left).background(false),
                end_title: face(Anton, 0x000000, Left),
                end_body: face(NotoSansTc, 0x171717, Left),
                ..PresetConfig::default()
            },
        },
        Preset {
            id: "cinematic",
            name: "電影氛圍",
            description: "黑膜+照片底，跳色標題，探索頁高觸及",
            palettes: vec![
                palette(0x1c1917, 0xFDE047, 0xFFFFFF, "鵝黃 (熱門)"),
                palette(0x1c1917, 0x22D3EE, 0xFFFFFF, "電光藍"),
                palette(0x1c1917, 0xF472B6, 0xFFFFFF, "霓虹粉"),
                palette(0x1c1917, 0xFFFFFF, 0xE5E7EB, "經典全白"),
                palette(0x1c1917, 0xA3E635, 0xFFFFFF, "酸性綠"),
                palette(0x1c1917, 0xFB923C, 0xFFFFFF, "愛馬仕橘"),
                palette(0x1c1917, 0xE879F9, 0xFFFFFF, "紫羅蘭"),
                palette(0x1c1917, 0x67E8F9, 0xFFFFFF, "冰河藍"),
            ],
            config: PresetConfig {
                bg_type: BackgroundType::Image,
                bg_color: rgb(0x1c1917),
                overlay_type: Some(OverlayType::Black),
                overlay_opacity: Some(0.6),
                bg_blur: Some(0.0),
                title: face(NotoSerifTc, 0xFDE047, Center)
                    .weight(700)
                    .background(false)
                    .shadow(true),
                subtitle: face(NotoSerifTc, 0xFDE047, Center)
                    .weight(500)
                    .background(false)
                    .shadow(true),
                body: face(NotoSerifTc, 0xFFFFFF, Center)
                    .weight(400)
                    .background(false)
                    .shadow(true),
                note: face(Montserrat, 0xD1D5DB, Center)
                    .background(false)
                    .shadow(true),
                end_title: face(NotoSerifTc, 0xFDE047, Center),
                end_body: face(NotoSerifTc, 0xFFFFFF, Center),
            },
        },
        Preset {
            id: "devotional",
            name: "晨更默想",
            description: "優雅明體、大地色系，適合靈修與反思",
            palettes: vec![
                palette(0xF5F5F0, 0x4A4A40, 0x5C5C50, "米灰/深灰"),
                palette(0xE7E5E4, 0x57534E, 0x78716C, "石灰/暖灰"),
                palette(0xFFF7ED, 0x9A3412, 0xC2410C, "暖橘/白"),
                palette(0xF0FDF4, 0x166534, 0x15803D, "薄荷/深綠"),
                palette(0xFAFAF9, 0x44403C, 0x78716C, "極簡石"),
                palette(0xECFEFF, 0x155E75, 0x0E7490, "晨露"),
                palette(0xFFF1F2, 0x9F1239, 0xBE123C, "玫瑰"),
            ],
            config: PresetConfig {
                bg_type: BackgroundType::Color,
                bg_color: rgb(0xF5F5F0),
                overlay_type: Some(OverlayType::None),
                title: face(NotoSerifTc, 0x4A4A40, Center)
                    .weight(900)
                    .background(false)
                    .shadow(false),
                subtitle: face(NotoSerifTc, 0x4A4A40, Center)
                    .weight(700)
                    .background(false)
                    .shadow(false),
                body: face(NotoSerifTc, 0x5C5C50, Center)
                    .weight(500)
                    .background(false)
                    .shadow(false),
                note: face(NotoSansTc, 0xA3A390, Center).background(false),
                end_title: face(NotoSerifTc, 0x4A4A40, Center),
                end_body: face(NotoSerifTc, 0x5C5C50, Center),
                ..PresetConfig::default()
            },
        },
        Preset {
            id: "life",
            name: "生活筆記",
            description: "手寫字體、溫暖米黃，適合牧者心聲",
            palettes: vec![
                palette(0xFDF6E3, 0x5D4037, 0x795548, "米黃/咖"),
                palette(0xFEFCE8, 0x854D0E, 0xA16207, "淡黃/金"),
                palette(0xF0F9FF, 0x0369A1, 0x075985, "信紙藍"),
                palette(0xFFFBEB, 0xB45309, 0xD97706, "蜂蜜"),
                palette(0xF5F3FF, 0x6D28D9, 0x7C3AED, "薰衣草"),
                palette(0xFFF7ED, 0xC2410C, 0xEA580C, "暖陽"),
            ],
            config: PresetConfig {
                bg_type: BackgroundType::Color,
                bg_color: rgb(0xFDF6E3),
                overlay_type: Some(OverlayType::None),
                title: face(KleeOne, 0x5D4037, Center)
                    .weight(600)
                    .background(false)
                    .shadow(false),
                subtitle: face(KleeOne, 0x5D4037, Center)
                    .weight(600)
                    .background(false)
                    .shadow(false),
                body: face(KleeOne, 0x795548, Center)
                    .weight(400)
                    .background(false)
                    .shadow(false),
                note: face(KleeOne, 0xA1887F, Center).background(false),
                end_title: face(KleeOne, 0x5D4037, Center),
                end_body: face(KleeOne, 0x795548, Center),
                ..PresetConfig::default()
            },
        },
        Preset {
            id: "theology",
            name: "神學思考",
            description: "極簡黑體、深藍冷調，適合知識內容",
            palettes: vec![
                palette(0x1E293B, 0xFFFFFF, 0xE2E8F0, "深藍/白"),
                palette(0x0F172A, 0x38BDF8, 0xE0F2FE, "午夜/淺藍"),
                palette(0x334155, 0xF1F5F9, 0xCBD5E1, "石墨/灰"),
                palette(0x14532D, 0xFFFFFF, 0xDCFCE7, "學院綠"),
                palette(0x451A03, 0xFEF3C7, 0xFDE68A, "書卷咖"),
                palette(0x312E81, 0xE0E7FF, 0xC7D2FE, "靛藍"),
            ],
            config: PresetConfig {
                bg_type: BackgroundType::Color,
                bg_color: rgb(0x1E293B),
                overlay_type: Some(OverlayType::None),
                title: face(NotoSansTc, 0xFFFFFF, Left)
                    .weight(700)
                    .background(false)
                    .shadow(false),
                subtitle: face(NotoSansTc, 0x94A3B8, Left)
                    .weight(500)
                    .background(false)
                    .shadow(false),
                body: face(NotoSansTc, 0xE2E8F0, Left)
                    .weight(400)
                    .background(false)
                    .shadow(false),
                note: face(Montserrat, 0x64748B, Left).background(false),
                end_title: face(NotoSansTc, 0xFFFFFF, Left),
                end_body: face(NotoSansTc, 0xCBD5E1, Left),
                ..PresetConfig::default()
            },
        },
        Preset {
            id: "y2k",
            name: "Y2K 千禧復古",
            description: "大膽配色、粗框線條、像素風，適合年輕潮流",
            palettes: vec![
                palette(0xFF00FF, 0xFFFF00, 0xFFFFFF, "桃紅/黃"),
                palette(0x000000, 0x00FF00, 0xFFFFFF, "駭客/綠"),
                palette(0xFFFF00, 0x0000FF, 0x000000, "黃/藍"),
                palette(0xE0E7FF, 0xFF0000, 0x0000FF, "白/紅藍"),
                palette(0x4F46E5, 0xA5B4FC, 0xFFFFFF, "電子紫"),
                palette(0xF472B6, 0x881337, 0xFFFFFF, "芭比粉"),
            ],
            config: PresetConfig {
                bg_type: BackgroundType::Color,
                bg_color: rgb(0xFF00FF),
                overlay_type: Some(OverlayType::None),
                title: face(DelaGothicOne, 0xFFFF00, Center)
                    .weight(400)
                    .background(false)
                    .shadow(true)
                    .line_height(1.1),
                subtitle: face(DelaGothicOne, 0xFFFF00, Center)
                    .weight(400)
                    .background(false)
                    .shadow(true),
                body: face(DotGothic16, 0xFFFFFF, Center)
                    .weight(400)
                    .background(false)
                    .shadow(false),
                note: face(DotGothic16, 0xFFFFFF, Center)
                    .background(true)
                    .background_color(rgb(0x000000)),
                end_title: face(DelaGothicOne, 0xFFFF00, Center),
                end_body: face(DotGothic16, 0xFFFFFF, Center),
                ..PresetConfig::default()
            },
        },
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/presets.rs"]
mod tests;
