use crate::model::style::FontFamily;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A selectable font with its picker label.
pub struct FontEntry {
    pub family: FontFamily,
    pub label: &'static str,
}

/// Picker order.
pub const FONT_CATALOG: [FontEntry; 11] = [
    FontEntry { family: FontFamily::NotoSansTc, label: "標準黑體 (現代/乾淨)" },
    FontEntry { family: FontFamily::NotoSerifTc, label: "標準明體 (優雅/文學)" },
    FontEntry { family: FontFamily::DelaGothicOne, label: "特粗黑體 (大標題/限一般)" },
    FontEntry { family: FontFamily::Anton, label: "美式海報 (Anton Impact)" },
    FontEntry { family: FontFamily::ShipporiMincho, label: "古風明體 (質感/沈穩)" },
    FontEntry { family: FontFamily::KleeOne, label: "日系手寫 (溫暖/親切)" },
    FontEntry { family: FontFamily::MPlusRounded1c, label: "圓體 (柔和)" },
    FontEntry { family: FontFamily::RampartOne, label: "立體特效" },
    FontEntry { family: FontFamily::DotGothic16, label: "點陣復古" },
    FontEntry { family: FontFamily::Montserrat, label: "English - Modern" },
    FontEntry { family: FontFamily::PlayfairDisplay, label: "English - Elegant" },
];

/// Map a free-form family name onto the catalog; unknown names become Noto Sans TC.
pub fn match_font(name: &str) -> FontFamily {
    FONT_CATALOG
        .iter()
        .map(|e| e.family)
        .find(|f| f.name() == name.trim())
        .unwrap_or(FontFamily::NotoSansTc)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/fonts.rs"]
mod tests;
