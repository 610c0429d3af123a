use super::*;
use crate::model::config::{AspectRatio, FrameStyle};
use crate::model::document::default_design;
use crate::model::slide::NotePosition;
use crate::model::style::FontWeight;

#[test]
fn builtin_catalog_has_six_presets_with_palettes() {
    let cat = Catalog::builtin();
    let ids: Vec<_> = cat.presets().iter().map(|p| p.id).collect();
    assert_eq!(
        ids,
        vec!["power", "cinematic", "devotional", "life", "theology", "y2k"]
    );
    assert!(cat.presets().iter().all(|p| !p.palettes.is_empty()));
    assert!(cat.preset(DEFAULT_PRESET_ID).is_some());
    assert!(cat.preset("vaporwave").is_none());
}

#[test]
fn preset_merge_keeps_user_layout_choices() {
    let mut user = default_design();
    user.aspect_ratio = AspectRatio::Story;
    user.watermark = "@me".into();
    user.global_note_position = Some(NotePosition { x: 12.0, y: 34.0 });
    user.frame_style = FrameStyle::Corners;
    user.bg_image = Some("bg.png".into());
    user.body_style.font_size = 77.0;

    let cat = Catalog::builtin();
    let merged = cat.preset("power").unwrap().merge_into(&user);

    assert_eq!(merged.aspect_ratio, AspectRatio::Story);
    assert_eq!(merged.watermark, "@me");
    assert_eq!(merged.global_note_position, user.global_note_position);
    assert_eq!(merged.frame_style, FrameStyle::Corners);
    assert_eq!(merged.bg_image.as_deref(), Some("bg.png"));

    assert_eq!(merged.bg_color, Rgba8::WHITE);
    assert_eq!(merged.overlay_type, OverlayType::None);
    assert_eq!(merged.title_style.font_family, FontFamily::Anton);
    assert_eq!(merged.title_style.line_height, Some(1.1));
    assert_eq!(merged.body_style.font_weight, FontWeight(500));
    // Fields the preset does not name survive.
    assert_eq!(merged.body_style.font_size, 77.0);
}

#[test]
fn image_preset_switches_background_with_overlay() {
    let merged = Catalog::builtin()
        .preset("cinematic")
        .unwrap()
        .merge_into(&default_design());
    assert_eq!(merged.bg_type, BackgroundType::Image);
    assert_eq!(merged.overlay_type, OverlayType::Black);
    assert_eq!(merged.overlay_opacity, 0.6);
    assert!(merged.title_style.enable_shadow);
}

#[test]
fn palette_sets_colors_and_leaves_typography() {
    let mut c = default_design();
    c.bg_type = BackgroundType::Image;
    c.title_style.font_family = FontFamily::KleeOne;
    c.title_style.text_align = TextAlign::Right;

    let p = Palette {
        bg: Rgba8::BLACK,
        title: Rgba8::rgb(0x22, 0xd3, 0xee),
        body: Rgba8::WHITE,
        label: "test",
    };
    let out = apply_palette(&c, &p);

    assert_eq!(out.bg_type, BackgroundType::Color);
    assert_eq!(out.bg_color, Rgba8::BLACK);
    for role in StyleRole::HEADINGS {
        assert_eq!(out.style(role).color, p.title);
    }
    for role in StyleRole::TEXTS {
        assert_eq!(out.style(role).color, p.body);
    }
    assert_eq!(out.title_style.font_family, FontFamily::KleeOne);
    assert_eq!(out.title_style.text_align, TextAlign::Right);
}
