use super::*;
use crate::model::document::default_design;
use crate::model::style::{FontWeight, MAX_LINE_HEIGHT, TextAlign};

#[test]
fn fixed_aspect_ratios_ignore_custom_size() {
    let mut c = default_design();
    c.custom_width = 10;
    c.custom_height = 10;
    for (ratio, h) in [
        (AspectRatio::Square, 1080),
        (AspectRatio::Portrait, 1350),
        (AspectRatio::Story, 1920),
    ] {
        c.aspect_ratio = ratio;
        assert_eq!(c.canvas().unwrap(), Canvas::new(1080, h).unwrap());
    }
    c.aspect_ratio = AspectRatio::Custom;
    assert_eq!(c.canvas().unwrap(), Canvas::new(10, 10).unwrap());
    c.custom_height = 0;
    assert!(c.canvas().is_err());
}

#[test]
fn aspect_ratio_wire_names() {
    assert_eq!(serde_json::to_string(&AspectRatio::Story).unwrap(), "\"9:16\"");
    assert_eq!(AspectRatio::parse("custom").unwrap(), AspectRatio::Custom);
    assert!(AspectRatio::parse("3:2").is_err());
}

#[test]
fn image_background_forces_overlay() {
    let mut c = default_design();
    c.overlay_type = OverlayType::None;
    c.set_background_type(BackgroundType::Image);
    assert_eq!(c.overlay_type, OverlayType::Black);

    c.overlay_type = OverlayType::White;
    c.set_background_type(BackgroundType::Image);
    assert_eq!(c.overlay_type, OverlayType::White);

    c.set_background_type(BackgroundType::Color);
    assert_eq!(c.overlay_type, OverlayType::White);
}

#[test]
fn opacity_edit_enables_overlay_and_clamps() {
    let mut c = default_design();
    c.overlay_type = OverlayType::None;
    c.set_overlay_opacity(1.7);
    assert_eq!(c.overlay_opacity, 1.0);
    assert_eq!(c.overlay_type, OverlayType::Black);
    c.set_overlay_opacity(f64::NAN);
    assert_eq!(c.overlay_opacity, 0.0);
}

#[test]
fn end_styles_fall_back_and_materialize_on_edit() {
    let mut c = default_design();
    c.end_title_style = None;
    c.end_body_style = None;
    assert_eq!(c.style(StyleRole::EndTitle), &c.subtitle_style);
    assert_eq!(c.style(StyleRole::EndBody), &c.body_style);

    c.style_mut(StyleRole::EndTitle).text_align = TextAlign::Right;
    assert_eq!(c.end_title_style.as_ref().unwrap().text_align, TextAlign::Right);
    assert_eq!(c.subtitle_style.text_align, TextAlign::Left);
    assert_eq!(
        c.end_title_style.as_ref().unwrap().font_weight,
        FontWeight(700)
    );
}

#[test]
fn missing_global_note_position_uses_fallback() {
    let mut c = default_design();
    assert_eq!(c.note_anchor(), NotePosition { x: 85.0, y: 92.0 });
    c.global_note_position = None;
    assert_eq!(c.note_anchor(), NotePosition { x: 50.0, y: 92.0 });
}

#[test]
fn validate_rejects_bad_values() {
    let mut c = default_design();
    assert!(c.validate().is_ok());
    c.bg_blur = -1.0;
    assert!(c.validate().is_err());

    let mut c = default_design();
    c.bg_type = BackgroundType::Image;
    c.overlay_type = OverlayType::None;
    assert!(c.validate().is_err());

    let mut c = default_design();
    c.body_style.line_height = Some(0.0);
    assert!(c.validate().is_err());
}

#[test]
fn validate_rejects_values_past_the_limits() {
    let mut c = default_design();
    c.body_style.font_size = 1e20;
    assert!(c.validate().is_err());
    c.body_style.font_size = MAX_FONT_SIZE;
    assert!(c.validate().is_ok());

    let mut c = default_design();
    c.note_style.line_height = Some(MAX_LINE_HEIGHT * 2.0);
    assert!(c.validate().is_err());

    let mut c = default_design();
    c.bg_blur = MAX_BG_BLUR + 1.0;
    assert!(c.validate().is_err());
}

#[test]
fn config_json_uses_camel_case_keys() {
    let v = serde_json::to_value(default_design()).unwrap();
    assert_eq!(v["aspectRatio"], "4:5");
    assert_eq!(v["bgColor"], "#3b82f6");
    assert_eq!(v["globalNotePosition"]["x"], 85.0);
    assert_eq!(v["endTitleStyle"]["textAlign"], "center");
    assert_eq!(v["showProgressBar"], true);
}
