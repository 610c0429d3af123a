use super::*;

#[test]
fn default_document_has_cover_content_end() {
    let doc = Document::default();
    let kinds: Vec<_> = doc.slides.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SlideKind::Cover, SlideKind::Content, SlideKind::End]);
    assert_eq!(doc.slides[2].note, "LINK IN BIO");
    assert!(doc.validate().is_ok());
}

#[test]
fn json_round_trip_preserves_document() {
    let doc = Document::default();
    let s = doc.to_json_string().unwrap();
    let back = Document::from_json_str(&s).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut doc = Document::default();
    doc.slides[1].id = "1".to_string();
    let err = doc.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate slide id"));
}

#[test]
fn lookup_by_id() {
    let mut doc = Document::default();
    assert_eq!(doc.position_of("3"), Some(2));
    assert!(doc.slide("nope").is_none());
    doc.slide_mut("2").unwrap().title = "x".into();
    assert_eq!(doc.slide("2").unwrap().title, "x");
}

#[test]
fn minimal_config_json_fills_defaults() {
    let style = r##"{"fontSize":40,"fontFamily":"Anton","color":"#ffffff"}"##;
    let json = format!(
        r##"{{"slides":[],"config":{{"bgColor":"#000","titleStyle":{style},"subtitleStyle":{style},"bodyStyle":{style},"noteStyle":{style}}}}}"##
    );
    let doc = Document::from_json_str(&json).unwrap();
    assert!(doc.config.global_note_position.is_none());
    assert!(doc.config.end_title_style.is_none());
    assert_eq!(doc.config.custom_width, 1080);
    assert_eq!(doc.config.frame_color, Rgba8::WHITE);
}
