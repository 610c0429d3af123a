use super::*;

#[test]
fn positional_kind_puts_cover_first_and_end_last() {
    assert_eq!(SlideKind::positional(0, 1), SlideKind::Cover);
    assert_eq!(SlideKind::positional(0, 2), SlideKind::Cover);
    assert_eq!(SlideKind::positional(1, 2), SlideKind::End);
    assert_eq!(SlideKind::positional(1, 3), SlideKind::Content);
    assert_eq!(SlideKind::positional(2, 3), SlideKind::End);
}

#[test]
fn slide_serializes_kind_as_type_and_skips_missing_override() {
    let s = SlideContent::new("7", SlideKind::End).with_text("t", "b", "n");
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["type"], "end");
    assert!(v.get("notePosition").is_none());

    let mut s = s;
    s.note_position = Some(NotePosition::new(10.0, 20.0));
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["notePosition"]["x"], 10.0);
}

#[test]
fn slide_deserializes_with_missing_text_fields() {
    let s: SlideContent = serde_json::from_str(r#"{"id":"a","type":"cover"}"#).unwrap();
    assert_eq!(s.kind, SlideKind::Cover);
    assert!(s.title.is_empty() && s.note.is_empty());
}

#[test]
fn note_position_new_clamps() {
    let p = NotePosition::new(-10.0, 250.0);
    assert_eq!(p, NotePosition { x: 0.0, y: 100.0 });
}

#[test]
fn set_field_replaces_only_named_field() {
    let mut s = SlideContent::new("1", SlideKind::Content).with_text("a", "b", "c");
    s.set_field("body".parse().unwrap(), "new");
    assert_eq!((s.title.as_str(), s.body.as_str(), s.note.as_str()), ("a", "new", "c"));
    assert!("subtitle".parse::<SlideField>().is_err());
}
