use super::*;

use crate::foundation::core::Rgba8;
use crate::model::style::TextStyle;
use crate::style::resolve::resolve;

fn style(size: f64, align: TextAlign) -> ConcreteStyle {
    let mut s = TextStyle::plain(size, Rgba8::WHITE, 400, align);
    s.line_height = Some(1.5);
    resolve(&s, 1.0)
}

#[test]
fn empty_text_has_no_extent() {
    let mut engine = TextEngine::new();
    let shaped = engine.shape("", &style(40.0, TextAlign::Left), None, 500.0);
    assert_eq!(shaped.line_count, 0);
    assert_eq!(shaped.height, 0.0);
    assert!(!shaped.is_drawable());
}

#[test]
fn missing_face_measures_approximately() {
    let mut engine = TextEngine::new();
    let shaped = engine.shape("abcd", &style(40.0, TextAlign::Left), None, 1000.0);
    assert!(!shaped.is_drawable());
    assert_eq!(shaped.line_count, 1);
    assert!((shaped.width - 4.0 * 40.0 * 0.55).abs() < 1e-9);
    assert!((shaped.height - 60.0).abs() < 1e-9);
}

#[test]
fn approximate_lines_wrap_and_honor_hard_breaks() {
    let mut engine = TextEngine::new();
    // 22px per char, 100px column -> 4 chars per line
    let shaped = engine.shape("aaaaaaaaa\nbb", &style(40.0, TextAlign::Left), None, 100.0);
    assert_eq!(shaped.line_count, 4);
    assert!(shaped.width <= 100.0);
    assert!((shaped.height - 4.0 * 60.0).abs() < 1e-9);
}

#[test]
fn stretched_text_fills_the_column() {
    let mut engine = TextEngine::new();
    let shaped = engine.shape("ab", &style(40.0, TextAlign::Justify), None, 800.0);
    assert_eq!(shaped.width, 800.0);
}
