use super::*;

use std::time::Duration;

use crate::assets::fonts::FontBook;
use crate::assets::store::PreparedAssets;
use crate::compose::compositor::compose;
use crate::compose::layer::{RenderMode, SlidePosition};
use crate::editor::clock::ManualClock;
use crate::model::style::{FontFamily, FontWeight, MAX_FONT_SIZE, MAX_LINE_HEIGHT};
use crate::persist::store::MemoryStore;
use crate::render::layout::{MAX_GUIDE_DASHES, layout};
use crate::render::text::TextEngine;

const SETTLE: Duration = Duration::from_millis(600);

fn session() -> (EditorSession, MemoryStore, ManualClock) {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let s = EditorSession::with_parts(
        Box::new(store.clone()),
        Box::new(clock.clone()),
        Catalog::builtin(),
    );
    (s, store, clock)
}

fn slide_tree(s: &EditorSession, index: usize, mode: RenderMode) -> LayerTree {
    let doc = s.document();
    compose(
        &doc.slides[index],
        &doc.config,
        SlidePosition::new(index, doc.slides.len()),
        0.4,
        mode,
    )
    .unwrap()
}

fn settle(s: &mut EditorSession, clock: &ManualClock) {
    clock.advance(SETTLE);
    s.tick();
}

#[test]
fn every_edit_is_persisted_immediately() {
    let (mut s, store, _clock) = session();
    s.update_slide_field("1", SlideField::Title, "hello").unwrap();
    let saved = Document::from_json_str(&store.raw().unwrap()).unwrap();
    assert_eq!(saved.slides[0].title, "hello");
}

#[test]
fn typing_burst_is_one_undo_step() {
    let (mut s, _store, clock) = session();
    let original = s.document().slides[0].title.clone();
    for t in ["h", "he", "hel", "hell", "hello"] {
        s.update_slide_field("1", SlideField::Title, t).unwrap();
        clock.advance(Duration::from_millis(100));
        s.tick();
    }
    settle(&mut s, &clock);
    assert_eq!(s.history().len(), 2);
    assert!(s.undo());
    assert_eq!(s.document().slides[0].title, original);
}

#[test]
fn spaced_edits_undo_and_redo_exactly() {
    let (mut s, _store, clock) = session();
    let initial = (**s.document()).clone();
    s.set_watermark("@a");
    settle(&mut s, &clock);
    s.set_frame_style(FrameStyle::Cinema);
    settle(&mut s, &clock);
    s.add_slide();
    settle(&mut s, &clock);
    let last = (**s.document()).clone();

    for _ in 0..3 {
        assert!(s.undo());
    }
    assert_eq!(**s.document(), initial);
    assert!(!s.undo());
    for _ in 0..3 {
        assert!(s.redo());
    }
    assert_eq!(**s.document(), last);
}

#[test]
fn undo_does_not_schedule_a_snapshot() {
    let (mut s, _store, clock) = session();
    s.set_watermark("@a");
    settle(&mut s, &clock);
    s.undo();
    settle(&mut s, &clock);
    assert_eq!(s.history().len(), 2);
    assert!(s.can_redo());
}

#[test]
fn edit_inside_quiet_window_is_undoable() {
    let (mut s, _store, _clock) = session();
    s.set_watermark("@quick");
    assert!(s.can_undo());
    assert!(s.undo());
    assert_eq!(s.document().config.watermark, Document::default().config.watermark);
}

#[test]
fn added_slides_are_content_with_unique_ids() {
    let (mut s, _store, _clock) = session();
    let a = s.add_slide();
    let b = s.add_slide();
    assert_ne!(a, b);
    let slide = s.document().slide(&a).unwrap();
    assert_eq!(slide.kind, SlideKind::Content);
    assert_eq!(slide.title, "新標題");
    assert!(s.document().validate().is_ok());
}

#[test]
fn structural_edits_keep_kinds() {
    let (mut s, _store, _clock) = session();
    s.remove_slide("1").unwrap();
    assert_eq!(s.document().slides[0].kind, SlideKind::Content);
    s.move_slide("3", 0).unwrap();
    assert_eq!(s.document().slides[0].id, "3");
    assert_eq!(s.document().slides[0].kind, SlideKind::End);
    s.set_slide_kind("3", SlideKind::Cover).unwrap();
    assert_eq!(s.document().slides[0].kind, SlideKind::Cover);
    assert!(s.remove_slide("nope").is_err());
}

#[test]
fn image_upload_forces_an_overlay_and_recolours() {
    let (mut s, _store, _clock) = session();
    s.set_overlay_type(OverlayType::None);
    assert_eq!(s.document().config.overlay_type, OverlayType::None);
    s.upload_background_image("photos/bg.png");
    let cfg = &s.document().config;
    assert_eq!(cfg.bg_type, BackgroundType::Image);
    assert_eq!(cfg.bg_image.as_deref(), Some("photos/bg.png"));
    assert_eq!(cfg.overlay_type, OverlayType::Black);
    assert_eq!(cfg.overlay_opacity, 0.6);
    assert_eq!(cfg.title_style.color, Rgba8::from_hex("#FDE047").unwrap());
    assert_eq!(cfg.body_style.color, Rgba8::WHITE);
}

#[test]
fn image_background_cannot_drop_its_overlay() {
    let (mut s, _store, _clock) = session();
    s.set_background_type(BackgroundType::Image);
    s.set_overlay_type(OverlayType::None);
    assert_ne!(s.document().config.overlay_type, OverlayType::None);
    s.set_background_type(BackgroundType::Color);
    assert_ne!(s.document().config.overlay_type, OverlayType::None);
}

#[test]
fn heavy_font_selection_forces_regular_weight_on_that_role_only() {
    let (mut s, _store, _clock) = session();
    let before_body = s.document().config.body_style.font_weight;
    s.update_text_style_field(StyleRole::Title, "fontWeight", "900").unwrap();
    s.update_text_style(StyleRole::Title, TextStyleEdit::FontFamily(FontFamily::DelaGothicOne));
    let cfg = &s.document().config;
    assert_eq!(cfg.title_style.font_weight, FontWeight::REGULAR);
    assert_eq!(cfg.body_style.font_weight, before_body);
}

#[test]
fn invalid_numeric_input_is_coerced() {
    let (mut s, _store, _clock) = session();
    let size = s.document().config.title_style.font_size;
    s.update_text_style_field(StyleRole::Title, "fontSize", "big").unwrap();
    assert_eq!(s.document().config.title_style.font_size, size);

    s.set_custom_size("abc", "1500");
    assert_eq!(s.document().config.custom_width, 1);
    assert_eq!(s.document().config.custom_height, 1500);

    let blur = s.document().config.bg_blur;
    s.set_background_blur("x");
    assert_eq!(s.document().config.bg_blur, blur);
    s.set_background_blur("1e20");
    assert_eq!(s.document().config.bg_blur, MAX_BG_BLUR);
}

#[test]
fn presets_keep_user_settings_and_palettes_follow_the_active_preset() {
    let (mut s, _store, _clock) = session();
    s.set_aspect_ratio(AspectRatio::Story);
    s.set_watermark("@me");
    s.apply_preset("y2k").unwrap();
    let cfg = &s.document().config;
    assert_eq!(cfg.aspect_ratio, AspectRatio::Story);
    assert_eq!(cfg.watermark, "@me");
    assert_eq!(s.active_preset(), Some("y2k"));

    let palette = s.catalog().preset("y2k").unwrap().palettes[0].clone();
    s.apply_palette(0).unwrap();
    let cfg = &s.document().config;
    assert_eq!(cfg.bg_type, BackgroundType::Color);
    assert_eq!(cfg.bg_color, palette.bg);
    assert_eq!(cfg.style(StyleRole::EndTitle).color, palette.title);
    assert_eq!(cfg.note_style.color, palette.body);

    assert!(s.apply_palette(99).is_err());
    assert!(s.apply_preset("missing").is_err());
}

#[test]
fn note_drag_commits_a_clamped_override() {
    let (mut s, _store, _clock) = session();
    let tree = slide_tree(&s, 1, RenderMode::Preview);
    let slide_box = Rect::new(0.0, 0.0, 432.0, 540.0);
    let note = Rect::new(180.0, 480.0, 250.0, 510.0);

    assert!(!s.note_pointer_down(&tree, Point::new(10.0, 10.0), note));
    assert!(s.note_pointer_down(&tree, Point::new(200.0, 490.0), note));
    s.note_pointer_move(Point::new(900.0, 900.0));
    assert!(s.note_pointer_up(Point::new(900.0, -40.0), slide_box));

    let pos = s.document().slide("2").unwrap().note_position.unwrap();
    assert_eq!((pos.x, pos.y), (100.0, 0.0));
    assert_eq!(s.last_interacted(), Some("2"));
    assert!(!s.note_drag().is_dragging());

    s.apply_note_position_to_all();
    let doc = s.document();
    assert_eq!(doc.config.global_note_position, Some(pos));
    assert!(doc.slides.iter().all(|sl| sl.note_position.is_none()));
}

#[test]
fn export_tree_never_starts_a_note_drag() {
    let (mut s, _store, _clock) = session();
    let tree = slide_tree(&s, 1, RenderMode::Export);
    let note = Rect::new(180.0, 480.0, 250.0, 510.0);
    assert!(!s.note_pointer_down(&tree, Point::new(200.0, 490.0), note));
    assert!(!s.note_drag().is_dragging());
}

#[test]
fn huge_font_size_is_clamped_and_still_lays_out() {
    let (mut s, _store, _clock) = session();
    s.update_text_style_field(StyleRole::Body, "fontSize", "1e20").unwrap();
    s.update_text_style_field(StyleRole::Body, "lineHeight", "1e20").unwrap();
    let body = &s.document().config.body_style;
    assert_eq!(body.font_size, MAX_FONT_SIZE);
    assert_eq!(body.line_height, Some(MAX_LINE_HEIGHT));
    assert!(s.document().config.validate().is_ok());

    let tree = slide_tree(&s, 0, RenderMode::Preview);
    let laid = layout(
        &tree,
        &PreparedAssets::empty(),
        &mut FontBook::empty(),
        &mut TextEngine::new(),
    );
    assert!(laid.note_bounds.is_some());
    let prims: usize = laid
        .layers
        .iter()
        .flat_map(|l| &l.stages)
        .map(|st| st.prims.len())
        .sum();
    assert!(prims < 16 * MAX_GUIDE_DASHES, "{prims} primitives");
}

#[test]
fn failed_generation_leaves_state_intact() {
    let (mut s, _store, _clock) = session();
    let before = (**s.document()).clone();
    let failing = |_: &GenerationRequest| -> SocialflowResult<String> {
        Err(SocialflowError::generation("network down"))
    };
    assert!(s.generate(&failing, "sermon text", "5").is_err());
    let empty = |_: &GenerationRequest| -> SocialflowResult<String> { Ok(String::new()) };
    assert!(s.generate(&empty, "sermon text", "5").is_err());
    assert!(s.generate(&empty, "   ", "5").is_err());
    assert_eq!(**s.document(), before);
}

#[test]
fn generation_replaces_slides_with_positional_kinds() {
    let (mut s, _store, _clock) = session();
    let seen = std::cell::Cell::new(0u32);
    let generator = |req: &GenerationRequest| -> SocialflowResult<String> {
        seen.set(req.page_count());
        Ok(r##"{"slides":[
            {"type":"end","title":"a","body":"","note":""},
            {"type":"cover","title":"b","body":"","note":""}
        ],"themeSuggestion":{"bgColor":"#000000","titleColor":"#22D3EE",
            "bodyColor":"#FFFFFF","fontFamily":"Anton","mood":"loud"}}"##
            .to_string())
    };
    s.generate(&generator, "text", "99").unwrap();
    assert_eq!(seen.get(), 10);
    let doc = s.document();
    assert_eq!(doc.slides.len(), 2);
    assert_eq!(doc.slides[0].kind, SlideKind::Cover);
    assert_eq!(doc.slides[1].kind, SlideKind::End);
    assert_eq!(doc.config.title_style.font_family, FontFamily::Anton);
    assert!(doc.validate().is_ok());
}

#[test]
fn reset_clears_storage_and_history() {
    let (mut s, store, clock) = session();
    s.set_watermark("@gone");
    settle(&mut s, &clock);
    s.reset();
    assert!(store.raw().is_none());
    assert_eq!(**s.document(), Document::default());
    assert_eq!(s.history().len(), 1);
    assert!(!s.can_undo());
}

#[test]
fn session_reopens_from_stored_state() {
    let (mut s, store, _clock) = session();
    s.set_watermark("@kept");
    let reopened = EditorSession::open(Box::new(store.clone()));
    assert_eq!(reopened.document().config.watermark, "@kept");
}

#[test]
fn preview_scale_follows_viewport_and_zoom_bounds() {
    assert_eq!(preview_scale_for_viewport(100.0), 0.2);
    assert_eq!(preview_scale_for_viewport(700.0), 0.45);
    assert_eq!(preview_scale_for_viewport(4000.0), 0.5);
    let desktop = preview_scale_for_viewport(1000.0);
    assert!((desktop - 500.0 / 1080.0).abs() < 1e-12);

    let (mut s, _store, _clock) = session();
    for _ in 0..30 {
        s.zoom_in();
    }
    assert_eq!(s.preview_scale(), MAX_ZOOM);
    for _ in 0..30 {
        s.zoom_out();
    }
    assert_eq!(s.preview_scale(), MIN_ZOOM);
}
