use super::*;
use crate::model::document::{default_design, default_slides};
use crate::model::slide::{NotePosition, SlideKind};
use crate::model::style::TextAlign;

fn tree(kind_idx: usize, scale: f64, mode: RenderMode) -> LayerTree {
    let slides = default_slides();
    compose(
        &slides[kind_idx],
        &default_design(),
        SlidePosition::new(kind_idx, slides.len()),
        scale,
        mode,
    )
    .unwrap()
}

#[test]
fn export_tree_has_no_guides() {
    for i in 0..3 {
        assert!(!tree(i, 1.0, RenderMode::Export).has_guides());
        assert!(tree(i, 0.4, RenderMode::Preview).has_guides());
    }
    let t = tree(0, 1.0, RenderMode::Export);
    let LayerContent::Note(note) = &t.layer(LayerName::Note).unwrap().content else {
        panic!("note layer expected");
    };
    assert!(!note.draggable);
}

#[test]
fn layers_appear_in_contract_order() {
    let t = tree(1, 1.0, RenderMode::Export);
    let names: Vec<_> = t.paint_order().iter().map(|l| l.name).collect();
    assert_eq!(
        names,
        vec![
            LayerName::Background,
            LayerName::Overlay,
            LayerName::Content,
            LayerName::Watermark,
            LayerName::Progress,
            LayerName::Note,
        ]
    );
    assert_eq!(t.size, Size::new(1080.0, 1350.0));
}

#[test]
fn geometry_scales_proportionally() {
    let mut config = default_design();
    config.frame_style = FrameStyle::Corners;
    let slide = &default_slides()[0];
    let pos = SlidePosition::new(0, 3);
    let a = compose(slide, &config, pos, 1.0, RenderMode::Export).unwrap();
    let b = compose(slide, &config, pos, 0.5, RenderMode::Export).unwrap();

    let shapes = |t: &LayerTree| match &t.layer(LayerName::Frame).unwrap().content {
        LayerContent::Shapes(s) => s.clone(),
        _ => panic!("frame shapes expected"),
    };
    for (sa, sb) in shapes(&a).iter().zip(shapes(&b).iter()) {
        assert!((sa.rect.x0 * 0.5 - sb.rect.x0).abs() < 1e-9);
        assert!((sa.rect.y1 * 0.5 - sb.rect.y1).abs() < 1e-9);
    }
}

#[test]
fn frame_styles_produce_expected_shapes() {
    let size = Size::new(1080.0, 1350.0);
    let c = Rgba8::WHITE;
    assert!(frame_shapes(FrameStyle::None, c, size, 1.0).is_empty());

    let simple = frame_shapes(FrameStyle::Simple, c, size, 1.0);
    assert_eq!(simple.len(), 4);
    assert_eq!(simple[0].rect, Rect::new(32.0, 32.0, 1048.0, 34.0));

    let bold = frame_shapes(FrameStyle::Bold, c, size, 1.0);
    assert_eq!(bold[1].rect, Rect::new(32.0, 1312.0, 1048.0, 1318.0));

    assert_eq!(frame_shapes(FrameStyle::Corners, c, size, 1.0).len(), 8);

    let cinema = frame_shapes(FrameStyle::Cinema, c, size, 1.0);
    assert_eq!(cinema.len(), 2);
    assert_eq!(cinema[0].rect, Rect::new(0.0, 48.0, 1080.0, 50.0));
    assert_eq!(cinema[1].rect, Rect::new(0.0, 1300.0, 1080.0, 1302.0));
}

#[test]
fn progress_bar_tracks_position_and_hides_for_single_slide() {
    let size = Size::new(1000.0, 1000.0);
    let [track, fill] =
        progress_shapes(OverlayType::Black, SlidePosition::new(1, 4), size, 1.0).unwrap();
    assert_eq!(track.rect, Rect::new(100.0, 956.0, 900.0, 960.0));
    assert_eq!(fill.rect.width(), 400.0);
    assert_eq!(fill.color, Rgba8::WHITE);
    assert_eq!(track.color.a, 51);

    let [_, fill] =
        progress_shapes(OverlayType::White, SlidePosition::new(1, 4), size, 1.0).unwrap();
    assert_eq!(fill.color, Rgba8::BLACK);

    assert!(progress_shapes(OverlayType::Black, SlidePosition::new(0, 1), size, 1.0).is_none());

    let mut config = default_design();
    config.show_progress_bar = false;
    let t = compose(
        &default_slides()[0],
        &config,
        SlidePosition::new(0, 3),
        1.0,
        RenderMode::Export,
    )
    .unwrap();
    assert!(t.layer(LayerName::Progress).is_none());
}

#[test]
fn note_uses_override_then_global_then_fallback() {
    let mut config = default_design();
    let mut slide = default_slides()[0].clone();
    let center = |slide: &SlideContent, config: &DesignConfig| {
        let t = compose(slide, config, SlidePosition::new(0, 1), 1.0, RenderMode::Export)
            .unwrap();
        match &t.layer(LayerName::Note).unwrap().content {
            LayerContent::Note(n) => n.center,
            _ => panic!("note expected"),
        }
    };

    assert_eq!(center(&slide, &config), Point::new(918.0, 1242.0));
    config.global_note_position = None;
    assert_eq!(center(&slide, &config), Point::new(540.0, 1242.0));
    slide.note_position = Some(NotePosition::new(0.0, 100.0));
    assert_eq!(center(&slide, &config), Point::new(0.0, 1350.0));

    slide.note.clear();
    let t = compose(&slide, &config, SlidePosition::new(0, 1), 1.0, RenderMode::Export).unwrap();
    assert!(t.layer(LayerName::Note).is_none());
}

#[test]
fn overlay_none_is_an_invisible_layer() {
    let mut config = default_design();
    config.overlay_type = OverlayType::None;
    let t = compose(
        &default_slides()[0],
        &config,
        SlidePosition::new(0, 3),
        1.0,
        RenderMode::Export,
    )
    .unwrap();
    let overlay = t.layer(LayerName::Overlay).unwrap();
    assert!(!overlay.is_painted());
}

#[test]
fn image_background_blurs_with_overscale_and_falls_back_to_black() {
    let mut config = default_design();
    config.set_background_type(BackgroundType::Image);
    let slide = &default_slides()[0];
    let pos = SlidePosition::new(0, 3);

    let t = compose(slide, &config, pos, 1.0, RenderMode::Export).unwrap();
    assert_eq!(
        t.layer(LayerName::Background).unwrap().content,
        LayerContent::Fill(Rgba8::BLACK)
    );

    config.bg_image = Some("bg.jpg".into());
    config.bg_blur = 8.0;
    let t = compose(slide, &config, pos, 0.5, RenderMode::Export).unwrap();
    let LayerContent::Image(img) = &t.layer(LayerName::Background).unwrap().content else {
        panic!("image expected");
    };
    assert_eq!(img.blur, 4.0);
    assert_eq!(img.overscale, 1.05);
}

#[test]
fn content_roles_follow_slide_kind() {
    let roles = |t: &LayerTree| match &t.layer(LayerName::Content).unwrap().content {
        LayerContent::Content(b) => (
            b.items.iter().map(|i| i.role).collect::<Vec<_>>(),
            b.align,
            b.center_overflow,
        ),
        _ => panic!("content expected"),
    };
    let (cover, align, centered) = roles(&tree(0, 1.0, RenderMode::Export));
    assert_eq!(cover, vec![StyleRole::Title, StyleRole::Body]);
    assert_eq!(align, None);
    assert!(!centered);
    let (content, _, centered) = roles(&tree(1, 1.0, RenderMode::Export));
    assert_eq!(content, vec![StyleRole::Subtitle, StyleRole::Body]);
    assert!(!centered);
    let (end, align, centered) = roles(&tree(2, 1.0, RenderMode::Export));
    assert_eq!(end, vec![StyleRole::EndTitle, StyleRole::EndBody]);
    assert_eq!(align, Some(Anchor::Center));
    assert!(centered);
}

#[test]
fn end_slide_falls_back_to_subtitle_alignment() {
    let mut config = default_design();
    config.end_title_style = None;
    config.subtitle_style.text_align = TextAlign::Right;
    let mut slide = default_slides()[2].clone();
    slide.kind = SlideKind::End;
    let t = compose(&slide, &config, SlidePosition::new(2, 3), 1.0, RenderMode::Export).unwrap();
    let LayerContent::Content(b) = &t.layer(LayerName::Content).unwrap().content else {
        panic!("content expected");
    };
    assert_eq!(b.align, Some(Anchor::End));
    assert_eq!(b.gap, 50.0);
}

#[test]
fn out_of_range_config_is_rejected() {
    let mut config = default_design();
    config.body_style.font_size = 1e20;
    let err = compose(
        &default_slides()[0],
        &config,
        SlidePosition::new(0, 3),
        0.4,
        RenderMode::Preview,
    )
    .unwrap_err();
    assert!(matches!(err, SocialflowError::Validation(_)));
}

#[test]
fn watermark_contrasts_with_overlay() {
    let mut config = default_design();
    config.overlay_type = OverlayType::White;
    let t = compose(
        &default_slides()[0],
        &config,
        SlidePosition::new(0, 3),
        0.5,
        RenderMode::Export,
    )
    .unwrap();
    let LayerContent::Watermark(w) = &t.layer(LayerName::Watermark).unwrap().content else {
        panic!("watermark expected");
    };
    assert_eq!(w.style.color, Rgba8::BLACK.with_alpha(0.6));
    assert_eq!(w.style.font_size, 10.0);
    assert_eq!(w.anchor, Point::new(540.0 - 32.0, 32.0));

    config.watermark.clear();
    let t = compose(
        &default_slides()[0],
        &config,
        SlidePosition::new(0, 3),
        0.5,
        RenderMode::Export,
    )
    .unwrap();
    assert!(t.layer(LayerName::Watermark).is_none());
}

#[test]
fn invalid_scale_is_rejected() {
    let slide = &default_slides()[0];
    for s in [0.0, -1.0, f64::NAN] {
        assert!(
            compose(slide, &default_design(), SlidePosition::new(0, 1), s, RenderMode::Export)
                .is_err()
        );
    }
}
