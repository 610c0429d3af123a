use super::*;

use crate::compose::layer::{LayerName, Shape};
use crate::foundation::core::{Rect, Rgba8, Size};
use crate::render::layout::{LaidLayer, Prim, SlideLayout, Stage};
use crate::render::passes::execute_plan;
use crate::render::plan::compile_layout;

fn filled(size: Size, rect: Rect, color: Rgba8, opacity: f32) -> SlideLayout {
    SlideLayout {
        size,
        layers: vec![LaidLayer {
            name: LayerName::Background,
            opacity,
            stages: vec![Stage {
                prims: vec![Prim::Fill(Shape::rect(rect, color))],
                blur_sigma: None,
            }],
        }],
        note_bounds: None,
    }
}

fn pixel(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

#[test]
fn full_fill_covers_every_pixel() {
    let size = Size::new(4.0, 4.0);
    let layout = filled(size, Rect::new(0.0, 0.0, 4.0, 4.0), Rgba8::rgb(255, 0, 0), 1.0);
    let plan = compile_layout(&layout, 1.0).unwrap();
    let mut backend = CpuBackend::new();
    let frame = execute_plan(&mut backend, &plan, &PreparedAssets::empty()).unwrap();
    assert_eq!((frame.width, frame.height), (4, 4));
    assert!(frame.premultiplied);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(pixel(&frame, x, y), [255, 0, 0, 255]);
        }
    }
}

#[test]
fn layer_opacity_is_applied_when_compositing() {
    let size = Size::new(2.0, 2.0);
    let layout = filled(size, Rect::new(0.0, 0.0, 2.0, 2.0), Rgba8::WHITE, 0.5);
    let plan = compile_layout(&layout, 1.0).unwrap();
    let frame = execute_plan(&mut CpuBackend::new(), &plan, &PreparedAssets::empty()).unwrap();
    let px = pixel(&frame, 0, 0);
    assert!((127..=129).contains(&px[3]), "alpha {}", px[3]);
}

#[test]
fn surfaces_are_cleared_between_frames() {
    let size = Size::new(4.0, 4.0);
    let mut backend = CpuBackend::new();
    let left = filled(size, Rect::new(0.0, 0.0, 2.0, 4.0), Rgba8::WHITE, 1.0);
    execute_plan(&mut backend, &compile_layout(&left, 1.0).unwrap(), &PreparedAssets::empty()).unwrap();
    let right = filled(size, Rect::new(2.0, 0.0, 4.0, 4.0), Rgba8::WHITE, 1.0);
    let frame = execute_plan(&mut backend, &compile_layout(&right, 1.0).unwrap(), &PreparedAssets::empty()).unwrap();
    assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 0]);
    assert_eq!(pixel(&frame, 3, 0), [255, 255, 255, 255]);
}

#[test]
fn unprepared_image_fails_the_frame() {
    let layout = SlideLayout {
        size: Size::new(2.0, 2.0),
        layers: vec![LaidLayer {
            name: LayerName::Background,
            opacity: 1.0,
            stages: vec![Stage {
                prims: vec![Prim::Image {
                    source: "missing.png".to_string(),
                    transform: Affine::IDENTITY,
                    width: 2,
                    height: 2,
                }],
                blur_sigma: None,
            }],
        }],
        note_bounds: None,
    };
    let plan = compile_layout(&layout, 1.0).unwrap();
    let err = execute_plan(&mut CpuBackend::new(), &plan, &PreparedAssets::empty()).unwrap_err();
    assert!(matches!(err, SocialflowError::Export(_)));
}

#[test]
fn blurred_stage_spreads_past_its_shape() {
    let size = Size::new(16.0, 16.0);
    let mut layout = filled(size, Rect::new(6.0, 6.0, 10.0, 10.0), Rgba8::WHITE, 1.0);
    layout.layers[0].stages[0].blur_sigma = Some(1.5);
    let plan = compile_layout(&layout, 1.0).unwrap();
    let frame = execute_plan(&mut CpuBackend::new(), &plan, &PreparedAssets::empty()).unwrap();
    assert!(pixel(&frame, 5, 8)[3] > 0);
    assert!(pixel(&frame, 8, 8)[3] < 255);
    assert_eq!(pixel(&frame, 0, 0), [0, 0, 0, 0]);
}

#[test]
fn premultiplied_colors_are_unpremultiplied_for_paint() {
    let c = Rgba8::rgba(255, 0, 0, 128).premultiplied();
    let paint = paint_color(c).to_rgba8();
    assert_eq!(paint.a, 128);
    assert!(paint.r >= 254);
}
