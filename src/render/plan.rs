use std::sync::Arc;

use kurbo::Shape as _;

use crate::assets::fonts::FontFace;
use crate::foundation::core::{Affine, BezPath, Canvas, Rect, Rgba8Premul, RoundedRect, Vec2};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::render::layout::{Prim, SlideLayout, Stage};

/// Largest surface side the CPU rasterizer accepts.
pub const MAX_SURFACE_SIDE: u32 = u16::MAX as u32;

const FINAL: SurfaceId = SurfaceId(0);
const WORK: SurfaceId = SurfaceId(1);

#[derive(Clone, Debug)]
/// Backend-agnostic pass list producing one slide bitmap.
///
/// Every stage is drawn into a scratch surface, blurred there when it asks for it, and
/// composited over the final surface at its layer opacity.
pub struct RenderPlan {
    pub canvas: Canvas,
    pub surfaces: Vec<SurfaceDesc>,
    pub passes: Vec<Pass>,
    pub final_surface: SurfaceId,
}

#[derive(Clone, Debug)]
pub enum Pass {
    Scene(ScenePass),
    Offscreen(OffscreenPass),
    Composite(CompositePass),
}

#[derive(Clone, Debug)]
pub struct ScenePass {
    pub target: SurfaceId,
    pub ops: Vec<DrawOp>,
    pub clear_to_transparent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceDesc {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
/// Post-process `input` into `output`. The two may be the same surface.
pub struct OffscreenPass {
    pub input: SurfaceId,
    pub output: SurfaceId,
    pub fx: PassFx,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PassFx {
    /// Separable gaussian. Pixels outside `region` are left as they are.
    Blur {
        radius_px: u32,
        sigma: f32,
        region: Option<PixelRect>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Half-open pixel rectangle.
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    /// Pixels touched by `rect`, clipped to `canvas`. `None` when nothing remains.
    pub fn covering(rect: Rect, canvas: Canvas) -> Option<Self> {
        let clip = |v: f64, max: u32| v.clamp(0.0, f64::from(max)) as u32;
        let out = Self {
            x0: clip(rect.x0.floor(), canvas.width),
            y0: clip(rect.y0.floor(), canvas.height),
            x1: clip(rect.x1.ceil(), canvas.width),
            y1: clip(rect.y1.ceil(), canvas.height),
        };
        (out.x0 < out.x1 && out.y0 < out.y1).then_some(out)
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

#[derive(Clone, Debug)]
pub struct CompositePass {
    pub target: SurfaceId,
    pub ops: Vec<CompositeOp>,
}

#[derive(Clone, Copy, Debug)]
pub enum CompositeOp {
    Over { src: SurfaceId, opacity: f32 },
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Rgba8Premul,
    },
    Image {
        source: String,
        transform: Affine,
    },
    Glyphs {
        face: Arc<FontFace>,
        font_size: f32,
        glyphs: Arc<Vec<vello_cpu::Glyph>>,
        transform: Affine,
        color: Rgba8Premul,
    },
}

/// Blur reach in pixels for a gaussian of `sigma`.
pub fn blur_radius(sigma: f64) -> u32 {
    (sigma * 3.0).ceil().max(0.0) as u32
}

/// Compile a measured slide into passes at `supersample` device pixels per layout pixel.
pub fn compile_layout(layout: &SlideLayout, supersample: f64) -> SocialflowResult<RenderPlan> {
    if !supersample.is_finite() || supersample <= 0.0 {
        return Err(SocialflowError::validation(
            "supersample factor must be finite and > 0",
        ));
    }
    let width = (layout.size.width * supersample).round();
    let height = (layout.size.height * supersample).round();
    if width < 1.0 || height < 1.0 {
        return Err(SocialflowError::validation("render size must be at least 1px"));
    }
    if width > f64::from(MAX_SURFACE_SIDE) || height > f64::from(MAX_SURFACE_SIDE) {
        return Err(SocialflowError::validation(format!(
            "render size {width}x{height} exceeds {MAX_SURFACE_SIDE}px per side"
        )));
    }
    let canvas = Canvas::new(width as u32, height as u32)?;
    let desc = SurfaceDesc {
        width: canvas.width,
        height: canvas.height,
    };
    let global = Affine::scale(supersample);

    let mut passes = vec![Pass::Scene(ScenePass {
        target: FINAL,
        ops: Vec::new(),
        clear_to_transparent: true,
    })];
    for layer in &layout.layers {
        if layer.opacity <= 0.0 {
            continue;
        }
        for stage in &layer.stages {
            let ops = stage_ops(stage, global);
            if ops.is_empty() {
                continue;
            }
            passes.push(Pass::Scene(ScenePass {
                target: WORK,
                ops,
                clear_to_transparent: true,
            }));
            if let Some(fx) = stage_blur(stage, supersample, canvas) {
                passes.push(Pass::Offscreen(OffscreenPass {
                    input: WORK,
                    output: WORK,
                    fx,
                }));
            }
            passes.push(Pass::Composite(CompositePass {
                target: FINAL,
                ops: vec![CompositeOp::Over {
                    src: WORK,
                    opacity: layer.opacity,
                }],
            }));
        }
    }

    Ok(RenderPlan {
        canvas,
        surfaces: vec![desc, desc],
        passes,
        final_surface: FINAL,
    })
}

fn stage_blur(stage: &Stage, supersample: f64, canvas: Canvas) -> Option<PassFx> {
    let sigma = stage.blur_sigma.filter(|s| *s > 0.0)? * supersample;
    let radius_px = blur_radius(sigma);
    if radius_px == 0 {
        return None;
    }
    let reach = f64::from(radius_px);
    let region = stage
        .bounds()
        .map(|b| Affine::scale(supersample).transform_rect_bbox(b).inflate(reach, reach))
        .and_then(|b| PixelRect::covering(b, canvas));
    Some(PassFx::Blur {
        radius_px,
        sigma: sigma as f32,
        region,
    })
}

fn stage_ops(stage: &Stage, global: Affine) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(stage.prims.len());
    for prim in &stage.prims {
        match prim {
            Prim::Fill(shape) => {
                if shape.color.a == 0 || shape.rect.area() <= 0.0 {
                    continue;
                }
                let path = if shape.radius > 0.0 {
                    RoundedRect::from_rect(shape.rect, shape.radius).to_path(0.1)
                } else {
                    shape.rect.to_path(0.1)
                };
                ops.push(DrawOp::FillPath {
                    path,
                    transform: global,
                    color: shape.color.premultiplied(),
                });
            }
            Prim::Image {
                source, transform, ..
            } => ops.push(DrawOp::Image {
                source: source.clone(),
                transform: global * *transform,
            }),
            Prim::Text {
                shaped,
                origin,
                color,
            } => {
                let Some(face) = shaped.face.clone() else {
                    continue;
                };
                if color.a == 0 || shaped.glyphs.is_empty() {
                    continue;
                }
                ops.push(DrawOp::Glyphs {
                    face,
                    font_size: shaped.font_size,
                    glyphs: shaped.glyphs.clone(),
                    transform: global * Affine::translate(Vec2::new(origin.x, origin.y)),
                    color: color.premultiplied(),
                });
            }
        }
    }
    ops
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
