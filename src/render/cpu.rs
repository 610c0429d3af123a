use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::assets::fonts::FontFace;
use crate::assets::store::PreparedAssets;
use crate::foundation::core::{Affine, BezPath, Point};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::render::blur::{blur_region_in_place, blur_rgba8_premul};
use crate::render::composite::over_in_place;
use crate::render::passes::{FrameRGBA, PassBackend};
use crate::render::plan::{
    CompositeOp, CompositePass, DrawOp, OffscreenPass, PassFx, RenderPlan, ScenePass, SurfaceDesc,
    SurfaceId,
};

/// Rasterizes plans with `vello_cpu`.
///
/// Decoded images and font data are cached by reference across slides; call
/// [`CpuBackend::clear_caches`] when the prepared assets change.
#[derive(Default)]
pub struct CpuBackend {
    image_cache: HashMap<String, vello_cpu::Image>,
    font_cache: HashMap<FontKey, vello_cpu::peniko::FontData>,
    surfaces: HashMap<SurfaceId, CpuSurface>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    weight: u16,
    index: u32,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_caches(&mut self) {
        self.image_cache.clear();
        self.font_cache.clear();
    }

    fn surface(&self, id: SurfaceId, role: &str) -> SocialflowResult<&CpuSurface> {
        self.surfaces.get(&id).ok_or_else(|| {
            SocialflowError::export(format!("{role} surface {id:?} was not initialized"))
        })
    }

    fn take_surface(&mut self, id: SurfaceId, role: &str) -> SocialflowResult<CpuSurface> {
        self.surfaces.remove(&id).ok_or_else(|| {
            SocialflowError::export(format!("{role} surface {id:?} was not initialized"))
        })
    }

    fn image_paint_for(
        &mut self,
        source: &str,
        assets: &PreparedAssets,
    ) -> SocialflowResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(source) {
            return Ok(paint.clone());
        }
        let img = assets.image(source).ok_or_else(|| {
            SocialflowError::export(format!("image '{source}' was not prepared"))
        })?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(decoded_to_pixmap(img)?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(source.to_string(), paint.clone());
        Ok(paint)
    }

    fn font_for(&mut self, face: &FontFace) -> vello_cpu::peniko::FontData {
        let key = FontKey {
            family: face.family_name.clone(),
            weight: face.weight,
            index: face.index,
        };
        self.font_cache
            .entry(key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
                    face.index,
                )
            })
            .clone()
    }
}

impl PassBackend for CpuBackend {
    fn ensure_surface(&mut self, id: SurfaceId, desc: &SurfaceDesc) -> SocialflowResult<()> {
        let width: u16 = desc
            .width
            .try_into()
            .map_err(|_| SocialflowError::export("surface width exceeds u16"))?;
        let height: u16 = desc
            .height
            .try_into()
            .map_err(|_| SocialflowError::export("surface height exceeds u16"))?;
        let reuse = self
            .surfaces
            .get(&id)
            .is_some_and(|s| s.width == width && s.height == height);
        if !reuse {
            self.surfaces.insert(
                id,
                CpuSurface {
                    width,
                    height,
                    pixmap: vello_cpu::Pixmap::new(width, height),
                },
            );
        }
        Ok(())
    }

    fn exec_scene(&mut self, pass: &ScenePass, assets: &PreparedAssets) -> SocialflowResult<()> {
        let mut surface = self.take_surface(pass.target, "scene target")?;
        if pass.clear_to_transparent {
            surface.pixmap.data_as_u8_slice_mut().fill(0);
        }
        if !pass.ops.is_empty() {
            let mut ctx = vello_cpu::RenderContext::new(surface.width, surface.height);
            let drawn = pass
                .ops
                .iter()
                .try_for_each(|op| draw_op(self, &mut ctx, op, assets));
            if let Err(err) = drawn {
                self.surfaces.insert(pass.target, surface);
                return Err(err);
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut surface.pixmap);
        }
        self.surfaces.insert(pass.target, surface);
        Ok(())
    }

    fn exec_offscreen(&mut self, pass: &OffscreenPass) -> SocialflowResult<()> {
        let PassFx::Blur {
            radius_px,
            sigma,
            region,
        } = pass.fx;
        if pass.input == pass.output {
            let surface = self
                .surfaces
                .get_mut(&pass.output)
                .ok_or_else(|| SocialflowError::export("offscreen surface was not initialized"))?;
            let (w, h) = (u32::from(surface.width), u32::from(surface.height));
            let data = surface.pixmap.data_as_u8_slice_mut();
            return match region {
                Some(region) => blur_region_in_place(data, w, h, region, radius_px, sigma),
                None => {
                    let blurred = blur_rgba8_premul(data, w, h, radius_px, sigma)?;
                    data.copy_from_slice(&blurred);
                    Ok(())
                }
            };
        }

        let input = self.surface(pass.input, "offscreen input")?;
        let (w, h) = (u32::from(input.width), u32::from(input.height));
        let mut bytes = input.pixmap.data_as_u8_slice().to_vec();
        match region {
            Some(region) => blur_region_in_place(&mut bytes, w, h, region, radius_px, sigma)?,
            None => bytes = blur_rgba8_premul(&bytes, w, h, radius_px, sigma)?,
        }
        let output = self
            .surfaces
            .get_mut(&pass.output)
            .ok_or_else(|| SocialflowError::export("offscreen output surface was not initialized"))?;
        if (u32::from(output.width), u32::from(output.height)) != (w, h) {
            return Err(SocialflowError::export(
                "offscreen input/output surface size mismatch",
            ));
        }
        output.pixmap.data_as_u8_slice_mut().copy_from_slice(&bytes);
        Ok(())
    }

    fn exec_composite(&mut self, pass: &CompositePass) -> SocialflowResult<()> {
        let mut dst = self.take_surface(pass.target, "composite target")?;
        let mut result = Ok(());
        for op in &pass.ops {
            let CompositeOp::Over { src, opacity } = *op;
            result = self.surface(src, "composite src").and_then(|src| {
                over_in_place(
                    dst.pixmap.data_as_u8_slice_mut(),
                    src.pixmap.data_as_u8_slice(),
                    opacity,
                )
            });
            if result.is_err() {
                break;
            }
        }
        self.surfaces.insert(pass.target, dst);
        result
    }

    fn readback_rgba8(&mut self, surface: SurfaceId, plan: &RenderPlan) -> SocialflowResult<FrameRGBA> {
        let data = self
            .surface(surface, "readback")?
            .pixmap
            .data_as_u8_slice()
            .to_vec();
        let cap = plan.surfaces.len() as u32;
        self.surfaces.retain(|id, _| id.0 < cap);
        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn draw_op(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
    assets: &PreparedAssets,
) -> SocialflowResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    match op {
        DrawOp::FillPath {
            path,
            transform,
            color,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(paint_color(*color));
            ctx.fill_path(&bezpath_to_cpu(path));
        }
        DrawOp::Image { source, transform } => {
            let paint = backend.image_paint_for(source, assets)?;
            let (w, h) = image_paint_size(&paint)?;
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        }
        DrawOp::Glyphs {
            face,
            font_size,
            glyphs,
            transform,
            color,
        } => {
            let font = backend.font_for(face);
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(paint_color(*color));
            ctx.glyph_run(&font)
                .font_size(*font_size)
                .fill_glyphs(glyphs.iter().copied());
        }
    }
    Ok(())
}

/// `vello_cpu` takes straight colors; plan colors are premultiplied.
fn paint_color(c: crate::foundation::core::Rgba8Premul) -> vello_cpu::peniko::Color {
    let straight = |v: u8| -> u8 {
        if c.a == 0 {
            0
        } else {
            ((u32::from(v) * 255 + u32::from(c.a) / 2) / u32::from(c.a)).min(255) as u8
        }
    };
    vello_cpu::peniko::Color::from_rgba8(straight(c.r), straight(c.g), straight(c.b), c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn decoded_to_pixmap(img: &DecodedImage) -> SocialflowResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width
        .try_into()
        .map_err(|_| SocialflowError::export("image width exceeds u16"))?;
    let h: u16 = img
        .height
        .try_into()
        .map_err(|_| SocialflowError::export("image height exceeds u16"))?;
    if img.rgba8_premul.len() != img.width as usize * img.height as usize * 4 {
        return Err(SocialflowError::export("decoded image byte length mismatch"));
    }
    let mut may_have_opacities = false;
    let pixels: Vec<_> = img
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn image_paint_size(image: &vello_cpu::Image) -> SocialflowResult<(f64, f64)> {
    match &image.image {
        vello_cpu::ImageSource::Pixmap(p) => Ok((f64::from(p.width()), f64::from(p.height()))),
        vello_cpu::ImageSource::OpaqueId(_) => Err(SocialflowError::export(
            "cpu backend does not support opaque image ids",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
