use crate::assets::store::PreparedAssets;
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::render::plan::{CompositePass, OffscreenPass, Pass, RenderPlan, ScenePass, SurfaceDesc, SurfaceId};

#[derive(Clone, Debug)]
/// A rendered slide bitmap in RGBA8.
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

pub trait PassBackend {
    fn ensure_surface(&mut self, id: SurfaceId, desc: &SurfaceDesc) -> SocialflowResult<()>;

    fn exec_scene(&mut self, pass: &ScenePass, assets: &PreparedAssets) -> SocialflowResult<()>;

    fn exec_offscreen(&mut self, pass: &OffscreenPass) -> SocialflowResult<()>;

    fn exec_composite(&mut self, pass: &CompositePass) -> SocialflowResult<()>;

    fn readback_rgba8(&mut self, surface: SurfaceId, plan: &RenderPlan) -> SocialflowResult<FrameRGBA>;
}

pub fn execute_plan<B: PassBackend + ?Sized>(
    backend: &mut B,
    plan: &RenderPlan,
    assets: &PreparedAssets,
) -> SocialflowResult<FrameRGBA> {
    for (idx, desc) in plan.surfaces.iter().enumerate() {
        let id = SurfaceId(
            idx.try_into()
                .map_err(|_| SocialflowError::export("surface id overflow"))?,
        );
        backend.ensure_surface(id, desc)?;
    }

    for pass in &plan.passes {
        match pass {
            Pass::Scene(p) => backend.exec_scene(p, assets)?,
            Pass::Offscreen(p) => backend.exec_offscreen(p)?,
            Pass::Composite(p) => backend.exec_composite(p)?,
        }
    }

    backend.readback_rgba8(plan.final_surface, plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/passes.rs"]
mod tests;
