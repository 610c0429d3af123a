use super::*;
use crate::foundation::core::Canvas;
use crate::render::plan::{CompositeOp, PassFx};

#[derive(Default)]
struct MockBackend {
    calls: Vec<&'static str>,
}

impl PassBackend for MockBackend {
    fn ensure_surface(&mut self, _id: SurfaceId, _desc: &SurfaceDesc) -> SocialflowResult<()> {
        self.calls.push("ensure_surface");
        Ok(())
    }

    fn exec_scene(&mut self, _pass: &ScenePass, _assets: &PreparedAssets) -> SocialflowResult<()> {
        self.calls.push("exec_scene");
        Ok(())
    }

    fn exec_offscreen(&mut self, _pass: &OffscreenPass) -> SocialflowResult<()> {
        self.calls.push("exec_offscreen");
        Ok(())
    }

    fn exec_composite(&mut self, _pass: &CompositePass) -> SocialflowResult<()> {
        self.calls.push("exec_composite");
        Ok(())
    }

    fn readback_rgba8(&mut self, _surface: SurfaceId, plan: &RenderPlan) -> SocialflowResult<FrameRGBA> {
        self.calls.push("readback_rgba8");
        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: vec![0; (plan.canvas.width * plan.canvas.height * 4) as usize],
            premultiplied: true,
        })
    }
}

#[test]
fn execute_plan_calls_in_expected_order() {
    let desc = SurfaceDesc {
        width: 4,
        height: 3,
    };
    let plan = RenderPlan {
        canvas: Canvas {
            width: 4,
            height: 3,
        },
        surfaces: vec![desc, desc],
        passes: vec![
            Pass::Scene(ScenePass {
                target: SurfaceId(1),
                ops: vec![],
                clear_to_transparent: true,
            }),
            Pass::Offscreen(OffscreenPass {
                input: SurfaceId(1),
                output: SurfaceId(1),
                fx: PassFx::Blur {
                    radius_px: 3,
                    sigma: 1.0,
                    region: None,
                },
            }),
            Pass::Composite(CompositePass {
                target: SurfaceId(0),
                ops: vec![CompositeOp::Over {
                    src: SurfaceId(1),
                    opacity: 1.0,
                }],
            }),
        ],
        final_surface: SurfaceId(0),
    };

    let mut backend = MockBackend::default();
    let out = execute_plan(&mut backend, &plan, &PreparedAssets::empty()).unwrap();
    assert_eq!((out.width, out.height), (4, 3));
    assert!(out.premultiplied);
    assert_eq!(
        backend.calls,
        vec![
            "ensure_surface",
            "ensure_surface",
            "exec_scene",
            "exec_offscreen",
            "exec_composite",
            "readback_rgba8",
        ]
    );
}
