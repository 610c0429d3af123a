//! Socialflow composes multi-slide social-media carousels from text plus a shared design,
//! and exports them as PNG images or a zip.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: `TextStyle + scale -> ConcreteStyle` (absolute pixel sizes, shadows, boxes)
//! 2. **Compose**: `SlideContent + DesignConfig + scale + mode -> LayerTree`
//! 3. **Lay out**: `LayerTree -> SlideLayout` (text shaped with Parley, primitives in z order)
//! 4. **Compile**: `SlideLayout -> RenderPlan` (scene, blur and composite passes)
//! 5. **Render**: `RenderPlan -> FrameRGBA` on the `vello_cpu` backend
//! 6. **Export**: every slide in order, encoded as PNG, optionally bundled in a zip
//!
//! Preview and export differ only in scale and [`RenderMode`], so their geometry stays
//! proportional. [`EditorSession`] owns the editable [`Document`] with debounced undo/redo
//! and persistence through a [`StateStore`].
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod compose;
mod editor;
mod export;
mod foundation;
mod generate;
mod history;
mod interact;
mod model;
mod persist;
mod render;
mod style;

pub use assets::decode::{
    DecodedImage, decode_image, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
pub use assets::fonts::{FontBook, FontFace};
pub use assets::store::{PreparedAssets, normalize_rel_path};
pub use catalog::fonts::{FONT_CATALOG, FontEntry, match_font};
pub use catalog::presets::{
    Catalog, DEFAULT_PRESET_ID, Palette, Preset, PresetConfig, apply_palette,
};
pub use compose::compositor::{CONTENT_PADDING, FRAME_INSET, compose, frame_shapes, progress_shapes};
pub use compose::kinds::{
    CONTENT_GAP, ContentCtx, ContentRenderer, CoverRenderer, EndRenderer, KindRenderer,
    renderer_for,
};
pub use compose::layer::{
    BackgroundImage, ContentBlock, Guide, Layer, LayerContent, LayerName, LayerTree, NoteItem,
    RenderMode, Shape, SlidePosition, TextItem, WatermarkItem,
};
pub use editor::clock::{Clock, ManualClock, SystemClock};
pub use editor::session::{
    EditorSession, INITIAL_PREVIEW_SCALE, MAX_ZOOM, MIN_ZOOM, UPLOAD_OVERLAY_OPACITY, ZOOM_STEP,
    preview_scale_for_viewport,
};
pub use export::archive::{ARCHIVE_FILE_NAME, bundle_zip, write_archive};
pub use export::pipeline::{
    DEFAULT_SUPERSAMPLE, ExportOptions, ExportProgress, ExportedImage, Exporter, SlideRenderer,
    encode_png,
};
pub use foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Rgba8Premul, Size, Vec2};
pub use foundation::error::{SocialflowError, SocialflowResult};
pub use foundation::math::{clamp_percent, parse_float_or, parse_int_or_zero, parse_page_count};
pub use generate::service::{
    ContentGenerator, GeneratedSlide, GenerationRequest, GenerationResponse, JsonFileGenerator,
    MAX_PAGE_COUNT, MIN_PAGE_COUNT, ThemeSuggestion, apply_theme, parse_response,
};
pub use history::debounce::Debouncer;
pub use history::manager::{DEFAULT_CAPACITY, DEFAULT_QUIET_PERIOD, History};
pub use interact::drag::{DragState, NoteDrag, NoteDrop, apply_note_position_to_all, pointer_to_percent};
pub use model::config::{
    AspectRatio, BASE_WIDTH, BackgroundPosition, BackgroundSize, BackgroundType, DesignConfig,
    FrameStyle, MAX_BG_BLUR, OverlayType,
};
pub use model::document::{Document, default_design, default_slides};
pub use model::slide::{NotePosition, SlideContent, SlideField, SlideKind};
pub use model::style::{
    FontFamily, FontWeight, MAX_FONT_SIZE, MAX_LINE_HEIGHT, StylePatch, StyleRole, TextAlign,
    TextStyle, TextStyleEdit,
};
pub use persist::store::{FileStore, MemoryStore, STORAGE_NAMESPACE, StateStore, load_or_default};
pub use render::blur::{Kernel, blur_region_in_place, blur_rgba8_premul};
pub use render::composite::{PremulRgba8, over, over_in_place};
pub use render::cpu::CpuBackend;
pub use render::layout::{
    LaidLayer, MAX_GUIDE_DASHES, Prim, SlideLayout, Stage, background_transform, dashed_outline,
    layout,
};
pub use render::passes::{FrameRGBA, PassBackend, execute_plan};
pub use render::plan::{
    CompositeOp, CompositePass, DrawOp, MAX_SURFACE_SIDE, OffscreenPass, Pass, PassFx, PixelRect,
    RenderPlan, ScenePass, SurfaceDesc, SurfaceId, blur_radius, compile_layout,
};
pub use render::text::{ShapedText, TextEngine};
pub use style::normalize::normalize;
pub use style::resolve::{
    Anchor, BoxDecoration, ConcreteStyle, DEFAULT_LINE_HEIGHT, Shadow, resolve, resolve_role,
};
