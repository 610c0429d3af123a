use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::assets::fonts::FontBook;
use crate::assets::store::PreparedAssets;
use crate::compose::compositor::compose;
use crate::compose::layer::{LayerTree, RenderMode, SlidePosition};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::model::document::Document;
use crate::render::cpu::CpuBackend;
use crate::render::layout::{SlideLayout, layout};
use crate::render::passes::{FrameRGBA, execute_plan};
use crate::render::plan::compile_layout;
use crate::render::text::TextEngine;

pub const DEFAULT_SUPERSAMPLE: u32 = 2;

/// Export tunables. [`ExportOptions::from_env`] reads `SOCIALFLOW_SUPERSAMPLE` and
/// `SOCIALFLOW_FONTS_DIR` over the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Device pixels per slide pixel.
    pub supersample: u32,
    pub fonts_dir: Option<PathBuf>,
    /// Directory image references are resolved against.
    pub assets_root: PathBuf,
    pub system_fonts: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            supersample: DEFAULT_SUPERSAMPLE,
            fonts_dir: None,
            assets_root: PathBuf::from("."),
            system_fonts: true,
        }
    }
}

impl ExportOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let supersample = std::env::var("SOCIALFLOW_SUPERSAMPLE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.supersample);
        let fonts_dir = std::env::var("SOCIALFLOW_FONTS_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            supersample,
            fonts_dir,
            ..defaults
        }
    }

    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = root.into();
        self
    }

    /// Load the configured fonts into a fresh book.
    pub fn load_fonts(&self) -> FontBook {
        let dirs: Vec<&Path> = self.fonts_dir.as_deref().into_iter().collect();
        FontBook::load(self.system_fonts, &dirs)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportProgress {
    pub completed: usize,
    pub total: usize,
}

impl ExportProgress {
    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn is_done(self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

#[derive(Clone, Debug)]
/// One encoded slide.
pub struct ExportedImage {
    /// 0-based slide position.
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl ExportedImage {
    /// `slide-<n>.png` with `n` counting from 1.
    pub fn file_name(&self) -> String {
        format!("slide-{}.png", self.index + 1)
    }

    /// Write the PNG into `dir` under [`ExportedImage::file_name`].
    pub fn write_to(&self, dir: &Path) -> SocialflowResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// Measures and rasterizes layer trees. Font and image caches live as long as it does.
pub struct SlideRenderer {
    fonts: FontBook,
    text: TextEngine,
    backend: CpuBackend,
}

impl SlideRenderer {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            text: TextEngine::new(),
            backend: CpuBackend::new(),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Drop decoded image paints, for when the prepared assets change.
    pub fn forget_images(&mut self) {
        self.backend.clear_caches();
    }

    pub fn layout(&mut self, tree: &LayerTree, assets: &PreparedAssets) -> SlideLayout {
        layout(tree, assets, &mut self.fonts, &mut self.text)
    }

    pub fn render(
        &mut self,
        tree: &LayerTree,
        assets: &PreparedAssets,
        supersample: f64,
    ) -> SocialflowResult<FrameRGBA> {
        let laid = self.layout(tree, assets);
        let plan = compile_layout(&laid, supersample)?;
        tracing::debug!(
            slide = %tree.slide_id,
            passes = plan.passes.len(),
            width = plan.canvas.width,
            height = plan.canvas.height,
            "compiled slide plan"
        );
        execute_plan(&mut self.backend, &plan, assets)
    }
}

/// Sequential slide exporter.
pub struct Exporter {
    options: ExportOptions,
    renderer: SlideRenderer,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        let fonts = options.load_fonts();
        Self::with_fonts(options, fonts)
    }

    pub fn with_fonts(options: ExportOptions, fonts: FontBook) -> Self {
        Self {
            options,
            renderer: SlideRenderer::new(fonts),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn renderer(&mut self) -> &mut SlideRenderer {
        &mut self.renderer
    }

    /// Render one slide at `scale` in `mode`, without supersampling.
    pub fn render_slide(
        &mut self,
        doc: &Document,
        index: usize,
        scale: f64,
        mode: RenderMode,
    ) -> SocialflowResult<FrameRGBA> {
        let slide = doc.slides.get(index).ok_or_else(|| {
            SocialflowError::validation(format!(
                "slide index {index} out of range for {} slides",
                doc.slides.len()
            ))
        })?;
        let assets = PreparedAssets::prepare(&doc.config, &self.options.assets_root);
        self.renderer.forget_images();
        let tree = compose(
            slide,
            &doc.config,
            SlidePosition::new(index, doc.slides.len()),
            scale,
            mode,
        )?;
        self.renderer.render(&tree, &assets, 1.0)
    }

    /// Export every slide in order at scale 1 and the configured supersampling.
    ///
    /// `on_progress` runs after each slide is encoded. Any failure aborts the batch and
    /// returns a single [`SocialflowError::Export`]; no partial result is returned.
    #[tracing::instrument(skip_all, fields(slides = doc.slides.len()))]
    pub fn export_slides(
        &mut self,
        doc: &Document,
        mut on_progress: impl FnMut(ExportProgress),
    ) -> SocialflowResult<Vec<ExportedImage>> {
        let total = doc.slides.len();
        if total == 0 {
            return Err(SocialflowError::export("nothing to export: no slides"));
        }
        let supersample = f64::from(self.options.supersample.max(1));
        let assets = PreparedAssets::prepare(&doc.config, &self.options.assets_root);
        self.renderer.forget_images();

        let mut images = Vec::with_capacity(total);
        for (index, slide) in doc.slides.iter().enumerate() {
            let image = self.export_one(doc, index, &assets, supersample).map_err(|err| {
                tracing::warn!(slide = %slide.id, index, error = %err, "export aborted");
                SocialflowError::export(format!("slide {} ({}): {err}", index + 1, slide.id))
            })?;
            images.push(image);
            on_progress(ExportProgress {
                completed: index + 1,
                total,
            });
        }
        tracing::info!(count = images.len(), "export finished");
        Ok(images)
    }

    fn export_one(
        &mut self,
        doc: &Document,
        index: usize,
        assets: &PreparedAssets,
        supersample: f64,
    ) -> SocialflowResult<ExportedImage> {
        let tree = compose(
            &doc.slides[index],
            &doc.config,
            SlidePosition::new(index, doc.slides.len()),
            1.0,
            RenderMode::Export,
        )?;
        let frame = self.renderer.render(&tree, assets, supersample)?;
        let (width, height) = (frame.width, frame.height);
        Ok(ExportedImage {
            index,
            width,
            height,
            png: encode_png(frame)?,
        })
    }
}

/// Encode a frame as PNG with straight alpha.
pub fn encode_png(frame: FrameRGBA) -> SocialflowResult<Vec<u8>> {
    let FrameRGBA {
        width,
        height,
        mut data,
        premultiplied,
    } = frame;
    if premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| SocialflowError::export("frame buffer does not match its dimensions"))?;
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(png)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
