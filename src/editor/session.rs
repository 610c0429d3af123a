use std::sync::Arc;

use crate::catalog::presets::{Catalog, DEFAULT_PRESET_ID, apply_palette};
use crate::compose::layer::LayerTree;
use crate::editor::clock::{Clock, SystemClock};
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{SocialflowError, SocialflowResult};
use crate::foundation::math::{parse_float_or, parse_int_or_zero, parse_page_count};
use crate::generate::service::{ContentGenerator, GenerationRequest, apply_theme};
use crate::history::manager::History;
use crate::interact::drag::{NoteDrag, apply_note_position_to_all};
use crate::model::config::{
    AspectRatio, BASE_WIDTH, BackgroundPosition, BackgroundSize, BackgroundType, FrameStyle,
    MAX_BG_BLUR, OverlayType,
};
use crate::model::document::Document;
use crate::model::slide::{SlideContent, SlideField, SlideKind};
use crate::model::style::{StyleRole, TextStyleEdit};
use crate::persist::store::{StateStore, load_or_default};
use crate::style::normalize::normalize;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 1.5;
pub const ZOOM_STEP: f64 = 0.1;
/// Preview scale before any viewport is known.
pub const INITIAL_PREVIEW_SCALE: f64 = 0.4;
/// Overlay opacity forced by an image upload when no overlay was active.
pub const UPLOAD_OVERLAY_OPACITY: f64 = 0.6;

const NEW_SLIDE_TITLE: &str = "新標題";
const NEW_SLIDE_BODY: &str = "新內容";
const NEW_SLIDE_NOTE: &str = "New";

/// Preview scale that fits a slide into a viewport `width` px wide.
pub fn preview_scale_for_viewport(width: f64) -> f64 {
    let base = f64::from(BASE_WIDTH);
    if width < 768.0 {
        ((width - 40.0) / base).clamp(0.2, 0.45)
    } else {
        ((width * 0.6 - 100.0) / base).min(0.5)
    }
}

/// The single editable document plus everything that reacts to its edits.
///
/// Every mutation produces a new normalized snapshot, persists it immediately, and
/// schedules a debounced history entry. Undo/redo restore snapshots without scheduling.
pub struct EditorSession {
    doc: Arc<Document>,
    history: History,
    catalog: Catalog,
    store: Box<dyn StateStore>,
    clock: Box<dyn Clock>,
    drag: NoteDrag,
    last_interacted: Option<String>,
    active_preset: Option<String>,
    preview_scale: f64,
    id_seq: u64,
}

impl EditorSession {
    /// Start from whatever `store` holds, falling back to the default document.
    pub fn open(store: Box<dyn StateStore>) -> Self {
        Self::with_parts(store, Box::new(SystemClock), Catalog::builtin())
    }

    pub fn with_parts(store: Box<dyn StateStore>, clock: Box<dyn Clock>, catalog: Catalog) -> Self {
        let mut doc = load_or_default(store.as_ref());
        doc.config = normalize(&doc.config);
        let doc = Arc::new(doc);
        Self {
            history: History::new(doc.clone()),
            doc,
            catalog,
            store,
            clock,
            drag: NoteDrag::new(),
            last_interacted: None,
            active_preset: Some(DEFAULT_PRESET_ID.to_string()),
            preview_scale: INITIAL_PREVIEW_SCALE,
            id_seq: 0,
        }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.doc
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_preset(&self) -> Option<&str> {
        self.active_preset.as_deref()
    }

    pub fn last_interacted(&self) -> Option<&str> {
        self.last_interacted.as_deref()
    }

    pub fn note_drag(&self) -> &NoteDrag {
        &self.drag
    }

    pub fn preview_scale(&self) -> f64 {
        self.preview_scale
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.doc) {
            tracing::warn!(error = %err, "failed to persist editor state");
        }
    }

    fn try_mutate(
        &mut self,
        edit: impl FnOnce(&mut Document) -> SocialflowResult<()>,
    ) -> SocialflowResult<()> {
        let mut next = (*self.doc).clone();
        edit(&mut next)?;
        next.config = normalize(&next.config);
        if next == *self.doc {
            return Ok(());
        }
        self.doc = Arc::new(next);
        self.persist();
        self.history.schedule(self.clock.now(), self.doc.clone());
        Ok(())
    }

    fn mutate(&mut self, edit: impl FnOnce(&mut Document)) {
        // Infallible edits cannot fail the wrapper.
        let _ = self.try_mutate(|doc| {
            edit(doc);
            Ok(())
        });
    }

    fn slide_mut<'a>(doc: &'a mut Document, id: &str) -> SocialflowResult<&'a mut SlideContent> {
        doc.slide_mut(id)
            .ok_or_else(|| SocialflowError::validation(format!("unknown slide '{id}'")))
    }

    fn fresh_id(&mut self) -> String {
        loop {
            self.id_seq += 1;
            let id = format!("s{}", self.id_seq);
            if self.doc.slide(&id).is_none() {
                return id;
            }
        }
    }

    // --- slides ---

    pub fn update_slide_field(
        &mut self,
        id: &str,
        field: SlideField,
        value: &str,
    ) -> SocialflowResult<()> {
        self.try_mutate(|doc| {
            Self::slide_mut(doc, id)?.set_field(field, value);
            Ok(())
        })
    }

    /// Append a content slide with placeholder text; returns its id.
    pub fn add_slide(&mut self) -> String {
        let id = self.fresh_id();
        let slide = SlideContent::new(id.clone(), SlideKind::Content).with_text(
            NEW_SLIDE_TITLE,
            NEW_SLIDE_BODY,
            NEW_SLIDE_NOTE,
        );
        self.mutate(|doc| doc.slides.push(slide));
        id
    }

    /// Remaining slides keep their kinds.
    pub fn remove_slide(&mut self, id: &str) -> SocialflowResult<()> {
        self.try_mutate(|doc| {
            let at = doc
                .position_of(id)
                .ok_or_else(|| SocialflowError::validation(format!("unknown slide '{id}'")))?;
            doc.slides.remove(at);
            Ok(())
        })?;
        if self.last_interacted.as_deref() == Some(id) {
            self.last_interacted = None;
        }
        Ok(())
    }

    /// Move a slide to `to` (clamped to the last position). Kinds are not re-derived.
    pub fn move_slide(&mut self, id: &str, to: usize) -> SocialflowResult<()> {
        self.try_mutate(|doc| {
            let from = doc
                .position_of(id)
                .ok_or_else(|| SocialflowError::validation(format!("unknown slide '{id}'")))?;
            let slide = doc.slides.remove(from);
            let to = to.min(doc.slides.len());
            doc.slides.insert(to, slide);
            Ok(())
        })
    }

    pub fn set_slide_kind(&mut self, id: &str, kind: SlideKind) -> SocialflowResult<()> {
        self.try_mutate(|doc| {
            Self::slide_mut(doc, id)?.kind = kind;
            Ok(())
        })
    }

    // --- canvas and chrome ---

    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        self.mutate(|doc| doc.config.aspect_ratio = ratio);
    }

    /// Custom size from form input. Invalid input coerces to 0, then floors at 1px.
    pub fn set_custom_size(&mut self, width_raw: &str, height_raw: &str) {
        let px = |raw: &str| parse_int_or_zero(raw).clamp(1, i64::from(u32::MAX)) as u32;
        let (w, h) = (px(width_raw), px(height_raw));
        self.mutate(|doc| {
            doc.config.custom_width = w;
            doc.config.custom_height = h;
        });
    }

    pub fn set_frame_style(&mut self, style: FrameStyle) {
        self.mutate(|doc| doc.config.frame_style = style);
    }

    pub fn set_frame_color(&mut self, color: Rgba8) {
        self.mutate(|doc| doc.config.frame_color = color);
    }

    pub fn set_watermark(&mut self, text: &str) {
        self.mutate(|doc| doc.config.watermark = text.to_string());
    }

    pub fn set_progress_bar(&mut self, on: bool) {
        self.mutate(|doc| doc.config.show_progress_bar = on);
    }

    // --- background and overlay ---

    pub fn set_background_type(&mut self, bg_type: BackgroundType) {
        self.mutate(|doc| doc.config.set_background_type(bg_type));
    }

    pub fn set_background_color(&mut self, color: Rgba8) {
        self.mutate(|doc| doc.config.bg_color = color);
    }

    pub fn set_background_size(&mut self, size: BackgroundSize) {
        self.mutate(|doc| doc.config.bg_size = size);
    }

    pub fn set_background_position(&mut self, position: BackgroundPosition) {
        self.mutate(|doc| doc.config.bg_position = position);
    }

    /// Blur radius from form input; invalid input keeps the current radius.
    pub fn set_background_blur(&mut self, raw: &str) {
        let blur = parse_float_or(raw, self.doc.config.bg_blur).clamp(0.0, MAX_BG_BLUR);
        self.mutate(|doc| doc.config.bg_blur = blur);
    }

    pub fn set_overlay_type(&mut self, overlay: OverlayType) {
        self.mutate(|doc| doc.config.overlay_type = overlay);
    }

    pub fn set_overlay_opacity(&mut self, raw: &str) {
        let opacity = parse_float_or(raw, self.doc.config.overlay_opacity);
        self.mutate(|doc| doc.config.set_overlay_opacity(opacity));
    }

    /// Use an uploaded image as the background.
    ///
    /// Switches to an image background, turns on a black overlay at 0.6 when none was
    /// active, and recolours title and body for contrast.
    pub fn upload_background_image(&mut self, source: &str) {
        let source = source.to_string();
        self.mutate(|doc| {
            let cfg = &mut doc.config;
            if cfg.overlay_type == OverlayType::None {
                cfg.overlay_type = OverlayType::Black;
                cfg.overlay_opacity = UPLOAD_OVERLAY_OPACITY;
            }
            cfg.bg_image = Some(source);
            cfg.set_background_type(BackgroundType::Image);
            cfg.title_style.color = Rgba8::rgb(0xfd, 0xe0, 0x47);
            cfg.body_style.color = Rgba8::WHITE;
        });
    }

    // --- typography ---

    pub fn update_text_style(&mut self, role: StyleRole, edit: TextStyleEdit) {
        self.mutate(|doc| doc.config.style_mut(role).apply(edit));
    }

    /// Style edit from a form field name and raw input.
    pub fn update_text_style_field(
        &mut self,
        role: StyleRole,
        field: &str,
        raw: &str,
    ) -> SocialflowResult<()> {
        let edit = TextStyleEdit::parse(field, raw, self.doc.config.style(role))?;
        self.update_text_style(role, edit);
        Ok(())
    }

    /// Merge a catalog preset over the config and mark it active.
    pub fn apply_preset(&mut self, id: &str) -> SocialflowResult<()> {
        let preset = self
            .catalog
            .preset(id)
            .ok_or_else(|| SocialflowError::validation(format!("unknown preset '{id}'")))?
            .clone();
        self.mutate(|doc| doc.config = preset.merge_into(&doc.config));
        self.active_preset = Some(preset.id.to_string());
        Ok(())
    }

    /// Apply palette `index` of the active preset.
    pub fn apply_palette(&mut self, index: usize) -> SocialflowResult<()> {
        let palette = self
            .active_preset
            .as_deref()
            .and_then(|id| self.catalog.preset(id))
            .and_then(|p| p.palettes.get(index))
            .cloned()
            .ok_or_else(|| {
                SocialflowError::validation(format!("no palette {index} in the active preset"))
            })?;
        self.mutate(|doc| doc.config = apply_palette(&doc.config, &palette));
        Ok(())
    }

    // --- notes ---

    /// Pointer down at `pointer` on the slide `tree` was composed for. Starts a drag when
    /// the tree's note is draggable and the pointer lands inside `note_bounds`.
    pub fn note_pointer_down(
        &mut self,
        tree: &LayerTree,
        pointer: Point,
        note_bounds: Rect,
    ) -> bool {
        self.drag.pointer_down(
            &tree.slide_id,
            pointer,
            note_bounds,
            tree.note_draggable(),
        )
    }

    pub fn note_pointer_move(&mut self, pointer: Point) {
        self.drag.pointer_move(pointer);
    }

    /// Release the drag and commit the note override. Returns whether anything was committed.
    pub fn note_pointer_up(&mut self, pointer: Point, slide_box: Rect) -> bool {
        let Some(released) = self.drag.pointer_up(pointer, slide_box) else {
            return false;
        };
        let committed = self
            .try_mutate(|doc| {
                Self::slide_mut(doc, &released.slide_id)?.note_position = Some(released.position);
                Ok(())
            })
            .is_ok();
        if committed {
            self.last_interacted = Some(released.slide_id);
        }
        committed
    }

    pub fn apply_note_position_to_all(&mut self) {
        let next = apply_note_position_to_all(&self.doc, self.last_interacted.as_deref());
        self.mutate(|doc| *doc = next);
    }

    // --- generation ---

    /// Replace the slides with generated content and apply any theme suggestion.
    ///
    /// Any failure leaves the document untouched.
    pub fn generate(
        &mut self,
        generator: &dyn ContentGenerator,
        prompt: &str,
        page_count_raw: &str,
    ) -> SocialflowResult<()> {
        let request = GenerationRequest::new(prompt, parse_page_count(page_count_raw))?;
        let response = generator.generate(&request)?;
        self.id_seq += 1;
        let prefix = format!("g{}-", self.id_seq);
        let theme = response.theme_suggestion.clone();
        let slides = response.into_slides(&prefix);
        tracing::info!(slides = slides.len(), themed = theme.is_some(), "applied generation");
        self.mutate(|doc| {
            doc.slides = slides;
            if let Some(theme) = &theme {
                doc.config = apply_theme(&doc.config, theme);
            }
        });
        self.last_interacted = None;
        Ok(())
    }

    // --- history ---

    /// Commit a due debounced snapshot. Hosts call this from their timer.
    pub fn tick(&mut self) -> bool {
        self.history.poll(self.clock.now())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.undo() else {
            return false;
        };
        self.restore(prev);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo() else {
            return false;
        };
        self.restore(next);
        true
    }

    fn restore(&mut self, doc: Arc<Document>) {
        self.drag.cancel();
        self.doc = doc;
        self.persist();
    }

    /// Drop stored state and start over from the default document.
    pub fn reset(&mut self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to clear stored state");
        }
        self.doc = Arc::new(Document::default());
        self.history.reset(self.doc.clone());
        self.drag.cancel();
        self.last_interacted = None;
        self.active_preset = Some(DEFAULT_PRESET_ID.to_string());
    }

    // --- preview ---

    pub fn set_viewport_width(&mut self, width: f64) {
        self.preview_scale = preview_scale_for_viewport(width);
    }

    pub fn zoom_in(&mut self) {
        self.preview_scale = (self.preview_scale + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.preview_scale = (self.preview_scale - ZOOM_STEP).max(MIN_ZOOM);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
