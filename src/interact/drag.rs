use crate::foundation::core::{Point, Rect};
use crate::model::document::Document;
use crate::model::slide::NotePosition;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        slide_id: String,
        /// Last pointer position seen; tracked only, never committed.
        pointer: Point,
    },
}

#[derive(Clone, Debug, PartialEq)]
/// A committed drag: the slide's new note override.
pub struct NoteDrop {
    pub slide_id: String,
    pub position: NotePosition,
}

/// Pointer-driven repositioning of a slide's note.
#[derive(Clone, Debug, Default)]
pub struct NoteDrag {
    state: DragState,
}

impl NoteDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag if `pointer` lands on the note and the slide is editable.
    /// Returns whether a drag started.
    pub fn pointer_down(
        &mut self,
        slide_id: &str,
        pointer: Point,
        note_bounds: Rect,
        editable: bool,
    ) -> bool {
        if !editable || self.is_dragging() || !note_bounds.contains(pointer) {
            return false;
        }
        self.state = DragState::Dragging {
            slide_id: slide_id.to_string(),
            pointer,
        };
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        if let DragState::Dragging { pointer: p, .. } = &mut self.state {
            *p = pointer;
        }
    }

    /// Finish the drag, converting the release point into a clamped percentage of
    /// `slide_box`. Returns `None` when no drag was active.
    pub fn pointer_up(&mut self, pointer: Point, slide_box: Rect) -> Option<NoteDrop> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Dragging { slide_id, .. } => Some(NoteDrop {
                slide_id,
                position: pointer_to_percent(pointer, slide_box),
            }),
        }
    }

    /// Abandon an in-flight drag without committing.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Convert a pointer position into percentages of `slide_box`, clamped to `[0, 100]`.
pub fn pointer_to_percent(pointer: Point, slide_box: Rect) -> NotePosition {
    let pct = |v: f64, origin: f64, extent: f64| {
        if extent > 0.0 {
            (v - origin) / extent * 100.0
        } else {
            0.0
        }
    };
    NotePosition::new(
        pct(pointer.x, slide_box.x0, slide_box.width()),
        pct(pointer.y, slide_box.y0, slide_box.height()),
    )
}

/// Collapse per-slide overrides into the shared note position.
///
/// The new global position is taken from the last-interacted slide's override, else the
/// first slide's, else the current global. Every override is then cleared.
pub fn apply_note_position_to_all(doc: &Document, last_interacted: Option<&str>) -> Document {
    let from_last = last_interacted
        .and_then(|id| doc.slide(id))
        .and_then(|s| s.note_position);
    let from_first = doc.slides.first().and_then(|s| s.note_position);

    let mut out = doc.clone();
    out.config.global_note_position = from_last
        .or(from_first)
        .or(doc.config.global_note_position);
    for s in &mut out.slides {
        s.note_position = None;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
