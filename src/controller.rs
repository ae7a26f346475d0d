//! Interaction controller: turns pointer events and list commands into layout
//! mutations.
//!
//! [`Session`] owns the [`Layout`] exclusively. Every mutating entry point finishes
//! with a full [`recheck`] so that flags are never stale when the caller renders.
//! Entry points return whether anything changed, which the front-end uses to
//! request a repaint.

use crate::catalog::{CatalogRecord, NoteUpdate};
use crate::checker::recheck;
use crate::constants::FEEDBACK_DURATION_SECS;
use crate::geometry::{radius_px, within_radius, Point};
use crate::types::{AddChildError, CircleIdentity, Layout, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Pointer interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No child is being moved
    #[default]
    Idle,
    /// The child at this index follows the pointer
    Dragging(usize),
}

/// A short-lived label naming the pattern a child was just switched to.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackLabel {
    /// Where the toggled child was when the label was emitted
    pub position: Point,
    /// Newly active pattern
    pub pattern: Pattern,
    /// Input-clock time (seconds) after which the label disappears
    pub expires_at: f64,
}

/// A note write the front-end should hand to the note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSaveRequest {
    /// Correlates the eventual outcome with this request
    pub ticket: Uuid,
    /// The row key and note text to store
    pub update: NoteUpdate,
}

/// Result of a note write, delivered back to the session whenever it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSaveOutcome {
    /// Ticket of the originating request
    pub ticket: Uuid,
    /// `Err` carries a user-facing message
    pub result: Result<(), String>,
}

/// State of the save-confirmation indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSaveStatus {
    /// The write has been dispatched but has not answered yet
    Pending,
    /// The write succeeded
    Saved,
    /// The write failed with the given message
    Failed(String),
}

/// The most recent note save, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSaveNotice {
    /// Which row the note belongs to
    pub identity: CircleIdentity,
    /// Current status of that save
    pub status: NoteSaveStatus,
}

/// One editing session over a single layout.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    layout: Layout,
    #[serde(skip)]
    drag: DragState,
    #[serde(skip)]
    feedback: Vec<FeedbackLabel>,
    #[serde(skip)]
    pending_notes: HashMap<Uuid, CircleIdentity>,
    #[serde(skip)]
    note_notice: Option<(Uuid, NoteSaveNotice)>,
}

impl Session {
    /// Creates a session over an empty layout for a canvas of the given size.
    pub fn new(canvas_size: (f32, f32)) -> Self {
        Self {
            layout: Layout::new(canvas_size),
            ..Default::default()
        }
    }

    /// The layout, including the flags from the last check.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current pointer interaction state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Live pattern labels.
    pub fn feedback(&self) -> &[FeedbackLabel] {
        &self.feedback
    }

    /// Status of the most recent note save, if any.
    pub fn note_notice(&self) -> Option<&NoteSaveNotice> {
        self.note_notice.as_ref().map(|(_, notice)| notice)
    }

    /// Re-derives every flag from the current layout.
    pub fn recheck(&mut self) {
        recheck(&mut self.layout);
    }

    /// Records the current canvas size. A change moves the parent center, so flags
    /// are recomputed.
    pub fn set_canvas_size(&mut self, canvas_size: (f32, f32)) -> bool {
        let changed = self.layout.set_canvas_size(canvas_size);
        if changed {
            self.recheck();
        }
        changed
    }

    /// Index of the topmost child whose circle contains `point`.
    ///
    /// The scan runs over the whole list and the last match wins.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        let mut hit = None;
        for (index, child) in self.layout.children().iter().enumerate() {
            if within_radius(child.position, point, radius_px(child.active_size())) {
                hit = Some(index);
            }
        }
        hit
    }

    /// Pointer pressed at `point`. Starts dragging the topmost child under it.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        match self.hit_test(point) {
            Some(index) => {
                log::debug!("Start dragging child {index}");
                self.drag = DragState::Dragging(index);
                true
            }
            None => false,
        }
    }

    /// Pointer moved to `point`. Moves the dragged child, if any.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let DragState::Dragging(index) = self.drag else {
            return false;
        };
        if !self.layout.set_position(index, point) {
            self.drag = DragState::Idle;
            return false;
        }
        self.recheck();
        true
    }

    /// Pointer released. Always returns to idle.
    pub fn pointer_up(&mut self) {
        if let DragState::Dragging(index) = self.drag {
            log::debug!("Stop dragging child {index}");
        }
        self.drag = DragState::Idle;
    }

    /// Pointer left the canvas. Ends any drag, like a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Double-click at `point`: toggles the pattern of every child whose circle
    /// contains it, not only the topmost one.
    ///
    /// # Returns
    ///
    /// Indices of the toggled children.
    pub fn double_click(&mut self, point: Point, now: f64) -> Vec<usize> {
        let hits: Vec<usize> = self
            .layout
            .children()
            .iter()
            .enumerate()
            .filter(|(_, child)| {
                within_radius(child.position, point, radius_px(child.active_size()))
            })
            .map(|(index, _)| index)
            .collect();

        for &index in &hits {
            if let Some(pattern) = self.layout.toggle_pattern(index) {
                let position = self.layout.children()[index].position;
                log::debug!("Child {index} switched to {}", pattern.label());
                self.feedback.push(FeedbackLabel {
                    position,
                    pattern,
                    expires_at: now + FEEDBACK_DURATION_SECS,
                });
            }
        }
        if !hits.is_empty() {
            self.recheck();
        }
        hits
    }

    /// Drops expired pattern labels. Returns `true` while any label is still live.
    pub fn prune_feedback(&mut self, now: f64) -> bool {
        self.feedback.retain(|label| label.expires_at > now);
        !self.feedback.is_empty()
    }

    /// Replaces or clears the parent circle.
    pub fn set_parent(&mut self, record: Option<&CatalogRecord>) {
        self.layout.set_parent(record);
        self.recheck();
    }

    /// Add-circle command: appends a child from the selected row and pattern.
    ///
    /// Rejected without any state change when no parent is set or the child
    /// selection is incomplete.
    pub fn add_circle(
        &mut self,
        record: Option<&CatalogRecord>,
        pattern: Option<Pattern>,
    ) -> Result<usize, AddChildError> {
        if self.layout.parent().is_none() {
            return Err(AddChildError::SelectionIncomplete);
        }
        let index = self.layout.add_child(record, pattern)?;
        self.recheck();
        Ok(index)
    }

    /// Remove command. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.layout.remove_child(index).is_none() {
            return false;
        }
        // Indices shift after removal, so an ongoing drag cannot keep its target.
        self.drag = DragState::Idle;
        self.recheck();
        true
    }

    /// Save-note command: stores `text` on the child and returns the write the
    /// front-end must dispatch. Geometry is not affected.
    pub fn save_note(&mut self, index: usize, text: &str) -> Option<NoteSaveRequest> {
        if !self.layout.set_note(index, text) {
            return None;
        }
        let identity = self.layout.children()[index].identity.clone();
        let ticket = Uuid::new_v4();
        self.pending_notes.insert(ticket, identity.clone());
        self.note_notice = Some((
            ticket,
            NoteSaveNotice {
                identity: identity.clone(),
                status: NoteSaveStatus::Pending,
            },
        ));
        Some(NoteSaveRequest {
            ticket,
            update: NoteUpdate {
                identity,
                note: text.to_string(),
            },
        })
    }

    /// Applies a finished note write to the save indicator. Outcomes may arrive
    /// after any number of further edits; they never touch the layout.
    pub fn apply_note_outcome(&mut self, outcome: NoteSaveOutcome) {
        let Some(identity) = self.pending_notes.remove(&outcome.ticket) else {
            log::debug!("Ignoring outcome for unknown note ticket {}", outcome.ticket);
            return;
        };
        let status = match outcome.result {
            Ok(()) => NoteSaveStatus::Saved,
            Err(message) => {
                log::warn!("Saving note for {identity} failed: {message}");
                NoteSaveStatus::Failed(message)
            }
        };
        // An older save finishing late must not hide the status of a newer pending one.
        if let Some((latest, _)) = &self.note_notice {
            if *latest != outcome.ticket && self.pending_notes.contains_key(latest) {
                return;
            }
        }
        self.note_notice = Some((outcome.ticket, NoteSaveNotice { identity, status }));
    }
}
