//! Core data types for the circle layout.
//!
//! This module defines the parent and child circle records, the diameter pattern
//! toggle, and [`Layout`], the single owned store that the interaction session
//! mutates and the checker and projector read.

use crate::catalog::CatalogRecord;
use crate::constants::DEFAULT_CANVAS_SIZE;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Discriminator of a catalog row: which role the circle may play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleKind {
    /// The reference boundary circle
    #[serde(alias = "parent-candidate", alias = "親円")]
    Parent,
    /// A placeable marker circle
    #[serde(alias = "child-candidate", alias = "子円")]
    Child,
}

impl CircleKind {
    /// Human-readable name of the kind.
    pub fn label(self) -> &'static str {
        match self {
            CircleKind::Parent => "Parent",
            CircleKind::Child => "Child",
        }
    }
}

/// Identity triple of a catalog row, used as the external key for note persistence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircleIdentity {
    /// Category (parent or child candidate)
    pub kind: CircleKind,
    /// Type label, e.g. a product family
    pub type_label: String,
    /// Display name of the entry
    pub name: String,
}

impl fmt::Display for CircleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} / {}", self.kind.label(), self.type_label, self.name)
    }
}

/// Which of a child's two diameters is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pattern {
    /// The maximum outer diameter
    #[default]
    MaxOuter,
    /// The shaft diameter
    Shaft,
}

impl Pattern {
    /// Both patterns, in menu order.
    pub const ALL: [Pattern; 2] = [Pattern::MaxOuter, Pattern::Shaft];

    /// Returns the other pattern.
    pub fn toggled(self) -> Self {
        match self {
            Pattern::MaxOuter => Pattern::Shaft,
            Pattern::Shaft => Pattern::MaxOuter,
        }
    }

    /// Label shown in menus, lists and the toggle feedback.
    pub fn label(self) -> &'static str {
        match self {
            Pattern::MaxOuter => "Max outer diameter",
            Pattern::Shaft => "Shaft diameter",
        }
    }
}

/// The reference boundary circle. It has a single size and no pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentCircle {
    /// Catalog identity of the parent
    pub identity: CircleIdentity,
    /// Diameter in millimetres
    pub max_outer_diameter: f32,
}

impl ParentCircle {
    /// Builds a parent circle from its catalog row.
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            identity: record.identity(),
            max_outer_diameter: record.max_outer_diameter,
        }
    }
}

/// Violation flags derived by the constraint checker. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConstraintFlags {
    /// The child intersects at least one other child
    pub has_circle_overlap: bool,
    /// The child is not fully contained in the parent
    pub is_outside_parent: bool,
}

impl ConstraintFlags {
    /// Either violation holds.
    pub fn is_overlapping(&self) -> bool {
        self.has_circle_overlap || self.is_outside_parent
    }
}

/// A placeable marker circle instantiated from a catalog row.
///
/// The two diameters are fixed at construction and the active size is always
/// derived from the current [`Pattern`], so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildCircle {
    /// Catalog identity of this child
    pub identity: CircleIdentity,
    max_outer_diameter: f32,
    shaft_diameter: f32,
    pattern: Pattern,
    /// Center position in canvas-local pixels
    pub position: Point,
    /// Free-text note, persisted externally
    pub note: String,
    #[serde(skip)]
    pub(crate) flags: ConstraintFlags,
}

impl ChildCircle {
    /// Creates a child circle with fixed diameters, placed at `position`.
    pub fn new(
        identity: CircleIdentity,
        max_outer_diameter: f32,
        shaft_diameter: f32,
        pattern: Pattern,
        position: Point,
    ) -> Self {
        Self {
            identity,
            max_outer_diameter,
            shaft_diameter,
            pattern,
            position,
            note: String::new(),
            flags: ConstraintFlags::default(),
        }
    }

    /// Maximum outer diameter in millimetres.
    pub fn max_outer_diameter(&self) -> f32 {
        self.max_outer_diameter
    }

    /// Shaft diameter in millimetres.
    pub fn shaft_diameter(&self) -> f32 {
        self.shaft_diameter
    }

    /// Currently active pattern.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Diameter selected by the current pattern, in millimetres.
    pub fn active_size(&self) -> f32 {
        match self.pattern {
            Pattern::MaxOuter => self.max_outer_diameter,
            Pattern::Shaft => self.shaft_diameter,
        }
    }

    /// Flips the active pattern and returns the new one.
    pub fn toggle_pattern(&mut self) -> Pattern {
        self.pattern = self.pattern.toggled();
        self.pattern
    }

    /// Flags from the most recent constraint check.
    pub fn flags(&self) -> ConstraintFlags {
        self.flags
    }
}

/// Reasons a child circle could not be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddChildError {
    /// The parent, child record or pattern has not been chosen
    #[error("selection is incomplete")]
    SelectionIncomplete,
    /// The chosen record has no shaft diameter, so it cannot be toggled
    #[error("catalog row has no shaft diameter")]
    MissingShaftDiameter,
}

/// The parent circle plus the ordered list of child circles.
///
/// List order is z-order: later children are drawn on top and win hit-tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    parent: Option<ParentCircle>,
    children: Vec<ChildCircle>,
    #[serde(skip)]
    canvas_size: (f32, f32),
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl Layout {
    /// Creates an empty layout for a canvas of the given pixel size.
    pub fn new(canvas_size: (f32, f32)) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            canvas_size,
        }
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (f32, f32) {
        self.canvas_size
    }

    /// Updates the canvas size. Returns `true` if it changed.
    pub fn set_canvas_size(&mut self, canvas_size: (f32, f32)) -> bool {
        if self.canvas_size == canvas_size {
            return false;
        }
        self.canvas_size = canvas_size;
        true
    }

    /// Center of the canvas, where the parent circle sits.
    pub fn canvas_center(&self) -> Point {
        Point::new(self.canvas_size.0 / 2.0, self.canvas_size.1 / 2.0)
    }

    /// The current parent circle, if one is set.
    pub fn parent(&self) -> Option<&ParentCircle> {
        self.parent.as_ref()
    }

    /// All child circles in list order.
    pub fn children(&self) -> &[ChildCircle] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ChildCircle] {
        &mut self.children
    }

    /// The child at `index`, if it exists.
    pub fn child(&self, index: usize) -> Option<&ChildCircle> {
        self.children.get(index)
    }

    /// Replaces the parent circle, or clears it when `record` is `None`.
    pub fn set_parent(&mut self, record: Option<&CatalogRecord>) {
        self.parent = record.map(ParentCircle::from_record);
    }

    /// Appends a child built from `record` with the requested `pattern`,
    /// positioned at the canvas center.
    ///
    /// # Returns
    ///
    /// The index of the new child, or an error if the record or pattern is missing.
    pub fn add_child(
        &mut self,
        record: Option<&CatalogRecord>,
        pattern: Option<Pattern>,
    ) -> Result<usize, AddChildError> {
        let (record, pattern) = match (record, pattern) {
            (Some(record), Some(pattern)) => (record, pattern),
            _ => return Err(AddChildError::SelectionIncomplete),
        };
        let shaft_diameter = record
            .shaft_diameter
            .ok_or(AddChildError::MissingShaftDiameter)?;

        let mut child = ChildCircle::new(
            record.identity(),
            record.max_outer_diameter,
            shaft_diameter,
            pattern,
            self.canvas_center(),
        );
        child.note = record.note.clone().unwrap_or_default();
        self.children.push(child);
        Ok(self.children.len() - 1)
    }

    /// Removes the child at `index`. Out-of-range indices are a no-op.
    pub fn remove_child(&mut self, index: usize) -> Option<ChildCircle> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    /// Moves the child at `index`. Returns `false` if there is no such child.
    pub fn set_position(&mut self, index: usize, position: Point) -> bool {
        match self.children.get_mut(index) {
            Some(child) => {
                child.position = position;
                true
            }
            None => false,
        }
    }

    /// Flips the pattern of the child at `index` and returns the new pattern.
    pub fn toggle_pattern(&mut self, index: usize) -> Option<Pattern> {
        self.children.get_mut(index).map(ChildCircle::toggle_pattern)
    }

    /// Overwrites the note of the child at `index`. Does not persist it.
    pub fn set_note(&mut self, index: usize, text: &str) -> bool {
        match self.children.get_mut(index) {
            Some(child) => {
                child.note = text.to_string();
                true
            }
            None => false,
        }
    }
}
