//! Render/status projector.
//!
//! Reads a [`Session`] and produces plain data: a [`Frame`] of shapes to paint, an
//! aggregate [`Status`], and a display list for the circle list. Nothing here
//! mutates the layout; the same frame feeds both the canvas painter and the exporter.

use crate::constants::FEEDBACK_OFFSET_Y;
use crate::controller::Session;
use crate::geometry::{radius_px, Point};
use crate::types::{ChildCircle, CircleIdentity, Layout, Pattern};
use eframe::egui::Color32;

/// Which violation, if any, decides a child's fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleState {
    /// No violation
    Normal,
    /// Overlaps another child but is inside the parent
    CircleOverlap,
    /// Extends outside the parent; wins over an overlap
    OutsideParent,
}

impl CircleState {
    /// Picks the state for `child`, outside-parent first.
    pub fn of(child: &ChildCircle) -> Self {
        let flags = child.flags();
        if flags.is_outside_parent {
            CircleState::OutsideParent
        } else if flags.has_circle_overlap {
            CircleState::CircleOverlap
        } else {
            CircleState::Normal
        }
    }
}

/// Fill colors for one pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill without violations
    pub normal: Color32,
    /// Fill when overlapping another child
    pub circle_overlap: Color32,
    /// Fill when outside the parent
    pub outside_parent: Color32,
}

impl Palette {
    /// Palette for `pattern`. Each pattern has its own set so a violation is
    /// distinguishable from a normal circle of either pattern.
    pub fn for_pattern(pattern: Pattern) -> Self {
        match pattern {
            Pattern::MaxOuter => Self {
                normal: Color32::from_rgba_unmultiplied(0, 64, 255, 128),
                circle_overlap: Color32::from_rgba_unmultiplied(255, 128, 0, 128),
                outside_parent: Color32::from_rgba_unmultiplied(255, 0, 0, 128),
            },
            Pattern::Shaft => Self {
                normal: Color32::from_rgba_unmultiplied(128, 192, 255, 128),
                circle_overlap: Color32::from_rgba_unmultiplied(255, 192, 128, 128),
                outside_parent: Color32::from_rgba_unmultiplied(255, 128, 128, 128),
            },
        }
    }

    /// Fill for `state`.
    pub fn fill(&self, state: CircleState) -> Color32 {
        match state {
            CircleState::Normal => self.normal,
            CircleState::CircleOverlap => self.circle_overlap,
            CircleState::OutsideParent => self.outside_parent,
        }
    }
}

/// The parent boundary, drawn unfilled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentShape {
    /// Canvas center
    pub center: Point,
    /// Radius in pixels
    pub radius: f32,
}

/// A filled child disk with its caption.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildShape {
    /// Position of the child in the list
    pub index: usize,
    /// Center in canvas-local pixels
    pub center: Point,
    /// Active radius in pixels
    pub radius: f32,
    /// Fill chosen from the pattern palette and violation state
    pub fill: Color32,
    /// Caption drawn above the disk
    pub label: String,
}

/// A transient pattern label.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackText {
    /// Anchor point (bottom center of the text)
    pub anchor: Point,
    /// Text to draw
    pub text: &'static str,
}

/// Everything the canvas shows for one layout state.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Canvas size in pixels
    pub canvas_size: (f32, f32),
    /// Parent outline, if a parent is set
    pub parent: Option<ParentShape>,
    /// Children in list (z) order
    pub children: Vec<ChildShape>,
    /// Live pattern labels
    pub feedback: Vec<FeedbackText>,
}

/// Aggregate placement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No children are placed
    Empty,
    /// Every child is placed without violations
    Success,
    /// At least one violation holds
    Error {
        /// Some children overlap each other
        has_overlap: bool,
        /// Some child extends outside the parent
        has_outside: bool,
    },
}

impl Status {
    /// Computes the status of `layout` from its current flags.
    pub fn of(layout: &Layout) -> Self {
        let children = layout.children();
        let has_overlap = children.iter().any(|c| c.flags().has_circle_overlap);
        let has_outside = children.iter().any(|c| c.flags().is_outside_parent);

        if has_overlap || has_outside {
            Status::Error {
                has_overlap,
                has_outside,
            }
        } else if !children.is_empty() {
            Status::Success
        } else {
            Status::Empty
        }
    }

    /// User-facing lines describing the status.
    pub fn messages(&self) -> Vec<&'static str> {
        match *self {
            Status::Empty => Vec::new(),
            Status::Success => vec!["All circles are placed correctly."],
            Status::Error {
                has_overlap,
                has_outside,
            } => {
                let mut lines = Vec::new();
                if has_overlap {
                    lines.push("⚠ Child circles overlap each other.");
                }
                if has_outside {
                    lines.push("⚠ A circle extends outside the parent circle.");
                }
                lines
            }
        }
    }
}

/// Violation label for the outside-parent condition.
pub const OUTSIDE_LABEL: &str = "outside parent";
/// Violation label for the overlap condition.
pub const OVERLAP_LABEL: &str = "overlap";

/// One row of the circle list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    /// Position in the child list; valid until the next removal
    pub index: usize,
    /// Catalog identity
    pub identity: CircleIdentity,
    /// Active diameter in millimetres
    pub active_size: f32,
    /// Label of the active pattern
    pub pattern_label: &'static str,
    /// Labels of the violations that hold
    pub violations: Vec<&'static str>,
    /// Current note text
    pub note: String,
}

impl ListEntry {
    /// Returns `true` if any violation holds.
    pub fn is_overlapping(&self) -> bool {
        !self.violations.is_empty()
    }
}

/// Caption shown above a child: its name and active size.
pub fn child_caption(child: &ChildCircle) -> String {
    format!("{} ({}mm)", child.identity.name, child.active_size())
}

/// Builds the frame for the session's current state.
pub fn project_frame(session: &Session) -> Frame {
    let layout = session.layout();

    let parent = layout.parent().map(|parent| ParentShape {
        center: layout.canvas_center(),
        radius: radius_px(parent.max_outer_diameter),
    });

    let children = layout
        .children()
        .iter()
        .enumerate()
        .map(|(index, child)| ChildShape {
            index,
            center: child.position,
            radius: radius_px(child.active_size()),
            fill: Palette::for_pattern(child.pattern()).fill(CircleState::of(child)),
            label: child_caption(child),
        })
        .collect();

    let feedback = session
        .feedback()
        .iter()
        .map(|label| FeedbackText {
            anchor: Point::new(label.position.x, label.position.y - FEEDBACK_OFFSET_Y),
            text: label.pattern.label(),
        })
        .collect();

    Frame {
        canvas_size: layout.canvas_size(),
        parent,
        children,
        feedback,
    }
}

/// Builds the circle list rows.
pub fn display_list(layout: &Layout) -> Vec<ListEntry> {
    layout
        .children()
        .iter()
        .enumerate()
        .map(|(index, child)| {
            let flags = child.flags();
            let mut violations = Vec::new();
            if flags.is_outside_parent {
                violations.push(OUTSIDE_LABEL);
            }
            if flags.has_circle_overlap {
                violations.push(OVERLAP_LABEL);
            }
            ListEntry {
                index,
                identity: child.identity.clone(),
                active_size: child.active_size(),
                pattern_label: child.pattern().label(),
                violations,
                note: child.note.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;
    use crate::types::CircleKind;

    fn child(name: &str) -> CatalogRecord {
        CatalogRecord {
            kind: CircleKind::Child,
            type_label: "Pin".into(),
            name: name.into(),
            max_outer_diameter: 1.0,
            shaft_diameter: Some(0.5),
            note: None,
        }
    }

    fn parent(diameter: f32) -> CatalogRecord {
        CatalogRecord {
            kind: CircleKind::Parent,
            type_label: "Board".into(),
            name: "P".into(),
            max_outer_diameter: diameter,
            shaft_diameter: None,
            note: None,
        }
    }

    #[test]
    fn test_status_empty_without_children() {
        let mut session = Session::new((800.0, 600.0));
        assert_eq!(Status::of(session.layout()), Status::Empty);
        assert!(Status::Empty.messages().is_empty());

        session.set_parent(Some(&parent(4.0)));
        assert_eq!(Status::of(session.layout()), Status::Empty);
    }

    #[test]
    fn test_status_success_and_error() {
        let mut session = Session::new((800.0, 600.0));
        session.set_parent(Some(&parent(4.0)));
        session.add_circle(Some(&child("A")), Some(Pattern::MaxOuter)).unwrap();
        assert_eq!(Status::of(session.layout()), Status::Success);

        session.add_circle(Some(&child("B")), Some(Pattern::MaxOuter)).unwrap();
        assert_eq!(
            Status::of(session.layout()),
            Status::Error {
                has_overlap: true,
                has_outside: false
            }
        );
        assert_eq!(Status::of(session.layout()).messages().len(), 1);
    }

    #[test]
    fn test_status_lists_both_conditions() {
        let status = Status::Error {
            has_overlap: true,
            has_outside: true,
        };
        assert_eq!(status.messages().len(), 2);
    }

    #[test]
    fn test_fill_priority_outside_over_overlap() {
        let mut session = Session::new((800.0, 600.0));
        session.set_parent(Some(&parent(0.5)));
        session.add_circle(Some(&child("A")), Some(Pattern::MaxOuter)).unwrap();
        session.add_circle(Some(&child("B")), Some(Pattern::MaxOuter)).unwrap();

        let frame = project_frame(&session);
        let palette = Palette::for_pattern(Pattern::MaxOuter);
        assert_eq!(frame.children.len(), 2);
        assert!(frame.children.iter().all(|c| c.fill == palette.outside_parent));
    }

    #[test]
    fn test_palettes_differ_per_pattern() {
        let a = Palette::for_pattern(Pattern::MaxOuter);
        let b = Palette::for_pattern(Pattern::Shaft);
        for state in [
            CircleState::Normal,
            CircleState::CircleOverlap,
            CircleState::OutsideParent,
        ] {
            assert_ne!(a.fill(state), b.fill(state));
        }
        assert_ne!(a.normal, a.circle_overlap);
        assert_ne!(a.circle_overlap, a.outside_parent);
    }

    #[test]
    fn test_frame_geometry() {
        let mut session = Session::new((800.0, 600.0));
        session.set_parent(Some(&parent(3.0)));
        session.add_circle(Some(&child("A")), Some(Pattern::Shaft)).unwrap();

        let frame = project_frame(&session);
        let parent = frame.parent.unwrap();
        assert_eq!(parent.center, Point::new(400.0, 300.0));
        assert_eq!(parent.radius, radius_px(3.0));

        let shape = &frame.children[0];
        assert_eq!(shape.radius, radius_px(0.5));
        assert_eq!(shape.label, "A (0.5mm)");
        assert_eq!(shape.fill, Palette::for_pattern(Pattern::Shaft).normal);
    }

    #[test]
    fn test_frame_carries_feedback() {
        let mut session = Session::new((800.0, 600.0));
        session.set_parent(Some(&parent(3.0)));
        session.add_circle(Some(&child("A")), Some(Pattern::MaxOuter)).unwrap();
        session.double_click(Point::new(400.0, 300.0), 0.0);

        let frame = project_frame(&session);
        assert_eq!(frame.feedback.len(), 1);
        assert_eq!(frame.feedback[0].text, Pattern::Shaft.label());
        assert_eq!(frame.feedback[0].anchor, Point::new(400.0, 300.0 - FEEDBACK_OFFSET_Y));
    }

    #[test]
    fn test_display_list_rows() {
        let mut session = Session::new((800.0, 600.0));
        session.set_parent(Some(&parent(0.5)));
        session.add_circle(Some(&child("A")), Some(Pattern::MaxOuter)).unwrap();
        session.add_circle(Some(&child("B")), Some(Pattern::Shaft)).unwrap();
        session.save_note(1, "tight fit");

        let rows = display_list(session.layout());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].violations, [OUTSIDE_LABEL, OVERLAP_LABEL]);
        assert!(rows[0].is_overlapping());
        assert_eq!(rows[1].pattern_label, Pattern::Shaft.label());
        assert_eq!(rows[1].active_size, 0.5);
        assert_eq!(rows[1].note, "tight fit");
    }
}
