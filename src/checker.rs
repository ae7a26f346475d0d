//! Constraint checker for child circle placement.
//!
//! [`recheck`] re-derives the overlap and containment flags of every child from the
//! current positions and active sizes. It never patches flags incrementally, so a
//! single call after any mutation leaves every flag consistent with the layout.
//! The pairwise scan is quadratic in the number of children, which stays small
//! because children are placed by hand.

use crate::constants::SCALE;
use crate::geometry::{distance, Point};
use crate::types::{ConstraintFlags, Layout};

/// Returns `true` if two child circles intersect.
///
/// Sizes are diameters in millimetres. Circles that are exactly tangent do not overlap.
pub fn circles_overlap(a: Point, a_size: f32, b: Point, b_size: f32) -> bool {
    distance(a, b) < (a_size + b_size) * SCALE / 2.0
}

/// Returns `true` if a child of diameter `child_size` at `position` is not contained in
/// a parent of diameter `parent_size` centered at `center`.
///
/// Containment is approximated by comparing the center distance against the parent
/// radius shrunk by the child radius.
pub fn is_outside_parent(center: Point, parent_size: f32, position: Point, child_size: f32) -> bool {
    let max_distance = parent_size * SCALE / 2.0 - child_size * SCALE / 2.0;
    distance(center, position) > max_distance
}

/// Recomputes the flags of every child in `layout`.
///
/// Overlap between children is checked whether or not a parent is set; without a
/// parent no child is considered outside.
pub fn recheck(layout: &mut Layout) {
    let center = layout.canvas_center();
    let parent_size = layout.parent().map(|parent| parent.max_outer_diameter);
    let placements: Vec<(Point, f32)> = layout
        .children()
        .iter()
        .map(|child| (child.position, child.active_size()))
        .collect();

    for (i, child) in layout.children_mut().iter_mut().enumerate() {
        let (position, size) = placements[i];

        let has_circle_overlap = placements
            .iter()
            .enumerate()
            .any(|(j, &(other, other_size))| j != i && circles_overlap(position, size, other, other_size));

        let is_outside_parent = parent_size
            .is_some_and(|parent_size| is_outside_parent(center, parent_size, position, size));

        child.flags = ConstraintFlags {
            has_circle_overlap,
            is_outside_parent,
        };
    }
}
