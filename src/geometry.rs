//! Distance and containment math shared by the constraint checker and hit-testing.
//!
//! All points live in canvas-local pixel space: the origin is the top-left corner
//! of the canvas, x grows rightward and y grows downward.

use crate::constants::SCALE;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// A point in canvas-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate in pixels
    pub x: f32,
    /// Vertical coordinate in pixels
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl From<Point> for egui::Pos2 {
    fn from(point: Point) -> Self {
        egui::pos2(point.x, point.y)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Returns `true` if `point` lies inside or on the circle of `radius` around `center`.
pub fn within_radius(center: Point, point: Point, radius: f32) -> bool {
    distance(center, point) <= radius
}

/// On-canvas radius (in pixels) of a circle with the given diameter in millimetres.
pub fn radius_px(diameter_mm: f32) -> f32 {
    diameter_mm * SCALE / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_pythagorean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance(b, a), 5.0);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Point::new(12.5, -7.0);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_within_radius_boundary_is_inclusive() {
        let center = Point::new(10.0, 10.0);
        assert!(within_radius(center, Point::new(15.0, 10.0), 5.0));
        assert!(within_radius(center, Point::new(12.0, 11.0), 5.0));
        assert!(!within_radius(center, Point::new(15.5, 10.0), 5.0));
    }

    #[test]
    fn test_radius_px_uses_scale() {
        assert_eq!(radius_px(2.0), SCALE);
        assert_eq!(radius_px(0.0), 0.0);
    }

    #[test]
    fn test_pos2_conversion() {
        let p: Point = egui::pos2(4.0, 9.0).into();
        assert_eq!(p, Point::new(4.0, 9.0));
        let back: egui::Pos2 = p.into();
        assert_eq!(back, egui::pos2(4.0, 9.0));
    }
}
