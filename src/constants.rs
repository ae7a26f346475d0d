//! Shared application-wide constants.
//! Centralizes tweakable values used by the checker, hit-testing and rendering.

// Geometry
/// Conversion from catalog millimetres to canvas pixels. Used on both sides of every
/// distance comparison as well as for drawing.
pub const SCALE: f32 = 200.0;

/// Canvas size (in pixels) assumed before the first frame reports the real one.
pub const DEFAULT_CANVAS_SIZE: (f32, f32) = (800.0, 600.0);

// Feedback
/// How long the pattern label stays visible after a double-click toggle.
pub const FEEDBACK_DURATION_SECS: f64 = 1.0;
/// Vertical offset of the pattern label above the circle center (in pixels).
pub const FEEDBACK_OFFSET_Y: f32 = 20.0;

// Drawing
/// Stroke width for the parent outline and child borders (in pixels).
pub const OUTLINE_STROKE_WIDTH: f32 = 1.0;
/// Gap between a child's top edge and its name label (in pixels).
pub const LABEL_GAP: f32 = 5.0;
/// Font size for circle labels.
pub const LABEL_FONT_SIZE: f32 = 12.0;
/// Font size for the transient pattern label.
pub const FEEDBACK_FONT_SIZE: f32 = 14.0;

// Export
/// Margin added around the canvas when exporting.
pub const EXPORT_MARGIN: f32 = 10.0;
/// Raster scale used for PNG export.
pub const PNG_EXPORT_SCALE: f32 = 2.0;
