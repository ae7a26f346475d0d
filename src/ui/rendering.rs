//! Canvas rendering of a projected [`Frame`].
//!
//! Layers are drawn back to front: parent outline, child disks in list order,
//! then captions and transient pattern labels on top.

use super::state::CircleFitApp;
use crate::constants::{
    FEEDBACK_FONT_SIZE, LABEL_FONT_SIZE, LABEL_GAP, OUTLINE_STROKE_WIDTH,
};
use crate::projector::Frame;
use eframe::egui;

impl CircleFitApp {
    /// Paints `frame` onto the canvas.
    pub fn paint_frame(&self, painter: &egui::Painter, frame: &Frame) {
        let outline = if self.dark_mode {
            egui::Color32::from_gray(220)
        } else {
            egui::Color32::BLACK
        };
        let stroke = egui::Stroke::new(OUTLINE_STROKE_WIDTH, outline);

        if let Some(parent) = &frame.parent {
            painter.circle_stroke(self.canvas_to_screen(parent.center), parent.radius, stroke);
        }

        for child in &frame.children {
            let center = self.canvas_to_screen(child.center);
            painter.circle(center, child.radius, child.fill, stroke);
        }

        // Captions go after all disks so later circles cannot hide them
        for child in &frame.children {
            let center = self.canvas_to_screen(child.center);
            painter.text(
                egui::pos2(center.x, center.y - child.radius - LABEL_GAP),
                egui::Align2::CENTER_BOTTOM,
                &child.label,
                egui::FontId::proportional(LABEL_FONT_SIZE),
                outline,
            );
        }

        let feedback_color = if self.dark_mode {
            egui::Color32::from_white_alpha(220)
        } else {
            egui::Color32::from_black_alpha(180)
        };
        for label in &frame.feedback {
            painter.text(
                self.canvas_to_screen(label.anchor),
                egui::Align2::CENTER_BOTTOM,
                label.text,
                egui::FontId::proportional(FEEDBACK_FONT_SIZE),
                feedback_color,
            );
        }
    }
}
