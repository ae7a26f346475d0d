//! Canvas interaction.
//!
//! Translates egui pointer input into the session's pointer events. Every
//! position is converted to canvas-local space (screen position minus the canvas
//! rect's top-left corner) before it reaches the session.

use super::state::CircleFitApp;
use crate::controller::DragState;
use crate::geometry::Point;
use crate::projector::project_frame;
use eframe::egui;

impl CircleFitApp {
    /// Converts a screen position to canvas-local coordinates.
    pub fn screen_to_canvas(&self, screen_pos: egui::Pos2) -> Point {
        (screen_pos - self.canvas_rect.min.to_vec2()).into()
    }

    /// Converts canvas-local coordinates to a screen position.
    pub fn canvas_to_screen(&self, point: Point) -> egui::Pos2 {
        egui::Pos2::from(point) + self.canvas_rect.min.to_vec2()
    }

    /// Allocates the canvas, routes pointer input to the session and paints the frame.
    pub(super) fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        self.canvas_rect = response.rect;
        let size = response.rect.size();
        self.session.set_canvas_size((size.x, size.y));

        if self.handle_pointer(ui) {
            ui.ctx().request_repaint();
        }

        let frame = project_frame(&self.session);
        self.paint_frame(&painter, &frame);
    }

    /// Feeds this frame's pointer input to the session.
    ///
    /// Returns `true` if the layout changed and the canvas needs repainting.
    fn handle_pointer(&mut self, ui: &egui::Ui) -> bool {
        let (pressed, down, moved, double_clicked, latest, now) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.button_double_clicked(egui::PointerButton::Primary),
                i.pointer.latest_pos(),
                i.time,
            )
        });
        let on_canvas = latest.filter(|pos| self.canvas_rect.contains(*pos));
        let mut changed = false;

        if double_clicked {
            if let Some(pos) = on_canvas {
                let point = self.screen_to_canvas(pos);
                changed |= !self.session.double_click(point, now).is_empty();
            }
        }

        if pressed {
            if let Some(pos) = on_canvas {
                let point = self.screen_to_canvas(pos);
                self.session.pointer_down(point);
            }
        }

        if let DragState::Dragging(_) = self.session.drag_state() {
            match on_canvas {
                Some(pos) if down && moved && !pressed => {
                    let point = self.screen_to_canvas(pos);
                    changed |= self.session.pointer_move(point);
                }
                // Pointer left the canvas or is gone entirely
                None => self.session.pointer_leave(),
                Some(_) => {}
            }
        }

        if !down {
            self.session.pointer_up();
        }

        changed
    }
}
