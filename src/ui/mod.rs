//! User interface for the circle layout checker.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main CircleFitApp
//! - `canvas` - Pointer handling on the canvas, translated into session events
//! - `rendering` - Painting a projected frame with egui
//! - `panels` - Toolbar, selection menus, status block and circle list
//! - `file_ops` - Catalog loading and note saving on background tasks
//! - `export` - SVG/PNG export of the current frame

mod canvas;
pub mod export;
mod file_ops;
mod panels;
mod rendering;
mod state;

pub use state::CircleFitApp;

use crate::LaunchOptions;
use eframe::egui;

impl CircleFitApp {
    /// Creates the app, restoring persisted state and starting the initial catalog load.
    ///
    /// A catalog path given on the command line wins over the remembered one.
    pub fn new(cc: &eframe::CreationContext<'_>, launch: LaunchOptions) -> Self {
        let mut app = cc
            .storage
            .and_then(|storage| storage.get_string("app_state"))
            .and_then(|json| match Self::from_json(&json) {
                Ok(app) => Some(app),
                Err(err) => {
                    log::warn!("Discarding unreadable saved state: {err}");
                    None
                }
            })
            .unwrap_or_default();

        if launch.light_mode {
            app.dark_mode = false;
        }
        if let Some(path) = launch.catalog.or_else(|| app.catalog.path.clone()) {
            app.load_catalog(path, &cc.egui_ctx);
        }
        app
    }
}

impl eframe::App for CircleFitApp {
    /// Persist the layout and preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("Failed to serialize app state: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        // Apply finished background work before drawing anything
        self.handle_pending_io();

        // Expire pattern labels; keep repainting while any is visible
        let now = ctx.input(|i| i.time);
        if self.session.prune_feedback(now) {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let max_allowed = (viewport_width * 0.9).max(220.0);
        let clamped_width = self.side_panel_width.clamp(220.0, max_allowed);

        egui::SidePanel::right("side_panel")
            .resizable(true)
            .default_width(clamped_width)
            .show(ctx, |ui| {
                self.side_panel_width = ui.available_width().clamp(220.0, max_allowed);
                self.draw_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

#[cfg(test)]
mod tests;
