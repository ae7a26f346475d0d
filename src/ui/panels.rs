//! Toolbar and side panel: catalog menus, placement status and the circle list.

use super::state::CircleFitApp;
use crate::catalog::CatalogRecord;
use crate::controller::NoteSaveStatus;
use crate::projector::{display_list, Status};
use crate::types::{AddChildError, Pattern};
use eframe::egui;

/// Actions collected while drawing the circle list and applied afterwards.
enum ListAction {
    Remove(usize),
    SaveNote(usize),
}

fn parent_option_text(record: &CatalogRecord) -> String {
    format!(
        "{} - {} ({}mm)",
        record.type_label, record.name, record.max_outer_diameter
    )
}

fn child_option_text(record: &CatalogRecord) -> String {
    match record.shaft_diameter {
        Some(shaft) => format!(
            "{} (max outer: {}mm, shaft: {}mm)",
            record.name, record.max_outer_diameter, shaft
        ),
        None => format!("{} (max outer: {}mm)", record.name, record.max_outer_diameter),
    }
}

impl CircleFitApp {
    /// Draws the top toolbar.
    pub(super) fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open catalog…").clicked() {
                self.open_catalog_dialog(ui.ctx());
            }
            let reload_path = self.catalog.path.clone();
            ui.add_enabled_ui(reload_path.is_some() && !self.catalog.loading, |ui| {
                if ui.button("Reload").clicked() {
                    if let Some(path) = reload_path {
                        self.load_catalog(path, ui.ctx());
                    }
                }
            });

            ui.separator();

            if ui.button("Export SVG").clicked() {
                self.export_svg(ui.ctx());
            }
            if ui.button("Export PNG").clicked() {
                self.export_png(ui.ctx());
            }

            ui.separator();

            let theme_label = if self.dark_mode { "☀ Light" } else { "🌙 Dark" };
            if ui.button(theme_label).clicked() {
                self.dark_mode = !self.dark_mode;
            }
        });
    }

    /// Draws the side panel contents.
    pub(super) fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = &self.message {
            let color = if message.is_error {
                ui.visuals().error_fg_color
            } else {
                ui.visuals().text_color()
            };
            ui.colored_label(color, &message.text);
            ui.separator();
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Circles");
            self.draw_selection_menus(ui);
            ui.separator();
            self.draw_status(ui);
            ui.separator();
            self.draw_circle_list(ui);
        });
    }

    fn draw_selection_menus(&mut self, ui: &mut egui::Ui) {
        if self.catalog.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading catalog…");
            });
        } else if self.catalog.catalog.is_empty() {
            ui.label("No catalog loaded.");
        }

        // Parent menu
        let catalog = &self.catalog.catalog;
        let previous_parent = self.selection.parent;
        let parent_text = self
            .selection
            .parent
            .and_then(|i| catalog.record(i))
            .map(parent_option_text)
            .unwrap_or_else(|| "Select…".to_string());
        egui::ComboBox::from_label("Parent circle")
            .selected_text(parent_text)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut self.selection.parent, None, "Select…");
                for (index, record) in catalog.parents() {
                    ui.selectable_value(
                        &mut self.selection.parent,
                        Some(index),
                        parent_option_text(record),
                    );
                }
            });
        if self.selection.parent != previous_parent {
            let record = self.selection.parent.and_then(|i| catalog.record(i));
            self.session.set_parent(record);
        }

        // Type menu; changing it resets the name choice
        let previous_type = self.selection.child_type.clone();
        egui::ComboBox::from_label("Type")
            .selected_text(self.selection.child_type.as_deref().unwrap_or("Select…"))
            .show_ui(ui, |ui| {
                for type_label in catalog.child_types() {
                    ui.selectable_value(
                        &mut self.selection.child_type,
                        Some(type_label.to_string()),
                        type_label,
                    );
                }
            });
        if self.selection.child_type != previous_type {
            self.selection.child = None;
        }

        // Name menu
        let type_chosen = self.selection.child_type.clone();
        ui.add_enabled_ui(type_chosen.is_some(), |ui| {
            let name_text = self
                .selection
                .child
                .and_then(|i| catalog.record(i))
                .map(child_option_text)
                .unwrap_or_else(|| "Select…".to_string());
            egui::ComboBox::from_label("Name")
                .selected_text(name_text)
                .show_ui(ui, |ui| {
                    if let Some(type_label) = type_chosen.as_deref() {
                        for (index, record) in catalog.children_of_type(type_label) {
                            ui.selectable_value(
                                &mut self.selection.child,
                                Some(index),
                                child_option_text(record),
                            );
                        }
                    }
                });
        });

        // Pattern menu and add button need a child choice
        let child_chosen = self.selection.child.is_some();
        ui.add_enabled_ui(child_chosen, |ui| {
            egui::ComboBox::from_label("Diameter pattern")
                .selected_text(self.selection.pattern.label())
                .show_ui(ui, |ui| {
                    for pattern in Pattern::ALL {
                        ui.selectable_value(&mut self.selection.pattern, pattern, pattern.label());
                    }
                });

            if ui.button("Add circle").clicked() {
                let record = self.selection.child.and_then(|i| catalog.record(i));
                match self.session.add_circle(record, Some(self.selection.pattern)) {
                    Ok(index) => log::info!("Added child circle {index}"),
                    Err(AddChildError::SelectionIncomplete) => {
                        log::debug!("Add circle ignored: selection incomplete");
                    }
                    Err(err) => {
                        self.message = Some(super::state::UiMessage::error(format!(
                            "Cannot add circle: {err}"
                        )));
                    }
                }
            }
        });
    }

    fn draw_status(&mut self, ui: &mut egui::Ui) {
        let status = Status::of(self.session.layout());
        let color = match status {
            Status::Error { .. } => ui.visuals().error_fg_color,
            Status::Success => egui::Color32::from_rgb(60, 170, 90),
            Status::Empty => ui.visuals().text_color(),
        };
        for line in status.messages() {
            ui.colored_label(color, line);
        }

        if let Some(notice) = self.session.note_notice() {
            let (text, color) = match &notice.status {
                NoteSaveStatus::Pending => (
                    format!("Saving note for {}…", notice.identity.name),
                    ui.visuals().weak_text_color(),
                ),
                NoteSaveStatus::Saved => (
                    format!("Note saved for {}.", notice.identity.name),
                    egui::Color32::from_rgb(60, 170, 90),
                ),
                NoteSaveStatus::Failed(reason) => (
                    format!("Failed to save note for {}: {reason}", notice.identity.name),
                    ui.visuals().error_fg_color,
                ),
            };
            ui.colored_label(color, text);
        }
    }

    fn draw_circle_list(&mut self, ui: &mut egui::Ui) {
        self.sync_note_drafts();
        let entries = display_list(self.session.layout());
        let mut action = None;

        for entry in &entries {
            let stroke_color = if entry.is_overlapping() {
                ui.visuals().error_fg_color
            } else {
                ui.visuals().widgets.noninteractive.bg_stroke.color
            };
            egui::Frame::group(ui.style())
                .stroke(egui::Stroke::new(1.0, stroke_color))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(format!(
                            "{} - {} ({}mm)",
                            entry.identity.type_label, entry.identity.name, entry.active_size
                        ));
                        ui.label(egui::RichText::new(entry.pattern_label).small().strong());
                        for violation in &entry.violations {
                            ui.colored_label(ui.visuals().error_fg_color, *violation);
                        }
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Delete").clicked() {
                                action = Some(ListAction::Remove(entry.index));
                            }
                        });
                    });
                    if let Some(draft) = self.note_drafts.get_mut(entry.index) {
                        ui.add(
                            egui::TextEdit::multiline(draft)
                                .hint_text("Enter a note")
                                .desired_rows(2)
                                .desired_width(f32::INFINITY),
                        );
                    }
                    if ui.button("Save note").clicked() {
                        action = Some(ListAction::SaveNote(entry.index));
                    }
                });
        }

        match action {
            Some(ListAction::Remove(index)) => {
                if self.session.remove(index) && index < self.note_drafts.len() {
                    self.note_drafts.remove(index);
                }
            }
            Some(ListAction::SaveNote(index)) => self.save_note(index, ui.ctx()),
            None => {}
        }
    }
}
