//! Background file operations: catalog loading and note saving.
//!
//! Work runs on the tokio runtime entered in `main`. Results come back through
//! the app's [`IoResult`] channel and are applied at the start of the next frame,
//! so the UI thread never blocks on the disk.

use super::state::{CircleFitApp, IoResult, UiMessage};
use crate::catalog::{Catalog, CatalogSource, JsonCatalogFile, NoteStore};
use crate::controller::NoteSaveOutcome;
use eframe::egui;
use std::path::PathBuf;

impl CircleFitApp {
    /// Applies every background result that has arrived since the last frame.
    pub fn handle_pending_io(&mut self) {
        while let Ok(result) = self.io.receiver.try_recv() {
            self.apply_io_result(result);
        }
    }

    /// Applies a single background result.
    ///
    /// A failed catalog load empties the catalog and reports the error; the
    /// layout already on the canvas is left as it is.
    pub fn apply_io_result(&mut self, result: IoResult) {
        match result {
            IoResult::CatalogLoaded { path, result } => {
                self.catalog.loading = false;
                match result {
                    Ok(records) => {
                        let count = records.len();
                        self.set_catalog(Catalog::from_records(records));
                        self.message = Some(UiMessage::info(format!(
                            "Loaded {count} rows from {}",
                            path.display()
                        )));
                        self.catalog.path = Some(path);
                    }
                    Err(err) => {
                        log::error!("Failed to load catalog {}: {err}", path.display());
                        self.set_catalog(Catalog::default());
                        self.message = Some(UiMessage::error(format!(
                            "Failed to load catalog: {err}"
                        )));
                    }
                }
            }
            IoResult::CatalogCancelled => self.catalog.loading = false,
            IoResult::NoteSaved(outcome) => self.session.apply_note_outcome(outcome),
            IoResult::Exported(Ok(Some(path))) => {
                self.message = Some(UiMessage::info(format!("Exported {}", path.display())));
            }
            IoResult::Exported(Ok(None)) => {}
            IoResult::Exported(Err(err)) => {
                log::error!("Export failed: {err}");
                self.message = Some(UiMessage::error(format!("Export failed: {err}")));
            }
        }
    }

    /// Starts loading the catalog at `path` on a blocking worker.
    ///
    /// # Arguments
    ///
    /// * `path` - JSON catalog file to read
    /// * `ctx` - The egui context, woken once the load finishes
    pub fn load_catalog(&mut self, path: PathBuf, ctx: &egui::Context) {
        log::info!("Loading catalog from {}", path.display());
        self.catalog.loading = true;
        let sender = self.io.sender.clone();
        let ctx = ctx.clone();
        tokio::task::spawn_blocking(move || {
            let result = JsonCatalogFile::new(&path)
                .load()
                .map_err(|err| err.to_string());
            let _ = sender.send(IoResult::CatalogLoaded { path, result });
            ctx.request_repaint();
        });
    }

    /// Asks for a catalog file and loads it.
    pub fn open_catalog_dialog(&mut self, ctx: &egui::Context) {
        let sender = self.io.sender.clone();
        let ctx = ctx.clone();
        self.catalog.loading = true;
        tokio::spawn(async move {
            let picked = rfd::AsyncFileDialog::new()
                .add_filter("JSON catalog", &["json"])
                .pick_file()
                .await;
            match picked {
                Some(handle) => {
                    let path = handle.path().to_path_buf();
                    let source = JsonCatalogFile::new(&path);
                    let result = tokio::task::spawn_blocking(move || source.load())
                        .await
                        .map_err(|err| err.to_string())
                        .and_then(|loaded| loaded.map_err(|err| err.to_string()));
                    let _ = sender.send(IoResult::CatalogLoaded { path, result });
                }
                None => {
                    let _ = sender.send(IoResult::CatalogCancelled);
                }
            }
            ctx.request_repaint();
        });
    }

    /// Save button handler: stores the draft on the child and writes it back to
    /// the catalog file in the background.
    pub fn save_note(&mut self, index: usize, ctx: &egui::Context) {
        let text = self.note_drafts.get(index).cloned().unwrap_or_default();
        let Some(request) = self.session.save_note(index, &text) else {
            return;
        };

        let Some(path) = self.catalog.path.clone() else {
            self.session.apply_note_outcome(NoteSaveOutcome {
                ticket: request.ticket,
                result: Err("no catalog file is open".to_string()),
            });
            return;
        };

        let sender = self.io.sender.clone();
        let ctx = ctx.clone();
        tokio::task::spawn_blocking(move || {
            let result = JsonCatalogFile::new(path)
                .save_note(&request.update)
                .map_err(|err| err.to_string());
            let _ = sender.send(IoResult::NoteSaved(NoteSaveOutcome {
                ticket: request.ticket,
                result,
            }));
            ctx.request_repaint();
        });
    }
}
