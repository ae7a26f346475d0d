//! Application state management structures.
//!
//! This module contains the state that sits around the [`Session`]: the loaded
//! catalog, the selection menus, note editor buffers, and the channel that
//! background I/O uses to report back to the UI thread.

use crate::catalog::{Catalog, CatalogRecord};
use crate::controller::{NoteSaveOutcome, Session};
use crate::types::Pattern;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

/// State of the loaded catalog.
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogState {
    /// Rows from the last successful load
    #[serde(skip)]
    pub catalog: Catalog,
    /// File the catalog was (or is being) loaded from; remembered across restarts
    pub path: Option<PathBuf>,
    /// Whether a load is in flight
    #[serde(skip)]
    pub loading: bool,
}

/// Choices made in the side panel menus. Row indices refer to the current catalog
/// and are reset whenever it is reloaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Catalog row chosen as the parent
    pub parent: Option<usize>,
    /// Child type chosen in the first menu
    pub child_type: Option<String>,
    /// Catalog row chosen as the child to add
    pub child: Option<usize>,
    /// Pattern the new child starts with
    pub pattern: Pattern,
}

/// A message shown at the top of the side panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiMessage {
    /// Message text
    pub text: String,
    /// Whether to style the message as an error
    pub is_error: bool,
}

impl UiMessage {
    /// An informational message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// An error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Messages sent from background I/O tasks back to the app.
#[derive(Debug)]
pub enum IoResult {
    /// A catalog load finished
    CatalogLoaded {
        /// File that was read
        path: PathBuf,
        /// Rows, or a user-facing error
        result: Result<Vec<CatalogRecord>, String>,
    },
    /// The catalog file dialog was dismissed
    CatalogCancelled,
    /// A note write finished
    NoteSaved(NoteSaveOutcome),
    /// An export finished; `Ok(None)` means the dialog was cancelled
    Exported(Result<Option<PathBuf>, String>),
}

/// Channel endpoints for [`IoResult`]s.
pub struct IoState {
    /// Cloned into each background task
    pub sender: Sender<IoResult>,
    /// Drained once per frame
    pub receiver: Receiver<IoResult>,
}

impl Default for IoState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }
}

/// The main application structure.
///
/// This struct implements the `eframe::App` trait. Only the layout, the catalog
/// path and UI preferences are persisted; everything else is rebuilt on start.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CircleFitApp {
    /// The layout being edited and its interaction state
    pub session: Session,
    /// Loaded catalog rows and their source file
    pub catalog: CatalogState,
    /// Side panel menu choices
    #[serde(skip)]
    pub selection: SelectionState,
    /// Note editor buffers, one per child in list order
    #[serde(skip)]
    pub note_drafts: Vec<String>,
    /// Last message for the user (load errors, export results)
    #[serde(skip)]
    pub message: Option<UiMessage>,
    /// Background I/O channel
    #[serde(skip)]
    pub io: IoState,
    /// Screen rect of the canvas from the last frame
    #[serde(skip)]
    pub canvas_rect: egui::Rect,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the side panel across sessions
    pub side_panel_width: f32,
}

impl Default for CircleFitApp {
    fn default() -> Self {
        Self {
            session: Session::default(),
            catalog: CatalogState::default(),
            selection: SelectionState::default(),
            note_drafts: Vec::new(),
            message: None,
            io: IoState::default(),
            canvas_rect: egui::Rect::NOTHING,
            dark_mode: true,
            side_panel_width: 320.0,
        }
    }
}

impl CircleFitApp {
    /// Serializes the persisted part of the app state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores app state from JSON and re-derives the flags of the restored layout.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut app: Self = serde_json::from_str(json)?;
        app.session.recheck();
        app.sync_note_drafts();
        Ok(app)
    }

    /// Keeps one note buffer per child. New buffers start from the child's stored note.
    pub fn sync_note_drafts(&mut self) {
        let children = self.session.layout().children();
        self.note_drafts.truncate(children.len());
        for child in &children[self.note_drafts.len()..] {
            self.note_drafts.push(child.note.clone());
        }
    }

    /// Replaces the catalog and clears menu choices that pointed into the old one.
    ///
    /// The parent menu is pointed at the row matching the parent already on the
    /// canvas, if the new catalog has one.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog.catalog = catalog;
        let parent = self.session.layout().parent().and_then(|parent| {
            self.catalog
                .catalog
                .parents()
                .find(|(_, record)| record.matches(&parent.identity))
                .map(|(index, _)| index)
        });
        self.selection = SelectionState {
            parent,
            pattern: self.selection.pattern,
            ..Default::default()
        };
    }
}
