//! # Circle Fit
//!
//! An interactive checker for circular parts laid out inside a circular boundary.
//! A parent circle (the housing) is chosen from a catalog and drawn at the canvas
//! center; child circles (the parts) are added from the same catalog and dragged
//! into place. Every edit re-validates the whole layout:
//! - **Overlap**: two children whose disks intersect
//! - **Containment**: a child reaching past the parent boundary
//!
//! Each child has two candidate sizes (maximum outer diameter and shaft
//! diameter); double-clicking a child switches between them.
//!
//! ## Features
//! - JSON catalogs with English or Japanese column headers
//! - Drag-to-place with live violation colors and a status summary
//! - Per-child notes written back to the catalog file
//! - SVG and PNG export of the current layout
//! - Layout and preferences persisted between runs

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod checker;
pub mod constants;
pub mod controller;
pub mod geometry;
pub mod projector;
pub mod types;
mod ui;

// Re-export public types and functions
pub use catalog::{Catalog, CatalogError, CatalogRecord, CatalogSource, JsonCatalogFile, NoteStore};
pub use controller::Session;
pub use types::*;
pub use ui::export::{frame_to_svg, render_png, ExportError};
pub use ui::CircleFitApp;

use std::path::PathBuf;

/// Startup options taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Catalog to load at startup instead of the remembered one
    pub catalog: Option<PathBuf>,
    /// Start with light visuals
    pub light_mode: bool,
}

/// Runs the circle layout application.
///
/// This function initializes the egui application window and starts the main event loop.
/// Background file work is spawned on the ambient tokio runtime, so the caller must
/// have entered one.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// use circle_fit::{run_app, LaunchOptions};
///
/// fn main() -> Result<(), eframe::Error> {
///     let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
///     let _guard = runtime.enter();
///     run_app(LaunchOptions::default())
/// }
/// ```
pub fn run_app(launch: LaunchOptions) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Circle Fit",
        options,
        Box::new(move |cc| Ok(Box::new(CircleFitApp::new(cc, launch)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_default() {
        let layout = Layout::default();
        assert!(layout.parent().is_none());
        assert!(layout.children().is_empty());
        assert_eq!(layout.canvas_size(), constants::DEFAULT_CANVAS_SIZE);
    }

    #[test]
    fn test_launch_options_default() {
        let launch = LaunchOptions::default();
        assert!(launch.catalog.is_none());
        assert!(!launch.light_mode);
    }
}
