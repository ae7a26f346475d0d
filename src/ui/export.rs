//! Export utilities: render the current layout to SVG and PNG.
//!
//! The SVG is built from the same [`Frame`] the canvas paints, so an export
//! always matches what is on screen. Transient pattern labels are left out.

use super::state::{CircleFitApp, IoResult};
use crate::constants::{EXPORT_MARGIN, LABEL_FONT_SIZE, LABEL_GAP, OUTLINE_STROKE_WIDTH, PNG_EXPORT_SCALE};
use crate::projector::{project_frame, Frame};
use eframe::egui::{self, Color32};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors from rendering or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The generated SVG could not be parsed for rasterizing
    #[error("failed to parse SVG: {0}")]
    Svg(#[from] usvg::Error),
    /// The output raster could not be allocated
    #[error("cannot allocate a {width}x{height} image")]
    Raster {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },
    /// PNG encoding failed
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    /// Writing the output file failed
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Renders `frame` as a standalone SVG document.
///
/// The document is the canvas size plus [`EXPORT_MARGIN`] on every side.
pub fn frame_to_svg(frame: &Frame) -> String {
    let (canvas_w, canvas_h) = frame.canvas_size;
    let width = canvas_w + 2.0 * EXPORT_MARGIN;
    let height = canvas_h + 2.0 * EXPORT_MARGIN;

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        out,
        r#"<g transform="translate({EXPORT_MARGIN} {EXPORT_MARGIN})">"#
    );

    if let Some(parent) = &frame.parent {
        let _ = writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="black" stroke-width="{OUTLINE_STROKE_WIDTH}"/>"#,
            parent.center.x, parent.center.y, parent.radius
        );
    }

    for child in &frame.children {
        let (rgb, opacity) = svg_color(child.fill);
        let _ = writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{rgb}" fill-opacity="{opacity:.3}" stroke="black" stroke-width="{OUTLINE_STROKE_WIDTH}"/>"#,
            child.center.x, child.center.y, child.radius
        );
    }

    for child in &frame.children {
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="{LABEL_FONT_SIZE}">{}</text>"#,
            child.center.x,
            child.center.y - child.radius - LABEL_GAP,
            escape_xml(&child.label)
        );
    }

    let _ = writeln!(out, "</g>");
    let _ = writeln!(out, "</svg>");
    out
}

/// Rasterizes an SVG document at `scale`.
pub fn render_png(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap, ExportError> {
    let mut opt = usvg::Options::default();
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    opt.fontdb = Arc::new(db);

    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)?;
    let size = tree.size();
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(ExportError::Raster { width, height })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn svg_color(color: Color32) -> (String, f32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    (format!("rgb({r},{g},{b})"), f32::from(a) / 255.0)
}

fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}

impl CircleFitApp {
    /// Exports the current layout to an SVG file chosen in a save dialog.
    pub fn export_svg(&mut self, ctx: &egui::Context) {
        let svg = frame_to_svg(&project_frame(&self.session));
        let sender = self.io.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let result = match rfd::AsyncFileDialog::new()
                .add_filter("SVG", &["svg"])
                .set_file_name("layout.svg")
                .save_file()
                .await
            {
                Some(handle) => {
                    let path = handle.path().to_path_buf();
                    std::fs::write(&path, svg.as_bytes())
                        .map(|()| Some(path.clone()))
                        .map_err(|source| ExportError::Io { path, source }.to_string())
                }
                None => Ok(None),
            };
            let _ = sender.send(IoResult::Exported(result));
            ctx.request_repaint();
        });
    }

    /// Exports the current layout to a PNG file chosen in a save dialog.
    pub fn export_png(&mut self, ctx: &egui::Context) {
        let svg = frame_to_svg(&project_frame(&self.session));
        let pixmap = match render_png(&svg, PNG_EXPORT_SCALE) {
            Ok(pixmap) => pixmap,
            Err(err) => {
                self.apply_io_result(IoResult::Exported(Err(err.to_string())));
                return;
            }
        };

        let sender = self.io.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let result = match rfd::AsyncFileDialog::new()
                .add_filter("PNG", &["png"])
                .set_file_name("layout.png")
                .save_file()
                .await
            {
                Some(handle) => {
                    let path = handle.path().to_path_buf();
                    write_png(&pixmap, path)
                        .map(Some)
                        .map_err(|err| err.to_string())
                }
                None => Ok(None),
            };
            let _ = sender.send(IoResult::Exported(result));
            ctx.request_repaint();
        });
    }
}

fn write_png(pixmap: &tiny_skia::Pixmap, path: PathBuf) -> Result<PathBuf, ExportError> {
    let bytes = pixmap
        .encode_png()
        .map_err(|err| ExportError::Encode(err.to_string()))?;
    match std::fs::write(&path, bytes) {
        Ok(()) => Ok(path),
        Err(source) => Err(ExportError::Io { path, source }),
    }
}
