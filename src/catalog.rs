//! Catalog of circle definitions and note persistence.
//!
//! The catalog is a flat list of rows describing parent and child candidates. It is
//! read through [`CatalogSource`] and notes are written back through [`NoteStore`].
//! [`JsonCatalogFile`] implements both over a JSON array on disk; its field names
//! accept both English keys and the Japanese spreadsheet headers.

use crate::types::{CircleIdentity, CircleKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Spreadsheet header used for the note column.
const NOTE_HEADER: &str = "備考";
/// Spreadsheet header used for the name column.
const NAME_HEADER: &str = "名称";

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Whether the row describes a parent or a child candidate
    #[serde(alias = "判断円")]
    pub kind: CircleKind,
    /// Type label used to group child candidates
    #[serde(rename = "type", alias = "タイプ")]
    pub type_label: String,
    /// Display name
    #[serde(alias = "名称")]
    pub name: String,
    /// Maximum outer diameter in millimetres
    #[serde(alias = "最大外径")]
    pub max_outer_diameter: f32,
    /// Shaft diameter in millimetres; parent rows usually leave it empty
    #[serde(default, alias = "シャフト径")]
    pub shaft_diameter: Option<f32>,
    /// Free-text note
    #[serde(default, alias = "備考")]
    pub note: Option<String>,
}

impl CatalogRecord {
    /// The identity triple of this row.
    pub fn identity(&self) -> CircleIdentity {
        CircleIdentity {
            kind: self.kind,
            type_label: self.type_label.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns `true` if this row is keyed by `identity`.
    pub fn matches(&self, identity: &CircleIdentity) -> bool {
        self.kind == identity.kind
            && self.type_label == identity.type_label
            && self.name == identity.name
    }
}

/// A note to write back for the row keyed by `identity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    /// Row key
    pub identity: CircleIdentity,
    /// New note text
    pub note: String,
}

/// Errors raised while reading or writing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read or written
    #[error("failed to access catalog file {}: {source}", path.display())]
    Io {
        /// Path of the catalog file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The catalog contents are not a valid list of rows
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    /// No row matches the identity of a note update
    #[error("no catalog row matches {0}")]
    RecordNotFound(CircleIdentity),
}

/// Read side of the catalog.
pub trait CatalogSource {
    /// Loads every row, in catalog order.
    fn load(&self) -> Result<Vec<CatalogRecord>, CatalogError>;
}

/// Write side of the catalog, used for note persistence.
pub trait NoteStore: Send + Sync {
    /// Stores `update.note` on the row keyed by `update.identity`.
    fn save_note(&self, update: &NoteUpdate) -> Result<(), CatalogError>;
}

/// A catalog stored as a JSON array of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    /// Creates a handle for the catalog at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String, CatalogError> {
        std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CatalogSource for JsonCatalogFile {
    fn load(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        let records: Vec<CatalogRecord> = serde_json::from_str(&self.read()?)?;
        log::info!(
            "Loaded {} catalog rows from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

impl NoteStore for JsonCatalogFile {
    fn save_note(&self, update: &NoteUpdate) -> Result<(), CatalogError> {
        // Rows are edited as raw JSON so unknown columns and header spelling survive the rewrite.
        let mut rows: Vec<serde_json::Value> = serde_json::from_str(&self.read()?)?;

        let target = rows
            .iter()
            .position(|row| {
                serde_json::from_value::<CatalogRecord>(row.clone())
                    .map(|record| record.matches(&update.identity))
                    .unwrap_or(false)
            })
            .ok_or_else(|| CatalogError::RecordNotFound(update.identity.clone()))?;

        if let Some(object) = rows[target].as_object_mut() {
            let key = if object.contains_key(NOTE_HEADER) || object.contains_key(NAME_HEADER) {
                NOTE_HEADER
            } else {
                "note"
            };
            object.insert(key.to_string(), serde_json::Value::String(update.note.clone()));
        }

        let json = serde_json::to_string_pretty(&rows)?;
        std::fs::write(&self.path, json).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Saved note for {}", update.identity);
        Ok(())
    }
}

/// Loaded catalog rows with the lookups the selection menus need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Wraps rows in catalog order.
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Returns `true` if no rows are loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The row at `index`, if any.
    pub fn record(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    /// Parent candidates with their row indices.
    pub fn parents(&self) -> impl Iterator<Item = (usize, &CatalogRecord)> {
        self.of_kind(CircleKind::Parent)
    }

    /// Child candidates with their row indices.
    pub fn children(&self) -> impl Iterator<Item = (usize, &CatalogRecord)> {
        self.of_kind(CircleKind::Child)
    }

    /// Distinct child type labels in first-seen order.
    pub fn child_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for (_, record) in self.children() {
            if !types.contains(&record.type_label.as_str()) {
                types.push(&record.type_label);
            }
        }
        types
    }

    /// Child candidates of the given type, with their row indices.
    pub fn children_of_type<'a>(
        &'a self,
        type_label: &'a str,
    ) -> impl Iterator<Item = (usize, &'a CatalogRecord)> + 'a {
        self.children()
            .filter(move |(_, record)| record.type_label == type_label)
    }

    fn of_kind(&self, kind: CircleKind) -> impl Iterator<Item = (usize, &CatalogRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, record)| record.kind == kind)
    }
}
