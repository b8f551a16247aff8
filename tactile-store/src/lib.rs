//! # Tactile Canvas Store
//!
//! Thread-safe storage of named canvas documents, shared by every front end.
//!
//! Documents live in memory. A store built with [`DocumentStore::with_data_dir`]
//! also writes each document to `<data_dir>/<id>.json` after every change.
//! Write failures after a successful in-memory change are logged, not returned.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tactile_core::{CanvasDocument, CanvasError, CanvasState, DocumentId, GridConfig};

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document has this ID.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),
    /// The canvas or document failed validation.
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A document could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// Document identifier.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Last save time in milliseconds since the epoch.
    pub timestamp: u64,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Number of painted cells.
    pub painted: usize,
}

impl From<&CanvasDocument> for DocumentSummary {
    fn from(doc: &CanvasDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name.clone(),
            timestamp: doc.timestamp,
            width: doc.canvas.width,
            height: doc.canvas.height,
            painted: doc.canvas.cells.len(),
        }
    }
}

fn validate_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(CanvasError::InvalidFormat("document name is empty".to_string()).into());
    }
    Ok(())
}

/// Thread-safe document storage.
///
/// # Example
///
/// ```
/// use tactile_core::GridConfig;
/// use tactile_store::DocumentStore;
///
/// let store = DocumentStore::new();
/// let doc = store.create("Sunset", GridConfig::new(16, 16).unwrap()).unwrap();
/// assert_eq!(store.list().len(), 1);
/// assert!(store.load_canvas(doc.id).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Arc<RwLock<HashMap<DocumentId, CanvasDocument>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl DocumentStore {
    /// Create an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with filesystem persistence. The directory is created
    /// if it doesn't exist; existing files are not read until
    /// [`DocumentStore::load_all_from_disk`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            documents: Arc::default(),
            data_dir: Some(data_dir),
        })
    }

    /// Persistence directory, if any.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Create an empty canvas document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Canvas`] for an invalid grid or empty name.
    pub fn create(&self, name: &str, config: GridConfig) -> StoreResult<CanvasDocument> {
        let canvas = CanvasState::new(config)?;
        self.save(name, &canvas)
    }

    /// Store a canvas under a new document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Canvas`] for an empty name.
    pub fn save(&self, name: &str, canvas: &CanvasState) -> StoreResult<CanvasDocument> {
        validate_name(name)?;
        let doc = CanvasDocument::from_canvas(name, canvas);
        self.put(doc.clone());
        tracing::info!(id = %doc.id, name, "document created");
        Ok(doc)
    }

    /// Add an externally produced document after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Canvas`] if the document is invalid.
    pub fn import(&self, doc: CanvasDocument) -> StoreResult<DocumentId> {
        doc.validate()?;
        let id = doc.id;
        self.put(doc);
        Ok(id)
    }

    /// Replace a document's canvas.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown ID.
    pub fn update(&self, id: DocumentId, canvas: &CanvasState) -> StoreResult<CanvasDocument> {
        let doc = {
            let mut documents = self
                .documents
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let existing = documents
                .get_mut(&id)
                .ok_or(StoreError::DocumentNotFound(id))?;
            *existing = existing.with_canvas(canvas);
            existing.clone()
        };
        tracing::debug!(%id, cells = canvas.painted_count(), "document updated");
        self.persist(&doc);
        Ok(doc)
    }

    /// Rename a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown ID or
    /// [`StoreError::Canvas`] for an empty name.
    pub fn rename(&self, id: DocumentId, name: &str) -> StoreResult<CanvasDocument> {
        validate_name(name)?;
        let doc = {
            let mut documents = self
                .documents
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let existing = documents
                .get_mut(&id)
                .ok_or(StoreError::DocumentNotFound(id))?;
            existing.name = name.to_string();
            existing.clone()
        };
        self.persist(&doc);
        Ok(doc)
    }

    /// A document by ID.
    #[must_use]
    pub fn get(&self, id: DocumentId) -> Option<CanvasDocument> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        documents.get(&id).cloned()
    }

    /// Rebuild a document's canvas.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown ID.
    pub fn load_canvas(&self, id: DocumentId) -> StoreResult<CanvasState> {
        let doc = self.get(id).ok_or(StoreError::DocumentNotFound(id))?;
        Ok(doc.to_canvas()?)
    }

    /// All documents, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<DocumentSummary> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut summaries: Vec<_> = documents.values().map(DocumentSummary::from).collect();
        summaries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.name.cmp(&b.name))
        });
        summaries
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a document and its file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DocumentNotFound`] for an unknown ID.
    pub fn delete(&self, id: DocumentId) -> StoreResult<CanvasDocument> {
        let removed = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .ok_or(StoreError::DocumentNotFound(id))?;
        self.delete_file(id);
        tracing::info!(%id, "document deleted");
        Ok(removed)
    }

    fn put(&self, doc: CanvasDocument) {
        {
            let mut documents = self
                .documents
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            documents.insert(doc.id, doc.clone());
        }
        self.persist(&doc);
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    fn document_path(data_dir: &Path, id: DocumentId) -> PathBuf {
        data_dir.join(format!("{id}.json"))
    }

    /// Write a document to disk. No-op without a data directory.
    fn persist(&self, doc: &CanvasDocument) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let json = match doc.to_json() {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize document {}: {e}", doc.id);
                return;
            }
        };
        let path = Self::document_path(data_dir, doc.id);
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!(
                "Failed to persist document {} to {}: {e}",
                doc.id,
                path.display()
            );
        }
    }

    fn delete_file(&self, id: DocumentId) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let path = Self::document_path(data_dir, id);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to delete document file {}: {e}", path.display());
            }
        }
    }

    /// Read one document file into memory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file can't be read and
    /// [`StoreError::Canvas`] if it fails validation or its name is not
    /// `<id>.json` for the ID it contains.
    pub fn load_file(&self, path: &Path) -> StoreResult<DocumentId> {
        let contents = std::fs::read_to_string(path)?;
        let doc = CanvasDocument::from_json(&contents)?;
        let id = doc.id;
        let stem = path.file_stem().and_then(|stem| stem.to_str());
        if stem != Some(id.to_string().as_str()) {
            return Err(CanvasError::InvalidFormat(format!(
                "file {} does not match document id {id}",
                path.display()
            ))
            .into());
        }
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, doc);
        Ok(id)
    }

    /// Load every `*.json` document in the data directory. Files that fail
    /// validation are skipped with a warning. Returns the loaded IDs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory can't be read.
    pub fn load_all_from_disk(&self) -> StoreResult<Vec<DocumentId>> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(Vec::new());
        };
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }
            match self.load_file(&path) {
                Ok(id) => ids.push(id),
                Err(e) => tracing::warn!("Skipping {}: {e}", path.display()),
            }
        }
        tracing::info!(count = ids.len(), "documents loaded from disk");
        Ok(ids)
    }
}

/// Serialize any value as pretty JSON, mapping failures to [`StoreError`].
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if encoding fails.
pub fn to_pretty_json<T: Serialize>(value: &T) -> StoreResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialization(e.to_string()))
}
