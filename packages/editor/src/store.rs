//! # Document Stores
//!
//! Persistence collaborators for email content. A store keeps one opaque JSON
//! value per email id and replaces it wholesale on save (last writer wins).
//!
//! - **Memory-backed**: for tests and previews
//! - **File-backed**: one `<email_id>.json` file per email in a directory

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid email id: {0:?}")]
    InvalidId(String),

    #[error("Store rejected the write: {0}")]
    Rejected(String),
}

/// Load and replace the stored content of an email
pub trait DocumentStore {
    /// `Ok(None)` when nothing has been saved for this email yet
    fn load_document(&self, email_id: &str) -> Result<Option<Value>, StoreError>;

    fn save_document(&self, email_id: &str, content: &Value) -> Result<(), StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn load_document(&self, email_id: &str) -> Result<Option<Value>, StoreError> {
        (**self).load_document(email_id)
    }

    fn save_document(&self, email_id: &str, content: &Value) -> Result<(), StoreError> {
        (**self).save_document(email_id, content)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an email's stored content
    pub fn insert(&self, email_id: impl Into<String>, content: Value) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        documents.insert(email_id.into(), content);
        Ok(())
    }

    pub fn get(&self, email_id: &str) -> Option<Value> {
        self.documents
            .lock()
            .ok()
            .and_then(|documents| documents.get(email_id).cloned())
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn load_document(&self, email_id: &str) -> Result<Option<Value>, StoreError> {
        let documents = self
            .documents
            .lock()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        Ok(documents.get(email_id).cloned())
    }

    fn save_document(&self, email_id: &str, content: &Value) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .lock()
            .map_err(|e| StoreError::Rejected(e.to_string()))?;
        documents.insert(email_id.to_string(), content.clone());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `email_id`
    pub fn path_for(&self, email_id: &str) -> Result<PathBuf, StoreError> {
        let invalid = email_id.is_empty()
            || email_id == "."
            || email_id == ".."
            || email_id.contains(['/', '\\'])
            || email_id.contains('\0');
        if invalid {
            return Err(StoreError::InvalidId(email_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", email_id)))
    }
}

impl DocumentStore for FileStore {
    fn load_document(&self, email_id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(email_id)?;
        if !path.exists() {
            debug!(path = %path.display(), "No stored document");
            return Ok(None);
        }

        let source = std::fs::read_to_string(&path)?;
        // Unparseable files come back as their raw text, which holds no blocks
        match serde_json::from_str(&source) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Stored document is not JSON");
                Ok(Some(Value::String(source)))
            }
        }
    }

    fn save_document(&self, email_id: &str, content: &Value) -> Result<(), StoreError> {
        let path = self.path_for(email_id)?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(content)?;
        std::fs::write(&path, json)?;

        debug!(path = %path.display(), "Saved document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        assert!(store.load_document("welcome").unwrap().is_none());

        store.save_document("welcome", &json!({ "blocks": [] })).unwrap();
        store
            .save_document("welcome", &json!({ "blocks": [{ "id": "spacer-1", "type": "spacer", "height": 8 }] }))
            .unwrap();

        let stored = store.load_document("welcome").unwrap().unwrap();
        assert_eq!(stored["blocks"].as_array().map(Vec::len), Some(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("emails"));

        let content = json!({ "blocks": [], "style": { "maxWidth": 640 } });
        store.save_document("newsletter", &content).unwrap();

        assert!(dir.path().join("emails/newsletter.json").exists());
        assert_eq!(store.load_document("newsletter").unwrap(), Some(content));
        assert_eq!(store.load_document("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_returns_corrupt_file_as_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{\"blocks\": [").unwrap();
        let store = FileStore::new(dir.path());

        let stored = store.load_document("broken").unwrap();
        assert_eq!(stored, Some(Value::String("{\"blocks\": [".to_string())));
    }

    #[test]
    fn test_memory_store_insert_seeds_content() {
        let store = MemoryStore::new();
        store.insert("seeded", json!({ "blocks": [] })).unwrap();
        assert_eq!(store.get("seeded"), Some(json!({ "blocks": [] })));
    }

    #[test]
    fn test_memory_store_insert_reports_poisoned_lock() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let writer = std::sync::Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = writer.documents.lock().unwrap();
            panic!("writer crashed while holding the lock");
        })
        .join();

        let result = store.insert("welcome", json!({ "blocks": [] }));
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[test]
    fn test_file_store_refuses_path_like_ids() {
        let store = FileStore::new("/tmp/mailblocks");
        for id in ["", "..", "../etc/passwd", "a/b", "a\\b"] {
            assert!(matches!(store.path_for(id), Err(StoreError::InvalidId(_))), "{id}");
        }
    }
}
