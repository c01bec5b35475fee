//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::Document;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps serialized documents in memory, for tests and ephemeral sessions.
///
/// Documents go through the same JSON encoding as on disk, so a load
/// never shares state with the document that was saved.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Other(format!("Lock error: {}", e))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let json = document.to_json().map_err(|e| StorageError::Serialization(e.to_string()));
        Box::pin(async move {
            let json = json?;
            let mut docs = self.documents.write().map_err(Self::lock_error)?;
            docs.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Document>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(Self::lock_error)?;
            let json = docs.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            Document::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(Self::lock_error)?;
            docs.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(Self::lock_error)?;
            let mut ids: Vec<String> = docs.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(Self::lock_error)?;
            Ok(docs.contains_key(&id))
        })
    }
}
