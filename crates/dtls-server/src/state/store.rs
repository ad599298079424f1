//! The document store.
//!
//! Keyed by URI. The map itself and each document carry a read-write
//! discipline: lifecycle notifications (didOpen/didChange/didClose) take
//! exclusive locks, request handlers take shared locks. Handlers for
//! different documents never contend; changes to one document serialize
//! against its readers.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::state::document::Document;

#[derive(Default)]
pub struct DocumentStore {
    documents: RwLock<FxHashMap<String, Arc<RwLock<Document>>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly opened document, replacing any stale entry.
    pub fn open(&self, document: Document) {
        let uri = document.uri.clone();
        self.documents.write().insert(uri, Arc::new(RwLock::new(document)));
    }

    pub fn get(&self, uri: &str) -> Option<Arc<RwLock<Document>>> {
        self.documents.read().get(uri).cloned()
    }

    pub fn close(&self, uri: &str) -> bool {
        self.documents.write().remove(uri).is_some()
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.documents.read().contains_key(uri)
    }

    /// Snapshot of the open documents, for cross-document lookups
    /// (go-to-definition across open token files).
    pub fn all(&self) -> Vec<Arc<RwLock<Document>>> {
        self.documents.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}
