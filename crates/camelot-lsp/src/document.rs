//! Tracking of the documents the client has open.
//!
//! camelot reads files from disk, so only the identity of each document is
//! kept. The store exists so that a configuration change can revalidate
//! every open document.

use std::collections::HashMap;

use tower_lsp::lsp_types::Url;

/// An open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    uri: Url,
    version: i32,
}

impl Document {
    /// Create a document record.
    pub fn new(uri: Url, version: i32) -> Self {
        Self { uri, version }
    }

    /// Get the document's URI.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Get the last version reported by the client.
    pub fn version(&self) -> i32 {
        self.version
    }
}

/// The set of open documents, keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<Url, Document>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document as open.
    pub fn open(&mut self, uri: Url, version: i32) {
        self.documents
            .insert(uri.clone(), Document::new(uri, version));
    }

    /// Record a new version of an open document.
    pub fn change(&mut self, uri: &Url, version: i32) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.version = version;
        }
    }

    /// Forget a document.
    pub fn close(&mut self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Get a document by URI.
    pub fn get(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// All open document URIs.
    pub fn uris(&self) -> Vec<Url> {
        self.documents.keys().cloned().collect()
    }

    /// Get the number of documents in the store.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
