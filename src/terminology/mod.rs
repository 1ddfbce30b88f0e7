//! Terminology provider capability and cache
//!
//! The core never fetches anything itself: it consumes terminologies
//! through the [`TerminologyLoader`] capability, and memoizes the results
//! in an explicit, injectable [`TerminologyCache`]. Population, refresh and
//! expiry are the caller's concern.

use std::collections::HashMap;

use tracing::info;

use crate::models::Document;

/// Capability to load a terminology document by url
pub trait TerminologyLoader {
    /// Returns `None` on network or parse failure, never an error, so that
    /// mapping of unrelated document parts can proceed.
    fn load(&self, url: &str) -> Option<Document>;
}

/// A fixed url-to-document table, the loader used in tests and offline runs
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    documents: HashMap<String, Document>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Document) {
        self.documents.insert(url.into(), document);
    }
}

impl TerminologyLoader for InMemoryLoader {
    fn load(&self, url: &str) -> Option<Document> {
        self.documents.get(url).cloned()
    }
}

/// Url-keyed memoization of terminology loads
///
/// Failed loads are cached as `None` so a bad url is only attempted once
/// per cache lifetime; `clear` starts over.
#[derive(Debug, Default)]
pub struct TerminologyCache {
    entries: HashMap<String, Option<Document>>,
}

impl TerminologyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch through the loader unless already cached
    pub fn get_or_load(
        &mut self,
        loader: &dyn TerminologyLoader,
        url: &str,
    ) -> Option<&Document> {
        if !self.entries.contains_key(url) {
            let loaded = loader.load(url);
            if loaded.is_none() {
                info!(url, "terminology not loadable");
            }
            self.entries.insert(url.to_string(), loaded);
        }
        self.entries.get(url).and_then(|entry| entry.as_ref())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
