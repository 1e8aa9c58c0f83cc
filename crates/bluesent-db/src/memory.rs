//! In-process [`DocumentStore`] with the same upsert semantics as the
//! Postgres store. Used by tests and by callers that do not need durability.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::store::{Collection, Document, DocumentStore};
use crate::StoreError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<(Collection, String), Document>>,
    finds: AtomicUsize,
    upserts: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the store lock is poisoned.
    pub fn len(&self, collection: Collection) -> Result<usize, StoreError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|(c, _)| *c == collection)
            .count())
    }

    /// Total `find` calls served so far.
    #[must_use]
    pub fn find_count(&self) -> usize {
        self.finds.load(Ordering::Relaxed)
    }

    /// Total `upsert` calls served so far.
    #[must_use]
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::Relaxed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<(Collection, String), Document>>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        self.finds.fetch_add(1, Ordering::Relaxed);
        Ok(self.lock()?.get(&(collection, id.to_string())).cloned())
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::Relaxed);
        let mut documents = self.lock()?;
        let stored = documents.entry((collection, id.to_string())).or_default();
        for (field, value) in fields {
            stored.insert(field, value);
        }
        Ok(())
    }
}
