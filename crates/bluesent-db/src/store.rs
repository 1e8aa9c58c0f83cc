//! The document store seam shared by the reconciler and the aggregator.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::StoreError;

/// Field holding a document's primary key.
pub const PRIMARY_KEY: &str = "_id";

/// A stored document: a JSON object keyed by field name.
pub type Document = Map<String, Value>;

/// The collections this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Statistics,
}

impl Collection {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Collection::Posts => "posts",
            Collection::Statistics => "statistics",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point lookups and keyed upserts over named collections.
///
/// Implementations may be shared by concurrent callers. No atomicity is
/// promised across a `find` followed by an `upsert`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document whose primary key is `id`. Absence is `Ok(None)`.
    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create the document if `id` is absent; otherwise overwrite each field
    /// present in `fields`, leaving fields not mentioned untouched.
    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn find(&self, collection: Collection, id: &str) -> Result<Option<Document>, StoreError> {
        (**self).find(collection, id).await
    }

    async fn upsert(
        &self,
        collection: Collection,
        id: &str,
        fields: Document,
    ) -> Result<(), StoreError> {
        (**self).upsert(collection, id, fields).await
    }
}
