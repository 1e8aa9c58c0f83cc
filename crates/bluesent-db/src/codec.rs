//! Conversion between domain records and stored documents.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::store::{Collection, Document, PRIMARY_KEY};
use crate::StoreError;

/// Encodes entities into documents and back.
///
/// Absent optional fields must stay absent in both directions so a stored
/// value is never confused with a zero or null placeholder.
pub trait Codec: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] if `entity` cannot be represented, or
    /// [`StoreError::MalformedDocument`] if it does not encode to an object
    /// whose primary key matches `id`.
    fn encode<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        entity: &T,
    ) -> Result<Document, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Codec`] if the document does not match `T`.
    fn decode<T: DeserializeOwned>(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<T, StoreError>;
}

/// `serde_json` codec; the format the Postgres store keeps in `JSONB`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        entity: &T,
    ) -> Result<Document, StoreError> {
        let malformed = || StoreError::MalformedDocument {
            collection,
            id: id.to_string(),
        };

        let document = match serde_json::to_value(entity) {
            Ok(Value::Object(document)) => document,
            Ok(_) => return Err(malformed()),
            Err(source) => return Err(StoreError::Codec { collection, source }),
        };

        match document.get(PRIMARY_KEY) {
            Some(Value::String(key)) if key == id => Ok(document),
            _ => Err(malformed()),
        }
    }

    fn decode<T: DeserializeOwned>(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(document))
            .map_err(|source| StoreError::Codec { collection, source })
    }
}
