//! Per-account daily statistics in the `statistics` collection.

use bluesent_core::{DailyStats, DayRange};

use crate::codec::{Codec, JsonCodec};
use crate::store::{Collection, DocumentStore};
use crate::StoreError;

/// Writes and reads [`DailyStats`] documents.
pub struct StatsAggregator<S> {
    store: S,
    codec: JsonCodec,
}

impl<S: DocumentStore> StatsAggregator<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            codec: JsonCodec,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upsert the statistics document for `stats.account_id`.
    ///
    /// The caller supplies the complete bucket series; stored buckets are
    /// replaced, not appended to.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or the write fails.
    pub async fn upsert_daily(&self, stats: &DailyStats) -> Result<(), StoreError> {
        let fields = self
            .codec
            .encode(Collection::Statistics, &stats.account_id, stats)?;
        self.store
            .upsert(Collection::Statistics, &stats.account_id, fields)
            .await?;

        tracing::debug!(
            account_id = %stats.account_id,
            buckets = stats.post_stats.as_ref().map_or(0, Vec::len),
            "upserted daily stats"
        );
        Ok(())
    }

    /// Read the statistics for `account_id`, keeping buckets inside `range`
    /// ordered most recent day first. Storage is not modified.
    ///
    /// Returns `Ok(None)` when the account has no statistics document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read or decode fails.
    pub async fn query_daily(
        &self,
        account_id: &str,
        range: DayRange,
    ) -> Result<Option<DailyStats>, StoreError> {
        let Some(document) = self.store.find(Collection::Statistics, account_id).await? else {
            tracing::debug!(account_id, "no daily stats stored");
            return Ok(None);
        };

        let stats: DailyStats = self.codec.decode(Collection::Statistics, document)?;
        Ok(Some(stats.project(range)))
    }
}
