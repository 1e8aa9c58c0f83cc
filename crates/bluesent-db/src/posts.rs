//! Reconciliation of freshly scraped posts against the `posts` collection.

use bluesent_core::{
    is_stale, merge_post, min_days_for_update, ConfigError, PostRecord, SettingsProvider,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::codec::{Codec, JsonCodec};
use crate::store::{Collection, DocumentStore};
use crate::StoreError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

/// Result of reconciling one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The merged record was written.
    pub persisted: bool,
    /// The post had no stored copy before this call.
    pub first_sighting: bool,
    /// The post is old enough to be offered for a rescrape.
    pub stale_eligible: bool,
}

/// Merges incoming posts with their stored copies and writes the result.
///
/// Every call re-reads the stored record and the rescrape threshold; nothing
/// is cached between calls.
pub struct PostReconciler<S, P> {
    store: S,
    settings: P,
    codec: JsonCodec,
    clock: fn() -> DateTime<Utc>,
}

impl<S, P> PostReconciler<S, P>
where
    S: DocumentStore,
    P: SettingsProvider,
{
    #[must_use]
    pub fn new(store: S, settings: P) -> Self {
        Self {
            store,
            settings,
            codec: JsonCodec,
            clock: Utc::now,
        }
    }

    /// Replace the source of "now"; used to pin time in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reconcile one incoming post and upsert the merged record.
    ///
    /// With a stored copy, the stored engagement counters and (if the
    /// incoming record lacks one) `created_at` are carried forward, and
    /// `fetched_at` is set to now. A first sighting is written as received
    /// and is never stale.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Configuration`] if the rescrape threshold
    /// is missing or invalid (nothing is read or written in that case), and
    /// [`ReconcileError::Store`] if the lookup, decode, encode, or upsert fails.
    pub async fn reconcile(
        &self,
        incoming: PostRecord,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let min_days = min_days_for_update(&self.settings)?;
        let now = (self.clock)();

        let stored: Option<PostRecord> =
            match self.store.find(Collection::Posts, &incoming.id).await? {
                Some(document) => Some(self.codec.decode(Collection::Posts, document)?),
                None => None,
            };

        let first_sighting = stored.is_none();
        let merged = merge_post(incoming, stored.as_ref(), now);
        let stale_eligible = !first_sighting && is_stale(merged.created_at, now, min_days);

        let fields = self.codec.encode(Collection::Posts, &merged.id, &merged)?;
        self.store.upsert(Collection::Posts, &merged.id, fields).await?;

        tracing::debug!(
            post_id = %merged.id,
            first_sighting,
            stale_eligible,
            min_days,
            "reconciled post"
        );

        Ok(ReconcileOutcome {
            persisted: true,
            first_sighting,
            stale_eligible,
        })
    }

    /// Reconcile `posts` in order and report whether every one is stale.
    ///
    /// Each post is reconciled even after one reports not stale. The first
    /// failure aborts the batch; posts already written stay written. An empty
    /// batch is vacuously all-stale.
    ///
    /// # Errors
    ///
    /// Returns the error of the first post that fails to reconcile.
    pub async fn reconcile_batch<I>(&self, posts: I) -> Result<bool, ReconcileError>
    where
        I: IntoIterator<Item = PostRecord>,
    {
        let mut all_stale = true;
        let mut count = 0_usize;
        for post in posts {
            let outcome = self.reconcile(post).await?;
            all_stale &= outcome.stale_eligible;
            count += 1;
        }

        tracing::debug!(count, all_stale, "reconciled post batch");
        Ok(all_stale)
    }
}
