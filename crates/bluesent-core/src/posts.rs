//! Scraped post records and the rules for merging a fresh scrape with the
//! stored copy.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A scraped post as persisted in the `posts` collection.
///
/// Engagement counters are only authoritative on the stored copy: a fresh
/// scrape may carry placeholder numbers, so [`merge_post`] always keeps the
/// stored ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Post identifier (the AT-URI or record key), unique across `posts`.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub repost_count: u64,
    /// Omitted from the document when unknown; never written as a sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Remaining scraped fields (reply tree, labels, language...), carried
    /// through reconciliation. Keys naming a typed field are dropped by
    /// [`merge_post`] so they cannot shadow it in the stored document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document keys owned by the typed fields of [`PostRecord`].
const TYPED_FIELDS: [&str; 10] = [
    "_id",
    "likeCount",
    "replyCount",
    "quoteCount",
    "repostCount",
    "createdAt",
    "fetchedAt",
    "author",
    "text",
    "uri",
];

impl PostRecord {
    /// A record with zeroed counters and nothing but its identity.
    #[must_use]
    pub fn new(id: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            like_count: 0,
            reply_count: 0,
            quote_count: 0,
            repost_count: 0,
            created_at: None,
            fetched_at,
            author: None,
            text: None,
            uri: None,
            extra: Map::new(),
        }
    }

    fn without_shadowing_extra(mut self) -> Self {
        self.extra.retain(|key, _| !TYPED_FIELDS.contains(&key.as_str()));
        self
    }
}

/// Build the record to persist from a fresh scrape and the stored copy.
///
/// With no stored copy the incoming record is returned as-is. Otherwise the
/// stored counters replace the incoming ones, `fetched_at` becomes `now`, and
/// a missing `created_at` is backfilled from storage. An incoming
/// `created_at` is never replaced.
///
/// In both cases `extra` entries whose key belongs to a typed field are
/// dropped; the flattened map would otherwise overwrite that field when the
/// record is encoded.
#[must_use]
pub fn merge_post(
    incoming: PostRecord,
    stored: Option<&PostRecord>,
    now: DateTime<Utc>,
) -> PostRecord {
    let incoming = incoming.without_shadowing_extra();
    let Some(stored) = stored else {
        return incoming;
    };

    PostRecord {
        like_count: stored.like_count,
        reply_count: stored.reply_count,
        quote_count: stored.quote_count,
        repost_count: stored.repost_count,
        created_at: incoming.created_at.or(stored.created_at),
        fetched_at: now,
        ..incoming
    }
}

/// Whether a post created at `created_at` is at least `min_days` old at `now`.
///
/// "Days" are whole 24-hour spans of elapsed time, so the boundary is
/// inclusive: exactly `min_days * 24h` after creation is stale. An unknown
/// creation time is never stale.
#[must_use]
pub fn is_stale(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>, min_days: u32) -> bool {
    let Some(created_at) = created_at else {
        return false;
    };
    now.signed_duration_since(created_at) >= Duration::days(i64::from(min_days))
}
