//! Per-account daily engagement statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of aggregated statistics for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub day: NaiveDate,
    #[serde(default)]
    pub post_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub repost_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

impl DayBucket {
    #[must_use]
    pub fn empty(day: NaiveDate) -> Self {
        Self {
            day,
            post_count: 0,
            like_count: 0,
            reply_count: 0,
            repost_count: 0,
            quote_count: 0,
        }
    }
}

/// The statistics document for one account, keyed by `account_id`.
///
/// `post_stats` is stored in whatever order the caller supplied it.
/// `None` (no series recorded) is kept distinct from an empty series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// Account DID.
    #[serde(rename = "_id")]
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_stats: Option<Vec<DayBucket>>,
}

impl DailyStats {
    #[must_use]
    pub fn new(account_id: impl Into<String>, post_stats: Vec<DayBucket>) -> Self {
        Self {
            account_id: account_id.into(),
            post_stats: Some(post_stats),
        }
    }

    /// Keep only the buckets inside `range`, most recent day first.
    ///
    /// Buckets sharing a day keep their stored relative order.
    #[must_use]
    pub fn project(mut self, range: DayRange) -> Self {
        if let Some(buckets) = self.post_stats.as_mut() {
            buckets.retain(|bucket| range.contains(bucket.day));
            buckets.sort_by(|a, b| b.day.cmp(&a.day));
        }
        self
    }
}

/// Inclusive date bounds, either of which may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DayRange {
    #[must_use]
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn stats() -> DailyStats {
        DailyStats::new(
            "did:plc:abc",
            vec![
                DayBucket::empty(day(1, 5)),
                DayBucket::empty(day(1, 12)),
                DayBucket::empty(day(1, 18)),
                DayBucket::empty(day(1, 25)),
            ],
        )
    }

    fn days(stats: &DailyStats) -> Vec<NaiveDate> {
        stats
            .post_stats
            .as_ref()
            .unwrap()
            .iter()
            .map(|b| b.day)
            .collect()
    }

    #[test]
    fn bounded_range_filters_and_sorts_descending() {
        let projected = stats().project(DayRange::new(Some(day(1, 10)), Some(day(1, 20))));
        assert_eq!(days(&projected), vec![day(1, 18), day(1, 12)]);
    }

    #[test]
    fn bounds_are_inclusive() {
        let projected = stats().project(DayRange::new(Some(day(1, 12)), Some(day(1, 18))));
        assert_eq!(days(&projected), vec![day(1, 18), day(1, 12)]);
    }

    #[test]
    fn from_only_keeps_later_days() {
        let projected = stats().project(DayRange::new(Some(day(1, 18)), None));
        assert_eq!(days(&projected), vec![day(1, 25), day(1, 18)]);
    }

    #[test]
    fn to_only_keeps_earlier_days() {
        let projected = stats().project(DayRange::new(None, Some(day(1, 12))));
        assert_eq!(days(&projected), vec![day(1, 12), day(1, 5)]);
    }

    #[test]
    fn open_range_sorts_everything() {
        let mut unsorted = stats();
        unsorted.post_stats.as_mut().unwrap().swap(0, 2);
        let projected = unsorted.project(DayRange::all());
        assert_eq!(
            days(&projected),
            vec![day(1, 25), day(1, 18), day(1, 12), day(1, 5)]
        );
    }

    #[test]
    fn missing_series_stays_missing() {
        let stats = DailyStats {
            account_id: "did:plc:abc".to_string(),
            post_stats: None,
        };
        let projected = stats.project(DayRange::new(Some(day(1, 1)), None));
        assert!(projected.post_stats.is_none());
    }

    #[test]
    fn empty_range_result_is_empty_not_missing() {
        let projected = stats().project(DayRange::new(Some(day(2, 1)), None));
        assert_eq!(projected.post_stats, Some(vec![]));
    }

    #[test]
    fn document_uses_stored_field_names() {
        let value = serde_json::to_value(stats()).unwrap();
        assert_eq!(value["_id"], "did:plc:abc");
        assert_eq!(value["postStats"][0]["day"], "2024-01-05");
        assert_eq!(value["postStats"][0]["postCount"], 0);
    }
}
