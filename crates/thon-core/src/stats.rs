//! Aggregate statistics over entries.
//!
//! A single linear pass accumulates each completed entry's duration into the
//! overall total, its category, and every one of its labels. Labels are not
//! mutually exclusive, so an entry with N labels is counted N times across
//! `by_label` and the label totals may sum to more than `total_seconds`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entry::TimeEntry;

/// An entry that can be aggregated.
///
/// This trait lets aggregation run over [`TimeEntry`] values or lightweight
/// test fixtures alike.
pub trait AggregatableEntry {
    fn category(&self) -> &str;

    fn labels(&self) -> impl Iterator<Item = &str>;

    /// Seconds from start to end, or `None` while still in progress.
    fn duration_seconds(&self) -> Option<i64>;
}

impl AggregatableEntry for TimeEntry {
    fn category(&self) -> &str {
        Self::category(self)
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        Self::labels(self).iter()
    }

    fn duration_seconds(&self) -> Option<i64> {
        Self::duration_seconds(self)
    }
}

/// Totals in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub total_seconds: i64,
    pub by_category: BTreeMap<String, i64>,
    pub by_label: BTreeMap<String, i64>,
}

impl TimeStats {
    pub fn category_seconds(&self, category: &str) -> i64 {
        self.by_category.get(category).copied().unwrap_or(0)
    }

    pub fn label_seconds(&self, label: &str) -> i64 {
        self.by_label.get(label).copied().unwrap_or(0)
    }
}

/// Computes totals over `entries`.
///
/// In-progress entries contribute zero seconds but still register their
/// category and labels.
pub fn aggregate<'a, E, I>(entries: I) -> TimeStats
where
    E: AggregatableEntry + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut stats = TimeStats::default();

    for entry in entries {
        let duration = entry.duration_seconds().unwrap_or(0);

        stats.total_seconds += duration;
        *stats
            .by_category
            .entry(entry.category().to_string())
            .or_insert(0) += duration;
        for label in entry.labels() {
            *stats.by_label.entry(label.to_string()).or_insert(0) += duration;
        }
    }

    stats
}
