//! Time entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{EntryId, Labels, ValidationError, required};

/// The user-supplied fields of an entry, validated before a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    title: String,
    description: String,
    category: String,
    labels: Labels,
}

impl NewEntry {
    /// Validates the form fields.
    ///
    /// `title` and `category` must be non-empty after trimming. Labels are
    /// trimmed and deduplicated case-sensitively, keeping the first occurrence.
    pub fn new<I, S>(
        title: &str,
        description: &str,
        category: &str,
        labels: I,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            title: required(title, "title")?,
            description: description.trim().to_string(),
            category: required(category, "category")?,
            labels: labels.into_iter().collect(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// One recorded or in-progress work session.
///
/// Entries are only mutated by the timer while active; once `end_time` is
/// set the entry is terminal and exposes nothing but getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    id: EntryId,
    title: String,
    description: String,
    category: String,
    labels: Labels,
    start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_time: Option<DateTime<Utc>>,
    is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_seconds: Option<i64>,
}

impl TimeEntry {
    /// Creates a running entry from validated fields.
    pub(crate) fn begin(id: EntryId, fields: NewEntry, start_time: DateTime<Utc>) -> Self {
        let NewEntry {
            title,
            description,
            category,
            labels,
        } = fields;
        Self {
            id,
            title,
            description,
            category,
            labels,
            start_time,
            end_time: None,
            is_running: true,
            active_seconds: None,
        }
    }

    pub(crate) const fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Marks the entry terminal. Only called once, by the timer on stop.
    pub(crate) fn finish(&mut self, end_time: DateTime<Utc>, active_seconds: i64) {
        self.end_time = Some(end_time);
        self.active_seconds = Some(active_seconds);
        self.is_running = false;
    }

    pub const fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    pub const fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    pub const fn is_terminal(&self) -> bool {
        self.end_time.is_some()
    }

    /// Wall-clock span from start to stop, in whole seconds.
    ///
    /// `None` while the entry is still active. Pause intervals are included;
    /// see [`active_seconds`](Self::active_seconds) for running time only.
    pub fn duration_seconds(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_seconds())
    }

    /// Running time banked by the timer at stop, pause intervals excluded.
    pub const fn active_seconds(&self) -> Option<i64> {
        self.active_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 29, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_entry_requires_title_and_category() {
        assert_eq!(
            NewEntry::new("  ", "", "Work", Vec::<String>::new()),
            Err(ValidationError::Empty { field: "title" })
        );
        assert_eq!(
            NewEntry::new("Write spec", "", "", Vec::<String>::new()),
            Err(ValidationError::Empty { field: "category" })
        );
    }

    #[test]
    fn new_entry_trims_fields() {
        let fields = NewEntry::new(" Write spec ", " notes ", " Work ", ["a", "a"]).unwrap();
        assert_eq!(fields.title(), "Write spec");
        assert_eq!(fields.category(), "Work");
        assert_eq!(fields.description, "notes");
        assert_eq!(fields.labels.len(), 1);
    }

    #[test]
    fn begin_and_finish() {
        let fields = NewEntry::new("Write spec", "", "Work", ["deep-work"]).unwrap();
        let mut entry = TimeEntry::begin(EntryId::new("e1").unwrap(), fields, t0());

        assert!(entry.is_running());
        assert!(!entry.is_terminal());
        assert_eq!(entry.duration_seconds(), None);

        entry.finish(t0() + Duration::seconds(95), 90);
        assert!(!entry.is_running());
        assert!(entry.is_terminal());
        assert_eq!(entry.duration_seconds(), Some(95));
        assert_eq!(entry.active_seconds(), Some(90));
    }

    #[test]
    fn duration_floors_partial_seconds() {
        let fields = NewEntry::new("t", "", "c", Vec::<String>::new()).unwrap();
        let mut entry = TimeEntry::begin(EntryId::new("e1").unwrap(), fields, t0());
        entry.finish(t0() + Duration::milliseconds(61_900), 61);
        assert_eq!(entry.duration_seconds(), Some(61));
    }

    #[test]
    fn serializes_without_open_end() {
        let fields = NewEntry::new("t", "", "c", ["x"]).unwrap();
        let entry = TimeEntry::begin(EntryId::new("e1").unwrap(), fields, t0());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "e1");
        assert_eq!(json["labels"], serde_json::json!(["x"]));
        assert!(json.get("end_time").is_none());
        assert_eq!(json["is_running"], true);
    }
}
