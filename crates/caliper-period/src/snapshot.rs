//! Past analyses and the history they are looked up in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SnapshotStatus {
    Processed,
    Unprocessed,
}

/// One past analysis of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub uuid: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub version: Option<String>,
    pub status: SnapshotStatus,
    #[serde(default)]
    pub is_last: bool,
}

impl Snapshot {
    /// A processed, non-last snapshot.
    pub fn processed(id: i64, uuid: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            created_at,
            version: None,
            status: SnapshotStatus::Processed,
            is_last: false,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: SnapshotStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn last(mut self) -> Self {
        self.is_last = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Filter and order for snapshot lookups. Every unset criterion matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotQuery {
    pub status: Option<SnapshotStatus>,
    /// Inclusive lower bound on `created_at`.
    pub created_after: Option<i64>,
    /// Exclusive upper bound on `created_at`.
    pub created_before: Option<i64>,
    pub version: Option<String>,
    pub is_last: Option<bool>,
    /// Ordering by `created_at`.
    pub sort: SortOrder,
}

impl SnapshotQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn processed(mut self) -> Self {
        self.status = Some(SnapshotStatus::Processed);
        self
    }

    #[must_use]
    pub fn created_after(mut self, millis: i64) -> Self {
        self.created_after = Some(millis);
        self
    }

    #[must_use]
    pub fn created_before(mut self, millis: i64) -> Self {
        self.created_before = Some(millis);
        self
    }

    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn is_last(mut self, is_last: bool) -> Self {
        self.is_last = Some(is_last);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        self.status.is_none_or(|s| s == snapshot.status)
            && self.created_after.is_none_or(|t| snapshot.created_at >= t)
            && self.created_before.is_none_or(|t| snapshot.created_at < t)
            && self
                .version
                .as_deref()
                .is_none_or(|v| snapshot.version.as_deref() == Some(v))
            && self.is_last.is_none_or(|l| l == snapshot.is_last)
    }
}

/// Past analyses of projects.
pub trait SnapshotHistory {
    /// Snapshots of `project_uuid` matching `query`, in its sort order.
    fn find(&self, project_uuid: &str, query: &SnapshotQuery) -> Vec<Snapshot>;
}

/// History held in memory, keyed by project uuid.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotHistory {
    by_project: BTreeMap<String, Vec<Snapshot>>,
}

impl InMemorySnapshotHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, project_uuid: impl Into<String>, snapshot: Snapshot) {
        self.by_project
            .entry(project_uuid.into())
            .or_default()
            .push(snapshot);
    }

    #[must_use]
    pub fn with(mut self, project_uuid: &str, snapshot: Snapshot) -> Self {
        self.add(project_uuid, snapshot);
        self
    }
}

impl SnapshotHistory for InMemorySnapshotHistory {
    fn find(&self, project_uuid: &str, query: &SnapshotQuery) -> Vec<Snapshot> {
        let mut found: Vec<Snapshot> = self
            .by_project
            .get(project_uuid)
            .into_iter()
            .flatten()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        match query.sort {
            SortOrder::Ascending => found.sort_by_key(|s| s.created_at),
            SortOrder::Descending => found.sort_by_key(|s| std::cmp::Reverse(s.created_at)),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> InMemorySnapshotHistory {
        InMemorySnapshotHistory::new()
            .with("p", Snapshot::processed(2, "u2", 200).with_version("1.0"))
            .with("p", Snapshot::processed(1, "u1", 100).with_version("0.9"))
            .with(
                "p",
                Snapshot::processed(3, "u3", 300).with_status(SnapshotStatus::Unprocessed),
            )
            .with("other", Snapshot::processed(9, "u9", 150))
    }

    #[test]
    fn sorts_ascending_by_default() {
        let ids: Vec<i64> = history()
            .find("p", &SnapshotQuery::new())
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filters_on_status_and_bounds() {
        let q = SnapshotQuery::new()
            .processed()
            .created_after(100)
            .created_before(300)
            .sort(SortOrder::Descending);
        let ids: Vec<i64> = history().find("p", &q).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn created_before_is_exclusive() {
        let q = SnapshotQuery::new().created_before(100);
        assert!(history().find("p", &q).is_empty());
    }

    #[test]
    fn filters_on_version() {
        let q = SnapshotQuery::new().version("0.9");
        let found = history().find("p", &q);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].uuid, "u1");
    }

    #[test]
    fn unknown_project_has_no_history() {
        assert!(history().find("nope", &SnapshotQuery::new()).is_empty());
    }
}
