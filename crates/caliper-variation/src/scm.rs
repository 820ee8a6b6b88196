use std::collections::BTreeMap;

use caliper_component::{Component, ComponentRef};
use serde::{Deserialize, Serialize};

/// The commit that last touched a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Commit date, epoch milliseconds.
    pub date: i64,
}

impl Changeset {
    #[must_use]
    pub fn at(date: i64) -> Self {
        Self {
            revision: None,
            author: None,
            date,
        }
    }
}

/// Per-line changesets of one file. Lines are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmInfo {
    lines: BTreeMap<u32, Changeset>,
}

impl ScmInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line of `1..=line_count` changed in the same commit.
    #[must_use]
    pub fn uniform(line_count: u32, changeset: Changeset) -> Self {
        Self {
            lines: (1..=line_count).map(|l| (l, changeset.clone())).collect(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: u32, changeset: Changeset) -> Self {
        self.lines.insert(line, changeset);
        self
    }

    #[must_use]
    pub fn changeset_for_line(&self, line: u32) -> Option<&Changeset> {
        self.lines.get(&line)
    }

    /// Most recent changeset of the file.
    #[must_use]
    pub fn latest_changeset(&self) -> Option<&Changeset> {
        self.lines.values().max_by_key(|c| c.date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Changeset)> {
        self.lines.iter().map(|(l, c)| (*l, c))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// SCM data of the files of the analysed project.
pub trait ScmInfoRepository {
    fn scm_info(&self, file: &Component) -> Option<&ScmInfo>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryScmInfoRepository {
    by_file: BTreeMap<ComponentRef, ScmInfo>,
}

impl InMemoryScmInfoRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: ComponentRef, info: ScmInfo) {
        self.by_file.insert(file, info);
    }

    #[must_use]
    pub fn with(mut self, file: ComponentRef, info: ScmInfo) -> Self {
        self.add(file, info);
        self
    }
}

impl ScmInfoRepository for InMemoryScmInfoRepository {
    fn scm_info(&self, file: &Component) -> Option<&ScmInfo> {
        self.by_file.get(&file.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_changeset_is_the_most_recent() {
        let info = ScmInfo::new()
            .with_line(1, Changeset::at(10))
            .with_line(2, Changeset::at(30))
            .with_line(3, Changeset::at(20));
        assert_eq!(info.latest_changeset().map(|c| c.date), Some(30));
    }

    #[test]
    fn uniform_covers_every_line() {
        let info = ScmInfo::uniform(3, Changeset::at(5));
        assert_eq!(info.iter().count(), 3);
        assert!(info.changeset_for_line(4).is_none());
    }
}
