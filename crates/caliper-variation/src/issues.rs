use std::collections::BTreeMap;

use caliper_component::{Component, ComponentRef};
use caliper_formula::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
    PeriodValues,
};
use caliper_measure::Measure;
use caliper_metric::keys;
use serde::{Deserialize, Serialize};

/// Margin added to a period's date before comparing issue creation dates.
///
/// Issue dates are stored with second precision while snapshot dates keep
/// milliseconds; without it, issues of the reference analysis itself would
/// count as new.
pub const NEW_ISSUE_DATE_MARGIN_MS: i64 = 1_000;

/// Metrics written by [`IssueCountFormula`].
pub const ISSUE_COUNT_KEYS: [&str; 15] = [
    keys::VIOLATIONS,
    keys::BLOCKER_VIOLATIONS,
    keys::CRITICAL_VIOLATIONS,
    keys::MAJOR_VIOLATIONS,
    keys::MINOR_VIOLATIONS,
    keys::INFO_VIOLATIONS,
    keys::CODE_SMELLS,
    keys::BUGS,
    keys::VULNERABILITIES,
    keys::SECURITY_HOTSPOTS,
    keys::OPEN_ISSUES,
    keys::REOPENED_ISSUES,
    keys::CONFIRMED_ISSUES,
    keys::FALSE_POSITIVE_ISSUES,
    keys::WONT_FIX_ISSUES,
];

/// Metrics written by [`NewIssuesFormula`].
pub const NEW_ISSUE_KEYS: [&str; 10] = [
    keys::NEW_VIOLATIONS,
    keys::NEW_BLOCKER_VIOLATIONS,
    keys::NEW_CRITICAL_VIOLATIONS,
    keys::NEW_MAJOR_VIOLATIONS,
    keys::NEW_MINOR_VIOLATIONS,
    keys::NEW_INFO_VIOLATIONS,
    keys::NEW_CODE_SMELLS,
    keys::NEW_BUGS,
    keys::NEW_VULNERABILITIES,
    keys::NEW_SECURITY_HOTSPOTS,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
    Blocker,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Blocker,
        Severity::Critical,
        Severity::Major,
        Severity::Minor,
        Severity::Info,
    ];

    /// Metric counting unresolved issues of this severity.
    #[must_use]
    pub fn violations_key(self) -> &'static str {
        match self {
            Severity::Blocker => keys::BLOCKER_VIOLATIONS,
            Severity::Critical => keys::CRITICAL_VIOLATIONS,
            Severity::Major => keys::MAJOR_VIOLATIONS,
            Severity::Minor => keys::MINOR_VIOLATIONS,
            Severity::Info => keys::INFO_VIOLATIONS,
        }
    }

    #[must_use]
    pub fn new_violations_key(self) -> &'static str {
        match self {
            Severity::Blocker => keys::NEW_BLOCKER_VIOLATIONS,
            Severity::Critical => keys::NEW_CRITICAL_VIOLATIONS,
            Severity::Major => keys::NEW_MAJOR_VIOLATIONS,
            Severity::Minor => keys::NEW_MINOR_VIOLATIONS,
            Severity::Info => keys::NEW_INFO_VIOLATIONS,
        }
    }
}

/// Kind of rule that raised an issue.
///
/// Security hotspots are not violations: they only feed their own counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    #[default]
    CodeSmell,
    Bug,
    Vulnerability,
    SecurityHotspot,
}

impl IssueType {
    #[must_use]
    pub fn count_key(self) -> &'static str {
        match self {
            IssueType::CodeSmell => keys::CODE_SMELLS,
            IssueType::Bug => keys::BUGS,
            IssueType::Vulnerability => keys::VULNERABILITIES,
            IssueType::SecurityHotspot => keys::SECURITY_HOTSPOTS,
        }
    }

    #[must_use]
    pub fn new_count_key(self) -> &'static str {
        match self {
            IssueType::CodeSmell => keys::NEW_CODE_SMELLS,
            IssueType::Bug => keys::NEW_BUGS,
            IssueType::Vulnerability => keys::NEW_VULNERABILITIES,
            IssueType::SecurityHotspot => keys::NEW_SECURITY_HOTSPOTS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    #[default]
    Open,
    Confirmed,
    Reopened,
    Resolved,
    Closed,
}

impl IssueStatus {
    /// Metric counting unresolved issues in this status, if any.
    #[must_use]
    pub fn count_key(self) -> Option<&'static str> {
        match self {
            IssueStatus::Open => Some(keys::OPEN_ISSUES),
            IssueStatus::Confirmed => Some(keys::CONFIRMED_ISSUES),
            IssueStatus::Reopened => Some(keys::REOPENED_ISSUES),
            IssueStatus::Resolved | IssueStatus::Closed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    Fixed,
    FalsePositive,
    WontFix,
    Removed,
}

impl Resolution {
    /// Metric counting issues closed with this resolution, if any.
    #[must_use]
    pub fn count_key(self) -> Option<&'static str> {
        match self {
            Resolution::FalsePositive => Some(keys::FALSE_POSITIVE_ISSUES),
            Resolution::WontFix => Some(keys::WONT_FIX_ISSUES),
            Resolution::Fixed | Resolution::Removed => None,
        }
    }
}

/// An issue raised on a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(rename = "type", default)]
    pub issue_type: IssueType,
    pub severity: Severity,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub resolution: Option<Resolution>,
    /// Creation date, epoch milliseconds.
    pub created_at: i64,
}

impl Issue {
    /// An open code smell.
    pub fn new(key: impl Into<String>, severity: Severity, created_at: i64) -> Self {
        Self {
            key: key.into(),
            issue_type: IssueType::default(),
            severity,
            status: IssueStatus::default(),
            resolution: None,
            created_at,
        }
    }

    #[must_use]
    pub fn with_type(mut self, issue_type: IssueType) -> Self {
        self.issue_type = issue_type;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    /// Fixed and removed issues are closed, the others resolved.
    #[must_use]
    pub fn resolved(mut self, resolution: Resolution) -> Self {
        self.status = match resolution {
            Resolution::Fixed | Resolution::Removed => IssueStatus::Closed,
            Resolution::FalsePositive | Resolution::WontFix => IssueStatus::Resolved,
        };
        self.resolution = Some(resolution);
        self
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    #[must_use]
    pub fn is_hotspot(&self) -> bool {
        self.issue_type == IssueType::SecurityHotspot
    }

    /// Whether the issue appeared after `snapshot_date`.
    #[must_use]
    pub fn is_new_since(&self, snapshot_date: i64) -> bool {
        self.created_at > snapshot_date.saturating_add(NEW_ISSUE_DATE_MARGIN_MS)
    }

    /// Metrics this issue adds one to.
    fn count_keys(&self) -> Vec<&'static str> {
        match (self.is_hotspot(), self.resolution) {
            (true, None) => vec![keys::SECURITY_HOTSPOTS],
            (true, Some(_)) => Vec::new(),
            (false, None) => {
                let mut out = vec![
                    keys::VIOLATIONS,
                    self.severity.violations_key(),
                    self.issue_type.count_key(),
                ];
                out.extend(self.status.count_key());
                out
            }
            (false, Some(resolution)) => resolution.count_key().into_iter().collect(),
        }
    }

    /// Metrics this issue adds one to for a period it is new in.
    fn new_count_keys(&self) -> Vec<&'static str> {
        match (self.is_hotspot(), self.is_resolved()) {
            (_, true) => Vec::new(),
            (true, false) => vec![keys::NEW_SECURITY_HOTSPOTS],
            (false, false) => vec![
                keys::NEW_VIOLATIONS,
                self.severity.new_violations_key(),
                self.issue_type.new_count_key(),
            ],
        }
    }
}

/// Issues of the current analysis.
pub trait IssueSource {
    fn issues(&self, component: &Component) -> &[Issue];
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryIssueSource {
    by_component: BTreeMap<ComponentRef, Vec<Issue>>,
}

impl InMemoryIssueSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, component: ComponentRef, issue: Issue) {
        self.by_component.entry(component).or_default().push(issue);
    }

    #[must_use]
    pub fn with(mut self, component: ComponentRef, issue: Issue) -> Self {
        self.add(component, issue);
        self
    }
}

impl IssueSource for InMemoryIssueSource {
    fn issues(&self, component: &Component) -> &[Issue] {
        self.by_component
            .get(&component.reference)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Issue counts by type, severity, status and resolution. Issues are read
/// on every component, not only leaves, and every component gets a value
/// for every count, zero included.
pub struct IssueCountFormula<'a> {
    issues: &'a dyn IssueSource,
}

impl<'a> IssueCountFormula<'a> {
    pub fn new(issues: &'a dyn IssueSource) -> Self {
        Self { issues }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IssueCounter {
    counts: BTreeMap<&'static str, i32>,
}

impl IssueCounter {
    fn add(&mut self, key: &'static str, count: i32) {
        let mine = self.counts.entry(key).or_default();
        *mine = mine.saturating_add(count);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> i32 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

impl Counter for IssueCounter {
    /// Seeded by [`IssueCountFormula`], which owns the issue source.
    fn initialize(&mut self, _context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        for (key, count) in &other.counts {
            self.add(*key, *count);
        }
    }
}

impl Formula for IssueCountFormula<'_> {
    type Counter = IssueCounter;

    fn create_new_counter(&self) -> IssueCounter {
        IssueCounter::default()
    }

    fn initialize_counter(
        &self,
        counter: &mut IssueCounter,
        context: &CounterInitializationContext<'_>,
    ) -> Result<(), FormulaError> {
        for issue in self.issues.issues(context.component()) {
            for key in issue.count_keys() {
                counter.add(key, 1);
            }
        }
        Ok(())
    }

    fn create_measure(&self, counter: &IssueCounter, context: &CreateMeasureContext<'_>) -> Option<Measure> {
        Some(Measure::int(counter.get(&context.metric().key)))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        ISSUE_COUNT_KEYS.to_vec()
    }

    fn seeds_every_component(&self) -> bool {
        true
    }
}

/// Unresolved issues created after each period's reference analysis, in
/// total, per severity and per type.
///
/// Every period gets a slot for every count, zero included, on every
/// component. Like [`IssueCountFormula`], issues are read on every component.
pub struct NewIssuesFormula<'a> {
    issues: &'a dyn IssueSource,
}

impl<'a> NewIssuesFormula<'a> {
    pub fn new(issues: &'a dyn IssueSource) -> Self {
        Self { issues }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewIssuesCounter {
    new_issues: BTreeMap<&'static str, PeriodValues<i32>>,
}

impl Counter for NewIssuesCounter {
    /// Seeded by [`NewIssuesFormula`], which owns the issue source.
    fn initialize(&mut self, _context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        for (key, values) in &other.new_issues {
            self.new_issues.entry(*key).or_default().increment_all(values);
        }
    }
}

impl Formula for NewIssuesFormula<'_> {
    type Counter = NewIssuesCounter;

    fn create_new_counter(&self) -> NewIssuesCounter {
        NewIssuesCounter::default()
    }

    fn initialize_counter(
        &self,
        counter: &mut NewIssuesCounter,
        context: &CounterInitializationContext<'_>,
    ) -> Result<(), FormulaError> {
        let issues = self.issues.issues(context.component());
        for period in context.periods() {
            for key in NEW_ISSUE_KEYS {
                counter.new_issues.entry(key).or_default().increment(period, 0);
            }
            for issue in issues.iter().filter(|i| i.is_new_since(period.snapshot_date)) {
                for key in issue.new_count_keys() {
                    counter.new_issues.entry(key).or_default().increment(period, 1);
                }
            }
        }
        Ok(())
    }

    fn create_measure(&self, counter: &NewIssuesCounter, context: &CreateMeasureContext<'_>) -> Option<Measure> {
        counter
            .new_issues
            .get(context.metric().key.as_str())?
            .to_variations(context.periods(), f64::from)
            .map(|variations| Measure::no_value().with_variations(variations))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        NEW_ISSUE_KEYS.to_vec()
    }

    fn seeds_every_component(&self) -> bool {
        true
    }
}
