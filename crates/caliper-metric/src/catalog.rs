//! Metric catalog contract and in-memory implementation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::keys;
use crate::{Metric, ValueType};

/// Errors from metric lookups and registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("Metric with key '{0}' does not exist")]
    UnknownMetric(String),

    #[error("Metric with key '{0}' is already registered")]
    DuplicateKey(String),

    #[error("Metric with id {0} is already registered")]
    DuplicateId(u32),
}

/// Lookup contract for the metrics known to an analysis.
pub trait MetricCatalog {
    /// Metric for `key`, failing when it is unknown.
    fn get_by_key(&self, key: &str) -> Result<&Metric, MetricError> {
        self.find_by_key(key)
            .ok_or_else(|| MetricError::UnknownMetric(key.to_string()))
    }

    fn find_by_key(&self, key: &str) -> Option<&Metric>;

    /// All metrics, ordered by key.
    fn all(&self) -> Vec<&Metric>;
}

/// In-memory catalog keyed by metric key.
#[derive(Debug, Clone, Default)]
pub struct MetricRepository {
    by_key: BTreeMap<String, Metric>,
}

impl MetricRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list, rejecting duplicated keys or ids.
    pub fn from_metrics<I>(metrics: I) -> Result<Self, MetricError>
    where
        I: IntoIterator<Item = Metric>,
    {
        let mut repo = Self::new();
        for metric in metrics {
            repo.register(metric)?;
        }
        Ok(repo)
    }

    pub fn register(&mut self, metric: Metric) -> Result<(), MetricError> {
        if self.by_key.contains_key(&metric.key) {
            return Err(MetricError::DuplicateKey(metric.key));
        }
        if self.by_key.values().any(|m| m.id == metric.id) {
            return Err(MetricError::DuplicateId(metric.id));
        }
        self.by_key.insert(metric.key.clone(), metric);
        Ok(())
    }

    /// Register a metric with the next free id.
    pub fn register_new(
        &mut self,
        key: &str,
        name: &str,
        value_type: ValueType,
    ) -> Result<&Metric, MetricError> {
        let id = self.by_key.values().map(|m| m.id).max().unwrap_or(0) + 1;
        self.register(Metric::new(id, key, name, value_type))?;
        self.get_by_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl MetricCatalog for MetricRepository {
    fn find_by_key(&self, key: &str) -> Option<&Metric> {
        self.by_key.get(key)
    }

    fn all(&self) -> Vec<&Metric> {
        self.by_key.values().collect()
    }
}

const CORE: &[(&str, &str, ValueType)] = &[
    (keys::LINES, "Lines", ValueType::Int),
    (keys::NCLOC, "Lines of Code", ValueType::Int),
    (keys::NCLOC_DATA, "ncloc_data", ValueType::Data),
    (keys::NCLOC_LANGUAGE_DISTRIBUTION, "Lines of Code Per Language", ValueType::Data),
    (keys::FILES, "Files", ValueType::Int),
    (keys::DIRECTORIES, "Directories", ValueType::Int),
    (keys::CLASSES, "Classes", ValueType::Int),
    (keys::FUNCTIONS, "Functions", ValueType::Int),
    (keys::STATEMENTS, "Statements", ValueType::Int),
    (keys::GENERATED_LINES, "Generated Lines", ValueType::Int),
    (keys::GENERATED_NCLOC, "Generated Lines of Code", ValueType::Int),
    (keys::NEW_LINES, "New Lines", ValueType::Int),
    (keys::COMMENT_LINES, "Comment Lines", ValueType::Int),
    (keys::COMMENT_LINES_DENSITY, "Comments (%)", ValueType::Double),
    (keys::PUBLIC_API, "Public API", ValueType::Int),
    (keys::PUBLIC_UNDOCUMENTED_API, "Public Undocumented API", ValueType::Int),
    (keys::PUBLIC_DOCUMENTED_API_DENSITY, "Public Documented API (%)", ValueType::Double),
    (keys::COMPLEXITY, "Cyclomatic Complexity", ValueType::Int),
    (keys::FILE_COMPLEXITY, "Complexity / File", ValueType::Double),
    (keys::FILE_COMPLEXITY_DISTRIBUTION, "File Distribution / Complexity", ValueType::Data),
    (keys::COMPLEXITY_IN_CLASSES, "Complexity in Classes", ValueType::Int),
    (keys::CLASS_COMPLEXITY, "Complexity / Class", ValueType::Double),
    (keys::COMPLEXITY_IN_FUNCTIONS, "Complexity in Functions", ValueType::Int),
    (keys::FUNCTION_COMPLEXITY, "Complexity / Function", ValueType::Double),
    (keys::FUNCTION_COMPLEXITY_DISTRIBUTION, "Function Distribution / Complexity", ValueType::Data),
    (keys::COGNITIVE_COMPLEXITY, "Cognitive Complexity", ValueType::Int),
    (keys::DUPLICATED_LINES, "Duplicated Lines", ValueType::Int),
    (keys::DUPLICATED_BLOCKS, "Duplicated Blocks", ValueType::Int),
    (keys::DUPLICATED_FILES, "Duplicated Files", ValueType::Int),
    (keys::DUPLICATED_LINES_DENSITY, "Duplicated Lines (%)", ValueType::Double),
    (keys::TESTS, "Unit Tests", ValueType::Int),
    (keys::TEST_EXECUTION_TIME, "Unit Test Duration", ValueType::Long),
    (keys::TEST_ERRORS, "Unit Test Errors", ValueType::Int),
    (keys::SKIPPED_TESTS, "Skipped Unit Tests", ValueType::Int),
    (keys::TEST_FAILURES, "Unit Test Failures", ValueType::Int),
    (keys::TEST_SUCCESS_DENSITY, "Unit Test Success (%)", ValueType::Double),
    (keys::COVERAGE, "Coverage", ValueType::Double),
    (keys::LINES_TO_COVER, "Lines to Cover", ValueType::Int),
    (keys::UNCOVERED_LINES, "Uncovered Lines", ValueType::Int),
    (keys::LINE_COVERAGE, "Line Coverage", ValueType::Double),
    (keys::CONDITIONS_TO_COVER, "Conditions to Cover", ValueType::Int),
    (keys::UNCOVERED_CONDITIONS, "Uncovered Conditions", ValueType::Int),
    (keys::BRANCH_COVERAGE, "Condition Coverage", ValueType::Double),
    (keys::COVERAGE_LINE_HITS_DATA, "Coverage Hits by Line", ValueType::Data),
    (keys::CONDITIONS_BY_LINE, "Conditions by Line", ValueType::Data),
    (keys::COVERED_CONDITIONS_BY_LINE, "Covered Conditions by Line", ValueType::Data),
    (keys::NEW_COVERAGE, "Coverage on New Code", ValueType::Double),
    (keys::NEW_LINES_TO_COVER, "Lines to Cover on New Code", ValueType::Int),
    (keys::NEW_UNCOVERED_LINES, "Uncovered Lines on New Code", ValueType::Int),
    (keys::NEW_LINE_COVERAGE, "Line Coverage on New Code", ValueType::Double),
    (keys::NEW_CONDITIONS_TO_COVER, "Conditions to Cover on New Code", ValueType::Int),
    (keys::NEW_UNCOVERED_CONDITIONS, "Uncovered Conditions on New Code", ValueType::Int),
    (keys::NEW_BRANCH_COVERAGE, "Condition Coverage on New Code", ValueType::Double),
    (keys::VIOLATIONS, "Issues", ValueType::Int),
    (keys::NEW_VIOLATIONS, "New Issues", ValueType::Int),
    (keys::BLOCKER_VIOLATIONS, "Blocker Issues", ValueType::Int),
    (keys::CRITICAL_VIOLATIONS, "Critical Issues", ValueType::Int),
    (keys::MAJOR_VIOLATIONS, "Major Issues", ValueType::Int),
    (keys::MINOR_VIOLATIONS, "Minor Issues", ValueType::Int),
    (keys::INFO_VIOLATIONS, "Info Issues", ValueType::Int),
    (keys::NEW_BLOCKER_VIOLATIONS, "New Blocker Issues", ValueType::Int),
    (keys::NEW_CRITICAL_VIOLATIONS, "New Critical Issues", ValueType::Int),
    (keys::NEW_MAJOR_VIOLATIONS, "New Major Issues", ValueType::Int),
    (keys::NEW_MINOR_VIOLATIONS, "New Minor Issues", ValueType::Int),
    (keys::NEW_INFO_VIOLATIONS, "New Info Issues", ValueType::Int),
    (keys::OPEN_ISSUES, "Open Issues", ValueType::Int),
    (keys::REOPENED_ISSUES, "Reopened Issues", ValueType::Int),
    (keys::CONFIRMED_ISSUES, "Confirmed Issues", ValueType::Int),
    (keys::FALSE_POSITIVE_ISSUES, "False Positive Issues", ValueType::Int),
    (keys::WONT_FIX_ISSUES, "Won't Fix Issues", ValueType::Int),
    (keys::CODE_SMELLS, "Code Smells", ValueType::Int),
    (keys::BUGS, "Bugs", ValueType::Int),
    (keys::VULNERABILITIES, "Vulnerabilities", ValueType::Int),
    (keys::SECURITY_HOTSPOTS, "Security Hotspots", ValueType::Int),
    (keys::NEW_CODE_SMELLS, "New Code Smells", ValueType::Int),
    (keys::NEW_BUGS, "New Bugs", ValueType::Int),
    (keys::NEW_VULNERABILITIES, "New Vulnerabilities", ValueType::Int),
    (keys::NEW_SECURITY_HOTSPOTS, "New Security Hotspots", ValueType::Int),
    (keys::ALERT_STATUS, "Quality Gate Status", ValueType::Level),
    (keys::QUALITY_GATE_DETAILS, "Quality Gate Details", ValueType::Data),
];

/// Keys of every core metric, in declaration order.
pub fn core_metric_keys() -> impl Iterator<Item = &'static str> {
    CORE.iter().map(|(key, _, _)| *key)
}

/// Catalog holding every core metric. Doubles are scaled to one decimal.
#[must_use]
pub fn core_metrics() -> MetricRepository {
    let mut by_key = BTreeMap::new();
    for (id, (key, name, value_type)) in (1u32..).zip(CORE.iter()) {
        let mut metric = Metric::new(id, *key, *name, *value_type);
        if *value_type == ValueType::Double {
            metric = metric.with_decimal_scale(1);
        }
        by_key.insert((*key).to_string(), metric);
    }
    MetricRepository { by_key }
}
