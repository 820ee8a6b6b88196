//! # caliper-variation
//!
//! **Tier 3 (History-aware measures)**
//!
//! Deltas against the analysis periods: plain variations of numeric raw
//! measures, and "new code" measures built from per-line SCM dates and
//! issue creation dates.
//!
//! ## What belongs here
//! * `compute_variations` over every numeric raw measure
//! * `ScmInfo`, `Issue` and the read-only sources they come from
//! * New-code formulas (`NewLinesFormula`, `NewCoverageLinesFormula`,
//!   `NewCoverageRatioFormula`, `NewIssuesFormula`) and `IssueCountFormula`,
//!   counting issues by type, severity, status and resolution
//!
//! ## What does NOT belong here
//! * Choosing the periods (see `caliper-period`)
//! * The formula protocol itself (see `caliper-formula`)

#![forbid(unsafe_code)]

mod issues;
mod new_coverage;
mod new_lines;
mod past;
mod scm;
mod variations;

use caliper_formula::FormulaError;
use caliper_metric::MetricError;
use caliper_repository::RepositoryError;
use thiserror::Error;

pub use issues::{
    ISSUE_COUNT_KEYS, InMemoryIssueSource, Issue, IssueCountFormula, IssueSource, IssueStatus,
    IssueType, NEW_ISSUE_DATE_MARGIN_MS, NEW_ISSUE_KEYS, NewIssuesFormula, Resolution, Severity,
};
pub use new_coverage::{NewCoverageLinesFormula, NewCoverageRatioFormula};
pub use new_lines::NewLinesFormula;
pub use past::{InMemoryPastMeasures, PastMeasures};
pub use scm::{Changeset, InMemoryScmInfoRepository, ScmInfo, ScmInfoRepository};
pub use variations::{VariationsVisitor, compute_variations};

/// Errors from variation computation.
#[derive(Debug, Error)]
pub enum VariationError {
    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Formula(#[from] FormulaError),
}
