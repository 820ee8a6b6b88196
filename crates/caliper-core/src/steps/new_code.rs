//! Issue counts and new-code measures.
//!
//! Report trees compute them from per-line SCM data and issues. Views have
//! neither: their project view leaves already carry the measures of the
//! projects they reference, so values and period slots are summed instead.

use caliper_formula::{BoxedFormula, SumFormula, VariationSumFormula, boxed};
use caliper_metric::keys;
use caliper_variation::{
    ISSUE_COUNT_KEYS, IssueCountFormula, NEW_ISSUE_KEYS, NewCoverageLinesFormula,
    NewCoverageRatioFormula, NewIssuesFormula, NewLinesFormula,
};

use super::ComputationStep;
use crate::{AnalysisContext, AnalysisError};

const NEW_COVERAGE_COUNTS: [&str; 4] = [
    keys::NEW_LINES_TO_COVER,
    keys::NEW_UNCOVERED_LINES,
    keys::NEW_CONDITIONS_TO_COVER,
    keys::NEW_UNCOVERED_CONDITIONS,
];

pub struct IssueMeasuresStep;

impl ComputationStep for IssueMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute issue measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let views = context.is_views();
        let parts = context.parts();
        let formulas: Vec<BoxedFormula<'_>> = if views {
            ISSUE_COUNT_KEYS
                .iter()
                .map(|key| boxed(SumFormula::int(*key)))
                .chain(
                    NEW_ISSUE_KEYS
                        .iter()
                        .map(|key| boxed(VariationSumFormula::new(*key))),
                )
                .collect()
        } else {
            vec![
                boxed(IssueCountFormula::new(parts.issues)),
                boxed(NewIssuesFormula::new(parts.issues)),
            ]
        };
        parts.run_formulas(formulas)
    }
}

pub struct NewLinesMeasuresStep;

impl ComputationStep for NewLinesMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute new lines"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let views = context.is_views();
        let parts = context.parts();
        let formula = if views {
            boxed(VariationSumFormula::new(keys::NEW_LINES))
        } else {
            boxed(NewLinesFormula::new(parts.scm))
        };
        parts.run_formulas(vec![formula])
    }
}

/// Coverage counts on new code, then the ratios derived from them. The
/// ratios read the counts' variations, so they run in a second pass.
pub struct NewCoverageMeasuresStep;

impl ComputationStep for NewCoverageMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute coverage on new code"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let views = context.is_views();
        let parts = context.parts();
        let counts: Vec<BoxedFormula<'_>> = if views {
            NEW_COVERAGE_COUNTS
                .iter()
                .map(|key| boxed(VariationSumFormula::new(*key)))
                .collect()
        } else {
            vec![boxed(NewCoverageLinesFormula::new(parts.scm))]
        };
        parts.run_formulas(counts)?;

        context.parts().run_formulas(vec![
            boxed(NewCoverageRatioFormula::lines_and_conditions(
                keys::NEW_COVERAGE,
                keys::NEW_LINES_TO_COVER,
                keys::NEW_UNCOVERED_LINES,
                keys::NEW_CONDITIONS_TO_COVER,
                keys::NEW_UNCOVERED_CONDITIONS,
            )),
            boxed(NewCoverageRatioFormula::single(
                keys::NEW_LINE_COVERAGE,
                keys::NEW_LINES_TO_COVER,
                keys::NEW_UNCOVERED_LINES,
            )),
            boxed(NewCoverageRatioFormula::single(
                keys::NEW_BRANCH_COVERAGE,
                keys::NEW_CONDITIONS_TO_COVER,
                keys::NEW_UNCOVERED_CONDITIONS,
            )),
        ])
    }
}
