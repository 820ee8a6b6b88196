//! Aggregation of the raw measures every report carries.

use caliper_formula::{
    AverageFormula, BoxedFormula, ComplementDensityFormula, DensityFormula, DistributionFormula,
    DuplicationDensityFormula, FileCountFormula, LinesAndConditionsCoverageFormula,
    SingleWithUncoveredFormula, SumFormula, boxed,
};
use caliper_metric::keys;

use super::ComputationStep;
use crate::{AnalysisContext, AnalysisError};

fn int_sums<'a>(metric_keys: &[&str]) -> Vec<BoxedFormula<'a>> {
    metric_keys
        .iter()
        .map(|key| boxed(SumFormula::int(*key)))
        .collect()
}

fn average<'a>(output: &str, main: &str, by: &str) -> Option<BoxedFormula<'a>> {
    AverageFormula::builder()
        .output(output)
        .main(main)
        .by(by)
        .build()
        .map(boxed)
}

pub struct SizeMeasuresStep;

impl ComputationStep for SizeMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute size measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let mut formulas = int_sums(&[
            keys::LINES,
            keys::NCLOC,
            keys::GENERATED_LINES,
            keys::GENERATED_NCLOC,
            keys::CLASSES,
            keys::FUNCTIONS,
            keys::STATEMENTS,
        ]);
        formulas.push(boxed(FileCountFormula::new(keys::FILES)));
        context.parts().run_formulas(formulas)
    }
}

pub struct CommentMeasuresStep;

impl ComputationStep for CommentMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute comment measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let mut formulas = int_sums(&[
            keys::COMMENT_LINES,
            keys::PUBLIC_API,
            keys::PUBLIC_UNDOCUMENTED_API,
        ]);
        formulas.push(boxed(DensityFormula::of_total(
            keys::COMMENT_LINES_DENSITY,
            keys::COMMENT_LINES,
            keys::NCLOC,
        )));
        formulas.push(boxed(ComplementDensityFormula::new(
            keys::PUBLIC_DOCUMENTED_API_DENSITY,
            keys::PUBLIC_API,
            [keys::PUBLIC_UNDOCUMENTED_API],
        )));
        context.parts().run_formulas(formulas)
    }
}

/// Sums, distributions and averages of complexity. Averages per file read
/// the `files` measure, so this runs after [`SizeMeasuresStep`]. A file
/// without a class count is taken as a single class.
pub struct ComplexityMeasuresStep;

impl ComputationStep for ComplexityMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute complexity measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let mut formulas = int_sums(&[
            keys::COMPLEXITY,
            keys::COMPLEXITY_IN_CLASSES,
            keys::COMPLEXITY_IN_FUNCTIONS,
            keys::COGNITIVE_COMPLEXITY,
        ]);
        formulas.push(boxed(DistributionFormula::new(
            keys::FUNCTION_COMPLEXITY_DISTRIBUTION,
        )));
        formulas.push(boxed(DistributionFormula::new(
            keys::FILE_COMPLEXITY_DISTRIBUTION,
        )));
        formulas.extend(average(keys::FILE_COMPLEXITY, keys::COMPLEXITY, keys::FILES));
        formulas.extend(
            AverageFormula::builder()
                .output(keys::CLASS_COMPLEXITY)
                .main(keys::COMPLEXITY_IN_CLASSES)
                .by(keys::CLASSES)
                .fallback(keys::FILES)
                .build()
                .map(boxed),
        );
        formulas.extend(average(
            keys::FUNCTION_COMPLEXITY,
            keys::COMPLEXITY_IN_FUNCTIONS,
            keys::FUNCTIONS,
        ));
        context.parts().run_formulas(formulas)
    }
}

/// Files without duplication data count as holding no duplicated lines,
/// blocks or files.
pub struct DuplicationMeasuresStep;

impl ComputationStep for DuplicationMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute duplication measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let mut formulas: Vec<BoxedFormula<'_>> = [
            keys::DUPLICATED_LINES,
            keys::DUPLICATED_BLOCKS,
            keys::DUPLICATED_FILES,
        ]
        .iter()
        .map(|key| boxed(SumFormula::int(*key).with_default_input(0)))
        .collect();
        formulas.push(boxed(
            DuplicationDensityFormula::new(
                keys::DUPLICATED_LINES_DENSITY,
                keys::DUPLICATED_LINES,
                keys::LINES,
                keys::NCLOC,
                keys::COMMENT_LINES,
            )
            .with_default_input(0.0),
        ));
        context.parts().run_formulas(formulas)
    }
}

pub struct CoverageMeasuresStep;

impl ComputationStep for CoverageMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute coverage measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let mut formulas = int_sums(&[
            keys::LINES_TO_COVER,
            keys::UNCOVERED_LINES,
            keys::CONDITIONS_TO_COVER,
            keys::UNCOVERED_CONDITIONS,
        ]);
        formulas.push(boxed(LinesAndConditionsCoverageFormula::new(
            keys::COVERAGE,
            keys::LINES_TO_COVER,
            keys::UNCOVERED_LINES,
            keys::CONDITIONS_TO_COVER,
            keys::UNCOVERED_CONDITIONS,
        )));
        formulas.push(boxed(SingleWithUncoveredFormula::new(
            keys::LINE_COVERAGE,
            keys::LINES_TO_COVER,
            keys::UNCOVERED_LINES,
        )));
        formulas.push(boxed(SingleWithUncoveredFormula::new(
            keys::BRANCH_COVERAGE,
            keys::CONDITIONS_TO_COVER,
            keys::UNCOVERED_CONDITIONS,
        )));
        context.parts().run_formulas(formulas)
    }
}

pub struct UnitTestMeasuresStep;

impl ComputationStep for UnitTestMeasuresStep {
    fn description(&self) -> &'static str {
        "Compute unit test measures"
    }

    fn execute(&self, context: &mut AnalysisContext) -> Result<(), AnalysisError> {
        let mut formulas = int_sums(&[
            keys::TESTS,
            keys::TEST_ERRORS,
            keys::TEST_FAILURES,
            keys::SKIPPED_TESTS,
        ]);
        formulas.push(boxed(SumFormula::long(keys::TEST_EXECUTION_TIME)));
        formulas.push(boxed(ComplementDensityFormula::new(
            keys::TEST_SUCCESS_DENSITY,
            keys::TESTS,
            [keys::TEST_ERRORS, keys::TEST_FAILURES],
        )));
        context.parts().run_formulas(formulas)
    }
}
