//! Built-in formulas.

mod average;
mod coverage;
mod density;
mod distribution;
mod files;
mod sum;
mod variation_sum;

pub use average::{AverageFormula, AverageFormulaBuilder};
pub use coverage::{LinesAndConditionsCoverageFormula, SingleWithUncoveredFormula};
pub use density::{ComplementDensityFormula, DensityFormula, DuplicationDensityFormula};
pub use distribution::DistributionFormula;
pub use files::FileCountFormula;
pub use sum::{SumFormula, Summable};
pub use variation_sum::VariationSumFormula;

use crate::CounterInitializationContext;

/// Sum of an optional `f64`, `None` until a value arrives.
pub(crate) fn add_opt(sum: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value {
        *sum = Some(sum.unwrap_or(0.0) + value);
    }
}

/// Numeric value of a leaf measure.
pub(crate) fn leaf_value(context: &CounterInitializationContext<'_>, key: &str) -> Option<f64> {
    context.measure(key).and_then(|m| m.numeric_value())
}

/// `100 * part / whole`, only for a positive `whole`.
pub(crate) fn percent(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0).then(|| 100.0 * part / whole)
}
