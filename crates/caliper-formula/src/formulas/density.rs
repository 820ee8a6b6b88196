use caliper_measure::Measure;

use super::{add_opt, leaf_value, percent};
use crate::{
    Counter, CounterInitializationContext, CreateMeasureContext, Formula, FormulaError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Divisor {
    /// `num + denom`
    Total,
    /// `denom`
    Ratio,
}

/// Percentage of two summed metrics.
///
/// Both inputs must be present somewhere in the subtree, and the divisor
/// must be positive; otherwise no measure is written.
#[derive(Debug, Clone)]
pub struct DensityFormula {
    output: String,
    numerator: String,
    denominator: String,
    divisor: Divisor,
}

impl DensityFormula {
    /// `100 * num / (num + denom)`, e.g. comment lines density.
    pub fn of_total(
        output: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
            divisor: Divisor::Total,
        }
    }

    /// `100 * num / denom`.
    pub fn of_ratio(
        output: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        Self {
            divisor: Divisor::Ratio,
            ..Self::of_total(output, numerator, denominator)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DensityCounter {
    numerator: String,
    denominator: String,
    num: Option<f64>,
    denom: Option<f64>,
}

impl Counter for DensityCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        add_opt(&mut self.num, leaf_value(context, &self.numerator));
        add_opt(&mut self.denom, leaf_value(context, &self.denominator));
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        add_opt(&mut self.num, other.num);
        add_opt(&mut self.denom, other.denom);
    }
}

impl Formula for DensityFormula {
    type Counter = DensityCounter;

    fn create_new_counter(&self) -> DensityCounter {
        DensityCounter {
            numerator: self.numerator.clone(),
            denominator: self.denominator.clone(),
            ..DensityCounter::default()
        }
    }

    fn create_measure(&self, counter: &DensityCounter, _context: &CreateMeasureContext<'_>) -> Option<Measure> {
        let (num, denom) = (counter.num?, counter.denom?);
        let divisor = match self.divisor {
            Divisor::Total => num + denom,
            Divisor::Ratio => denom,
        };
        percent(num, divisor).map(Measure::double)
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}

/// `100 * duplicated_lines / lines`, or over `ncloc + comment_lines` when
/// `lines` is unknown.
#[derive(Debug, Clone)]
pub struct DuplicationDensityFormula {
    output: String,
    duplicated_lines: String,
    lines: String,
    ncloc: String,
    comment_lines: String,
    default_duplicated: Option<f64>,
}

impl DuplicationDensityFormula {
    pub fn new(
        output: impl Into<String>,
        duplicated_lines: impl Into<String>,
        lines: impl Into<String>,
        ncloc: impl Into<String>,
        comment_lines: impl Into<String>,
    ) -> Self {
        Self {
            output: output.into(),
            duplicated_lines: duplicated_lines.into(),
            lines: lines.into(),
            ncloc: ncloc.into(),
            comment_lines: comment_lines.into(),
            default_duplicated: None,
        }
    }

    /// Duplicated lines assumed for leaves without the metric.
    #[must_use]
    pub fn with_default_input(mut self, value: f64) -> Self {
        self.default_duplicated = Some(value);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DuplicationCounter {
    keys: [String; 4],
    default_duplicated: Option<f64>,
    duplicated: Option<f64>,
    lines: Option<f64>,
    ncloc: Option<f64>,
    comments: Option<f64>,
}

impl DuplicationCounter {
    fn divisor(&self) -> Option<f64> {
        self.lines.or_else(|| match (self.ncloc, self.comments) {
            (None, None) => None,
            (ncloc, comments) => Some(ncloc.unwrap_or(0.0) + comments.unwrap_or(0.0)),
        })
    }
}

impl Counter for DuplicationCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        let [duplicated, lines, ncloc, comments] = &self.keys;
        let values = [
            leaf_value(context, duplicated).or(self.default_duplicated),
            leaf_value(context, lines),
            leaf_value(context, ncloc),
            leaf_value(context, comments),
        ];
        add_opt(&mut self.duplicated, values[0]);
        add_opt(&mut self.lines, values[1]);
        add_opt(&mut self.ncloc, values[2]);
        add_opt(&mut self.comments, values[3]);
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        add_opt(&mut self.duplicated, other.duplicated);
        add_opt(&mut self.lines, other.lines);
        add_opt(&mut self.ncloc, other.ncloc);
        add_opt(&mut self.comments, other.comments);
    }
}

impl Formula for DuplicationDensityFormula {
    type Counter = DuplicationCounter;

    fn create_new_counter(&self) -> DuplicationCounter {
        DuplicationCounter {
            keys: [
                self.duplicated_lines.clone(),
                self.lines.clone(),
                self.ncloc.clone(),
                self.comment_lines.clone(),
            ],
            default_duplicated: self.default_duplicated,
            ..DuplicationCounter::default()
        }
    }

    fn create_measure(
        &self,
        counter: &DuplicationCounter,
        _context: &CreateMeasureContext<'_>,
    ) -> Option<Measure> {
        let duplicated = counter.duplicated?;
        percent(duplicated, counter.divisor()?).map(|d| Measure::double(d.min(100.0)))
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}

/// `100 * (total - sum(missing)) / total`, e.g. documented API density from
/// public API and undocumented API, or test success from tests, errors and
/// failures.
///
/// Requires a positive total and at least one of the `missing` inputs.
#[derive(Debug, Clone)]
pub struct ComplementDensityFormula {
    output: String,
    total: String,
    missing: Vec<String>,
}

impl ComplementDensityFormula {
    pub fn new<I, S>(output: impl Into<String>, total: impl Into<String>, missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output: output.into(),
            total: total.into(),
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplementCounter {
    total_key: String,
    missing_keys: Vec<String>,
    total: Option<f64>,
    missing: Option<f64>,
}

impl Counter for ComplementCounter {
    fn initialize(&mut self, context: &CounterInitializationContext<'_>) -> Result<(), FormulaError> {
        add_opt(&mut self.total, leaf_value(context, &self.total_key));
        for key in &self.missing_keys {
            add_opt(&mut self.missing, leaf_value(context, key));
        }
        Ok(())
    }

    fn aggregate(&mut self, other: &Self) {
        add_opt(&mut self.total, other.total);
        add_opt(&mut self.missing, other.missing);
    }
}

impl Formula for ComplementDensityFormula {
    type Counter = ComplementCounter;

    fn create_new_counter(&self) -> ComplementCounter {
        ComplementCounter {
            total_key: self.total.clone(),
            missing_keys: self.missing.clone(),
            ..ComplementCounter::default()
        }
    }

    fn create_measure(
        &self,
        counter: &ComplementCounter,
        _context: &CreateMeasureContext<'_>,
    ) -> Option<Measure> {
        let (total, missing) = (counter.total?, counter.missing?);
        percent(total - missing, total).map(Measure::double)
    }

    fn output_metric_keys(&self) -> Vec<&str> {
        vec![self.output.as_str()]
    }
}
