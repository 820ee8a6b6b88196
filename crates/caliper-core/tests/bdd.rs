//! BDD-style scenario tests for caliper-core.

use std::io::Write;

use caliper_component::{Component, ComponentTree, ComponentType};
use caliper_computer::{
    ComputerError, MeasureComputer, MeasureComputerContext, MeasureComputerDefinition,
};
use caliper_core::{AnalysisContext, ErrorCategory, analyze};
use caliper_measure::{Measure, MeasureVariations};
use caliper_metric::{Metric, MetricCatalog, ValueType, core_metrics, keys};
use caliper_period::{InMemorySnapshotHistory, PeriodMode, Snapshot};
use caliper_repository::MeasureRepository;
use caliper_settings::AnalysisSettings;
use caliper_variation::{
    Changeset, InMemoryIssueSource, InMemoryPastMeasures, InMemoryScmInfoRepository, Issue,
    ScmInfo, Severity,
};

const DAY: i64 = 86_400_000;
const ANALYSIS_DATE: i64 = 1_700_000_000_000;
const LAST_ANALYSIS: i64 = ANALYSIS_DATE - DAY;

const PROJECT: u32 = 1;
const DIRECTORY: u32 = 2;
const FILE_1: u32 = 3;
const FILE_2: u32 = 4;

fn project() -> Component {
    Component::builder(ComponentType::Project, PROJECT)
        .uuid("P")
        .version("1.1")
        .child(
            Component::builder(ComponentType::Directory, DIRECTORY)
                .uuid("D")
                .child(Component::builder(ComponentType::File, FILE_1).uuid("F1").build())
                .child(Component::builder(ComponentType::File, FILE_2).uuid("F2").build())
                .build(),
        )
        .build()
}

fn find(root: &Component, reference: u32) -> &Component {
    root.descendants()
        .find(|c| c.reference == reference)
        .expect("component in tree")
}

/// Raw measures of both files, as a report loader would store them.
fn file_measures(root: &Component) -> MeasureRepository {
    let catalog = core_metrics();
    let mut repository = MeasureRepository::new();
    let seeded: [(u32, &str, i32); 10] = [
        (FILE_1, keys::NCLOC, 30),
        (FILE_1, keys::COMMENT_LINES, 5),
        (FILE_1, keys::COMPLEXITY, 6),
        (FILE_1, keys::LINES_TO_COVER, 10),
        (FILE_1, keys::UNCOVERED_LINES, 4),
        (FILE_2, keys::NCLOC, 20),
        (FILE_2, keys::COMMENT_LINES, 0),
        (FILE_2, keys::COMPLEXITY, 2),
        (FILE_2, keys::LINES_TO_COVER, 10),
        (FILE_2, keys::UNCOVERED_LINES, 6),
    ];
    for (reference, key, value) in seeded {
        let metric = catalog.get_by_key(key).expect("core metric");
        repository
            .add(find(root, reference), metric, Measure::int(value))
            .expect("seeded");
    }
    repository
}

fn history() -> InMemorySnapshotHistory {
    InMemorySnapshotHistory::new()
        .with("P", Snapshot::processed(10, "s10", LAST_ANALYSIS - 10 * DAY).with_version("1.0"))
        .with("P", Snapshot::processed(11, "s11", LAST_ANALYSIS).with_version("1.1").last())
}

fn only_period1(value: &str) -> AnalysisSettings {
    AnalysisSettings::from_toml(&format!("[periods]\nperiod1 = \"{value}\"\n")).expect("valid toml")
}

fn int(context: &AnalysisContext, reference: u32, key: &str) -> Option<i32> {
    context
        .repository()
        .raw_by_ref(reference, key)
        .and_then(Measure::int_value)
}

fn double(context: &AnalysisContext, reference: u32, key: &str) -> Option<f64> {
    context
        .repository()
        .raw_by_ref(reference, key)
        .and_then(Measure::double_value)
}

fn variation(context: &AnalysisContext, reference: u32, key: &str, index: usize) -> Option<f64> {
    context
        .repository()
        .raw_by_ref(reference, key)
        .and_then(Measure::variations)
        .and_then(|v| v.get(index))
}

// =============================================================================
// Full analysis
// =============================================================================

#[test]
fn given_a_project_report_when_analyzed_then_measures_reach_the_root() {
    // Given two files with raw measures and no history
    let root = project();
    let measures = file_measures(&root);
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then sums, densities, averages and coverage are computed
    assert_eq!(int(&context, PROJECT, keys::NCLOC), Some(50));
    assert_eq!(int(&context, DIRECTORY, keys::COMMENT_LINES), Some(5));
    assert_eq!(int(&context, PROJECT, keys::FILES), Some(2));
    let density = double(&context, PROJECT, keys::COMMENT_LINES_DENSITY).unwrap();
    assert!((density - 100.0 * 5.0 / 55.0).abs() < 1e-9);
    assert_eq!(double(&context, FILE_2, keys::COMMENT_LINES_DENSITY), Some(0.0));
    assert_eq!(double(&context, PROJECT, keys::FILE_COMPLEXITY), Some(4.0));
    assert_eq!(double(&context, PROJECT, keys::LINE_COVERAGE), Some(50.0));
    assert_eq!(int(&context, PROJECT, keys::VIOLATIONS), Some(0));
    assert!(context.periods().is_empty());
}

#[test]
fn given_no_duplication_data_when_analyzed_then_the_project_has_no_duplication() {
    // Given a single file with 10 ncloc and 12 lines, and no duplication data
    let root = Component::builder(ComponentType::Project, PROJECT)
        .uuid("P")
        .child(Component::builder(ComponentType::File, FILE_1).uuid("F1").build())
        .build();
    let catalog = core_metrics();
    let mut measures = MeasureRepository::new();
    for (key, value) in [(keys::NCLOC, 10), (keys::LINES, 12)] {
        let metric = catalog.get_by_key(key).unwrap();
        measures
            .add(find(&root, FILE_1), metric, Measure::int(value))
            .unwrap();
    }
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then duplication counts are zero and so is the density
    assert_eq!(
        context.repository().raw_by_ref(PROJECT, keys::DUPLICATED_LINES),
        Some(&Measure::int(0))
    );
    assert_eq!(int(&context, PROJECT, keys::DUPLICATED_BLOCKS), Some(0));
    assert_eq!(int(&context, PROJECT, keys::DUPLICATED_FILES), Some(0));
    assert_eq!(double(&context, PROJECT, keys::DUPLICATED_LINES_DENSITY), Some(0.0));
}

#[test]
fn given_a_file_without_a_class_count_when_analyzed_then_it_counts_as_one_class() {
    // Given file1 with 8 complexity in classes and no class count
    let root = project();
    let mut measures = file_measures(&root);
    let catalog = core_metrics();
    let metric = catalog.get_by_key(keys::COMPLEXITY_IN_CLASSES).unwrap();
    measures
        .add(find(&root, FILE_1), metric, Measure::int(8))
        .unwrap();
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then the file count stands in for the class count
    assert_eq!(double(&context, FILE_1, keys::CLASS_COMPLEXITY), Some(8.0));
    assert_eq!(double(&context, PROJECT, keys::CLASS_COMPLEXITY), Some(8.0));
}

#[test]
fn given_history_when_analyzed_then_variations_and_new_code_are_computed() {
    // Given a previous analysis a day ago, new lines in file1, a new issue in file2
    let root = project();
    let measures = file_measures(&root);
    let scm = InMemoryScmInfoRepository::new()
        .with(FILE_1, ScmInfo::uniform(4, Changeset::at(LAST_ANALYSIS + 60_000)))
        .with(FILE_2, ScmInfo::uniform(2, Changeset::at(LAST_ANALYSIS - DAY)));
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("old", Severity::Minor, LAST_ANALYSIS - DAY))
        .with(FILE_2, Issue::new("new", Severity::Critical, LAST_ANALYSIS + 60_000));
    let past = InMemoryPastMeasures::new()
        .with("s11", "P", keys::NCLOC, 40.0)
        .with("s11", "F1", keys::NCLOC, 30.0);
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .settings(only_period1("previous_analysis"))
        .snapshot_history(history())
        .scm_info(scm)
        .issues(issues)
        .past_measures(past)
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then period 1 points at the last analysis
    let period = context.periods().period(1).expect("period 1");
    assert_eq!(period.mode, PeriodMode::PreviousAnalysis);
    assert_eq!(period.snapshot_date, LAST_ANALYSIS);
    // And variations compare against its measures
    assert_eq!(variation(&context, PROJECT, keys::NCLOC, 1), Some(10.0));
    assert_eq!(variation(&context, FILE_1, keys::NCLOC, 1), Some(0.0));
    // And new code follows the changesets and issue dates
    assert_eq!(variation(&context, PROJECT, keys::NEW_LINES, 1), Some(4.0));
    assert_eq!(variation(&context, PROJECT, keys::NEW_VIOLATIONS, 1), Some(1.0));
    assert_eq!(int(&context, PROJECT, keys::VIOLATIONS), Some(2));
    assert_eq!(int(&context, PROJECT, keys::CRITICAL_VIOLATIONS), Some(1));
}

#[test]
fn given_settings_in_a_file_when_loaded_then_the_days_period_is_used() {
    // Given settings on disk asking for a 10 day period
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[periods]\nperiod2 = \"10\"").unwrap();
    let settings = AnalysisSettings::from_file(file.path()).unwrap();
    let root = project();
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .settings(settings)
        .snapshot_history(history())
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then only period 2 exists and picks the snapshot nearest 10 days back
    assert!(context.periods().period(1).is_none());
    let period = context.periods().period(2).expect("period 2");
    assert_eq!(period.mode, PeriodMode::Days);
    assert_eq!(period.mode_parameter.as_deref(), Some("10"));
    assert_eq!(period.analysis_uuid, "s10");
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn given_a_view_when_analyzed_then_project_view_values_are_summed() {
    // Given a view over two projects carrying their own measures
    let pv1 = Component::builder(ComponentType::ProjectView, 11).uuid("PV1").build();
    let pv2 = Component::builder(ComponentType::ProjectView, 12).uuid("PV2").build();
    let root = Component::builder(ComponentType::View, 1)
        .uuid("V")
        .child(
            Component::builder(ComponentType::Subview, 2)
                .uuid("SV")
                .child(pv1.clone())
                .child(pv2.clone())
                .build(),
        )
        .build();
    let catalog = core_metrics();
    let mut measures = MeasureRepository::new();
    for (pv, ncloc, files, new_issues) in [(&pv1, 100, 4, 2.0), (&pv2, 50, 3, 1.0)] {
        let add = |repository: &mut MeasureRepository, key: &str, measure: Measure| {
            repository
                .add(pv, catalog.get_by_key(key).unwrap(), measure)
                .unwrap();
        };
        add(&mut measures, keys::NCLOC, Measure::int(ncloc));
        add(&mut measures, keys::FILES, Measure::int(files));
        add(&mut measures, keys::VIOLATIONS, Measure::int(files));
        add(
            &mut measures,
            keys::NEW_VIOLATIONS,
            Measure::no_value().with_variations(MeasureVariations::new().with(1, new_issues)),
        );
    }
    let history = InMemorySnapshotHistory::new().with("V", Snapshot::processed(5, "v5", LAST_ANALYSIS));
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .settings(only_period1("previous_analysis"))
        .snapshot_history(history)
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then values and period slots are summed up to the view
    assert!(context.is_views());
    assert_eq!(int(&context, 1, keys::NCLOC), Some(150));
    assert_eq!(int(&context, 2, keys::FILES), Some(7));
    assert_eq!(int(&context, 1, keys::VIOLATIONS), Some(7));
    assert_eq!(variation(&context, 1, keys::NEW_VIOLATIONS, 1), Some(3.0));
}

// =============================================================================
// Measure computers
// =============================================================================

struct DoubleNcloc {
    definition: MeasureComputerDefinition,
}

impl DoubleNcloc {
    fn new() -> Self {
        Self {
            definition: MeasureComputerDefinition::builder()
                .input_metrics([keys::NCLOC])
                .output_metrics(["double_ncloc"])
                .build()
                .unwrap(),
        }
    }
}

impl MeasureComputer for DoubleNcloc {
    fn name(&self) -> &str {
        "DoubleNcloc"
    }

    fn definition(&self) -> &MeasureComputerDefinition {
        &self.definition
    }

    fn compute(&self, context: &mut MeasureComputerContext<'_>) -> Result<(), ComputerError> {
        if let Some(ncloc) = context.measure(keys::NCLOC)?.and_then(Measure::int_value) {
            context.add_int("double_ncloc", ncloc * 2)?;
        }
        Ok(())
    }
}

/// Declares `inputs` and `outputs` and does nothing.
struct Declared {
    name: &'static str,
    definition: MeasureComputerDefinition,
}

impl Declared {
    fn new(name: &'static str, inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            name,
            definition: MeasureComputerDefinition::builder()
                .input_metrics(inputs.iter().copied())
                .output_metrics(outputs.iter().copied())
                .build()
                .unwrap(),
        }
    }
}

impl MeasureComputer for Declared {
    fn name(&self) -> &str {
        self.name
    }

    fn definition(&self) -> &MeasureComputerDefinition {
        &self.definition
    }

    fn compute(&self, _context: &mut MeasureComputerContext<'_>) -> Result<(), ComputerError> {
        Ok(())
    }
}

#[test]
fn given_a_plugin_computer_when_analyzed_then_it_sees_aggregated_inputs() {
    // Given a computer doubling ncloc, and a past value of its output
    let root = project();
    let measures = file_measures(&root);
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .settings(only_period1("previous_analysis"))
        .snapshot_history(history())
        .past_measures(InMemoryPastMeasures::new().with("s11", "P", "double_ncloc", 60.0))
        .plugin_metric(Metric::new(50_000, "double_ncloc", "Double ncloc", ValueType::Int))
        .measure_computer(DoubleNcloc::new())
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    analyze(&mut context).unwrap();

    // Then the computer ran on every level, and its output has a variation
    assert_eq!(context.computers().names(), vec!["DoubleNcloc"]);
    assert_eq!(int(&context, FILE_2, "double_ncloc"), Some(40));
    assert_eq!(int(&context, PROJECT, "double_ncloc"), Some(100));
    assert_eq!(variation(&context, PROJECT, "double_ncloc", 1), Some(40.0));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn given_computers_in_a_loop_when_analyzed_then_nothing_is_computed() {
    // Given two computers feeding each other
    let root = project();
    let measures = file_measures(&root);
    let seeded = measures.len();
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .plugin_metric(Metric::new(50_001, "x", "X", ValueType::Int))
        .plugin_metric(Metric::new(50_002, "y", "Y", ValueType::Int))
        .measure_computer(Declared::new("A", &["x"], &["y"]))
        .measure_computer(Declared::new("B", &["y"], &["x"]))
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    let err = analyze(&mut context).unwrap_err();

    // Then it aborts with a cycle before any measure is aggregated
    assert_eq!(err.category(), ErrorCategory::CycleError);
    assert_eq!(context.repository().len(), seeded);
}

#[test]
fn given_a_computer_reading_an_unknown_metric_when_analyzed_then_a_dependency_is_missing() {
    // Given a computer reading a metric nobody declares
    let root = project();
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .plugin_metric(Metric::new(50_001, "x", "X", ValueType::Int))
        .measure_computer(Declared::new("A", &["nowhere"], &["x"]))
        .build()
        .unwrap();

    // When the analysis runs
    let err = analyze(&mut context).unwrap_err();

    // Then the missing dependency is reported
    assert_eq!(err.category(), ErrorCategory::MissingDependencyError);
}

#[test]
fn given_a_conflicting_project_measure_when_analyzed_then_a_duplicate_is_reported() {
    // Given a project already carrying an ncloc that differs from its files
    let root = project();
    let mut measures = file_measures(&root);
    measures
        .add(&root, core_metrics().get_by_key(keys::NCLOC).unwrap(), Measure::int(99))
        .unwrap();
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .measures(measures)
        .build()
        .unwrap();

    // When the analysis runs
    let err = analyze(&mut context).unwrap_err();

    // Then the sum conflicts with it
    assert_eq!(err.category(), ErrorCategory::DuplicateMeasureError);
}

#[test]
fn given_a_negative_number_of_days_when_analyzed_then_configuration_is_rejected() {
    // Given period1 = -3
    let root = project();
    let mut context = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .settings(only_period1("-3"))
        .snapshot_history(history())
        .build()
        .unwrap();

    // When the analysis runs
    let err = analyze(&mut context).unwrap_err();

    // Then it is a configuration error
    assert_eq!(err.category(), ErrorCategory::ConfigurationError);
    assert_eq!(err.category().to_string(), "configuration_error");
}

#[test]
fn given_a_plugin_metric_named_like_a_core_one_when_built_then_it_is_rejected() {
    // Given a plugin redeclaring ncloc
    let root = project();

    // When the context is built
    let result = AnalysisContext::builder(ComponentTree::new(root).unwrap(), ANALYSIS_DATE)
        .plugin_metric(Metric::new(50_000, keys::NCLOC, "Ncloc", ValueType::Int))
        .build();

    // Then the clash is reported
    assert!(result.is_err());
}
