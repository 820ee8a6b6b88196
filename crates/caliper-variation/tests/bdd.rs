//! BDD-style scenario tests for caliper-variation.

use caliper_component::{Component, ComponentType};
use caliper_formula::{FormulaExecutor, boxed};
use caliper_measure::Measure;
use caliper_metric::{MetricCatalog, MetricRepository, core_metrics, keys};
use caliper_period::{Period, PeriodMode, PeriodsHolder};
use caliper_repository::MeasureRepository;
use caliper_variation::{
    Changeset, InMemoryIssueSource, InMemoryPastMeasures, InMemoryScmInfoRepository, Issue,
    IssueCountFormula, IssueStatus, IssueType, NewCoverageLinesFormula, NewCoverageRatioFormula,
    NewIssuesFormula, NewLinesFormula, Resolution, ScmInfo, Severity, compute_variations,
};

const PROJECT: u32 = 1;
const DIRECTORY: u32 = 12;
const FILE_1: u32 = 121;
const FILE_2: u32 = 122;
const FILE_3: u32 = 123;

/// 2009-12-25, the reference analysis of period 1.
const PERIOD_DATE: i64 = 1_261_699_200_000;
const BEFORE: i64 = PERIOD_DATE - 10_000;
const AFTER: i64 = PERIOD_DATE + 10_000;

fn project() -> Component {
    Component::builder(ComponentType::Project, PROJECT)
        .uuid("P")
        .child(
            Component::builder(ComponentType::Directory, DIRECTORY)
                .uuid("D")
                .child(Component::builder(ComponentType::File, FILE_1).uuid("F1").build())
                .child(Component::builder(ComponentType::File, FILE_2).uuid("F2").build())
                .child(Component::builder(ComponentType::File, FILE_3).uuid("F3").build())
                .build(),
        )
        .build()
}

fn periods() -> PeriodsHolder {
    PeriodsHolder::new(vec![Period {
        index: 1,
        mode: PeriodMode::PreviousAnalysis,
        mode_parameter: Some("2009-12-25".to_string()),
        snapshot_date: PERIOD_DATE,
        snapshot_id: 1000,
        analysis_uuid: "u1".to_string(),
    }])
    .expect("valid periods")
}

fn find(root: &Component, reference: u32) -> &Component {
    root.descendants()
        .find(|c| c.reference == reference)
        .expect("component in tree")
}

fn seed(
    repository: &mut MeasureRepository,
    catalog: &MetricRepository,
    component: &Component,
    key: &str,
    measure: Measure,
) {
    let metric = catalog.get_by_key(key).expect("core metric");
    repository.add(component, metric, measure).expect("seeded");
}

fn variation(repository: &MeasureRepository, reference: u32, key: &str, index: usize) -> Option<f64> {
    repository
        .raw_by_ref(reference, key)
        .and_then(Measure::variations)
        .and_then(|v| v.get(index))
}

// =============================================================================
// New lines
// =============================================================================

#[test]
fn given_changesets_after_the_period_when_new_lines_run_then_they_are_counted() {
    // Given file1 with 3 new lines out of 4, file2 all old, file3 without SCM
    let root = project();
    let catalog = core_metrics();
    let periods = periods();
    let scm = InMemoryScmInfoRepository::new()
        .with(
            FILE_1,
            ScmInfo::uniform(3, Changeset::at(AFTER)).with_line(4, Changeset::at(BEFORE)),
        )
        .with(FILE_2, ScmInfo::uniform(5, Changeset::at(BEFORE)));
    let mut repository = MeasureRepository::new();

    // When the new lines formula runs
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([boxed(NewLinesFormula::new(&scm))])
        .unwrap()
        .visit(&root)
        .unwrap();

    // Then counts flow up and the file without SCM has no measure
    assert_eq!(variation(&repository, FILE_1, keys::NEW_LINES, 1), Some(3.0));
    assert_eq!(variation(&repository, FILE_2, keys::NEW_LINES, 1), Some(0.0));
    assert_eq!(repository.raw_by_ref(FILE_3, keys::NEW_LINES), None);
    assert_eq!(variation(&repository, PROJECT, keys::NEW_LINES, 1), Some(3.0));
    assert_eq!(
        repository
            .raw_by_ref(PROJECT, keys::NEW_LINES)
            .map(Measure::value_type),
        Some(caliper_metric::ValueType::NoValue)
    );
}

#[test]
fn given_ncloc_data_when_new_lines_run_then_only_code_lines_count() {
    // Given all lines new, but line 2 is a comment
    let root = project();
    let catalog = core_metrics();
    let periods = periods();
    let scm = InMemoryScmInfoRepository::new().with(FILE_1, ScmInfo::uniform(3, Changeset::at(AFTER)));
    let mut repository = MeasureRepository::new();
    seed(
        &mut repository,
        &catalog,
        find(&root, FILE_1),
        keys::NCLOC_DATA,
        Measure::data_value("1=1;2=0;3=1"),
    );

    // When the new lines formula runs
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([boxed(NewLinesFormula::new(&scm))])
        .unwrap()
        .visit(&root)
        .unwrap();

    // Then the comment line is left out
    assert_eq!(variation(&repository, FILE_1, keys::NEW_LINES, 1), Some(2.0));
}

// =============================================================================
// New coverage
// =============================================================================

#[test]
fn given_line_hits_on_new_lines_when_new_coverage_runs_then_counts_and_ratios_follow() {
    // Given file1: lines 1-3 new, 4 old; hits 1:2 2:0 3:1 4:0;
    // conditions on line 3 (4, 1 covered) and line 4 (2, 0 covered)
    let root = project();
    let catalog = core_metrics();
    let periods = periods();
    let scm = InMemoryScmInfoRepository::new().with(
        FILE_1,
        ScmInfo::uniform(3, Changeset::at(AFTER)).with_line(4, Changeset::at(BEFORE)),
    );
    let mut repository = MeasureRepository::new();
    let file = find(&root, FILE_1);
    seed(&mut repository, &catalog, file, keys::COVERAGE_LINE_HITS_DATA, Measure::data_value("1=2;2=0;3=1;4=0"));
    seed(&mut repository, &catalog, file, keys::CONDITIONS_BY_LINE, Measure::data_value("3=4;4=2"));
    seed(&mut repository, &catalog, file, keys::COVERED_CONDITIONS_BY_LINE, Measure::data_value("3=1;4=0"));

    // When the counts, then the ratios, are computed
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([boxed(NewCoverageLinesFormula::new(&scm))])
        .unwrap()
        .visit(&root)
        .unwrap();
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([
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
        ])
        .unwrap()
        .visit(&root)
        .unwrap();

    // Then only the new lines count
    assert_eq!(variation(&repository, PROJECT, keys::NEW_LINES_TO_COVER, 1), Some(3.0));
    assert_eq!(variation(&repository, PROJECT, keys::NEW_UNCOVERED_LINES, 1), Some(1.0));
    assert_eq!(variation(&repository, PROJECT, keys::NEW_CONDITIONS_TO_COVER, 1), Some(4.0));
    assert_eq!(variation(&repository, PROJECT, keys::NEW_UNCOVERED_CONDITIONS, 1), Some(3.0));
    // (3 + 4 - 1 - 3) / (3 + 4)
    let new_coverage = variation(&repository, PROJECT, keys::NEW_COVERAGE, 1).unwrap();
    assert!((new_coverage - 100.0 * 3.0 / 7.0).abs() < 1e-9);
    let new_line_coverage = variation(&repository, PROJECT, keys::NEW_LINE_COVERAGE, 1).unwrap();
    assert!((new_line_coverage - 100.0 * 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn given_no_line_hits_when_new_coverage_runs_then_nothing_is_written() {
    // Given SCM data but no coverage
    let root = project();
    let catalog = core_metrics();
    let periods = periods();
    let scm = InMemoryScmInfoRepository::new().with(FILE_1, ScmInfo::uniform(3, Changeset::at(AFTER)));
    let mut repository = MeasureRepository::new();

    // When the new coverage formula runs
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([boxed(NewCoverageLinesFormula::new(&scm))])
        .unwrap()
        .visit(&root)
        .unwrap();

    // Then no component gets a new coverage count
    assert!(repository.is_empty());
}

// =============================================================================
// Issues
// =============================================================================

fn count_issues(root: &Component, issues: &InMemoryIssueSource) -> MeasureRepository {
    let catalog = core_metrics();
    let periods = periods();
    let mut repository = MeasureRepository::new();
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([
            boxed(IssueCountFormula::new(issues)),
            boxed(NewIssuesFormula::new(issues)),
        ])
        .unwrap()
        .visit(root)
        .unwrap();
    repository
}

fn count(repository: &MeasureRepository, reference: u32, key: &str) -> Option<i32> {
    repository.raw_by_ref(reference, key).and_then(Measure::int_value)
}

fn hotspot(created_at: i64) -> Issue {
    Issue::new("hotspot", Severity::Major, created_at).with_type(IssueType::SecurityHotspot)
}

#[test]
fn given_issues_in_several_statuses_when_counted_then_unresolved_ones_are_counted_per_status() {
    // Given open, confirmed and resolved issues, and an open hotspot
    let root = project();
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("a", Severity::Blocker, BEFORE))
        .with(FILE_1, Issue::new("b", Severity::Major, BEFORE).resolved(Resolution::Fixed))
        .with(FILE_1, Issue::new("c", Severity::Major, BEFORE).resolved(Resolution::FalsePositive))
        .with(FILE_2, Issue::new("d", Severity::Blocker, BEFORE).with_status(IssueStatus::Confirmed))
        .with(FILE_2, Issue::new("e", Severity::Major, BEFORE).with_status(IssueStatus::Confirmed))
        .with(FILE_3, hotspot(BEFORE));

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then only unresolved issues other than hotspots are violations
    assert_eq!(count(&repository, FILE_1, keys::VIOLATIONS), Some(1));
    assert_eq!(count(&repository, FILE_1, keys::OPEN_ISSUES), Some(1));
    assert_eq!(count(&repository, FILE_1, keys::CONFIRMED_ISSUES), Some(0));
    assert_eq!(count(&repository, FILE_2, keys::VIOLATIONS), Some(2));
    assert_eq!(count(&repository, FILE_2, keys::OPEN_ISSUES), Some(0));
    assert_eq!(count(&repository, FILE_2, keys::CONFIRMED_ISSUES), Some(2));
    assert_eq!(count(&repository, FILE_3, keys::VIOLATIONS), Some(0));
    assert_eq!(count(&repository, FILE_3, keys::OPEN_ISSUES), Some(0));
    assert_eq!(count(&repository, PROJECT, keys::VIOLATIONS), Some(3));
    assert_eq!(count(&repository, PROJECT, keys::OPEN_ISSUES), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::CONFIRMED_ISSUES), Some(2));
}

#[test]
fn given_resolved_issues_when_counted_then_they_are_counted_per_resolution() {
    // Given false positives and won't fix issues, one of them a hotspot
    let root = project();
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("a", Severity::Blocker, BEFORE))
        .with(FILE_1, Issue::new("b", Severity::Major, BEFORE).resolved(Resolution::Fixed))
        .with(FILE_1, Issue::new("c", Severity::Major, BEFORE).resolved(Resolution::FalsePositive))
        .with(FILE_1, Issue::new("d", Severity::Major, BEFORE).resolved(Resolution::WontFix))
        .with(FILE_2, Issue::new("e", Severity::Blocker, BEFORE).with_status(IssueStatus::Confirmed))
        .with(FILE_2, Issue::new("f", Severity::Major, BEFORE).with_status(IssueStatus::Confirmed))
        .with(FILE_2, Issue::new("g", Severity::Major, BEFORE).resolved(Resolution::WontFix))
        .with(FILE_3, hotspot(BEFORE).resolved(Resolution::WontFix));

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then resolutions are counted, the hotspot excluded
    assert_eq!(count(&repository, FILE_1, keys::VIOLATIONS), Some(1));
    assert_eq!(count(&repository, FILE_1, keys::FALSE_POSITIVE_ISSUES), Some(1));
    assert_eq!(count(&repository, FILE_1, keys::WONT_FIX_ISSUES), Some(1));
    assert_eq!(count(&repository, FILE_2, keys::VIOLATIONS), Some(2));
    assert_eq!(count(&repository, FILE_2, keys::FALSE_POSITIVE_ISSUES), Some(0));
    assert_eq!(count(&repository, FILE_2, keys::WONT_FIX_ISSUES), Some(1));
    assert_eq!(count(&repository, FILE_3, keys::WONT_FIX_ISSUES), Some(0));
    assert_eq!(count(&repository, PROJECT, keys::VIOLATIONS), Some(3));
    assert_eq!(count(&repository, PROJECT, keys::FALSE_POSITIVE_ISSUES), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::WONT_FIX_ISSUES), Some(2));
}

#[test]
fn given_unresolved_issues_when_counted_then_they_are_counted_per_severity() {
    // Given blocker and major issues, one fixed, and a major hotspot
    let root = project();
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("a", Severity::Blocker, BEFORE))
        .with(FILE_1, Issue::new("b", Severity::Major, BEFORE).resolved(Resolution::Fixed))
        .with(FILE_2, Issue::new("c", Severity::Blocker, BEFORE).with_status(IssueStatus::Confirmed))
        .with(FILE_2, Issue::new("d", Severity::Major, BEFORE).with_status(IssueStatus::Confirmed))
        .with(FILE_3, hotspot(BEFORE));

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then each severity gets its own count
    assert_eq!(count(&repository, FILE_1, keys::BLOCKER_VIOLATIONS), Some(1));
    assert_eq!(count(&repository, FILE_1, keys::MAJOR_VIOLATIONS), Some(0));
    assert_eq!(count(&repository, FILE_2, keys::BLOCKER_VIOLATIONS), Some(1));
    assert_eq!(count(&repository, FILE_2, keys::MAJOR_VIOLATIONS), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::BLOCKER_VIOLATIONS), Some(2));
    assert_eq!(count(&repository, PROJECT, keys::CRITICAL_VIOLATIONS), Some(0));
    assert_eq!(count(&repository, PROJECT, keys::MAJOR_VIOLATIONS), Some(1));
}

#[test]
fn given_issues_of_every_type_when_counted_then_they_are_counted_per_type() {
    // Given an open and a fixed code smell, a bug, an open and a closed hotspot
    let root = project();
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("a", Severity::Blocker, BEFORE))
        .with(FILE_1, Issue::new("b", Severity::Major, BEFORE).resolved(Resolution::Fixed))
        .with(
            FILE_2,
            Issue::new("c", Severity::Blocker, BEFORE)
                .with_type(IssueType::Bug)
                .with_status(IssueStatus::Confirmed),
        )
        .with(FILE_3, hotspot(BEFORE))
        .with(FILE_3, hotspot(BEFORE).resolved(Resolution::WontFix));

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then unresolved issues are counted per type
    assert_eq!(count(&repository, FILE_1, keys::CODE_SMELLS), Some(1));
    assert_eq!(count(&repository, FILE_1, keys::BUGS), Some(0));
    assert_eq!(count(&repository, FILE_2, keys::BUGS), Some(1));
    assert_eq!(count(&repository, FILE_2, keys::CODE_SMELLS), Some(0));
    assert_eq!(count(&repository, FILE_3, keys::SECURITY_HOTSPOTS), Some(1));
    assert_eq!(count(&repository, FILE_3, keys::VULNERABILITIES), Some(0));
    assert_eq!(count(&repository, PROJECT, keys::CODE_SMELLS), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::BUGS), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::VULNERABILITIES), Some(0));
    assert_eq!(count(&repository, PROJECT, keys::SECURITY_HOTSPOTS), Some(1));
}

#[test]
fn given_issues_around_the_period_when_counted_then_new_ones_are_counted_per_severity_and_type() {
    // Given issues created before, at and after the reference analysis
    let root = project();
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("old", Severity::Blocker, PERIOD_DATE - 1_000_000))
        .with(FILE_1, Issue::new("same", Severity::Blocker, PERIOD_DATE).with_type(IssueType::Bug))
        .with(FILE_1, Issue::new("smell", Severity::Critical, PERIOD_DATE + 100_000))
        .with(
            FILE_1,
            Issue::new("bug", Severity::Critical, PERIOD_DATE + 100_000).with_type(IssueType::Bug),
        )
        .with(
            FILE_1,
            Issue::new("fixed", Severity::Major, PERIOD_DATE + 200_000)
                .with_type(IssueType::Bug)
                .resolved(Resolution::Fixed),
        )
        .with(FILE_1, hotspot(PERIOD_DATE + 100_000))
        .with(FILE_1, hotspot(PERIOD_DATE + 100_000).resolved(Resolution::WontFix));

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then only unresolved issues created after the period are new
    for reference in [FILE_1, PROJECT] {
        assert_eq!(variation(&repository, reference, keys::NEW_VIOLATIONS, 1), Some(2.0));
        assert_eq!(variation(&repository, reference, keys::NEW_CRITICAL_VIOLATIONS, 1), Some(2.0));
        assert_eq!(variation(&repository, reference, keys::NEW_BLOCKER_VIOLATIONS, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_MAJOR_VIOLATIONS, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_CODE_SMELLS, 1), Some(1.0));
        assert_eq!(variation(&repository, reference, keys::NEW_BUGS, 1), Some(1.0));
        assert_eq!(variation(&repository, reference, keys::NEW_VULNERABILITIES, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_SECURITY_HOTSPOTS, 1), Some(1.0));
    }
    assert_eq!(variation(&repository, FILE_2, keys::NEW_VIOLATIONS, 1), Some(0.0));
}

#[test]
fn given_only_new_hotspots_when_counted_then_no_new_violation_is_reported() {
    // Given new hotspots of several severities, one of them closed
    let root = project();
    let mut issues = InMemoryIssueSource::new()
        .with(FILE_1, hotspot(PERIOD_DATE - 1_000_000))
        .with(FILE_1, hotspot(PERIOD_DATE))
        .with(FILE_1, hotspot(PERIOD_DATE + 100_000).resolved(Resolution::WontFix));
    for severity in [Severity::Critical, Severity::Blocker, Severity::Major] {
        let mut issue = hotspot(PERIOD_DATE + 100_000);
        issue.severity = severity;
        issues.add(FILE_1, issue);
    }

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then the hotspots only show up in their own count
    for reference in [FILE_1, PROJECT] {
        assert_eq!(variation(&repository, reference, keys::NEW_VIOLATIONS, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_CRITICAL_VIOLATIONS, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_BLOCKER_VIOLATIONS, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_VULNERABILITIES, 1), Some(0.0));
        assert_eq!(variation(&repository, reference, keys::NEW_SECURITY_HOTSPOTS, 1), Some(3.0));
    }
}

#[test]
fn given_issues_on_the_project_and_a_directory_when_counted_then_they_are_included() {
    // Given an issue on a file, one on the directory and one on the project
    let root = project();
    let issues = InMemoryIssueSource::new()
        .with(FILE_1, Issue::new("file", Severity::Minor, BEFORE))
        .with(DIRECTORY, Issue::new("dir", Severity::Major, AFTER))
        .with(PROJECT, Issue::new("project", Severity::Blocker, AFTER).with_type(IssueType::Bug));

    // When issues are counted
    let repository = count_issues(&root, &issues);

    // Then every level counts its own issues on top of its children's
    assert_eq!(count(&repository, FILE_1, keys::VIOLATIONS), Some(1));
    assert_eq!(count(&repository, DIRECTORY, keys::VIOLATIONS), Some(2));
    assert_eq!(count(&repository, DIRECTORY, keys::MAJOR_VIOLATIONS), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::VIOLATIONS), Some(3));
    assert_eq!(count(&repository, PROJECT, keys::BLOCKER_VIOLATIONS), Some(1));
    assert_eq!(count(&repository, PROJECT, keys::BUGS), Some(1));
    assert_eq!(variation(&repository, DIRECTORY, keys::NEW_VIOLATIONS, 1), Some(1.0));
    assert_eq!(variation(&repository, PROJECT, keys::NEW_VIOLATIONS, 1), Some(2.0));
}

#[test]
fn given_an_issue_one_second_after_the_period_when_counted_then_it_is_not_new() {
    // Given an issue created exactly one second after the reference analysis
    let root = project();
    let catalog = core_metrics();
    let periods = periods();
    let issues = InMemoryIssueSource::new().with(FILE_1, Issue::new("edge", Severity::Info, PERIOD_DATE + 1_000));
    let mut repository = MeasureRepository::new();

    // When new issues are computed
    FormulaExecutor::builder(&catalog, &mut repository)
        .with_variation_support(&periods)
        .build_for([boxed(NewIssuesFormula::new(&issues))])
        .unwrap()
        .visit(&root)
        .unwrap();

    // Then the precision margin keeps it out
    assert_eq!(variation(&repository, PROJECT, keys::NEW_VIOLATIONS, 1), Some(0.0));
}

// =============================================================================
// Variations
// =============================================================================

#[test]
fn given_past_values_when_variations_run_then_every_level_gets_its_delta() {
    // Given ncloc on a file and the project, with past values for period 1
    let root = project();
    let catalog = core_metrics();
    let periods = periods();
    let mut repository = MeasureRepository::new();
    seed(&mut repository, &catalog, find(&root, FILE_1), keys::NCLOC, Measure::int(50));
    seed(&mut repository, &catalog, &root, keys::NCLOC, Measure::int(50));
    let past = InMemoryPastMeasures::new()
        .with("u1", "F1", keys::NCLOC, 60.0)
        .with("u1", "P", keys::NCLOC, 40.0);

    // When variations are computed
    let updated =
        compute_variations(&root, &catalog, &mut repository, periods.periods(), &past).unwrap();

    // Then each component has current minus past
    assert_eq!(updated, 2);
    assert_eq!(variation(&repository, FILE_1, keys::NCLOC, 1), Some(-10.0));
    assert_eq!(variation(&repository, PROJECT, keys::NCLOC, 1), Some(10.0));
}
