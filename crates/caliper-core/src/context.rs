//! State shared by the steps of one analysis.

use caliper_component::{Component, ComponentTree};
use caliper_computer::{MeasureComputer, SortedComputers};
use caliper_formula::{BoxedFormula, FormulaExecutor};
use caliper_metric::{Metric, MetricCatalog, MetricRepository, core_metrics};
use caliper_period::{InMemorySnapshotHistory, PeriodsHolder, SnapshotHistory};
use caliper_repository::MeasureRepository;
use caliper_settings::AnalysisSettings;
use caliper_variation::{
    InMemoryIssueSource, InMemoryPastMeasures, InMemoryScmInfoRepository, IssueSource,
    PastMeasures, ScmInfoRepository,
};

use crate::AnalysisError;

/// Everything one analysis reads and writes.
///
/// Assembled once by [`AnalysisContextBuilder`], handed to every step in
/// turn, then dropped with the run.
pub struct AnalysisContext {
    tree: ComponentTree,
    analysis_date: i64,
    settings: AnalysisSettings,
    catalog: MetricRepository,
    plugin_metrics: MetricRepository,
    history: Box<dyn SnapshotHistory>,
    scm: Box<dyn ScmInfoRepository>,
    issues: Box<dyn IssueSource>,
    past: Box<dyn PastMeasures>,
    pending_computers: Vec<Box<dyn MeasureComputer>>,
    computers: SortedComputers,
    repository: MeasureRepository,
    periods: PeriodsHolder,
}

impl AnalysisContext {
    pub fn builder(tree: ComponentTree, analysis_date: i64) -> AnalysisContextBuilder {
        AnalysisContextBuilder {
            tree,
            analysis_date,
            settings: AnalysisSettings::default(),
            plugin_metrics: Vec::new(),
            history: Box::new(InMemorySnapshotHistory::new()),
            scm: Box::new(InMemoryScmInfoRepository::new()),
            issues: Box::new(InMemoryIssueSource::new()),
            past: Box::new(InMemoryPastMeasures::new()),
            computers: Vec::new(),
            repository: MeasureRepository::new(),
        }
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn root(&self) -> &Component {
        self.tree.root()
    }

    /// Date of the analysis, epoch milliseconds.
    pub fn analysis_date(&self) -> i64 {
        self.analysis_date
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Core and plugin metrics.
    pub fn catalog(&self) -> &dyn MetricCatalog {
        &self.catalog
    }

    pub fn repository(&self) -> &MeasureRepository {
        &self.repository
    }

    pub fn repository_mut(&mut self) -> &mut MeasureRepository {
        &mut self.repository
    }

    pub fn periods(&self) -> &PeriodsHolder {
        &self.periods
    }

    pub fn computers(&self) -> &SortedComputers {
        &self.computers
    }

    /// Whether the tree is a views tree rather than a report tree.
    pub fn is_views(&self) -> bool {
        self.root().kind.is_views_type()
    }

    pub(crate) fn history(&self) -> &dyn SnapshotHistory {
        &*self.history
    }

    pub(crate) fn set_periods(&mut self, periods: PeriodsHolder) {
        self.periods = periods;
    }

    pub(crate) fn sort_computers(&mut self) -> Result<(), AnalysisError> {
        let pending = std::mem::take(&mut self.pending_computers);
        self.computers = caliper_computer::sort_computers(pending, &core_metrics(), &self.plugin_metrics)?;
        Ok(())
    }

    /// Borrow the context as disjoint parts, so formulas can hold
    /// collaborators while the repository is written.
    pub(crate) fn parts(&mut self) -> AnalysisParts<'_> {
        AnalysisParts {
            root: self.tree.root(),
            catalog: &self.catalog,
            repository: &mut self.repository,
            periods: &self.periods,
            computers: &self.computers,
            scm: &*self.scm,
            issues: &*self.issues,
            past: &*self.past,
        }
    }
}

pub(crate) struct AnalysisParts<'a> {
    pub root: &'a Component,
    pub catalog: &'a MetricRepository,
    pub repository: &'a mut MeasureRepository,
    pub periods: &'a PeriodsHolder,
    pub computers: &'a SortedComputers,
    pub scm: &'a dyn ScmInfoRepository,
    pub issues: &'a dyn IssueSource,
    pub past: &'a dyn PastMeasures,
}

impl<'a> AnalysisParts<'a> {
    /// One post-order pass of `formulas` over the tree.
    pub fn run_formulas(self, formulas: Vec<BoxedFormula<'a>>) -> Result<(), AnalysisError> {
        FormulaExecutor::builder(self.catalog, self.repository)
            .with_variation_support(self.periods)
            .build_for(formulas)?
            .visit(self.root)?;
        Ok(())
    }
}

/// Assembles an [`AnalysisContext`]. Collaborators left unset default to
/// empty in-memory implementations.
pub struct AnalysisContextBuilder {
    tree: ComponentTree,
    analysis_date: i64,
    settings: AnalysisSettings,
    plugin_metrics: Vec<Metric>,
    history: Box<dyn SnapshotHistory>,
    scm: Box<dyn ScmInfoRepository>,
    issues: Box<dyn IssueSource>,
    past: Box<dyn PastMeasures>,
    computers: Vec<Box<dyn MeasureComputer>>,
    repository: MeasureRepository,
}

impl AnalysisContextBuilder {
    #[must_use]
    pub fn settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn snapshot_history(mut self, history: impl SnapshotHistory + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    #[must_use]
    pub fn scm_info(mut self, scm: impl ScmInfoRepository + 'static) -> Self {
        self.scm = Box::new(scm);
        self
    }

    #[must_use]
    pub fn issues(mut self, issues: impl IssueSource + 'static) -> Self {
        self.issues = Box::new(issues);
        self
    }

    #[must_use]
    pub fn past_measures(mut self, past: impl PastMeasures + 'static) -> Self {
        self.past = Box::new(past);
        self
    }

    /// Declare a metric contributed by a plugin.
    #[must_use]
    pub fn plugin_metric(mut self, metric: Metric) -> Self {
        self.plugin_metrics.push(metric);
        self
    }

    #[must_use]
    pub fn measure_computer(mut self, computer: impl MeasureComputer + 'static) -> Self {
        self.computers.push(Box::new(computer));
        self
    }

    /// Raw measures loaded from the analysis report.
    #[must_use]
    pub fn measures(mut self, repository: MeasureRepository) -> Self {
        self.repository = repository;
        self
    }

    /// Fails when a plugin metric clashes with a core metric or another
    /// plugin metric.
    pub fn build(self) -> Result<AnalysisContext, AnalysisError> {
        let plugin_metrics = MetricRepository::from_metrics(self.plugin_metrics)?;
        let mut catalog = core_metrics();
        for metric in plugin_metrics.all() {
            catalog.register(metric.clone())?;
        }
        Ok(AnalysisContext {
            tree: self.tree,
            analysis_date: self.analysis_date,
            settings: self.settings,
            catalog,
            plugin_metrics,
            history: self.history,
            scm: self.scm,
            issues: self.issues,
            past: self.past,
            pending_computers: self.computers,
            computers: SortedComputers::empty(),
            repository: self.repository,
            periods: PeriodsHolder::empty(),
        })
    }
}
