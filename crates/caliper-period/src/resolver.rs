//! Picks the past analysis each configured period compares against.

use caliper_component::{Component, ComponentType};
use caliper_settings::{MAX_PERIOD_INDEX, PeriodSettings};
use tracing::{debug, info};

use crate::dates::{MILLIS_PER_DAY, format_date, format_date_time, parse_date};
use crate::{
    Period, PeriodError, PeriodMode, PeriodsHolder, Snapshot, SnapshotHistory, SnapshotQuery,
    SortOrder,
};

pub const PREVIOUS_ANALYSIS: &str = "previous_analysis";
pub const PREVIOUS_VERSION: &str = "previous_version";

/// Resolves the periods of one analysis.
///
/// For each index the property value is read as, in order: a number of
/// days, a `yyyy-MM-dd` date, `previous_analysis`, `previous_version`, and
/// otherwise a version label. Unprocessed snapshots are never selected. A
/// value that matches no snapshot leaves its slot empty.
pub struct PeriodResolver<'a, H: ?Sized> {
    history: &'a H,
    analysis_date: i64,
    root: &'a Component,
    settings: &'a PeriodSettings,
}

impl<'a, H> PeriodResolver<'a, H>
where
    H: SnapshotHistory + ?Sized,
{
    pub fn new(
        history: &'a H,
        analysis_date: i64,
        root: &'a Component,
        settings: &'a PeriodSettings,
    ) -> Self {
        Self {
            history,
            analysis_date,
            root,
            settings,
        }
    }

    pub fn resolve(&self) -> Result<PeriodsHolder, PeriodError> {
        self.settings.validate()?;
        let qualifier = self.root.kind.qualifier();
        let mut periods = Vec::new();
        for index in 1..=MAX_PERIOD_INDEX {
            let Some(value) = self.settings.get(index, qualifier) else {
                continue;
            };
            match self.resolve_one(index, value)? {
                Some(period) => periods.push(period),
                None => debug!(period = index, value, "Period matches no analysis"),
            }
        }
        PeriodsHolder::new(periods)
    }

    fn resolve_one(&self, index: usize, value: &str) -> Result<Option<Period>, PeriodError> {
        if let Ok(days) = value.parse::<i64>() {
            return self.find_by_days(index, days);
        }
        if let Some(date) = parse_date(value) {
            return Ok(self.find_by_date(index, value, date));
        }
        Ok(match value {
            PREVIOUS_ANALYSIS => self.find_by_previous_analysis(index),
            PREVIOUS_VERSION => self.find_by_previous_version(index),
            version => self.find_by_version(index, version),
        })
    }

    fn find(&self, query: &SnapshotQuery) -> Vec<Snapshot> {
        self.history.find(&self.root.uuid, query)
    }

    fn processed_before_analysis(&self) -> SnapshotQuery {
        SnapshotQuery::new()
            .processed()
            .created_before(self.analysis_date)
    }

    fn find_by_days(&self, index: usize, days: i64) -> Result<Option<Period>, PeriodError> {
        if days < 0 {
            return Err(PeriodError::Configuration(format!(
                "period{index} must be a positive number of days, got {days}"
            )));
        }
        let target = days
            .checked_mul(MILLIS_PER_DAY)
            .and_then(|offset| self.analysis_date.checked_sub(offset))
            .ok_or_else(|| {
                PeriodError::Configuration(format!("period{index} is out of range: {days} days"))
            })?;
        let snapshots = self.find(&self.processed_before_analysis().sort(SortOrder::Ascending));
        let Some(nearest) = snapshots
            .iter()
            .min_by_key(|s| s.created_at.abs_diff(target))
        else {
            return Ok(None);
        };
        info!(
            period = index,
            "Compare over {} days ({}, analysis of {})",
            days,
            format_date(target),
            format_date_time(nearest.created_at)
        );
        Ok(Some(period(index, PeriodMode::Days, Some(days.to_string()), nearest)))
    }

    fn find_by_date(&self, index: usize, raw: &str, date: i64) -> Option<Period> {
        let query = self
            .processed_before_analysis()
            .created_after(date)
            .sort(SortOrder::Ascending);
        let snapshot = self.find(&query).into_iter().next()?;
        info!(
            period = index,
            "Compare to date {} (analysis of {})",
            raw,
            format_date_time(snapshot.created_at)
        );
        Some(period(index, PeriodMode::Date, Some(raw.to_string()), &snapshot))
    }

    fn find_by_previous_analysis(&self, index: usize) -> Option<Period> {
        let query = self.processed_before_analysis().sort(SortOrder::Descending);
        let snapshot = self.find(&query).into_iter().next()?;
        info!(
            period = index,
            "Compare to previous analysis ({})",
            format_date_time(snapshot.created_at)
        );
        let parameter = format_date(snapshot.created_at);
        Some(period(
            index,
            PeriodMode::PreviousAnalysis,
            Some(parameter),
            &snapshot,
        ))
    }

    fn find_by_previous_version(&self, index: usize) -> Option<Period> {
        if self.root.kind == ComponentType::View {
            debug!(period = index, "previous_version is not supported for views");
            return None;
        }
        let current_version = self.root.version.as_deref()?;
        let query = self.processed_before_analysis().sort(SortOrder::Descending);
        let previous = self.find(&query).into_iter().find(|s| {
            s.version
                .as_deref()
                .is_some_and(|version| version != current_version)
        });
        if let Some(snapshot) = previous {
            info!(
                period = index,
                "Compare to previous version ({}) (analysis of {})",
                snapshot.version.as_deref().unwrap_or_default(),
                format_date_time(snapshot.created_at)
            );
            return Some(period(
                index,
                PeriodMode::PreviousVersion,
                snapshot.version.clone(),
                &snapshot,
            ));
        }
        self.find_first_analysis(index)
    }

    // Previous version without any version change: the very first analysis.
    fn find_first_analysis(&self, index: usize) -> Option<Period> {
        let query = SnapshotQuery::new()
            .processed()
            .sort(SortOrder::Ascending);
        let snapshot = self.find(&query).into_iter().next()?;
        info!(
            period = index,
            "Compare to previous version (first analysis of {})",
            format_date_time(snapshot.created_at)
        );
        Some(period(index, PeriodMode::PreviousVersion, None, &snapshot))
    }

    fn find_by_version(&self, index: usize, version: &str) -> Option<Period> {
        let query = SnapshotQuery::new()
            .processed()
            .version(version)
            .sort(SortOrder::Descending);
        let snapshot = self.find(&query).into_iter().next()?;
        info!(
            period = index,
            "Compare to version ({}) ({})",
            version,
            format_date_time(snapshot.created_at)
        );
        Some(period(
            index,
            PeriodMode::Version,
            Some(version.to_string()),
            &snapshot,
        ))
    }
}

fn period(index: usize, mode: PeriodMode, parameter: Option<String>, snapshot: &Snapshot) -> Period {
    Period {
        index,
        mode,
        mode_parameter: parameter,
        snapshot_date: snapshot.created_at,
        snapshot_id: snapshot.id,
        analysis_uuid: snapshot.uuid.clone(),
    }
}
