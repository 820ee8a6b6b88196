//! Fuzz target for settings loading and period resolution.
//!
//! Arbitrary TOML goes through `AnalysisSettings::from_toml` and, when it
//! parses, through the period resolver against a small fixed history. We
//! only care about panics and hangs.

#![no_main]
use caliper_component::{Component, ComponentType};
use caliper_period::{InMemorySnapshotHistory, PeriodResolver, Snapshot};
use caliper_settings::AnalysisSettings;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 8 * 1024;
const DAY: i64 = 86_400_000;
const NOW: i64 = 1_700_000_000_000;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(settings) = AnalysisSettings::from_toml(s) else {
        return;
    };

    let root = Component::builder(ComponentType::Project, 1).uuid("P").build();
    let history = InMemorySnapshotHistory::new()
        .with("P", Snapshot::processed(1, "s1", NOW - 40 * DAY).with_version("1.0"))
        .with("P", Snapshot::processed(2, "s2", NOW - 10 * DAY).with_version("1.1"))
        .with("P", Snapshot::processed(3, "s3", NOW - DAY).with_version("1.1").last());

    let resolved = PeriodResolver::new(&history, NOW, &root, &settings.periods).resolve();
    if settings.periods.validate().is_err() {
        assert!(resolved.is_err(), "invalid period keys must fail resolution");
    }
    if let Ok(periods) = resolved {
        for period in periods.periods() {
            assert!((1..=5).contains(&period.index));
        }
    }
});
