use std::sync::{Arc, Mutex};

use stem_pipeline::config::PipelineConfig;
use stem_pipeline::ingestion::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadOptions, LoadSeverity,
    LoadStats, SourceFormat,
};
use stem_pipeline::pipeline::build;
use stem_pipeline::processing::CoercionWarning;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<LoadStats>>,
    warnings: Mutex<Vec<CoercionWarning>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, _ctx: &LoadContext, stats: LoadStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_warning(&self, _ctx: &LoadContext, warning: &CoercionWarning) {
        self.warnings.lock().unwrap().push(warning.clone());
    }

    fn on_failure(
        &self,
        _ctx: &LoadContext,
        severity: LoadSeverity,
        _error: &stem_pipeline::LoadError,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(
        &self,
        _ctx: &LoadContext,
        severity: LoadSeverity,
        _error: &stem_pipeline::LoadError,
    ) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options(obs: Arc<RecordingObserver>) -> LoadOptions {
    LoadOptions {
        format: Some(SourceFormat::Csv),
        observer: Some(obs),
        alert_at_or_above: LoadSeverity::Critical,
    }
}

#[test]
fn observer_receives_failure_and_alert_on_missing_file() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> I/O error -> Critical
    let _ = build(
        "tests/fixtures/does_not_exist.csv",
        &PipelineConfig::default(),
        &options(obs.clone()),
    )
    .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Critical]);
    assert!(obs.successes.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure_without_alert_for_missing_column() {
    let obs = Arc::new(RecordingObserver::default());

    // Schema mismatch -> Error severity (not Critical) -> should not alert
    let _ = build(
        "tests/fixtures/missing_award_column.csv",
        &PipelineConfig::default(),
        &options(obs.clone()),
    )
    .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lower_threshold_alerts_on_schema_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = LoadOptions {
        alert_at_or_above: LoadSeverity::Error,
        ..options(obs.clone())
    };

    let _ = build(
        "tests/fixtures/missing_award_column.csv",
        &PipelineConfig::default(),
        &opts,
    )
    .unwrap_err();

    assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Error]);
}

#[test]
fn observer_receives_stats_and_coercion_warnings_on_success() {
    let obs = Arc::new(RecordingObserver::default());

    build(
        "tests/fixtures/stem_extract.csv",
        &PipelineConfig::default(),
        &options(obs.clone()),
    )
    .unwrap();

    assert_eq!(
        *obs.successes.lock().unwrap(),
        vec![LoadStats {
            rows: 6,
            observations: 6 * 27,
            coerced_cells: 1,
            groups: 5,
            complete_rows: 5 * 27,
        }]
    );
    assert_eq!(
        *obs.warnings.lock().unwrap(),
        vec![CoercionWarning {
            row: 4,
            year: 2005,
            raw: "n/a".to_string(),
        }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out() {
    let a = Arc::new(RecordingObserver::default());
    let b = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        a.clone() as Arc<dyn LoadObserver>,
        b.clone() as Arc<dyn LoadObserver>,
    ]);
    let opts = LoadOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let _ = build("tests/fixtures/does_not_exist.csv", &PipelineConfig::default(), &opts)
        .unwrap_err();

    for obs in [&a, &b] {
        assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Critical]);
        assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Critical]);
    }
}

#[test]
fn file_observer_appends_events() {
    let log = std::env::temp_dir().join(format!("stem-pipeline-load-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&log);

    let opts = LoadOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };
    build("tests/fixtures/stem_extract.csv", &PipelineConfig::default(), &opts).unwrap();
    let _ = build("tests/fixtures/does_not_exist.csv", &PipelineConfig::default(), &opts)
        .unwrap_err();

    let contents = std::fs::read_to_string(&log).unwrap();
    let _ = std::fs::remove_file(&log);

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("coerced") && lines[0].contains("year=2005"));
    assert!(lines[1].contains(" ok ") && lines[1].contains("groups=5"));
    assert!(lines[2].contains(" fail severity=Critical"));
    assert!(lines[3].contains(" ALERT severity=Critical"));
}
