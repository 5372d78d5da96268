mod common;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use common::{make_mono, write_test_image};
use procyon_core::buffer::SampleDtype;
use procyon_core::curve::{CurveMethod, PiecewiseParams};
use procyon_core::error::ProcyonError;
use procyon_core::host::LocalSession;
use procyon_core::pipeline::config::{
    CurvesParams, PipelineConfig, StarRecombinationParams, Step, StepConfig,
};
use procyon_core::pipeline::{NoOpSink, PipelineRunner, RunState, StatusSink};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct RecordingSink {
    artifacts: Mutex<Vec<PathBuf>>,
    finished: AtomicUsize,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            artifacts: Mutex::new(Vec::new()),
            finished: AtomicUsize::new(0),
        }
    }

    fn artifacts(&self) -> Vec<PathBuf> {
        self.artifacts.lock().unwrap().clone()
    }
}

impl StatusSink for RecordingSink {
    fn artifact_saved(&self, path: &Path) {
        self.artifacts.lock().unwrap().push(path.to_path_buf());
    }

    fn run_finished(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

fn config_of(steps: Vec<StepConfig>) -> PipelineConfig {
    PipelineConfig {
        steps,
        save_every_step: false,
    }
}

fn open_session(dir: &tempfile::TempDir) -> LocalSession {
    let buffer = make_mono(
        2,
        2,
        &[0.0, 70.0, 140.0, 255.0],
        SampleDtype::U8,
    );
    let base = write_test_image(dir, "target.png", &buffer);
    LocalSession::open(&base).unwrap()
}

// ---------------------------------------------------------------------------
// Happy paths
// ---------------------------------------------------------------------------

#[test]
fn test_runner_completes_host_only_steps() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let mut runner = PipelineRunner::new();
    let sink = RecordingSink::new();

    let config = config_of(vec![
        StepConfig::enabled(Step::Unclip),
        StepConfig::enabled(Step::RemoveGreen),
    ]);
    let result = runner.run(&config, &mut session, &sink).unwrap();

    assert_eq!(result, dir.path().join("target_UC_DG.png"));
    assert!(result.exists());
    assert_eq!(runner.state(), RunState::Done);
    assert_eq!(runner.tracker().tags(), &["UC", "DG"]);
    assert_eq!(sink.finished.load(Ordering::SeqCst), 1);
}

#[test]
fn test_runner_skips_disabled_steps() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let mut runner = PipelineRunner::new();
    let sink = RecordingSink::new();

    let config = config_of(vec![
        StepConfig::enabled(Step::Unclip),
        StepConfig {
            enabled: false,
            step: Step::RemoveGreen,
        },
    ]);
    let result = runner.run(&config, &mut session, &sink).unwrap();

    assert_eq!(result, dir.path().join("target_UC.png"));
    assert_eq!(runner.tracker().tags(), &["UC"]);
}

#[test]
fn test_runner_resets_tracker_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let mut runner = PipelineRunner::new();
    let sink = RecordingSink::new();

    let config = config_of(vec![StepConfig::enabled(Step::Unclip)]);
    runner.run(&config, &mut session, &sink).unwrap();
    let second = runner.run(&config, &mut session, &sink).unwrap();

    assert_eq!(second, dir.path().join("target_UC.png"));
    assert_eq!(runner.tracker().tags(), &["UC"]);
}

// ---------------------------------------------------------------------------
// Star recombination without prior separation
// ---------------------------------------------------------------------------

#[test]
fn test_recombination_without_separation_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let mut runner = PipelineRunner::new();
    let sink = RecordingSink::new();

    let config = config_of(vec![StepConfig::enabled(Step::StarRecombination(
        StarRecombinationParams::default(),
    ))]);
    let result = runner.run(&config, &mut session, &sink).unwrap();

    // The current image stands in for the missing starless layer and the
    // step completes instead of failing on the absent dependency.
    assert_eq!(runner.state(), RunState::Done);
    assert_eq!(runner.tracker().tags(), &["StarComb"]);
    assert!(result.exists());
    assert!(dir.path().join("starless_result").exists());
    assert!(dir.path().join("starmask_result").exists());
}

// ---------------------------------------------------------------------------
// Background dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_spawn_run_executes_on_worker_thread() {
    let dir = tempfile::tempdir().unwrap();
    let session = open_session(&dir);
    let config = config_of(vec![StepConfig::enabled(Step::Unclip)]);

    let sink: std::sync::Arc<dyn StatusSink> = std::sync::Arc::new(NoOpSink);
    let handle = procyon_core::pipeline::spawn_run(config, session, sink);
    let result = handle.join().unwrap().unwrap();

    assert_eq!(result, dir.path().join("target_UC.png"));
    assert!(result.exists());
}

// ---------------------------------------------------------------------------
// Failure path
// ---------------------------------------------------------------------------

#[test]
fn test_runner_failure_sets_failed_state_and_notifies() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = open_session(&dir);
    let mut runner = PipelineRunner::new();
    let sink = RecordingSink::new();

    // r1 <= 0 is rejected by curve validation, failing the step.
    let config = config_of(vec![StepConfig::enabled(Step::Curves(CurvesParams {
        method: CurveMethod::PiecewiseLinear(PiecewiseParams {
            r1: -1.0,
            s1: 0.0,
            r2: 100.0,
            s2: 255.0,
        }),
    }))]);
    let err = runner.run(&config, &mut session, &sink).unwrap_err();

    assert!(matches!(err, ProcyonError::Step { .. }));
    assert_eq!(runner.state(), RunState::Failed);
    assert_eq!(sink.finished.load(Ordering::SeqCst), 1);
    assert!(sink.artifacts().is_empty());
}
