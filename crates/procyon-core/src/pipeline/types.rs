use std::path::Path;

use super::config::Step;

/// Lifecycle of a pipeline run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
    Failed,
}

/// Fire-and-forget status notifications from a run.
///
/// Implementors can drive a status bar, progress display, or logging. All
/// methods have default no-op implementations; none of them may block the
/// runner or report back.
pub trait StatusSink: Send + Sync {
    /// An enabled step is about to execute.
    fn step_started(&self, _step: &Step) {}

    /// The step body completed and its tag was recorded.
    fn step_finished(&self, _step: &Step) {}

    /// An artifact was persisted under the given name.
    fn artifact_saved(&self, _path: &Path) {}

    /// The run exited, successfully or not. This is the hook for re-enabling
    /// whatever controls started the run.
    fn run_finished(&self) {}
}

/// No-op sink for callers that don't care about progress.
pub struct NoOpSink;
impl StatusSink for NoOpSink {}
