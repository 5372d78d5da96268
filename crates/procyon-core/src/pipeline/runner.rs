use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::error::{ProcyonError, Result};
use crate::host::HostSession;
use crate::tracker::StepTracker;

use super::config::PipelineConfig;
use super::steps;
use super::types::{RunState, StatusSink};

/// Sequences the configured steps against a host session, threading artifact
/// naming through a [`StepTracker`].
///
/// One runner executes one run at a time; the tracker is reset at the start
/// of each run so a long-lived runner can be reused.
pub struct PipelineRunner {
    tracker: StepTracker,
    state: RunState,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self {
            tracker: StepTracker::new(),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn tracker(&self) -> &StepTracker {
        &self.tracker
    }

    /// Run the configured steps in order. Returns the path of the final
    /// artifact. Any step failure aborts the remaining steps; the sink's
    /// `run_finished` fires on every exit path.
    pub fn run(
        &mut self,
        config: &PipelineConfig,
        host: &mut dyn HostSession,
        sink: &dyn StatusSink,
    ) -> Result<PathBuf> {
        let base = host.image_path()?;
        if base.file_stem().map_or(true, |s| s.is_empty()) {
            return Err(ProcyonError::Pipeline(format!(
                "base image path '{}' has no file stem",
                base.display()
            )));
        }

        self.tracker.reset();
        self.state = RunState::Running;

        let _guard = FinishGuard { sink };
        let result = self.execute(config, host, &base, sink);
        self.state = match &result {
            Ok(_) => RunState::Done,
            Err(_) => RunState::Failed,
        };
        result
    }

    fn execute(
        &mut self,
        config: &PipelineConfig,
        host: &mut dyn HostSession,
        base: &Path,
        sink: &dyn StatusSink,
    ) -> Result<PathBuf> {
        let mut last_saved: Option<PathBuf> = None;

        for step_config in &config.steps {
            if !step_config.enabled {
                continue;
            }
            let step = &step_config.step;
            sink.step_started(step);
            info!(step = %step, "Running step");

            steps::execute(step, host, &mut self.tracker, base).map_err(|e| {
                error!(step = %step, error = ?e, "Step failed");
                ProcyonError::Step {
                    step: step.to_string(),
                    message: e.to_string(),
                }
            })?;

            if config.save_every_step {
                let artifact = self.tracker.artifact_name(base, None);
                host.save(&artifact)?;
                sink.artifact_saved(&artifact);
                last_saved = Some(artifact);
            }
            sink.step_finished(step);
        }

        // The final save happens in either persistence mode; skip it only if
        // the per-step save already wrote this exact name.
        let final_path = self.tracker.artifact_name(base, None);
        if last_saved.as_deref() != Some(final_path.as_path()) {
            host.save(&final_path)?;
            sink.artifact_saved(&final_path);
        }

        info!(result = %final_path.display(), "Pipeline complete");
        Ok(final_path)
    }
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifies the sink when the run exits, on success and failure alike, so
/// re-enable logic is never duplicated per exit path.
struct FinishGuard<'a> {
    sink: &'a dyn StatusSink,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.sink.run_finished();
    }
}
