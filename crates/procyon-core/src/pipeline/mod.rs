pub mod config;
mod runner;
mod steps;
mod types;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::Result;
use crate::host::HostSession;

pub use runner::PipelineRunner;
pub use types::{NoOpSink, RunState, StatusSink};

use config::PipelineConfig;

/// Dispatch a single run to a dedicated worker thread.
///
/// At most one run should be in flight per host session; the caller holds the
/// join handle and re-enables its controls when the sink's `run_finished`
/// fires (which it does on every exit path).
pub fn spawn_run<H>(
    config: PipelineConfig,
    mut host: H,
    sink: Arc<dyn StatusSink>,
) -> JoinHandle<Result<PathBuf>>
where
    H: HostSession + 'static,
{
    std::thread::Builder::new()
        .name("procyon-runner".into())
        .spawn(move || {
            let mut runner = PipelineRunner::new();
            runner.run(&config, &mut host, sink.as_ref())
        })
        .expect("Failed to spawn runner thread")
}
