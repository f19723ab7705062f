//! Running a whole [`BatchConfig`] through a [`Compositor`].

use log::{error, info};

use crate::compositor::Compositor;
use crate::config::BatchConfig;
use crate::error::ImagerError;

/// A run that failed, with its display name.
#[derive(Debug)]
pub struct FailedRun {
    pub name: String,
    pub error: ImagerError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Display names of runs that completed.
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedRun>,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run every `process` then every `together` entry of `config`.
///
/// A failing run is logged and recorded; the remaining runs still execute.
pub fn run_batch(compositor: &Compositor, config: &BatchConfig) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for run in &config.process {
        let name = format!("process {} @ {} {:?}", run.tag, run.max_flux, run.extra_name);
        let result = compositor
            .process(&run.tag, run.max_flux, &run.extra_name)
            .map(|report| {
                if !report.xray_rendered() {
                    info!("{}: optical only", report.tag);
                }
            });
        record(&mut outcome, name, result);
    }

    for run in &config.together {
        let name = format!("together {} @ {}", run.tag, run.max_flux);
        let result = compositor.together(&run.tag, run.max_flux).map(|_| ());
        record(&mut outcome, name, result);
    }

    outcome
}

fn record(outcome: &mut BatchOutcome, name: String, result: Result<(), ImagerError>) {
    match result {
        Ok(()) => {
            info!("Finished {name}");
            outcome.succeeded.push(name);
        }
        Err(e) => {
            error!("{name} failed: {e}");
            outcome.failed.push(FailedRun { name, error: e });
        }
    }
}
