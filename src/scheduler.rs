//! The scheduler loop.
//!
//! Every tick reloads the task file, then walks the tasks in order:
//! evaluate the trigger, and if it fired, compare fingerprints and
//! transfer only when the two sides differ. One task finishes before the
//! next starts. A failing task is logged and the tick moves on.
//!
//! The firing is recorded when the trigger fires, whatever happens after:
//! an unchanged tree or a failed transfer still consumes it.

use std::{path::PathBuf, thread, time::Duration};

use jiff::Zoned;
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    fingerprint::{changed, local_fingerprint, remote_fingerprint},
    marker::ManualMarker,
    model::{RunHistory, Task, Trigger},
    network::NetworkProbe,
    tasks::{TaskFileError, load_tasks},
    transfer::{SyncTool, TransferError, transfer},
    trigger::{Decision, TickContext, evaluate},
};

/// Which tasks a tick looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every task.
    All,

    /// WiFi-triggered tasks only. Used once at startup, so a host already
    /// on its home network doesn't wait for the first regular tick.
    WifiOnly,
}

impl Scope {
    fn includes(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::WifiOnly => matches!(task.trigger, Trigger::Wifi { .. }),
        }
    }
}

/// A task failure. Logged, then the tick continues.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}

/// What happened to one task in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Trigger didn't fire.
    NotDue,

    /// Trigger fired; both sides already match.
    Unchanged,

    /// Trigger fired and the transfer succeeded.
    Synced,
}

/// Tallies for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub evaluated: usize,
    pub fired: usize,
    pub synced: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl TickReport {
    fn tally(&mut self, outcome: &Result<TaskOutcome, TaskError>) {
        self.evaluated += 1;
        match outcome {
            Ok(TaskOutcome::NotDue) => {}
            Ok(TaskOutcome::Unchanged) => {
                self.fired += 1;
                self.unchanged += 1;
            }
            Ok(TaskOutcome::Synced) => {
                self.fired += 1;
                self.synced += 1;
            }
            Err(_) => {
                self.fired += 1;
                self.failed += 1;
            }
        }
    }
}

/// Periodic trigger evaluation over the task file.
pub struct Scheduler<T, P> {
    tasks_file: PathBuf,
    interval: Duration,
    marker: ManualMarker,
    tool: T,
    probe: P,
    history: RunHistory,
}

impl<T: SyncTool, P: NetworkProbe> Scheduler<T, P> {
    pub fn new(config: &Config, tool: T, probe: P) -> Self {
        Self {
            tasks_file: config.tasks_file.clone(),
            interval: config.tick_interval(),
            marker: ManualMarker::new(&config.marker),
            tool,
            probe,
            history: RunHistory::new(),
        }
    }

    /// Run forever: a startup WiFi pass, then a tick every interval.
    ///
    /// The interval runs from the end of one tick to the start of the next.
    /// A task file that can't be loaded skips that tick only.
    pub fn run(&mut self) -> ! {
        info!(
            tasks_file = %self.tasks_file.display(),
            interval_secs = self.interval.as_secs(),
            "service started, initial Wi-Fi checks in progress"
        );
        self.tick_logged(Zoned::now(), Scope::WifiOnly);

        loop {
            self.tick_logged(Zoned::now(), Scope::All);
            thread::sleep(self.interval);
        }
    }

    fn tick_logged(&mut self, now: Zoned, scope: Scope) {
        if let Err(e) = self.tick(now, scope) {
            error!(error = %e, "failed to load tasks; skipping this tick");
        }
    }

    /// One pass over the tasks in `scope`, as of `now`.
    pub fn tick(&mut self, now: Zoned, scope: Scope) -> Result<TickReport, TaskFileError> {
        let tasks = load_tasks(&self.tasks_file)?;

        let mut report = TickReport::default();
        let mut ctx = TickContext::new(now, &self.probe, &self.marker);

        for task in tasks.iter().filter(|t| scope.includes(t)) {
            let outcome = process(task, &mut self.history, &mut ctx, &self.tool);
            if let Err(e) = &outcome {
                error!(task = %task.id(), error = %e, "task failed");
            }
            report.tally(&outcome);
        }

        if report.fired > 0 {
            info!(?scope, ?report, "tick complete");
        } else {
            debug!(?scope, ?report, "tick complete");
        }
        Ok(report)
    }
}

/// Trigger check, change check, transfer: one task, start to finish.
fn process(
    task: &Task,
    history: &mut RunHistory,
    ctx: &mut TickContext<'_>,
    tool: &impl SyncTool,
) -> Result<TaskOutcome, TaskError> {
    if evaluate(task, history, ctx) == Decision::NotDue {
        return Ok(TaskOutcome::NotDue);
    }
    info!(task = %task.id(), trigger = task.trigger.kind(), "task due");

    if !needs_sync(task, tool) {
        info!(task = %task.id(), "fingerprints match; skipping sync");
        return Ok(TaskOutcome::Unchanged);
    }

    transfer(tool, task.direction, &task.local_path, &task.remote_path)?;
    info!(task = %task.id(), "sync completed");
    Ok(TaskOutcome::Synced)
}

/// Compare both sides. A side that can't be fingerprinted forces a sync.
fn needs_sync(task: &Task, tool: &impl SyncTool) -> bool {
    let local = local_fingerprint(&task.local_path)
        .inspect_err(|e| warn!(task = %task.id(), error = %e, "local fingerprint unavailable"))
        .ok();
    let remote = remote_fingerprint(tool, &task.remote_path)
        .inspect_err(|e| warn!(task = %task.id(), error = %e, "remote fingerprint unavailable"))
        .ok();

    debug!(
        task = %task.id(),
        local = ?local.as_ref().map(ToString::to_string),
        remote = ?remote.as_ref().map(ToString::to_string),
        "fingerprints"
    );

    changed(local.as_ref(), remote.as_ref())
}
