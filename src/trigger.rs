//! Trigger evaluation: is a task due right now?
//!
//! Each tick builds a [`TickContext`] holding what the triggers look at:
//! the current instant, the network identity, and the manual marker.
//! The network is queried again for every WiFi task: a transfer earlier in
//! the tick can outlast the connection. The marker is consumed at most once
//! per tick, and only if some manual task asks.
//!
//! Firing a `Scheduled` or `Wifi` trigger records the instant in the
//! run history. `Manual` keeps no history: the marker is its state.

use jiff::{SignedDuration, Zoned};
use tracing::{info, warn};

use crate::{
    marker::ManualMarker,
    model::{RunHistory, Task, TimeOfDay, Trigger},
    network::NetworkProbe,
};

/// Minimum spacing between WiFi firings while connected.
pub const WIFI_WINDOW: SignedDuration = SignedDuration::from_secs(15 * 60);

/// The outcome of evaluating one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Due,
    NotDue,
}

impl Decision {
    fn from_due(due: bool) -> Self {
        if due { Self::Due } else { Self::NotDue }
    }
}

/// What the triggers observe during one tick.
pub struct TickContext<'a> {
    now: Zoned,
    probe: &'a dyn NetworkProbe,
    marker: &'a ManualMarker,
    manual_requested: Option<bool>,
}

impl<'a> TickContext<'a> {
    pub fn new(now: Zoned, probe: &'a dyn NetworkProbe, marker: &'a ManualMarker) -> Self {
        Self {
            now,
            probe,
            marker,
            manual_requested: None,
        }
    }

    pub fn now(&self) -> &Zoned {
        &self.now
    }

    /// The network connected right now.
    fn network(&self) -> Option<String> {
        self.probe.current_network()
    }

    /// Whether a manual run was requested, consuming the marker on first use.
    ///
    /// Every manual task in the tick sees the same answer.
    fn manual_requested(&mut self) -> bool {
        let marker = self.marker;
        *self.manual_requested.get_or_insert_with(|| match marker.consume() {
            Ok(true) => {
                info!(marker = %marker.path().display(), "manual trigger consumed");
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(marker = %marker.path().display(), error = %e, "failed to consume manual trigger");
                false
            }
        })
    }
}

/// Decide whether `task` is due, recording the firing in `history`.
pub fn evaluate(task: &Task, history: &mut RunHistory, ctx: &mut TickContext<'_>) -> Decision {
    let id = task.id();
    let last_run = history.last_run(&id);

    let due = match &task.trigger {
        Trigger::Scheduled { time } => scheduled_due(*time, last_run, ctx.now()),
        Trigger::Wifi { ssid } => {
            let network = ctx.network();
            wifi_due(ssid, network.as_deref(), last_run, ctx.now())
        }
        Trigger::Manual => return Decision::from_due(ctx.manual_requested()),
    };

    if due {
        history.record(id, ctx.now().clone());
    }
    Decision::from_due(due)
}

/// Due on the first tick at or after `time`, once per calendar day.
pub fn scheduled_due(time: TimeOfDay, last_run: Option<&Zoned>, now: &Zoned) -> bool {
    now.time() >= time.time() && last_run.is_none_or(|last| last.date() < now.date())
}

/// Due while on `ssid`, at most once per [`WIFI_WINDOW`].
///
/// Disconnected never fires, however long it has been.
pub fn wifi_due(ssid: &str, network: Option<&str>, last_run: Option<&Zoned>, now: &Zoned) -> bool {
    network == Some(ssid)
        && last_run.is_none_or(|last| {
            now.timestamp().duration_since(last.timestamp()) >= WIFI_WINDOW
        })
}
