//! Task: a declared synchronization intent.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use super::TimeOfDay;

/// A directory pair to keep in sync, and when to check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Local directory.
    pub local_path: PathBuf,

    /// Remote endpoint (e.g. `gdrive:backups/saves`).
    /// Opaque here; handed to the transfer tool as-is.
    pub remote_path: String,

    /// Which side is the source of truth.
    #[serde(default)]
    pub direction: Direction,

    /// When the task is due.
    pub trigger: Trigger,
}

impl Task {
    /// The stable identity of this task across ticks.
    pub fn id(&self) -> TaskId {
        TaskId {
            local_path: self.local_path.clone(),
            remote_path: self.remote_path.clone(),
        }
    }
}

/// Displays the task the way the task editor lists it.
///
/// `UPLOAD: /home/deck/saves ↔ gdrive:saves [scheduled] at 09:00`
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Upload => "UPLOAD",
            Direction::Download => "DOWNLOAD",
        };
        write!(
            f,
            "{direction}: {} ↔ {} [{}]",
            self.local_path.display(),
            self.remote_path,
            self.trigger.kind()
        )?;
        match &self.trigger {
            Trigger::Scheduled { time } => write!(f, " at {time}"),
            Trigger::Wifi { ssid } => write!(f, " on Wi-Fi '{ssid}'"),
            Trigger::Manual => Ok(()),
        }
    }
}

/// Task identity: the `(local, remote)` pair.
///
/// Run history is keyed on this, so two tasks sharing both fields
/// would share debouncing state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId {
    pub local_path: PathBuf,
    pub remote_path: String,
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.local_path.display(), self.remote_path)
    }
}

/// Transfer direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Local is the source, remote the destination.
    #[default]
    Upload,

    /// Remote is the source, local the destination.
    Download,
}

/// What makes a task due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trigger {
    /// Once per calendar day, on the first tick at or after `time`.
    Scheduled { time: TimeOfDay },

    /// Every 15 minutes while joined to the named wireless network.
    Wifi { ssid: String },

    /// Whenever the manual marker is raised.
    Manual,
}

impl Trigger {
    /// The trigger's `type` tag as written in the task file.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scheduled { .. } => "scheduled",
            Self::Wifi { .. } => "wifi",
            Self::Manual => "manual",
        }
    }
}
