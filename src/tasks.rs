//! Task file: the task list written by the task editor.
//!
//! ```json
//! {"tasks": [
//!   {"local_path": "/home/deck/saves", "remote_path": "gdrive:saves",
//!    "direction": "upload", "trigger": {"type": "scheduled", "time": "09:00"}}
//! ]}
//! ```
//!
//! Reloaded on every tick. The document itself parses all-or-nothing;
//! a bad record inside it is skipped with a warning.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::warn;

use crate::model::Task;

/// Errors loading the task file. Each one costs a whole tick.
#[derive(Debug, thiserror::Error)]
pub enum TaskFileError {
    #[error("no task file at {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid task file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<serde_json::Value>,
}

/// Load the task list from `path`.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, TaskFileError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            TaskFileError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            TaskFileError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_tasks(&contents).map_err(|source| TaskFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a task file document, keeping the records that decode.
///
/// Records that fail to decode, and records repeating an earlier
/// record's identity, are dropped with a warning. Order is preserved.
pub fn parse_tasks(json: &str) -> Result<Vec<Task>, serde_json::Error> {
    let file: TaskFile = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(file.tasks.len());

    for (index, record) in file.tasks.into_iter().enumerate() {
        let task: Task = match serde_json::from_value(record) {
            Ok(task) => task,
            Err(e) => {
                warn!(index, error = %e, "skipping malformed task record");
                continue;
            }
        };

        if !seen.insert(task.id()) {
            warn!(index, task = %task.id(), "skipping task with duplicate local/remote pair");
            continue;
        }

        tasks.push(task);
    }

    Ok(tasks)
}
