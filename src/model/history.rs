//! Run history: when each task's trigger last fired.
//!
//! Lives for the process lifetime only. A restart forgets every entry,
//! so scheduled tasks past their time fire again on the first tick.

use std::collections::HashMap;

use jiff::Zoned;

use super::TaskId;

/// Last firing per task identity.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    last_run: HashMap<TaskId, Zoned>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the task's trigger last fired, if ever.
    pub fn last_run(&self, id: &TaskId) -> Option<&Zoned> {
        self.last_run.get(id)
    }

    /// Record that the task's trigger fired at `at`.
    pub fn record(&mut self, id: TaskId, at: Zoned) {
        self.last_run.insert(id, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use jiff::{civil::date, tz::TimeZone};

    fn id(local: &str) -> TaskId {
        TaskId {
            local_path: PathBuf::from(local),
            remote_path: "r:x".into(),
        }
    }

    #[test]
    fn record_overwrites_previous_entry() {
        let mut history = RunHistory::new();
        let first = date(2024, 3, 10).at(9, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();
        let second = date(2024, 3, 11).at(9, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();

        history.record(id("/a"), first);
        history.record(id("/a"), second.clone());

        assert_eq!(history.last_run(&id("/a")), Some(&second));
        assert!(history.last_run(&id("/b")).is_none());
    }
}
