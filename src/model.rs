//! Core data model for syncwatch.
//!
//! Tasks as declared in the task file, and the in-memory run history
//! that debounces their triggers.

mod history;
mod task;
mod time_of_day;

pub use history::RunHistory;
pub use task::{Direction, Task, TaskId, Trigger};
pub use time_of_day::TimeOfDay;
