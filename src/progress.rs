// src/progress.rs
use crate::tasks::{TaskId, TaskStatus};

/// Progress reporting for a pipeline run.
/// Frontends implement this to surface task outcomes as they settle.
pub trait Progress {
    /// Called at the start with the number of tasks in the plan.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called once per planned task, when it completes, fails, is skipped or blocked.
    fn task_finished(&mut self, _id: TaskId, _status: &TaskStatus) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
