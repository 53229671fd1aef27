use crate::model::{Filter, Task};
use crate::task_id::{SubtaskId, TaskId};

/// A discrete user intent, produced by a CLI invocation or a TUI key press and
/// consumed by [`crate::store::repo::TaskRepository::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(TaskId),
    Rename(TaskId, String),
    Remove(TaskId),
    Clear,
    SetFilter(Filter),
    AddSubtask(TaskId, String),
    ToggleSubtask(TaskId, SubtaskId),
    RenameSubtask(TaskId, SubtaskId, String),
    RemoveSubtask(TaskId, SubtaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Changed,
    Unchanged,
}

impl Outcome {
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl From<bool> for Outcome {
    fn from(changed: bool) -> Self {
        if changed { Self::Changed } else { Self::Unchanged }
    }
}
