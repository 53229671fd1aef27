use std::fmt;

use serde::Serialize;

use crate::model::Task;

/// Aggregate counts over the full collection, independent of the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub total: usize,
}

impl StatusCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            pending: tasks.iter().filter(|t| !t.done).count(),
            total: tasks.len(),
        }
    }

    pub fn completed(&self) -> usize {
        self.total - self.pending
    }
}

impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.pending == 1 {
            "tarea pendiente"
        } else {
            "tareas pendientes"
        };
        write!(f, "{} {} / {} en total", self.pending, noun, self.total)
    }
}
