use crate::model::{Filter, Task};

/// The tasks that pass `filter`, in their original order.
pub fn visible(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}
