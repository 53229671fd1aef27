use std::path::Path;

use crate::command::Command;
use crate::commands::open_repo;
use crate::error::{Result, TareasError};
use crate::output::{self, Format};

/// Flip a task between pending and completed.
pub fn toggle(data_dir: &Path, id: &str, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(id)?;
    repo.apply(Command::Toggle(id.clone()))?;

    let task = repo
        .get(&id)
        .ok_or_else(|| TareasError::TaskNotFound(id.to_string()))?;
    output::print_task(task, format)
}
