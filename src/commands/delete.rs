use std::path::Path;

use crate::command::Command;
use crate::commands::open_repo;
use crate::error::{Result, TareasError};
use crate::output::{self, Format};

pub fn run(data_dir: &Path, id: &str, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(id)?;
    let task = repo
        .get(&id)
        .cloned()
        .ok_or_else(|| TareasError::TaskNotFound(id.to_string()))?;

    repo.apply(Command::Remove(id))?;
    output::print_task(&task, format)
}
