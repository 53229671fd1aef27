use std::path::Path;

use crate::command::Command;
use crate::commands::open_repo;
use crate::error::{Result, TareasError};
use crate::output::{self, Format};

pub fn run(data_dir: &Path, id: &str, text: String, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(id)?;

    if !repo.apply(Command::Rename(id.clone(), text))?.changed() {
        output::print_unchanged("text unchanged", format);
        return Ok(());
    }

    let task = repo
        .get(&id)
        .ok_or_else(|| TareasError::TaskNotFound(id.to_string()))?;
    output::print_task(task, format)
}
