use std::path::Path;

use crate::command::Command;
use crate::commands::open_repo;
use crate::error::{Result, TareasError};
use crate::output::{self, Format};
use crate::store::files::FileSlots;
use crate::store::repo::TaskRepository;
use crate::task_id::TaskId;

fn print_parent(repo: &TaskRepository<FileSlots>, id: &TaskId, format: Format) -> Result<()> {
    let task = repo
        .get(id)
        .ok_or_else(|| TareasError::TaskNotFound(id.to_string()))?;
    output::print_task(task, format)
}

pub fn add(data_dir: &Path, task: &str, text: String, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(task)?;
    if !repo.apply(Command::AddSubtask(id.clone(), text))?.changed() {
        output::print_unchanged("nothing to add", format);
        return Ok(());
    }
    print_parent(&repo, &id, format)
}

pub fn toggle(data_dir: &Path, task: &str, subtask: &str, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(task)?;
    let sub = repo.resolve_subtask_id(&id, subtask)?;
    repo.apply(Command::ToggleSubtask(id.clone(), sub))?;
    print_parent(&repo, &id, format)
}

pub fn edit(data_dir: &Path, task: &str, subtask: &str, text: String, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(task)?;
    let sub = repo.resolve_subtask_id(&id, subtask)?;
    if !repo.apply(Command::RenameSubtask(id.clone(), sub, text))?.changed() {
        output::print_unchanged("text unchanged", format);
        return Ok(());
    }
    print_parent(&repo, &id, format)
}

pub fn delete(data_dir: &Path, task: &str, subtask: &str, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(task)?;
    let sub = repo.resolve_subtask_id(&id, subtask)?;
    repo.apply(Command::RemoveSubtask(id.clone(), sub))?;
    print_parent(&repo, &id, format)
}
