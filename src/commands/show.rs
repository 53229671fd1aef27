use std::path::Path;

use crate::commands::open_repo;
use crate::error::{Result, TareasError};
use crate::output::{self, Format};

pub fn run(data_dir: &Path, id: &str, format: Format) -> Result<()> {
    let repo = open_repo(data_dir)?;
    let id = repo.resolve_task_id(id)?;
    let task = repo
        .get(&id)
        .ok_or_else(|| TareasError::TaskNotFound(id.to_string()))?;
    output::print_task(task, format)
}
