use std::path::Path;

use crate::command::Command;
use crate::commands::open_repo;
use crate::error::Result;
use crate::model::Filter;
use crate::output::{self, Format};

pub fn run(data_dir: &Path, filter: Filter, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    repo.apply(Command::SetFilter(filter))?;
    output::print_tasks(&repo.visible(), repo.filter(), repo.status(), format)
}
