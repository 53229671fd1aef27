use std::path::Path;

use crate::command::{Command, Outcome};
use crate::commands::open_repo;
use crate::error::Result;
use crate::output::{self, Format};

pub fn run(data_dir: &Path, text: String, format: Format) -> Result<()> {
    let mut repo = open_repo(data_dir)?;
    match repo.apply(Command::Add(text))? {
        Outcome::Added(task) => output::print_task(&task, format),
        _ => {
            output::print_unchanged("nothing to add", format);
            Ok(())
        }
    }
}
