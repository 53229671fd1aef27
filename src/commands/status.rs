use std::path::Path;

use crate::commands::open_repo;
use crate::error::Result;
use crate::output::{self, Format};

pub fn run(data_dir: &Path, format: Format) -> Result<()> {
    let repo = open_repo(data_dir)?;
    output::print_status(repo.status(), format)
}
