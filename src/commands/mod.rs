pub mod clear;
pub mod create;
pub mod delete;
pub mod edit;
pub mod lifecycle;
pub mod list;
pub mod show;
pub mod status;
pub mod subtask;
pub mod theme;
pub mod tui;

use std::path::Path;

use crate::error::Result;
use crate::store::files::FileSlots;
use crate::store::repo::TaskRepository;

pub(crate) fn open_repo(data_dir: &Path) -> Result<TaskRepository<FileSlots>> {
    TaskRepository::open(FileSlots::open(data_dir))
}
