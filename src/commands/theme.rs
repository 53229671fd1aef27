use std::path::Path;

use crate::error::Result;
use crate::model::Theme;
use crate::output::{self, Format};
use crate::store::files::FileSlots;
use crate::store::tasks::ThemeStore;

fn themes(data_dir: &Path) -> ThemeStore<FileSlots> {
    ThemeStore::new(FileSlots::open(data_dir))
}

pub fn show(data_dir: &Path, format: Format) -> Result<()> {
    output::print_theme(themes(data_dir).load()?, format)
}

pub fn toggle(data_dir: &Path, format: Format) -> Result<()> {
    output::print_theme(themes(data_dir).toggle()?, format)
}

pub fn set(data_dir: &Path, theme: Theme, format: Format) -> Result<()> {
    themes(data_dir).save(theme)?;
    output::print_theme(theme, format)
}
