use std::path::{Path, PathBuf};

use crate::error::{Result, TareasError};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TAREAS_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory by priority:
    /// 1. explicit `--data-dir`
    /// 2. `$TAREAS_DIR` (tilde expanded)
    /// 3. platform data directory + `tareas`
    /// 4. `~/.tareas`
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env = std::env::var(DATA_DIR_ENV).ok().filter(|v| !v.trim().is_empty());
        Self::resolve_with(explicit, env.as_deref(), dirs::data_dir(), dirs::home_dir())
    }

    fn resolve_with(
        explicit: Option<&Path>,
        env: Option<&str>,
        platform_data: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<Self> {
        let data_dir = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Some(value) = env {
            expand_tilde(value, home.as_deref())
        } else if let Some(data) = platform_data {
            data.join("tareas")
        } else if let Some(home) = home {
            home.join(".tareas")
        } else {
            return Err(TareasError::NoDataDir);
        };
        Ok(Self { data_dir })
    }
}

fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = home
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
