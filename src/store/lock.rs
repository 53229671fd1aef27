use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{Result, TareasError};

const RETRY_INTERVAL: Duration = Duration::from_millis(20);

/// Acquire an exclusive lock on a file, waiting up to `timeout` for a competing
/// writer to finish. The lock is released when the returned File is dropped.
pub fn acquire_lock(path: &Path, timeout: Duration) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;

    let started = Instant::now();
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(file),
            Err(_) if started.elapsed() < timeout => thread::sleep(RETRY_INTERVAL),
            Err(_) => return Err(TareasError::Locked(path.display().to_string())),
        }
    }
}

/// Release lock explicitly (normally handled by Drop).
pub fn release_lock(file: File) -> Result<()> {
    FileExt::unlock(&file)?;
    Ok(())
}
