use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, TareasError};
use crate::store::lock;
use crate::store::slots::Slots;

const LOCK_FILE: &str = "slots.lock";
const LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Slot store backed by a data directory holding one `<key>.json` file per slot.
///
/// The directory is created on the first write, so opening a fresh location
/// and only reading from it leaves the filesystem untouched.
#[derive(Debug, Clone)]
pub struct FileSlots {
    root: PathBuf,
}

impl FileSlots {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(TareasError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid slot key '{key}'"),
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Slots for FileSlots {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.root)?;
        let lock_file = lock::acquire_lock(&self.root.join(LOCK_FILE), LOCK_TIMEOUT)?;

        // Write-then-rename so a reader never observes a half-written slot.
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        if let Err(err) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        lock::release_lock(lock_file)?;
        tracing::debug!(key, bytes = value.len(), path = %path.display(), "slot written");
        Ok(())
    }
}
