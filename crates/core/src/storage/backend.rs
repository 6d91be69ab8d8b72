use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::CoreError;

/// Keyed record storage: one string payload per key.
///
/// Each `write` replaces the whole record in one step. Readers see either the
/// previous payload or the new one, never a mix. Stores only talk to storage
/// through this trait, so the browser `localStorage`, a directory of files or
/// a test map are interchangeable.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Payload stored under `key`, or `None` if the record does not exist.
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Replace the record under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete the record under `key`. Deleting a missing record is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Keys double as file names, so only `[a-z0-9_]` is allowed.
pub fn validate_key(key: &str) -> Result<(), CoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CoreError::InvalidKey(key.to_string()))
    }
}

/// Process-local backend. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        validate_key(key)?;
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        validate_key(key)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        validate_key(key)?;
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use super::{validate_key, StorageBackend};
    use crate::errors::CoreError;

    /// One `<key>.json` file per record inside `dir` (native only).
    ///
    /// Writes go to a temporary file in the same directory which is then
    /// renamed over the target, so a crash mid-write leaves the old record.
    #[derive(Debug, Clone)]
    pub struct FileBackend {
        dir: PathBuf,
    }

    impl FileBackend {
        /// Use `dir`, creating it if needed.
        pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
            let dir = dir.into();
            std::fs::create_dir_all(&dir)?;
            Ok(Self { dir })
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        /// Path of the file backing `key`.
        pub fn record_path(&self, key: &str) -> Result<PathBuf, CoreError> {
            validate_key(key)?;
            Ok(self.dir.join(format!("{key}.json")))
        }
    }

    impl StorageBackend for FileBackend {
        fn name(&self) -> &str {
            "file"
        }

        fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
            let path = self.record_path(key)?;
            match std::fs::read_to_string(&path) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
            let path = self.record_path(key)?;
            let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| CoreError::from(e.error))?;
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), CoreError> {
            let path = self.record_path(key)?;
            match std::fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}
