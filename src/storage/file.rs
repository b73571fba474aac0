use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, TaskListError};
use crate::storage::KeyValueStore;

/// Keeps each key in `<dir>/<key>.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                TaskListError::Config(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(TaskListError::Storage {
                key: key.to_string(),
                message: "keys may only contain letters, digits, '_' and '-'".into(),
            });
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| TaskListError::Storage {
            key: key.to_string(),
            message: format!("read {}: {}", path.display(), e),
        })?;
        debug!(key, path = %path.display(), bytes = content.len(), "Read stored value");

        Ok(Some(content))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        let write = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &path));
        write.map_err(|e| TaskListError::Storage {
            key: key.to_string(),
            message: format!("write {}: {}", path.display(), e),
        })?;
        debug!(key, path = %path.display(), bytes = value.len(), "Wrote stored value");

        Ok(())
    }
}
