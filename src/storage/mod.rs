use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileStorage;
#[cfg(test)]
pub use memory::MemoryStorage;

/// Durable string key-value storage the task store persists through.
pub trait KeyValueStore {
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

pub fn default_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".tasklist")
}

pub fn from_config(config: &Config) -> Result<FileStorage> {
    let dir = config
        .storage
        .path
        .as_deref()
        .map(|s| shellexpand::tilde(s).into_owned())
        .map(PathBuf::from)
        .unwrap_or_else(default_dir);

    FileStorage::open(dir)
}
