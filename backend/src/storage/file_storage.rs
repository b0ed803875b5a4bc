//! # File Key-Value Storage
//!
//! Stores each key as its own file inside a data directory:
//!
//! ```text
//! data/
//! └── gemini-expenses.json   ← value for key "gemini-expenses"
//! ```
//!
//! Writes go to a temp file that is then renamed over the target, so a crash
//! mid-write never leaves a truncated payload behind.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::traits::KeyValueStorage;

#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    base_directory: PathBuf,
}

impl FileKeyValueStorage {
    /// Create a storage rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("creating data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// File backing `key`. Anything outside `[A-Za-z0-9._-]` is replaced so a
    /// key can never escape the data directory.
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        let mut file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if file_name.is_empty() || file_name.starts_with('.') {
            file_name.insert(0, '_');
        }
        self.base_directory.join(format!("{}.json", file_name))
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Read {} bytes from {:?}", content.len(), path);
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key);
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, value)
            .with_context(|| format!("writing {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("replacing {}", path.display()))?;

        debug!("Saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for_key(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}
