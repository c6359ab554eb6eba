use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{PixelflowError, PixelflowResult};

/// Minimal string key-value persistence.
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> PixelflowResult<Option<String>>;
    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> PixelflowResult<()>;
}

/// Process-local store, mostly for tests and one-shot CLI runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PixelflowResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PixelflowResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One file per key under a directory.
///
/// Writes go to a sibling temp file that is then renamed over the target, so a reader sees
/// either the previous value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir` (created lazily on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory configured through `PIXELFLOW_HISTORY_DIR`, else `./.pixelflow`.
    pub fn from_env() -> Self {
        let dir = std::env::var_os("PIXELFLOW_HISTORY_DIR")
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(".pixelflow"));
        Self::new(dir)
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PixelflowResult<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(PixelflowError::validation(format!(
                "store key \"{key}\" must be non-empty [A-Za-z0-9_-]"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PixelflowResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PixelflowError::persistence(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> PixelflowResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            PixelflowError::persistence(format!("create '{}': {e}", self.dir.display()))
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| {
            PixelflowError::persistence(format!("write '{}': {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            PixelflowError::persistence(format!("replace '{}': {e}", path.display()))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/store.rs"]
mod tests;
