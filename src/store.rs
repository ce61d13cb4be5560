// src/store.rs

use crate::errors::{ParlanceError, ParlanceResult};
use crate::models::PersistedMessage;
use std::fs;
use std::path::PathBuf;

/// Key-value persistence for the transcript, surviving restarts.
pub trait Store {
    /// Returns `Ok(None)` when no history has ever been saved.
    fn load(&self) -> ParlanceResult<Option<Vec<PersistedMessage>>>;
    fn save(&self, messages: &[PersistedMessage]) -> ParlanceResult<()>;
    fn clear(&self) -> ParlanceResult<()>;
}

/// History persisted as a JSON array in a single file under the user
/// config directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore { path }
    }

    pub fn default_path() -> ParlanceResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ParlanceError::store_error("could not determine home directory"))?;
        Ok(home_dir
            .join(".config")
            .join("parlance")
            .join("history.json"))
    }
}

impl Store for FileStore {
    fn load(&self) -> ParlanceResult<Option<Vec<PersistedMessage>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ParlanceError::store_error(format!("failed to read history: {}", e)))?;
        let messages: Vec<PersistedMessage> = serde_json::from_str(&contents)
            .map_err(|e| ParlanceError::store_error(format!("failed to parse history: {}", e)))?;
        Ok(Some(messages))
    }

    fn save(&self, messages: &[PersistedMessage]) -> ParlanceResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ParlanceError::store_error(format!("failed to create history directory: {}", e))
            })?;
        }
        let contents = serde_json::to_string_pretty(messages)
            .map_err(|e| ParlanceError::store_error(format!("failed to serialize history: {}", e)))?;
        fs::write(&self.path, contents)
            .map_err(|e| ParlanceError::store_error(format!("failed to write history: {}", e)))
    }

    fn clear(&self) -> ParlanceResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                ParlanceError::store_error(format!("failed to remove history: {}", e))
            })?;
        }
        Ok(())
    }
}
