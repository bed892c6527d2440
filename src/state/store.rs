//! State persistence.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::state::types::ArchiveState;

/// State file name inside the archive root.
pub const STATE_FILENAME: &str = "state.json";

/// How [`StateStore::load`] obtained its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No state persisted yet.
    Missing,
    Loaded,
    /// The persisted state was unreadable and progress tracking was reset.
    Recovered(String),
}

/// Load/save seam for the archive state.
pub trait StateStore {
    /// Load the persisted state. Never fails: unreadable state yields a
    /// fresh default and [`LoadStatus::Recovered`].
    fn load(&self) -> (ArchiveState, LoadStatus);

    /// Persist the state.
    fn save(&self, state: &ArchiveState) -> Result<()>;
}

/// JSON file store with atomic replace.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Store at `<output_dir>/state.json`.
    pub fn in_dir(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(STATE_FILENAME),
        }
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn recover(&self, reason: String) -> (ArchiveState, LoadStatus) {
        tracing::warn!(
            "{}; starting with empty state",
            Error::StateCorruption(format!("{}: {}", self.path.display(), reason))
        );

        // Keep the unreadable file around for inspection.
        let aside = self.path.with_extension("json.corrupt");
        if let Err(e) = fs::rename(&self.path, &aside) {
            tracing::debug!("Could not move {} aside: {}", self.path.display(), e);
        }

        (ArchiveState::default(), LoadStatus::Recovered(reason))
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> (ArchiveState, LoadStatus) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return (ArchiveState::default(), LoadStatus::Missing);
            }
            Err(e) => return self.recover(e.to_string()),
        };

        match serde_json::from_str(&content) {
            Ok(state) => (state, LoadStatus::Loaded),
            Err(e) => self.recover(e.to_string()),
        }
    }

    fn save(&self, state: &ArchiveState) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let tmp = dir.join(format!(".{}.{}.tmp", STATE_FILENAME, uuid::Uuid::new_v4()));
        let content = serde_json::to_string_pretty(state)?;

        let written = (|| -> Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<ArchiveState>>,
}

impl MemoryStateStore {
    pub fn new(state: ArchiveState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// Last saved state, if any.
    pub fn snapshot(&self) -> Option<ArchiveState> {
        self.state.lock().ok().and_then(|s| s.clone())
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> (ArchiveState, LoadStatus) {
        match self.snapshot() {
            Some(state) => (state, LoadStatus::Loaded),
            None => (ArchiveState::default(), LoadStatus::Missing),
        }
    }

    fn save(&self, state: &ArchiveState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| Error::Config("State lock poisoned".to_string()))?;
        *guard = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_fresh_state() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::in_dir(dir.path());
        let (state, status) = store.load();
        assert_eq!(state, ArchiveState::default());
        assert_eq!(status, LoadStatus::Missing);
    }

    #[test]
    fn test_corrupt_file_recovers_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::in_dir(dir.path());
        fs::write(store.path(), "{\"processed_ids\": [\"1\", ").unwrap();

        let (state, status) = store.load();
        assert_eq!(state, ArchiveState::default());
        assert!(matches!(status, LoadStatus::Recovered(_)));
        assert!(dir.path().join("state.json.corrupt").exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::in_dir(dir.path());

        let mut state = ArchiveState::default();
        state.mark_processed("17900000000000001", true);
        state.last_saved_media_id = Some("17900000000000001".to_string());
        store.save(&state).unwrap();

        let (loaded, status) = store.load();
        assert_eq!(status, LoadStatus::Loaded);
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::in_dir(dir.path());
        store.save(&ArchiveState::default()).unwrap();
        store.save(&ArchiveState::default()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![STATE_FILENAME.to_string()]);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonStateStore::in_dir(&dir.path().join("nested/archive"));
        store.save(&ArchiveState::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStateStore::default();
        assert_eq!(store.load().1, LoadStatus::Missing);

        let mut state = ArchiveState::default();
        state.mark_processed("a", true);
        store.save(&state).unwrap();
        assert_eq!(store.load(), (state, LoadStatus::Loaded));
    }
}
