//! JSON file store.

use super::{StateStore, StorageResult};
use crate::tournament::TournamentSnapshot;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// File name used when no path is configured
pub const DEFAULT_STATE_FILE: &str = "poker-tournament-settings.json";

/// Stores the snapshot as pretty-printed JSON.
///
/// Writes go to a sibling temporary file that is renamed over the target, so
/// a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_STATE_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> StorageResult<Option<TournamentSnapshot>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let snapshot = serde_json::from_str(&contents)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &TournamentSnapshot) -> StorageResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        countdown::{CountdownState, CountdownStatus},
        storage::StorageError,
        tournament::TournamentSettings,
    };

    /// Scratch directory removed when dropped
    struct ScratchDir(PathBuf);

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn temp_store() -> (ScratchDir, JsonFileStore) {
        let dir = std::env::temp_dir().join(format!("blind_clock_{}", uuid::Uuid::new_v4()));
        let store = JsonFileStore::new(dir.join(DEFAULT_STATE_FILE));
        (ScratchDir(dir), store)
    }

    fn snapshot() -> TournamentSnapshot {
        TournamentSnapshot {
            settings: TournamentSettings::default(),
            current_level_id: 4,
            buy_ins: 12,
            re_buys: 3,
            alert_active: false,
            panel_open: true,
            countdown: CountdownState {
                remaining_secs: 845,
                status: CountdownStatus::Running,
            },
            saved_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let (_dir, store) = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = temp_store();
        let snapshot = snapshot();
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_clear_removes_file_and_is_idempotent() {
        let (_dir, store) = temp_store();
        store.save(&snapshot()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let (_dir, store) = temp_store();
        store.save(&snapshot()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
    }
}
