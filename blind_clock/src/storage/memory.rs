//! In-memory store.

use super::{StateStore, StorageError, StorageResult};
use crate::tournament::TournamentSnapshot;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Keeps the snapshot in memory; can be switched into a failing mode
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<TournamentSnapshot>>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a snapshot
    pub fn with_snapshot(snapshot: TournamentSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Make every operation fail with [`StorageError::Unavailable`]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Currently stored snapshot
    pub fn snapshot(&self) -> Option<TournamentSnapshot> {
        self.snapshot.lock().ok().and_then(|s| s.clone())
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store set to fail".into()));
        }
        Ok(())
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, Option<TournamentSnapshot>>> {
        self.snapshot
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> StorageResult<Option<TournamentSnapshot>> {
        self.check()?;
        Ok(self.lock()?.clone())
    }

    fn save(&self, snapshot: &TournamentSnapshot) -> StorageResult<()> {
        self.check()?;
        *self.lock()? = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.check()?;
        *self.lock()? = None;
        Ok(())
    }
}
