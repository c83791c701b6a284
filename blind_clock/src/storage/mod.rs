//! Persistence gateway for tournament snapshots.
//!
//! The tournament loads once at startup and saves after every mutation.
//! Failures are logged and never roll back in-memory state.
//! [`BackgroundStore`] keeps file writes off the clock's async task.

pub mod background;
pub mod errors;
pub mod file;
pub mod memory;

pub use background::BackgroundStore;
pub use errors::{StorageError, StorageResult};
pub use file::{DEFAULT_STATE_FILE, JsonFileStore};
pub use memory::MemoryStore;

use crate::tournament::TournamentSnapshot;

/// Load/save/clear of the full tournament snapshot
pub trait StateStore: Send + Sync {
    /// Stored snapshot, or `None` when nothing has been saved
    fn load(&self) -> StorageResult<Option<TournamentSnapshot>>;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &TournamentSnapshot) -> StorageResult<()>;

    /// Erase the stored snapshot
    fn clear(&self) -> StorageResult<()>;
}
