//! Store wrapper that moves writes off the caller's task.

use super::{StateStore, StorageError, StorageResult};
use crate::tournament::TournamentSnapshot;
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

enum PendingWrite {
    Save(Box<TournamentSnapshot>),
    Clear,
}

/// Queues saves and clears for a writer task that runs them on the blocking pool.
///
/// `save` and `clear` only enqueue, so the clock actor never waits on the
/// filesystem. When several writes queue up behind a slow one, only the newest
/// is applied. `load` goes straight to the inner store and is meant for startup.
pub struct BackgroundStore {
    inner: Arc<dyn StateStore>,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

impl BackgroundStore {
    /// Wrap `inner` and spawn its writer task on the current runtime.
    ///
    /// The returned handle completes once the store has been dropped and
    /// every queued write has been flushed.
    pub fn spawn(inner: Arc<dyn StateStore>) -> (Self, JoinHandle<()>) {
        let (writes, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(inner.clone(), receiver));
        (Self { inner, writes }, task)
    }

    fn enqueue(&self, write: PendingWrite) -> StorageResult<()> {
        self.writes
            .send(write)
            .map_err(|_| StorageError::Unavailable("state writer has stopped".into()))
    }
}

async fn run_writer(store: Arc<dyn StateStore>, mut writes: mpsc::UnboundedReceiver<PendingWrite>) {
    while let Some(mut write) = writes.recv().await {
        while let Ok(newer) = writes.try_recv() {
            write = newer;
        }

        let store = store.clone();
        let result = tokio::task::spawn_blocking(move || match write {
            PendingWrite::Save(snapshot) => store.save(&snapshot),
            PendingWrite::Clear => store.clear(),
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("Failed to write tournament state: {}", e),
            Err(e) => log::error!("Tournament state writer failed: {}", e),
        }
    }
    log::debug!("Tournament state writer stopped");
}

impl StateStore for BackgroundStore {
    fn load(&self) -> StorageResult<Option<TournamentSnapshot>> {
        self.inner.load()
    }

    fn save(&self, snapshot: &TournamentSnapshot) -> StorageResult<()> {
        self.enqueue(PendingWrite::Save(Box::new(snapshot.clone())))
    }

    fn clear(&self) -> StorageResult<()> {
        self.enqueue(PendingWrite::Clear)
    }
}
