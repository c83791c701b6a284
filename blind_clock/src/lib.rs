//! # Blind Clock
//!
//! A poker tournament clock: a drift-corrected countdown per blind level,
//! automatic level progression, buy-in accounting with prize payouts, and
//! crash-safe persistence of the whole tournament.
//!
//! ## Architecture
//!
//! - [`countdown`]: the per-level countdown engine, driven by explicit instants
//! - [`tournament`]: the state machine owning levels, counters and the engine
//! - [`clock`]: an actor that serializes operator commands with interval ticks
//! - [`catalog`]: blind levels, structures and the built-in presets
//! - [`prize`]: prize pool and payout calculation
//! - [`storage`]: the persistence gateway and its file/memory stores
//! - [`notify`]: notification sinks for sounds, logs and live displays
//!
//! ## Example
//!
//! ```
//! use blind_clock::{
//!     clock::ClockConfig,
//!     countdown::CountdownStatus,
//!     notify::MemorySink,
//!     storage::MemoryStore,
//!     tournament::Tournament,
//! };
//! use std::sync::Arc;
//! use tokio::time::Instant;
//!
//! let store = Arc::new(MemoryStore::new());
//! let sink = Arc::new(MemorySink::new());
//! let mut tournament = Tournament::new(ClockConfig::default(), store.clone(), sink);
//!
//! tournament.start(Instant::now());
//! assert_eq!(tournament.status(), CountdownStatus::Running);
//! assert_eq!(store.save_count(), 1);
//! ```

pub mod catalog;
pub mod clock;
pub mod countdown;
pub mod display;
pub mod notify;
pub mod prize;
pub mod storage;
pub mod tournament;
pub mod transition;

pub use catalog::{BlindLevel, BlindStructure, LevelField, LevelId};
pub use clock::{ClockActor, ClockCommand, ClockConfig, ClockHandle, ClockResponse};
pub use countdown::{CountdownEngine, CountdownState, CountdownStatus, TickOutcome};
pub use notify::{ClockEvent, NotificationSink};
pub use prize::{DistributionMode, PrizeDistribution, Prizes};
pub use storage::{JsonFileStore, MemoryStore, StateStore, StorageError};
pub use tournament::{Tournament, TournamentSettings, TournamentSnapshot, TournamentView};
pub use transition::{IgnoreReason, Transition};
