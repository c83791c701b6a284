//! Tournament state machine.
//!
//! This module provides:
//! - Level progression with automatic advance on countdown completion
//! - Buy-in and re-buy accounting with the derived prize pool
//! - Catalog editing of the active blind structure
//! - Snapshot persistence through a [`StateStore`](crate::storage::StateStore)
//!
//! ## Example
//!
//! ```
//! use blind_clock::{
//!     clock::ClockConfig,
//!     notify::NullSink,
//!     storage::MemoryStore,
//!     tournament::Tournament,
//! };
//! use std::sync::Arc;
//! use tokio::time::{Duration, Instant};
//!
//! let mut tournament = Tournament::new(
//!     ClockConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NullSink),
//! );
//!
//! let t0 = Instant::now();
//! tournament.add_buy_in();
//! tournament.start(t0);
//! tournament.poll(t0 + Duration::from_secs(90));
//!
//! assert_eq!(tournament.remaining_secs(), 1200 - 90);
//! assert_eq!(tournament.prize_pool(), 20.0);
//! ```

pub mod machine;
pub mod models;

pub use machine::Tournament;
pub use models::{
    MIN_AMOUNT, SettingsPatch, TournamentSettings, TournamentSnapshot, TournamentView,
};
