//! Clock actor.
//!
//! A single task owns the [`Tournament`](crate::tournament::Tournament) and
//! serializes operator commands with interval ticks, so a countdown
//! completion and a concurrent command can never interleave.

pub mod actor;
pub mod config;
pub mod messages;

pub use actor::{ClockActor, ClockHandle};
pub use config::ClockConfig;
pub use messages::{ClockCommand, ClockError, ClockMessage, ClockResponse, ClockResult};
