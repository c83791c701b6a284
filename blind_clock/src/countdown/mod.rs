//! Countdown engine.
//!
//! A single timer with `Idle`, `Running`, `Paused` and `Complete` states. The
//! engine never reads the clock itself: callers pass the current
//! [`tokio::time::Instant`] into [`CountdownEngine::start`] and
//! [`CountdownEngine::tick`], which keeps it deterministic under test and
//! lets the clock actor run it on a paused tokio clock.
//!
//! ## Example
//!
//! ```
//! use blind_clock::countdown::{CountdownEngine, TickOutcome};
//! use tokio::time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut engine = CountdownEngine::new(2);
//! engine.start(t0);
//!
//! assert_eq!(
//!     engine.tick(t0 + Duration::from_millis(1_400)),
//!     TickOutcome::Ticked { remaining_secs: 1 }
//! );
//! assert_eq!(engine.tick(t0 + Duration::from_secs(2)), TickOutcome::Completed);
//! ```

pub mod engine;

pub use engine::{CountdownEngine, CountdownState, CountdownStatus, TickOutcome};
