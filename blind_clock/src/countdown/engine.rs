//! Drift-corrected countdown engine.

use crate::transition::{IgnoreReason, Transition};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant};

/// Countdown status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    /// Never started since construction
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Stopped with time remaining
    Paused,
    /// Reached zero; terminal until reset or time is added
    Complete,
}

/// Persistable part of a countdown
///
/// The wall-clock anchor is deliberately absent: a reloaded countdown never
/// continues in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub remaining_secs: u32,
    pub status: CountdownStatus,
}

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Engine is not running
    Idle,
    /// Tick belongs to an earlier epoch
    Stale,
    /// Less than a whole second has elapsed since the last decrement
    Pending,
    /// Counter decremented
    Ticked { remaining_secs: u32 },
    /// Counter reached zero on this tick
    Completed,
}

/// Countdown engine for a single level
///
/// Ticks measure real elapsed time against an anchor instant instead of
/// assuming a fixed decrement per callback. Whole seconds are consumed from
/// the anchor and the sub-second remainder carries into the next tick, so
/// irregular tick gaps summing to `T` decrement the counter by `floor(T)`.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    initial_secs: u32,
    remaining_secs: u32,
    status: CountdownStatus,
    last_tick: Option<Instant>,
    epoch: u64,
}

impl CountdownEngine {
    /// Create an idle engine
    pub fn new(initial_secs: u32) -> Self {
        Self {
            initial_secs,
            remaining_secs: initial_secs,
            status: CountdownStatus::Idle,
            last_tick: None,
            epoch: 0,
        }
    }

    /// Rebuild an engine from persisted state.
    ///
    /// `Running` degrades to `Paused`, and a `Complete` state with time left is
    /// treated as `Paused`.
    pub fn from_state(initial_secs: u32, state: CountdownState) -> Self {
        let status = match state.status {
            CountdownStatus::Running => CountdownStatus::Paused,
            CountdownStatus::Complete if state.remaining_secs > 0 => CountdownStatus::Paused,
            other => other,
        };

        Self {
            initial_secs,
            remaining_secs: state.remaining_secs,
            status,
            last_tick: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> CountdownState {
        CountdownState {
            remaining_secs: self.remaining_secs,
            status: self.status,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    /// Generation counter, bumped by every start, pause, reset and completion
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    pub fn is_complete(&self) -> bool {
        self.status == CountdownStatus::Complete
    }

    /// Start counting from `now`. Valid from `Idle` or `Paused` with time remaining.
    pub fn start(&mut self, now: Instant) -> Transition {
        match self.status {
            CountdownStatus::Running => Transition::Ignored(IgnoreReason::AlreadyRunning),
            CountdownStatus::Complete => Transition::Ignored(IgnoreReason::NoTimeRemaining),
            CountdownStatus::Idle | CountdownStatus::Paused if self.remaining_secs == 0 => {
                Transition::Ignored(IgnoreReason::NoTimeRemaining)
            }
            CountdownStatus::Idle | CountdownStatus::Paused => {
                self.status = CountdownStatus::Running;
                self.last_tick = Some(now);
                self.epoch += 1;
                Transition::Applied
            }
        }
    }

    /// Stop counting, keeping the remaining time as of the last tick
    pub fn pause(&mut self) -> Transition {
        if self.status != CountdownStatus::Running {
            return Transition::Ignored(IgnoreReason::NotRunning);
        }
        self.status = CountdownStatus::Paused;
        self.last_tick = None;
        self.epoch += 1;
        Transition::Applied
    }

    /// Continue a paused countdown
    pub fn resume(&mut self, now: Instant) -> Transition {
        match self.status {
            CountdownStatus::Paused => self.start(now),
            CountdownStatus::Running => Transition::Ignored(IgnoreReason::AlreadyRunning),
            CountdownStatus::Idle | CountdownStatus::Complete => {
                Transition::Ignored(IgnoreReason::NotPaused)
            }
        }
    }

    /// Reset to `new_duration` (or the configured duration) and pause.
    ///
    /// A new duration also becomes the configured duration for later resets.
    pub fn reset(&mut self, new_duration: Option<u32>) {
        if let Some(duration) = new_duration {
            self.initial_secs = duration;
        }
        self.remaining_secs = self.initial_secs;
        self.status = CountdownStatus::Paused;
        self.last_tick = None;
        self.epoch += 1;
    }

    /// Adjust the remaining time by a signed delta, clamped at zero.
    ///
    /// A completed countdown that gains time becomes `Paused`. Returns `true`
    /// when the adjustment drove the countdown to zero from any other status,
    /// which completes it.
    pub fn add_time(&mut self, delta_secs: i64) -> bool {
        let adjusted = (i64::from(self.remaining_secs) + delta_secs).clamp(0, i64::from(u32::MAX));
        self.remaining_secs = u32::try_from(adjusted).unwrap_or(u32::MAX);

        match self.status {
            CountdownStatus::Complete if self.remaining_secs > 0 => {
                self.status = CountdownStatus::Paused;
                false
            }
            CountdownStatus::Complete => false,
            _ if self.remaining_secs == 0 => {
                self.complete();
                true
            }
            _ => false,
        }
    }

    /// Advance the countdown to `now`
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.status != CountdownStatus::Running {
            return TickOutcome::Idle;
        }
        let Some(last_tick) = self.last_tick else {
            return TickOutcome::Idle;
        };

        let whole_secs = now.saturating_duration_since(last_tick).as_secs();
        if whole_secs == 0 {
            return TickOutcome::Pending;
        }

        self.last_tick = Some(last_tick + Duration::from_secs(whole_secs));
        let consumed = u32::try_from(whole_secs).unwrap_or(u32::MAX);
        self.remaining_secs = self.remaining_secs.saturating_sub(consumed);

        if self.remaining_secs == 0 {
            self.complete();
            TickOutcome::Completed
        } else {
            TickOutcome::Ticked {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Tick only if `epoch` is still current
    pub fn tick_if_current(&mut self, epoch: u64, now: Instant) -> TickOutcome {
        if epoch != self.epoch {
            return TickOutcome::Stale;
        }
        self.tick(now)
    }

    fn complete(&mut self) {
        self.status = CountdownStatus::Complete;
        self.last_tick = None;
        self.epoch += 1;
    }
}
