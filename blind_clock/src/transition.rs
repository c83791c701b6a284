//! Outcome of an operator-invoked state transition.
//!
//! Operations attempted from an invalid state are rejected without raising an
//! error; the rejection is reported through [`Transition::Ignored`].

use serde::Serialize;
use std::fmt;

/// Why a transition was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Countdown is already running
    AlreadyRunning,
    /// Countdown has no time left
    NoTimeRemaining,
    /// Countdown is not running
    NotRunning,
    /// Countdown is not paused
    NotPaused,
    /// Already on the final level
    FinalLevel,
    /// Refusing to remove the only level
    SoleLevel,
    /// Refusing to remove the level currently in play
    CurrentLevel,
    /// No level with that id
    UnknownLevel,
    /// No preset with that key
    UnknownPreset,
    /// Counter is already zero
    CounterAtZero,
    /// No alert to dismiss
    NoAlert,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::AlreadyRunning => "clock is already running",
            IgnoreReason::NoTimeRemaining => "no time remaining",
            IgnoreReason::NotRunning => "clock is not running",
            IgnoreReason::NotPaused => "clock is not paused",
            IgnoreReason::FinalLevel => "already on the final level",
            IgnoreReason::SoleLevel => "cannot remove the only level",
            IgnoreReason::CurrentLevel => "cannot remove the current level",
            IgnoreReason::UnknownLevel => "no such level",
            IgnoreReason::UnknownPreset => "no such blind structure",
            IgnoreReason::CounterAtZero => "counter is already zero",
            IgnoreReason::NoAlert => "no alert to dismiss",
        };
        f.write_str(text)
    }
}

/// Result of a state transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Applied,
    Ignored(IgnoreReason),
}

impl Transition {
    /// Check if the transition took effect
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }

    /// Reason for rejection, if any
    pub fn ignored_reason(&self) -> Option<IgnoreReason> {
        match self {
            Transition::Applied => None,
            Transition::Ignored(reason) => Some(*reason),
        }
    }
}
