//! Clock actor message types.

use crate::{
    catalog::{BlindLevel, LevelField, LevelId},
    prize::DistributionPatch,
    tournament::{SettingsPatch, TournamentSnapshot, TournamentView},
    transition::{IgnoreReason, Transition},
};
use thiserror::Error;
use tokio::sync::oneshot;

/// Operator commands accepted by the clock
#[derive(Debug, Clone, PartialEq)]
pub enum ClockCommand {
    /// Start an idle or paused countdown
    Start,
    Pause,
    Resume,
    /// Pause if running, resume or start otherwise
    Toggle,
    /// Reset the clock to the current level's duration
    ResetTimer,
    /// Adjust remaining time by signed seconds
    AddTime(i64),
    /// Skip to the next level
    NextLevel,
    AddBuyIn,
    RemoveBuyIn,
    AddReBuy,
    RemoveReBuy,
    /// Switch to a preset blind structure by key
    SelectStructure(String),
    AddLevel(BlindLevel),
    RemoveLevel(LevelId),
    UpdateLevel {
        id: LevelId,
        field: LevelField,
        value: u64,
    },
    /// Back to the first level; optionally wipe settings and saved state
    ResetTournament { clear_persisted: bool },
    DismissAlert,
    TogglePanel,
    UpdateSettings(SettingsPatch),
    UpdatePrizeDistribution(DistributionPatch),
}

/// Messages that can be sent to a ClockActor
#[derive(Debug)]
pub enum ClockMessage {
    /// Operator command
    Command {
        command: ClockCommand,
        response: oneshot::Sender<ClockResponse>,
    },

    /// Get the current view
    GetView {
        response: oneshot::Sender<TournamentView>,
    },

    /// Get the persistable snapshot
    GetSnapshot {
        response: oneshot::Sender<TournamentSnapshot>,
    },

    /// Drive the clock immediately instead of waiting for the interval
    Tick,

    /// Save and stop the actor
    Shutdown,
}

/// Outcome of a [`ClockCommand`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockResponse {
    /// The command changed state
    Applied,

    /// The command was a no-op
    Ignored(IgnoreReason),

    /// A level was stored under this id
    LevelAdded(LevelId),
}

impl ClockResponse {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

impl From<Transition> for ClockResponse {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Applied => Self::Applied,
            Transition::Ignored(reason) => Self::Ignored(reason),
        }
    }
}

/// Errors talking to the clock actor
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("clock is not running")]
    Closed,
}

pub type ClockResult<T> = Result<T, ClockError>;
