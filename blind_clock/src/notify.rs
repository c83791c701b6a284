//! Notification port for side effects (sounds, toasts, screen updates).
//!
//! The tournament emits [`ClockEvent`]s through an injected
//! [`NotificationSink`]; it only guarantees *that* and *when* events fire.

use crate::{
    catalog::{BlindLevel, LevelId},
    display,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Events emitted by the tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClockEvent {
    /// Countdown decremented
    Tick { remaining_secs: u32 },
    /// Remaining time was set by a reset or an adjustment
    TimeChanged { remaining_secs: u32 },
    /// Countdown entered the final seconds of a level
    FinalCountdown { level_id: LevelId, remaining_secs: u32 },
    /// Countdown for a level reached zero
    LevelCompleted {
        level_id: LevelId,
        next: Option<BlindLevel>,
    },
    /// A new level is in play
    LevelAdvanced { level: BlindLevel },
    /// Buy-in recorded
    BuyInAdded { buy_ins: u32 },
    /// Re-buy recorded
    ReBuyAdded { re_buys: u32 },
    /// Tournament returned to its first level
    TournamentReset { cleared: bool },
    /// Operator pressed a control
    Click,
}

/// Receiver of clock events
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &ClockEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: &ClockEvent) {}
}

/// Writes events to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, event: &ClockEvent) {
        match event {
            ClockEvent::Tick { remaining_secs } => {
                log::trace!("Tick: {}", display::format_clock(*remaining_secs));
            }
            ClockEvent::TimeChanged { remaining_secs } => {
                log::debug!("Clock set to {}", display::format_clock(*remaining_secs));
            }
            ClockEvent::FinalCountdown {
                level_id,
                remaining_secs,
            } => {
                log::info!(
                    "Level {} ends in {} seconds",
                    level_id,
                    remaining_secs
                );
            }
            ClockEvent::LevelCompleted { level_id, next } => match next {
                Some(next) => log::info!(
                    "Level {} complete. {}",
                    level_id,
                    display::blind_change_message(next.small_blind, next.big_blind)
                ),
                None => log::info!("Level {} complete. This is the final level", level_id),
            },
            ClockEvent::LevelAdvanced { level } => {
                log::info!("New blind level: {}", display::describe_level(level));
            }
            ClockEvent::BuyInAdded { buy_ins } => log::info!("Buy-in added ({} total)", buy_ins),
            ClockEvent::ReBuyAdded { re_buys } => log::info!("Re-buy added ({} total)", re_buys),
            ClockEvent::TournamentReset { cleared } => {
                log::info!("Tournament reset (settings cleared: {})", cleared);
            }
            ClockEvent::Click => log::trace!("Click"),
        }
    }
}

/// Records every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ClockEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded events
    pub fn events(&self) -> Vec<ClockEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Remove and return the recorded events
    pub fn take(&self) -> Vec<ClockEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    /// Number of recorded events matching a predicate
    pub fn count(&self, predicate: impl Fn(&ClockEvent) -> bool) -> usize {
        self.events
            .lock()
            .map(|events| events.iter().filter(|event| predicate(event)).count())
            .unwrap_or(0)
    }
}

impl NotificationSink for MemorySink {
    fn notify(&self, event: &ClockEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Forwards events to channel subscribers
///
/// Delivery uses `try_send`: a full subscriber drops the event, a closed one
/// is removed.
#[derive(Debug)]
pub struct BroadcastSink {
    capacity: usize,
    subscribers: Mutex<Vec<mpsc::Sender<ClockEvent>>>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> mpsc::Receiver<ClockEvent> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl NotificationSink for BroadcastSink {
    fn notify(&self, event: &ClockEvent) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };
        subscribers.retain(|sender| match sender.try_send(event.clone()) {
            Ok(_) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Subscriber channel full, dropping {:?}", event);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("Subscriber disconnected, removing");
                false
            }
        });
    }
}

/// Delivers each event to several sinks in order
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl NotificationSink for FanoutSink {
    fn notify(&self, event: &ClockEvent) {
        for sink in &self.sinks {
            sink.notify(event);
        }
    }
}
