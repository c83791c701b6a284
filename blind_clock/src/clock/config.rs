//! Clock configuration.

use crate::catalog::DEFAULT_PRESET;
use tokio::time::Duration;

/// Runtime parameters for the tournament clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    /// Period of the tick interval driving the countdown
    pub tick_interval: Duration,

    /// Delay between a level completing and the automatic advance (zero = immediate)
    pub auto_advance_delay: Duration,

    /// Preset used for fresh tournaments and full resets
    pub default_preset: String,

    /// Capacity of the actor's message inbox
    pub inbox_capacity: usize,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(250),
            auto_advance_delay: Duration::ZERO,
            default_preset: DEFAULT_PRESET.to_string(),
            inbox_capacity: 100,
        }
    }
}

impl ClockConfig {
    /// Set the auto-advance delay
    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    /// Set the tick interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}
