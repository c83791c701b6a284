//! Console configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use blind_clock::{catalog, clock::ClockConfig, storage::DEFAULT_STATE_FILE};
use std::{path::PathBuf, time::Duration};

/// Slowest tick interval that still refreshes the clock every second
const MAX_TICK_MS: u64 = 1_000;

/// Complete console configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Where the tournament snapshot is saved
    pub state_path: PathBuf,
    /// Tick interval of the clock actor in milliseconds
    pub tick_ms: u64,
    /// Seconds between a level finishing and the automatic advance
    pub auto_advance_delay_secs: u64,
    /// Preset used for fresh tournaments and full resets
    pub structure: String,
    /// Capacity of the event channel feeding the display
    pub event_buffer: usize,
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub state_path: Option<PathBuf>,
    pub tick_ms: Option<u64>,
    pub auto_advance_delay_secs: Option<u64>,
    pub structure: Option<String>,
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    ///
    /// Unparsable values fall back to their defaults; range checks happen
    /// in [`ConsoleConfig::validate`].
    pub fn from_env(overrides: ConfigOverrides) -> Self {
        let state_path = overrides
            .state_path
            .or_else(|| std::env::var("CLOCK_STATE_PATH").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let structure = overrides
            .structure
            .or_else(|| std::env::var("CLOCK_STRUCTURE").ok())
            .unwrap_or_else(|| catalog::DEFAULT_PRESET.to_string());

        Self {
            state_path,
            tick_ms: overrides
                .tick_ms
                .unwrap_or_else(|| parse_env_or("CLOCK_TICK_MS", 250)),
            auto_advance_delay_secs: overrides
                .auto_advance_delay_secs
                .unwrap_or_else(|| parse_env_or("CLOCK_AUTO_ADVANCE_DELAY_SECS", 0)),
            structure,
            event_buffer: parse_env_or("CLOCK_EVENT_BUFFER", 64),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            return Err(ConfigError::Invalid {
                var: "CLOCK_TICK_MS".to_string(),
                reason: format!("Must be between 1 and {}", MAX_TICK_MS),
            });
        }

        if catalog::preset(&self.structure).is_none() {
            return Err(ConfigError::Invalid {
                var: "CLOCK_STRUCTURE".to_string(),
                reason: format!(
                    "Unknown structure '{}' (expected one of: {})",
                    self.structure,
                    catalog::PRESET_KEYS.join(", ")
                ),
            });
        }

        if self.event_buffer == 0 {
            return Err(ConfigError::Invalid {
                var: "CLOCK_EVENT_BUFFER".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.state_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "CLOCK_STATE_PATH".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Library clock configuration derived from this one
    pub fn clock_config(&self) -> ClockConfig {
        ClockConfig {
            default_preset: self.structure.to_ascii_lowercase(),
            ..ClockConfig::default()
        }
        .with_tick_interval(Duration::from_millis(self.tick_ms))
        .with_auto_advance_delay(Duration::from_secs(self.auto_advance_delay_secs))
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
