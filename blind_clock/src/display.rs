//! Text helpers for presenting clock state.

use crate::catalog::BlindLevel;

/// Seconds before the end of a level during which the clock warns
pub const FINAL_COUNTDOWN_SECS: u32 = 10;

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whether the level is in its final seconds
pub fn is_final_countdown(remaining_secs: u32) -> bool {
    remaining_secs > 0 && remaining_secs <= FINAL_COUNTDOWN_SECS
}

/// Notification text for an upcoming blind change
pub fn blind_change_message(small_blind: u64, big_blind: u64) -> String {
    format!("Blinds changing to {}/{}", small_blind, big_blind)
}

/// One-line description of a level
pub fn describe_level(level: &BlindLevel) -> String {
    if level.ante > 0 {
        format!(
            "Level {}: {}/{} ante {}",
            level.id, level.small_blind, level.big_blind, level.ante
        )
    } else {
        format!(
            "Level {}: {}/{}",
            level.id, level.small_blind, level.big_blind
        )
    }
}

/// Format a currency amount, showing cents only when present
pub fn format_amount(currency: &str, amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}{:.0}", currency, amount)
    } else {
        format!("{}{:.2}", currency, amount)
    }
}
