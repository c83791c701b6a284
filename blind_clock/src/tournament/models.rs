//! Tournament settings, snapshots and read-only views.

use crate::{
    catalog::{self, BlindLevel, BlindStructure, LevelId},
    countdown::CountdownState,
    prize::{PrizeDistribution, Prizes},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smallest buy-in or re-buy amount an operator may configure
pub const MIN_AMOUNT: f64 = 1.0;

/// Operator-editable tournament settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Tournament title
    pub title: String,
    /// Currency symbol shown next to amounts (may be empty)
    pub currency: String,
    /// Price of a buy-in
    pub buy_in_amount: f64,
    /// Price of a re-buy
    pub re_buy_amount: f64,
    /// Active blind structure (a copy of a preset, possibly edited)
    pub blind_structure: BlindStructure,
    /// Payout configuration
    pub prize_distribution: PrizeDistribution,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            title: "Poker Tournament".to_string(),
            currency: "$".to_string(),
            buy_in_amount: 20.0,
            re_buy_amount: 20.0,
            blind_structure: catalog::presets::regular(),
            prize_distribution: PrizeDistribution::default(),
        }
    }
}

impl TournamentSettings {
    /// Default settings using the named preset, or the regular preset if unknown
    pub fn with_preset(key: &str) -> Self {
        let mut settings = Self::default();
        match catalog::preset(key) {
            Some(structure) => settings.blind_structure = structure,
            None => log::warn!("Unknown blind structure '{}', using regular", key),
        }
        settings
    }

    /// Apply a partial update; amounts below [`MIN_AMOUNT`] are clamped
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        if let Some(amount) = patch.buy_in_amount {
            self.buy_in_amount = coerce_amount(amount);
        }
        if let Some(amount) = patch.re_buy_amount {
            self.re_buy_amount = coerce_amount(amount);
        }
    }
}

fn coerce_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= MIN_AMOUNT {
        amount
    } else {
        MIN_AMOUNT
    }
}

/// Partial update for [`TournamentSettings`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub title: Option<String>,
    pub currency: Option<String>,
    pub buy_in_amount: Option<f64>,
    pub re_buy_amount: Option<f64>,
}

/// Persisted form of the whole tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub settings: TournamentSettings,
    pub current_level_id: LevelId,
    pub buy_ins: u32,
    pub re_buys: u32,
    pub alert_active: bool,
    pub panel_open: bool,
    pub countdown: CountdownState,
    pub saved_at: DateTime<Utc>,
}

/// Read-only summary for front ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentView {
    pub title: String,
    pub currency: String,
    pub structure_name: String,
    pub level_count: usize,
    /// 1-based position of the current level in the structure
    pub level_position: usize,
    pub current_level: Option<BlindLevel>,
    pub next_level: Option<BlindLevel>,
    pub countdown: CountdownState,
    /// Remaining time as `MM:SS`
    pub clock: String,
    pub final_countdown: bool,
    pub buy_ins: u32,
    pub re_buys: u32,
    pub prize_pool: f64,
    pub prizes: Prizes,
    pub distribution_warning: Option<String>,
    pub alert_active: bool,
    pub panel_open: bool,
    pub advance_pending: bool,
}
