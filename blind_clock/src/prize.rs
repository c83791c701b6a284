//! Prize pool and payout calculation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the three payout values are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Values are 0-100 shares of the pool
    #[default]
    Percentage,
    /// Values are absolute currency amounts
    Fixed,
}

impl fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionMode::Percentage => write!(f, "percentage"),
            DistributionMode::Fixed => write!(f, "fixed"),
        }
    }
}

/// Payout configuration for the top three places
///
/// Percentages are not required to sum to 100; see [`PrizeDistribution::check`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrizeDistribution {
    pub mode: DistributionMode,
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

impl Default for PrizeDistribution {
    fn default() -> Self {
        Self::percentage(60.0, 30.0, 10.0)
    }
}

impl PrizeDistribution {
    pub fn percentage(first: f64, second: f64, third: f64) -> Self {
        Self {
            mode: DistributionMode::Percentage,
            first,
            second,
            third,
        }
    }

    pub fn fixed(first: f64, second: f64, third: f64) -> Self {
        Self {
            mode: DistributionMode::Fixed,
            first,
            second,
            third,
        }
    }

    /// Sum of the three values
    pub fn percentage_total(&self) -> f64 {
        self.first + self.second + self.third
    }

    /// Advisory check; never blocks computation
    pub fn check(&self) -> Option<DistributionWarning> {
        if self.mode != DistributionMode::Percentage {
            return None;
        }
        let total = self.percentage_total();
        if (total - 100.0).abs() > f64::EPSILON * 100.0 {
            Some(DistributionWarning { total })
        } else {
            None
        }
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: DistributionPatch) {
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(first) = patch.first {
            self.first = first;
        }
        if let Some(second) = patch.second {
            self.second = second;
        }
        if let Some(third) = patch.third {
            self.third = third;
        }
    }
}

/// Partial update for a [`PrizeDistribution`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionPatch {
    pub mode: Option<DistributionMode>,
    pub first: Option<f64>,
    pub second: Option<f64>,
    pub third: Option<f64>,
}

/// Percentages that do not add up to 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionWarning {
    pub total: f64,
}

impl fmt::Display for DistributionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prize percentages add up to {}% instead of 100%",
            self.total
        )
    }
}

/// Payouts for the top three places
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Prizes {
    pub first: f64,
    pub second: f64,
    pub third: f64,
}

impl Prizes {
    /// Get payout for a specific position (1-indexed)
    pub fn payout_for_position(&self, position: usize) -> Option<f64> {
        match position {
            1 => Some(self.first),
            2 => Some(self.second),
            3 => Some(self.third),
            _ => None,
        }
    }
}

/// Total collected from buy-ins and re-buys
pub fn prize_pool(buy_ins: u32, buy_in_amount: f64, re_buys: u32, re_buy_amount: f64) -> f64 {
    f64::from(buy_ins) * buy_in_amount + f64::from(re_buys) * re_buy_amount
}

/// Compute payouts from the pool
///
/// Percentage payouts are plain floating point; rounding to currency units is
/// left to the display layer.
pub fn compute_prizes(pool: f64, distribution: &PrizeDistribution) -> Prizes {
    match distribution.mode {
        DistributionMode::Percentage => Prizes {
            first: pool * distribution.first / 100.0,
            second: pool * distribution.second / 100.0,
            third: pool * distribution.third / 100.0,
        },
        DistributionMode::Fixed => Prizes {
            first: distribution.first,
            second: distribution.second,
            third: distribution.third,
        },
    }
}
