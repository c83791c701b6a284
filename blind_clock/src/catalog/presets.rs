//! Built-in blind structure presets.
//!
//! Presets are read-only templates; the tournament copies one into its
//! active settings and edits the copy.

use super::models::{BlindLevel, BlindStructure};

/// Preset used when nothing else is configured
pub const DEFAULT_PRESET: &str = "regular";

/// Keys of every built-in preset, in display order
pub const PRESET_KEYS: [&str; 3] = ["regular", "turbo", "deep"];

const REGULAR_BLINDS: [(u64, u64); 20] = [
    (10, 25),
    (25, 50),
    (50, 100),
    (75, 150),
    (100, 200),
    (150, 300),
    (200, 400),
    (300, 600),
    (400, 800),
    (500, 1000),
    (700, 1400),
    (1000, 2000),
    (1500, 3000),
    (2000, 4000),
    (3000, 6000),
    (5000, 10000),
    (7500, 14000),
    (10000, 20000),
    (15000, 30000),
    (20000, 40000),
];

fn from_blinds(name: &str, duration_secs: u32) -> BlindStructure {
    let levels = REGULAR_BLINDS
        .iter()
        .zip(1..)
        .map(|(&(small, big), id)| BlindLevel::new(id, small, big, duration_secs))
        .collect();
    BlindStructure::new(name, levels)
}

/// 20 levels of 20 minutes
pub fn regular() -> BlindStructure {
    from_blinds("Juldagspokern", 1200)
}

/// Regular blinds with 10-minute levels
pub fn turbo() -> BlindStructure {
    from_blinds("Turbo", 600)
}

/// 30-minute levels with antes (half the small blind) from level 6
pub fn deep() -> BlindStructure {
    let mut structure = from_blinds("Deep Stack", 1800);
    for level in structure.levels.iter_mut().skip(5) {
        level.ante = level.small_blind / 2;
    }
    structure
}

/// Look up a preset by key
pub fn preset(key: &str) -> Option<BlindStructure> {
    match key.to_ascii_lowercase().as_str() {
        "regular" => Some(regular()),
        "turbo" => Some(turbo()),
        "deep" => Some(deep()),
        _ => None,
    }
}

/// All presets with their keys
pub fn presets() -> Vec<(&'static str, BlindStructure)> {
    PRESET_KEYS
        .iter()
        .filter_map(|&key| preset(key).map(|structure| (key, structure)))
        .collect()
}
