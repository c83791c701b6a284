//! Level catalog: blind levels, blind structures and the built-in presets.

pub mod models;
pub mod presets;

pub use models::{
    BlindLevel, BlindStructure, CatalogError, CatalogResult, LevelField, LevelId,
    MIN_LEVEL_DURATION_SECS, MIN_SMALL_BLIND,
};
pub use presets::{DEFAULT_PRESET, PRESET_KEYS, preset, presets};
