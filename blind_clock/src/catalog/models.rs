//! Blind level and blind structure models.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Blind level ID type
pub type LevelId = u32;

/// Shortest level an operator may configure, in seconds
pub const MIN_LEVEL_DURATION_SECS: u32 = 60;

/// Smallest small blind an operator may configure
pub const MIN_SMALL_BLIND: u64 = 1;

/// Catalog errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Blind structure '{0}' has no levels")]
    Empty(String),

    #[error("Duplicate level id: {0}")]
    DuplicateId(LevelId),

    #[error("Invalid blinds at level {id}: small {small_blind}, big {big_blind}")]
    InvalidBlinds {
        id: LevelId,
        small_blind: u64,
        big_blind: u64,
    },

    #[error("Level {0} has zero duration")]
    ZeroDuration(LevelId),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// A stage of play with fixed blinds and a fixed duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindLevel {
    /// Level id (unique within a structure, ascending)
    pub id: LevelId,
    /// Small blind amount
    pub small_blind: u64,
    /// Big blind amount
    pub big_blind: u64,
    /// Ante amount (0 when there is none)
    pub ante: u64,
    /// Duration of this level in seconds
    pub duration_secs: u32,
}

impl BlindLevel {
    /// Create a new blind level without an ante
    pub fn new(id: LevelId, small_blind: u64, big_blind: u64, duration_secs: u32) -> Self {
        Self {
            id,
            small_blind,
            big_blind,
            ante: 0,
            duration_secs,
        }
    }

    /// Create a blind level with ante
    pub fn with_ante(mut self, ante: u64) -> Self {
        self.ante = ante;
        self
    }

    /// Clamp operator-supplied values to safe minimums.
    ///
    /// Durations are floored at [`MIN_LEVEL_DURATION_SECS`], the small blind at
    /// [`MIN_SMALL_BLIND`] and the big blind at the small blind.
    pub fn sanitized(mut self) -> Self {
        self.small_blind = self.small_blind.max(MIN_SMALL_BLIND);
        self.big_blind = self.big_blind.max(self.small_blind);
        self.duration_secs = self.duration_secs.max(MIN_LEVEL_DURATION_SECS);
        self
    }

    /// Set a single field, applying the same coercion as [`BlindLevel::sanitized`]
    pub fn set_field(&mut self, field: LevelField, value: u64) {
        match field {
            LevelField::SmallBlind => {
                self.small_blind = value.max(MIN_SMALL_BLIND);
                self.big_blind = self.big_blind.max(self.small_blind);
            }
            LevelField::BigBlind => {
                self.big_blind = value.max(self.small_blind);
            }
            LevelField::Ante => {
                self.ante = value;
            }
            LevelField::Duration => {
                let secs = u32::try_from(value).unwrap_or(u32::MAX);
                self.duration_secs = secs.max(MIN_LEVEL_DURATION_SECS);
            }
        }
    }
}

/// Editable field of a blind level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelField {
    SmallBlind,
    BigBlind,
    Ante,
    Duration,
}

impl fmt::Display for LevelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelField::SmallBlind => write!(f, "small_blind"),
            LevelField::BigBlind => write!(f, "big_blind"),
            LevelField::Ante => write!(f, "ante"),
            LevelField::Duration => write!(f, "duration"),
        }
    }
}

impl FromStr for LevelField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sb" | "small" | "small_blind" => Ok(LevelField::SmallBlind),
            "bb" | "big" | "big_blind" => Ok(LevelField::BigBlind),
            "ante" => Ok(LevelField::Ante),
            "duration" | "time" => Ok(LevelField::Duration),
            other => Err(format!("unknown level field '{}'", other)),
        }
    }
}

/// An ordered catalog of blind levels
///
/// Sequence order defines progression order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindStructure {
    /// Display name
    pub name: String,
    /// Levels in progression order
    pub levels: Vec<BlindLevel>,
}

impl BlindStructure {
    /// Create a new structure from levels in progression order
    pub fn new(name: impl Into<String>, levels: Vec<BlindLevel>) -> Self {
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the structure has no levels
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get blind level by id
    pub fn level(&self, id: LevelId) -> Option<&BlindLevel> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Get mutable blind level by id
    pub fn level_mut(&mut self, id: LevelId) -> Option<&mut BlindLevel> {
        self.levels.iter_mut().find(|level| level.id == id)
    }

    /// Index of a level in progression order
    pub fn position(&self, id: LevelId) -> Option<usize> {
        self.levels.iter().position(|level| level.id == id)
    }

    /// First level in progression order
    pub fn first_level(&self) -> Option<&BlindLevel> {
        self.levels.first()
    }

    /// The level immediately following `id`, or `None` on the final level or an unknown id
    pub fn next_level(&self, id: LevelId) -> Option<&BlindLevel> {
        let index = self.position(id)?;
        self.levels.get(index + 1)
    }

    /// Smallest id greater than every id in use
    pub fn next_free_id(&self) -> LevelId {
        self.levels
            .iter()
            .map(|level| level.id)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Insert a level keeping ids sorted ascending.
    ///
    /// A level whose id is 0 or already taken is given [`BlindStructure::next_free_id`].
    /// Returns the id the level was stored under.
    pub fn insert(&mut self, mut level: BlindLevel) -> LevelId {
        if level.id == 0 || self.level(level.id).is_some() {
            level.id = self.next_free_id();
        }
        let id = level.id;
        self.levels.push(level);
        self.levels.sort_by_key(|level| level.id);
        id
    }

    /// Remove a level by id
    pub fn remove(&mut self, id: LevelId) -> Option<BlindLevel> {
        let index = self.position(id)?;
        Some(self.levels.remove(index))
    }

    /// Check structural invariants
    pub fn validate(&self) -> CatalogResult<()> {
        if self.levels.is_empty() {
            return Err(CatalogError::Empty(self.name.clone()));
        }

        let mut seen = std::collections::HashSet::with_capacity(self.levels.len());
        for level in &self.levels {
            if !seen.insert(level.id) {
                return Err(CatalogError::DuplicateId(level.id));
            }
            if level.small_blind == 0 || level.big_blind < level.small_blind {
                return Err(CatalogError::InvalidBlinds {
                    id: level.id,
                    small_blind: level.small_blind,
                    big_blind: level.big_blind,
                });
            }
            if level.duration_secs == 0 {
                return Err(CatalogError::ZeroDuration(level.id));
            }
        }

        Ok(())
    }
}
