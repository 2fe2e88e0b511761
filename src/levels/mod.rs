//! Level references, difficulty tiers, and the level-table contract.
//!
//! Chambers are authored level assets. The progression state machine never
//! inspects asset internals; it passes `LevelRef`s to the streaming
//! collaborator and draws candidates from a data table keyed by tier row name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CHECKPOINT_FIRST, CHECKPOINT_SECOND, CHECKPOINT_THIRD};

/// Reference to a level asset by path, e.g.
/// `/Game/Levels/Chamber_Pool/lvl_Chamber01.lvl_Chamber01`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelRef(String);

impl LevelRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    /// Final asset name component: text after the last `.`, falling back to
    /// the text after the last `/`, falling back to the whole path.
    pub fn asset_name(&self) -> &str {
        if let Some((_, name)) = self.0.rsplit_once('.') {
            return name;
        }
        match self.0.rsplit_once('/') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }
}

/// Difficulty tier selecting a row of the chamber level table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyTier {
    /// Fallback tier for out-of-range difficulty values
    Test,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl DifficultyTier {
    /// Map a difficulty value to its tier; anything past Expert falls back to Test
    pub fn from_difficulty(difficulty: u32) -> Self {
        match difficulty {
            0 => Self::Easy,
            1 => Self::Medium,
            2 => Self::Hard,
            3 => Self::Expert,
            _ => Self::Test,
        }
    }

    /// Row name of this tier in the level table
    pub fn row_name(&self) -> &'static str {
        match self {
            Self::Test => "00_Test",
            Self::Easy => "01_Easy",
            Self::Medium => "02_Medium",
            Self::Hard => "03_Hard",
            Self::Expert => "04_Expert",
        }
    }
}

/// Data-table contract: one row of chamber candidates per tier
pub trait LevelTable: Send + Sync {
    fn get_row(&self, row_name: &str) -> Option<Vec<LevelRef>>;
}

/// In-memory level table, JSON-loadable. Stands in for the engine's
/// data-table asset in headless hosts and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticLevelTable {
    pub rows: HashMap<String, Vec<LevelRef>>,
}

impl StaticLevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, row_name: impl Into<String>, levels: Vec<LevelRef>) -> Self {
        self.rows.insert(row_name.into(), levels);
        self
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl LevelTable for StaticLevelTable {
    fn get_row(&self, row_name: &str) -> Option<Vec<LevelRef>> {
        self.rows.get(row_name).cloned()
    }
}

/// Which of the three intermission levels a checkpoint maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntermissionTier {
    First,
    Second,
    Third,
}

/// Checkpoint index → intermission tier lookup
const CHECKPOINTS: [(u32, IntermissionTier); 3] = [
    (CHECKPOINT_FIRST, IntermissionTier::First),
    (CHECKPOINT_SECOND, IntermissionTier::Second),
    (CHECKPOINT_THIRD, IntermissionTier::Third),
];

/// Intermission tier for a chamber index, `None` for non-checkpoint indices
pub fn checkpoint_tier(chamber_index: u32) -> Option<IntermissionTier> {
    CHECKPOINTS
        .iter()
        .find(|(index, _)| *index == chamber_index)
        .map(|(_, tier)| *tier)
}

/// True when the chamber index sits on an intermission checkpoint
pub fn is_checkpoint(chamber_index: u32) -> bool {
    checkpoint_tier(chamber_index).is_some()
}

/// Fixed level references: intermission levels and the final chamber.
/// Pre-authored assets, not drawn from the level pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub intermission_first: LevelRef,
    pub intermission_second: LevelRef,
    pub intermission_third: LevelRef,
    pub final_chamber: LevelRef,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self {
            intermission_first: LevelRef::new(
                "/Game/Levels/Intermissions/lvl_Intermission1.lvl_Intermission1",
            ),
            intermission_second: LevelRef::new(
                "/Game/Levels/Intermissions/lvl_Intermission2.lvl_Intermission2",
            ),
            intermission_third: LevelRef::new(
                "/Game/Levels/Intermissions/lvl_Intermission3.lvl_Intermission3",
            ),
            final_chamber: LevelRef::new(
                "/Game/Levels/Chamber_Pool/lvl_FinalChamber.lvl_FinalChamber",
            ),
        }
    }
}

impl LevelCatalog {
    pub fn intermission_level(&self, tier: IntermissionTier) -> &LevelRef {
        match tier {
            IntermissionTier::First => &self.intermission_first,
            IntermissionTier::Second => &self.intermission_second,
            IntermissionTier::Third => &self.intermission_third,
        }
    }
}
