//! Chamber progression state machine.
//!
//! Streams procedurally-selected chambers in and out as the player runs
//! through the game: a difficulty-gated random pool of chamber levels,
//! fixed intermission levels at checkpoint indices 25/50/75, and a fixed
//! final chamber at index 99. At most two streamed levels stay resident;
//! the oldest is evicted first.
//!
//! Progression is non-reentrant: an in-flight latch blocks re-triggers for
//! the span of a single request and is released on every exit path, so a
//! failed load never locks the game out of progressing again.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::constants::{FINAL_CHAMBER_INDEX, MAX_RESIDENT_LEVELS};
use crate::levels::{
    checkpoint_tier, is_checkpoint, DifficultyTier, IntermissionTier, LevelCatalog, LevelRef,
    LevelTable,
};
use crate::logging::{DebugSink, TracingSink};
use crate::streaming::{LevelStreamer, StreamedLevel};

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ChamberExitEvent>()
            .add_event::<ChamberReadyEvent>()
            .add_systems(Update, handle_chamber_exits);
    }
}

/// Uniform random source for pool selection
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[min, max]`, inclusive on both ends
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

/// Default random source backed by a xoshiro generator
pub struct XoshiroSource {
    rng: Xoshiro256PlusPlus,
}

impl XoshiroSource {
    /// Deterministic source for replays and tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Default for XoshiroSource {
    fn default() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }
}

impl RandomSource for XoshiroSource {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Phase of the progression state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ProgressionPhase {
    #[default]
    Idle,
    LoadingChamber,
    LoadingIntermission,
    Ended,
}

/// Result of a progression trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// A progression request was already in flight; nothing changed
    Blocked,
    /// The level was selected and streamed in
    Loaded(LevelRef),
    /// Recoverable failure (empty pool, missing table, or rejected stream);
    /// the gate is open again and no level was streamed in
    Failed,
}

/// Event: the player crossed a chamber exit (external progression trigger)
#[derive(Event, Debug, Default)]
pub struct ChamberExitEvent;

/// Event: a new level finished streaming in
#[derive(Event, Debug, Clone)]
pub struct ChamberReadyEvent {
    pub chamber_index: u32,
    pub level: LevelRef,
    pub intermission: bool,
    pub ending: bool,
}

/// Chamber progression state and its injected collaborators
#[derive(Resource)]
pub struct ChamberProgress {
    chamber_index: u32,
    difficulty: u32,
    phase: ProgressionPhase,
    intermission: bool,
    ending: bool,
    in_flight: bool,
    level_pool: Vec<LevelRef>,
    current_level: Option<LevelRef>,
    loaded_levels: Vec<Box<dyn StreamedLevel>>,
    spawn_transform: Transform,
    catalog: LevelCatalog,
    table: Option<Box<dyn LevelTable>>,
    streamer: Box<dyn LevelStreamer>,
    rng: Box<dyn RandomSource>,
    sink: Box<dyn DebugSink>,
}

impl ChamberProgress {
    pub fn new(catalog: LevelCatalog, streamer: Box<dyn LevelStreamer>) -> Self {
        Self {
            chamber_index: 0,
            difficulty: 0,
            phase: ProgressionPhase::Idle,
            intermission: false,
            ending: false,
            in_flight: false,
            level_pool: Vec::new(),
            current_level: None,
            loaded_levels: Vec::new(),
            spawn_transform: Transform::IDENTITY,
            catalog,
            table: None,
            streamer,
            rng: Box::new(XoshiroSource::default()),
            sink: Box::new(TracingSink),
        }
    }

    /// Bind the level table the chamber pools are drawn from
    pub fn with_table(mut self, table: Box<dyn LevelTable>) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn DebugSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fixed transform chambers stream in at
    pub fn with_spawn_transform(mut self, transform: Transform) -> Self {
        self.spawn_transform = transform;
        self
    }

    pub fn chamber_index(&self) -> u32 {
        self.chamber_index
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn phase(&self) -> ProgressionPhase {
        self.phase
    }

    pub fn is_intermission(&self) -> bool {
        self.intermission
    }

    pub fn is_ending(&self) -> bool {
        self.ending
    }

    /// Whether a progression trigger would be accepted right now
    pub fn can_progress(&self) -> bool {
        !self.in_flight
    }

    pub fn current_level(&self) -> Option<&LevelRef> {
        self.current_level.as_ref()
    }

    pub fn level_pool(&self) -> &[LevelRef] {
        &self.level_pool
    }

    /// Number of streamed levels currently resident
    pub fn resident_count(&self) -> usize {
        self.loaded_levels.len()
    }

    /// Restore progress from a save (also used by debug jumps)
    pub fn set_chamber_index(&mut self, chamber_index: u32) {
        self.chamber_index = chamber_index;
    }

    /// Restore difficulty from a save (also used by debug jumps)
    pub fn set_difficulty(&mut self, difficulty: u32) {
        self.difficulty = difficulty;
    }

    /// Progression trigger: advance to the next chamber, intermission, or the
    /// ending. No-op while a previous request is in flight.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.in_flight {
            return AdvanceOutcome::Blocked;
        }
        self.in_flight = true;

        if is_checkpoint(self.chamber_index) {
            if self.intermission {
                // Intermission finished; back to chambers
                self.chamber_index += 1;
                self.load_chamber()
            } else {
                self.load_intermission()
            }
        } else if self.chamber_index != FINAL_CHAMBER_INDEX {
            self.chamber_index += 1;
            self.load_chamber()
        } else {
            self.ending = true;
            self.phase = ProgressionPhase::Ended;
            let level = self.catalog.final_chamber.clone();
            self.load_level(level)
        }
    }

    /// Select a random chamber from the current pool and stream it in
    fn load_chamber(&mut self) -> AdvanceOutcome {
        self.phase = ProgressionPhase::LoadingChamber;
        self.ending = false;
        self.intermission = false;

        if self.level_pool.is_empty() {
            self.refresh_level_pool();
        }

        // Selection error: nothing to pick even after a refresh
        if self.level_pool.is_empty() {
            self.in_flight = false;
            self.phase = ProgressionPhase::Idle;
            return AdvanceOutcome::Failed;
        }

        let index = self.rng.random_int(0, self.level_pool.len() as i32 - 1) as usize;
        let Some(level) = self.level_pool.get(index).cloned() else {
            self.in_flight = false;
            self.phase = ProgressionPhase::Idle;
            return AdvanceOutcome::Failed;
        };

        self.load_level(level)
    }

    /// Pick the intermission level for the current checkpoint, bump the
    /// difficulty, and stream it in
    fn load_intermission(&mut self) -> AdvanceOutcome {
        self.phase = ProgressionPhase::LoadingIntermission;
        self.intermission = true;

        let level = match checkpoint_tier(self.chamber_index) {
            Some(tier) => {
                self.difficulty += 1;
                self.catalog.intermission_level(tier).clone()
            }
            None => {
                self.sink
                    .log_error("Failed to decide intermission to load", 5.0);
                // Known quirk: the fallback also resets difficulty progress
                self.difficulty = 0;
                self.catalog
                    .intermission_level(IntermissionTier::First)
                    .clone()
            }
        };

        // New difficulty means a new pool
        self.refresh_level_pool();
        self.load_level(level)
    }

    /// Replace the level pool from the table row for the current difficulty.
    /// Returns false (pool untouched, gate reopened) on a binding error.
    fn refresh_level_pool(&mut self) -> bool {
        let tier = DifficultyTier::from_difficulty(self.difficulty);

        let Some(table) = self.table.as_ref() else {
            self.sink.log_error(
                "ERROR: Unable to load level pool; no level table bound",
                5.0,
            );
            self.in_flight = false;
            return false;
        };

        let Some(mut pool) = table.get_row(tier.row_name()) else {
            self.sink.log_error(
                &format!("ERROR: Level table has no row '{}'", tier.row_name()),
                5.0,
            );
            self.in_flight = false;
            return false;
        };

        // Prevent immediate repeats of the chamber the player is standing in
        if let Some(current) = self.current_level.as_ref() {
            if let Some(pos) = pool.iter().position(|level| level == current) {
                pool.remove(pos);
            }
        }

        self.level_pool = pool;
        true
    }

    /// Stream the given level in at the spawn transform.
    ///
    /// The latch reopens on every path out of here, success or failure, so a
    /// rejected stream can never dead-lock progression. Failed loads swap no
    /// level in and are otherwise silent. After any attempt the resident set
    /// is trimmed FIFO to the cap.
    fn load_level(&mut self, level: LevelRef) -> AdvanceOutcome {
        self.current_level = Some(level.clone());
        if let Some(pos) = self.level_pool.iter().position(|pooled| *pooled == level) {
            self.level_pool.remove(pos);
        }

        let unique_name = format!("{}{}", level.asset_name(), self.chamber_index);
        let outcome = match self
            .streamer
            .load_instance(&level, self.spawn_transform, &unique_name)
        {
            Ok(mut handle) => {
                handle.set_visible(true);
                self.loaded_levels.push(handle);
                info!(
                    "chamber streamed in: {} (index {})",
                    level.asset_name(),
                    self.chamber_index
                );
                AdvanceOutcome::Loaded(level)
            }
            Err(_) => AdvanceOutcome::Failed,
        };

        self.in_flight = false;

        while self.loaded_levels.len() > MAX_RESIDENT_LEVELS {
            let mut oldest = self.loaded_levels.remove(0);
            oldest.request_unload();
        }

        if self.phase != ProgressionPhase::Ended {
            self.phase = ProgressionPhase::Idle;
        }
        outcome
    }
}

/// System: drain progression triggers and announce freshly streamed levels
pub fn handle_chamber_exits(
    mut exits: EventReader<ChamberExitEvent>,
    mut ready: EventWriter<ChamberReadyEvent>,
    progress: Option<ResMut<ChamberProgress>>,
) {
    let Some(mut progress) = progress else {
        return;
    };
    for _ in exits.read() {
        if let AdvanceOutcome::Loaded(level) = progress.advance() {
            ready.send(ChamberReadyEvent {
                chamber_index: progress.chamber_index(),
                level,
                intermission: progress.is_intermission(),
                ending: progress.is_ending(),
            });
        }
    }
}
