//! Centralized gameplay constants for the sprint core.
//!
//! Eliminates magic numbers duplicated across the progression state machine
//! and the grapple physics model. Fixed asset paths live in
//! `levels::LevelCatalog` as the single source of truth.

// =====================================================
// Chamber Progression
// =====================================================

/// Chamber index of the first intermission checkpoint
pub const CHECKPOINT_FIRST: u32 = 25;

/// Chamber index of the second intermission checkpoint
pub const CHECKPOINT_SECOND: u32 = 50;

/// Chamber index of the third intermission checkpoint
pub const CHECKPOINT_THIRD: u32 = 75;

/// Chamber index of the final chamber (progression never increments past it)
pub const FINAL_CHAMBER_INDEX: u32 = 99;

/// Maximum number of streamed levels kept resident (oldest evicted beyond this)
pub const MAX_RESIDENT_LEVELS: usize = 2;

// =====================================================
// Grapple Swing
// =====================================================

/// Shortest rope length reachable by reeling, in engine units
pub const ROPE_MIN_LENGTH: f32 = 200.0;

/// Rope shortening rate while reeling, units per second
pub const REEL_SPEED: f32 = 300.0;

/// Divisor turning the velocity/rope-direction dot product into a lerp factor
pub const TENSION_ANGLE_DIVISOR: f32 = 1000.0;

/// Upper clamp on the tension-angle lerp factor
pub const TENSION_ANGLE_MAX: f32 = 999.0;

/// Tension scale at zero velocity alignment
pub const TENSION_SCALE_MIN: f32 = 0.75;

/// Tension scale at full velocity alignment (lerp factor 1.0)
pub const TENSION_SCALE_MAX: f32 = 8.0;

/// Centrifugal force multiplier (opposes tension)
pub const CENTRIFUGAL_FACTOR: f32 = -0.9;

/// Divisor turning player speed into the centrifugal cap factor
pub const CENTRIFUGAL_VELOCITY_DIVISOR: f32 = 2000.0;

// =====================================================
// Grapple Tuning Defaults
// =====================================================

/// Default rope length when a grapple anchor spawns, in engine units
pub const DEFAULT_ROPE_LENGTH: f32 = 1200.0;

/// Default rope slack divisor in the tension-strength formula
pub const DEFAULT_ROPE_SLACK: f32 = 800.0;

/// Default base tension strength applied along the rope direction
pub const DEFAULT_TENSION_STRENGTH: f32 = 2500.0;
