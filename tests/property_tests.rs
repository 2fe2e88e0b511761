//! Property-based tests using proptest.
//!
//! Invariants that must hold for ALL inputs:
//! - Reeling: rope length is monotone non-increasing and floored
//! - Grapple: zero force inside slack distance, finite force everywhere
//! - Tier mapping: every difficulty value resolves to a named table row
//! - Progression: the latch reopens after every advance, whatever fails

use bevy::math::Vec3;
use proptest::prelude::*;

use sprint_core::constants::ROPE_MIN_LENGTH;
use sprint_core::grapple::GrappleSwing;
use sprint_core::levels::{DifficultyTier, LevelCatalog, LevelRef, StaticLevelTable};
use sprint_core::logging::MemorySink;
use sprint_core::progression::{ChamberProgress, XoshiroSource};
use sprint_core::streaming::MemoryStreamer;

fn swinging_anchor(rope_length: f32) -> GrappleSwing {
    GrappleSwing {
        rope_length,
        swinging: true,
        ..Default::default()
    }
}

fn full_table() -> StaticLevelTable {
    let mut table = StaticLevelTable::new();
    for tier in ["00_Test", "01_Easy", "02_Medium", "03_Hard", "04_Expert"] {
        let levels = (0..3)
            .map(|i| LevelRef::new(format!("/Game/Levels/{tier}_{i}.{tier}_{i}")))
            .collect();
        table = table.with_row(tier, levels);
    }
    table
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_reel_is_monotone_and_floored(
        start in ROPE_MIN_LENGTH..5000.0f32,
        deltas in prop::collection::vec(0.0f32..10.0, 1..40),
    ) {
        let mut swing = swinging_anchor(start);
        let mut previous = swing.rope_length;
        for dt in deltas {
            swing.reel(dt);
            prop_assert!(swing.rope_length <= previous);
            prop_assert!(swing.rope_length >= ROPE_MIN_LENGTH);
            previous = swing.rope_length;
        }
    }

    #[test]
    fn prop_rope_untouched_while_not_swinging(
        start in ROPE_MIN_LENGTH..5000.0f32,
        dt in 0.0f32..100.0,
    ) {
        let mut swing = swinging_anchor(start);
        swing.stop();
        swing.reel(dt);
        prop_assert_eq!(swing.rope_length, start);
    }

    #[test]
    fn prop_zero_force_inside_slack_distance(
        fraction in 0.0f32..1.0,
        vx in -5000.0f32..5000.0,
        vy in -5000.0f32..5000.0,
        vz in -5000.0f32..5000.0,
    ) {
        let mut swing = swinging_anchor(800.0);
        let player = Vec3::new(fraction * swing.rope_length, 0.0, 0.0);
        let force = swing.compute_forces(Vec3::new(vx, vy, vz), player, Vec3::ZERO);
        prop_assert_eq!(force, Vec3::ZERO);
    }

    #[test]
    fn prop_forces_are_finite(
        px in -20000.0f32..20000.0,
        py in -20000.0f32..20000.0,
        pz in -20000.0f32..20000.0,
        vx in -10000.0f32..10000.0,
        vy in -10000.0f32..10000.0,
        vz in -10000.0f32..10000.0,
    ) {
        let mut swing = swinging_anchor(800.0);
        let force = swing.compute_forces(
            Vec3::new(vx, vy, vz),
            Vec3::new(px, py, pz),
            Vec3::ZERO,
        );
        prop_assert!(force.is_finite(), "non-finite force: {force:?}");
    }

    #[test]
    fn prop_tier_mapping_is_total(difficulty in any::<u32>()) {
        let row = DifficultyTier::from_difficulty(difficulty).row_name();
        prop_assert!(
            ["00_Test", "01_Easy", "02_Medium", "03_Hard", "04_Expert"].contains(&row)
        );
        if difficulty > 3 {
            prop_assert_eq!(row, "00_Test");
        }
    }

    #[test]
    fn prop_gate_reopens_after_every_advance(
        chamber_index in 0u32..120,
        difficulty in 0u32..6,
        has_table in any::<bool>(),
        stream_fails in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let streamer = if stream_fails {
            MemoryStreamer::failing()
        } else {
            MemoryStreamer::new()
        };
        let mut progress = ChamberProgress::new(LevelCatalog::default(), Box::new(streamer))
            .with_rng(Box::new(XoshiroSource::seeded(seed)))
            .with_sink(Box::new(MemorySink::new()));
        if has_table {
            progress = progress.with_table(Box::new(full_table()));
        }
        progress.set_chamber_index(chamber_index);
        progress.set_difficulty(difficulty);

        progress.advance();
        prop_assert!(progress.can_progress(), "latch left closed");
    }
}
