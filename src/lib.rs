//! Sprint - Gameplay Core Library
//!
//! This crate provides the host-engine-agnostic gameplay logic for Sprint:
//! - Chamber progression (difficulty-gated random level pool, intermission
//!   checkpoints, ending sequence, bounded level streaming)
//! - Grapple swing physics (rope tension, centrifugal damping, reel-in)
//! - Narrow collaborator contracts for level tables, level streaming,
//!   randomness, and debug output
//!
//! The host engine drives both components through per-frame and per-event
//! ticks; collision, rendering, and input binding stay on the host side.

pub mod constants;
pub mod grapple;
pub mod levels;
pub mod logging;
pub mod player;
pub mod progression;
pub mod streaming;
