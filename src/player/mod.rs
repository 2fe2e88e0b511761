//! Player kinematics surface.
//!
//! The character controller itself lives in the host engine. The gameplay
//! core only reads the player's velocity/location and hands additive forces
//! back to the host integrator.

use bevy::prelude::*;

/// Marker for the player entity
#[derive(Component, Debug, Default)]
pub struct Player;

/// Kinematic state mirrored from the host character movement
#[derive(Component, Debug, Default)]
pub struct PlayerBody {
    /// World-space velocity, engine units per second
    pub velocity: Vec3,
    /// Forces accumulated this tick, drained by the host integrator
    pub pending_force: Vec3,
}

impl PlayerBody {
    pub fn new(velocity: Vec3) -> Self {
        Self {
            velocity,
            pending_force: Vec3::ZERO,
        }
    }

    /// Add an additive force for the host integrator to apply
    pub fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    /// Drain the accumulated force (called once per tick by the host)
    pub fn take_force(&mut self) -> Vec3 {
        std::mem::take(&mut self.pending_force)
    }
}
