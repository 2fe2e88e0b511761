//! Grapple swing physics model.
//!
//! A grapple anchor tethers the player with a rope of fixed length. Past the
//! slack distance a tension force pulls the player back toward the anchor,
//! scaled up the faster the player moves away along the rope direction; a
//! capped centrifugal counter-force damps the correction. Reeling shortens
//! the rope down to a floor while swinging.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::constants::{
    CENTRIFUGAL_FACTOR, CENTRIFUGAL_VELOCITY_DIVISOR, DEFAULT_ROPE_LENGTH, DEFAULT_ROPE_SLACK,
    DEFAULT_TENSION_STRENGTH, REEL_SPEED, ROPE_MIN_LENGTH, TENSION_ANGLE_DIVISOR,
    TENSION_ANGLE_MAX, TENSION_SCALE_MAX, TENSION_SCALE_MIN,
};
use crate::player::{Player, PlayerBody};

pub struct GrapplePlugin;

impl Plugin for GrapplePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GrappleStartEvent>()
            .add_event::<GrappleStopEvent>()
            .add_event::<GrappleReelEvent>()
            .add_systems(
                Update,
                (handle_grapple_events, apply_reel, apply_grapple_physics).chain(),
            );
    }
}

/// Grapple anchor state; the anchor entity's `Transform` is the tether point
#[derive(Component, Debug)]
pub struct GrappleSwing {
    /// Current rope length; reeling floors it at [`ROPE_MIN_LENGTH`]
    pub rope_length: f32,
    /// Slack divisor in the tension-strength formula (tuning)
    pub rope_slack: f32,
    /// Base pull toward the anchor (tuning)
    pub base_tension_strength: f32,
    /// Whether swing physics runs this tick
    pub swinging: bool,
    /// Player captured on swing start
    pub player: Option<Entity>,
    /// Last computed output, retained for inspection
    pub grapple_forces: Vec3,
}

impl Default for GrappleSwing {
    fn default() -> Self {
        Self {
            rope_length: DEFAULT_ROPE_LENGTH,
            rope_slack: DEFAULT_ROPE_SLACK,
            base_tension_strength: DEFAULT_TENSION_STRENGTH,
            swinging: false,
            player: None,
            grapple_forces: Vec3::ZERO,
        }
    }
}

impl GrappleSwing {
    /// Begin swinging, capturing the player entity
    pub fn start(&mut self, player: Entity) {
        self.swinging = true;
        self.player = Some(player);
    }

    /// Stop swinging and release the player reference
    pub fn stop(&mut self) {
        self.swinging = false;
        self.player = None;
    }

    /// Compute the per-tick swing force from player kinematics.
    ///
    /// Stores the result in `grapple_forces` and returns it. Inside the slack
    /// distance (player not past rope length) the output is zero regardless
    /// of velocity.
    pub fn compute_forces(
        &mut self,
        player_velocity: Vec3,
        player_location: Vec3,
        anchor_location: Vec3,
    ) -> Vec3 {
        let player_speed = player_velocity.length();
        let player_distance = player_location.distance(anchor_location);
        let forward = (player_location - anchor_location).normalize_or_zero();

        // Rope only pulls once the player is past its length
        let slack = if player_distance > self.rope_length {
            1.0
        } else {
            0.0
        };
        // Grows superlinearly as the player pushes past base rope length
        let tension_strength =
            player_distance / self.rope_length * ((player_distance + self.rope_length) / self.rope_slack);
        // Stronger the closer player velocity is to the rope direction
        let tension_angle = player_velocity.dot(forward) / TENSION_ANGLE_DIVISOR;

        let tension_force = forward
            * self.base_tension_strength
            * tension_strength
            * slack
            * TENSION_SCALE_MIN.lerp(
                TENSION_SCALE_MAX,
                tension_angle.clamp(0.0, TENSION_ANGLE_MAX),
            );
        let centrifugal_force = tension_force
            * CENTRIFUGAL_FACTOR
            * (player_speed / CENTRIFUGAL_VELOCITY_DIVISOR).clamp(0.0, 1.0);

        self.grapple_forces = tension_force + centrifugal_force;
        self.grapple_forces
    }

    /// Shorten the rope while swinging, never below [`ROPE_MIN_LENGTH`]
    pub fn reel(&mut self, delta_secs: f32) {
        if self.swinging && self.rope_length > ROPE_MIN_LENGTH {
            self.rope_length = (self.rope_length - REEL_SPEED * delta_secs).max(ROPE_MIN_LENGTH);
        }
    }
}

/// Event: player fires the grapple at an anchor
#[derive(Event, Debug)]
pub struct GrappleStartEvent {
    pub anchor: Entity,
    pub player: Entity,
}

/// Event: player releases the grapple
#[derive(Event, Debug)]
pub struct GrappleStopEvent {
    pub anchor: Entity,
}

/// Event: player reels the rope in this tick
#[derive(Event, Debug)]
pub struct GrappleReelEvent {
    pub anchor: Entity,
}

/// System: start/stop swinging on grapple events
pub fn handle_grapple_events(
    mut starts: EventReader<GrappleStartEvent>,
    mut stops: EventReader<GrappleStopEvent>,
    mut anchors: Query<&mut GrappleSwing>,
) {
    for event in starts.read() {
        if let Ok(mut swing) = anchors.get_mut(event.anchor) {
            swing.start(event.player);
        }
    }
    for event in stops.read() {
        if let Ok(mut swing) = anchors.get_mut(event.anchor) {
            swing.stop();
        }
    }
}

/// System: shorten the rope on reel events
pub fn apply_reel(
    time: Res<Time>,
    mut reels: EventReader<GrappleReelEvent>,
    mut anchors: Query<&mut GrappleSwing>,
) {
    for event in reels.read() {
        if let Ok(mut swing) = anchors.get_mut(event.anchor) {
            swing.reel(time.delta_secs());
        }
    }
}

/// System: per-tick swing force application.
///
/// Runs only for anchors that are swinging and whose captured player entity
/// still resolves.
pub fn apply_grapple_physics(
    mut anchors: Query<(&mut GrappleSwing, &Transform)>,
    mut players: Query<(&Transform, &mut PlayerBody), (With<Player>, Without<GrappleSwing>)>,
) {
    for (mut swing, anchor_transform) in &mut anchors {
        if !swing.swinging {
            continue;
        }
        let Some(player) = swing.player else {
            continue;
        };
        let Ok((player_transform, mut body)) = players.get_mut(player) else {
            continue;
        };

        let force = swing.compute_forces(
            body.velocity,
            player_transform.translation,
            anchor_transform.translation,
        );
        body.add_force(force);
    }
}
