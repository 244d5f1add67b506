//! Character physics: gravity, jumps and banking

use super::state::Ceo;
use crate::settings::PhysicsSettings;

/// Advance the CEO one playing frame
///
/// A jump replaces the velocity with the impulse; otherwise gravity is added.
/// Position then moves by the new velocity.
pub fn integrate(ceo: &mut Ceo, physics: &PhysicsSettings, jump: bool) {
    ceo.velocity = if jump {
        physics.jump_impulse
    } else {
        ceo.velocity + physics.gravity
    };
    ceo.pos.y += ceo.velocity;
    ceo.rotation = tilt(ceo.velocity, physics);
}

/// Post-crash fall: gravity only, until the CEO rests near the ground
///
/// Rotation stays frozen at its crash value.
pub fn fall(ceo: &mut Ceo, physics: &PhysicsSettings, field_height: f32) {
    if ceo.pos.y < field_height - physics.ground_margin {
        ceo.velocity += physics.gravity;
        ceo.pos.y += ceo.velocity;
    }
}

/// Banking angle for a velocity
pub fn tilt(velocity: f32, physics: &PhysicsSettings) -> f32 {
    (velocity * physics.tilt_per_velocity).clamp(-physics.max_tilt, physics.max_tilt)
}
