//! Collision detection between the CEO and the world
//!
//! Checks run in priority order: field bounds, obstacle bars, power-ups. The
//! first crash ends the run and skips everything after it.

use super::state::{Ceo, CrashCause, GameEvent, GamePhase, GameState, Obstacle, PowerUp};
use crate::settings::Settings;

/// Axis-aligned box, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Hitbox {
    /// The CEO sprite box shrunk by `inset` on every side
    pub fn of_ceo(ceo: &Ceo, inset: f32) -> Self {
        Self {
            left: ceo.pos.x + inset,
            right: ceo.pos.x + ceo.size.x - inset,
            top: ceo.pos.y + inset,
            bottom: ceo.pos.y + ceo.size.y - inset,
        }
    }
}

/// Has the sprite touched the top or bottom of the field?
pub fn out_of_bounds(ceo: &Ceo, field_height: f32) -> bool {
    ceo.pos.y + ceo.size.y >= field_height || ceo.pos.y <= 0.0
}

/// Is the hitbox inside either bar of this obstacle?
pub fn hits_obstacle(hitbox: &Hitbox, obstacle: &Obstacle, gap: f32) -> bool {
    let overlaps = hitbox.right > obstacle.x && hitbox.left < obstacle.right();
    if !overlaps {
        return false;
    }
    let above_gap = hitbox.top < obstacle.top_height;
    let below_gap = hitbox.bottom > obstacle.top_height + gap;
    above_gap || below_gap
}

/// Circle test between the CEO center and the orb center
pub fn touches_power_up(ceo: &Ceo, power_up: &PowerUp) -> bool {
    let reach = ceo.size.x / 2.0 + power_up.size / 2.0;
    ceo.center().distance(power_up.pos) < reach
}

/// First crash condition for the current state, if any
pub fn detect_crash(state: &GameState, settings: &Settings) -> Option<CrashCause> {
    if out_of_bounds(&state.ceo, settings.field.height) {
        return Some(CrashCause::Bounds);
    }
    let hitbox = Hitbox::of_ceo(&state.ceo, settings.ceo.hitbox_inset());
    state
        .obstacles
        .iter()
        .any(|obs| hits_obstacle(&hitbox, obs, settings.obstacles.gap))
        .then_some(CrashCause::Obstacle)
}

/// Apply this frame's collisions
///
/// A crash moves the state to `GameOver` and emits the terminal event. Power-up
/// pickups restart the boost timer at full length; they never stack.
pub fn resolve(state: &mut GameState, settings: &Settings, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        return;
    }

    if let Some(cause) = detect_crash(state, settings) {
        state.phase = GamePhase::GameOver;
        log::info!("Game over ({cause:?}) with score {}", state.score);
        events.push(GameEvent::GameOver {
            score: state.score,
            cause,
        });
        return;
    }

    let ceo = &state.ceo;
    for p in state.power_ups.iter_mut() {
        if !p.collected && touches_power_up(ceo, p) {
            p.collected = true;
            state.boost_ticks = settings.power_ups.duration_frames;
            log::debug!("Collected {} power-up {}", p.label, p.id);
            events.push(GameEvent::PowerUpCollected {
                label: p.label.clone(),
            });
        }
    }
}
