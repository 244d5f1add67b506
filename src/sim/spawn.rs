//! Distance-based obstacle and power-up spawning
//!
//! Spawns are triggered by world distance travelled, not by frame count, so the
//! spacing between obstacles does not shrink while boosted.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Obstacle, ObstacleKind, PowerUp};
use crate::settings::Settings;

/// Accumulate this frame's travel and spawn once the threshold is reached
pub fn advance(state: &mut GameState, settings: &Settings, speed: f32, events: &mut Vec<GameEvent>) {
    state.spawn_distance += speed;
    if state.spawn_distance < settings.obstacles.spawn_distance {
        return;
    }
    state.spawn_distance = 0.0;

    spawn_obstacle(state, settings, events);

    if state.rng.random_bool(settings.power_ups.spawn_chance) {
        spawn_power_up(state, settings, events);
    }
}

/// Inclusive range of legal top-bar heights
pub fn top_height_range(settings: &Settings) -> (f32, f32) {
    let obs = &settings.obstacles;
    let min = obs.min_bar_height;
    let max = settings.field.height - obs.gap - obs.min_bar_height;
    (min, max)
}

fn spawn_obstacle(state: &mut GameState, settings: &Settings, events: &mut Vec<GameEvent>) {
    let (min, max) = top_height_range(settings);
    let steps = (max - min).floor() as u32;
    let top_height = min + state.rng.random_range(0..=steps) as f32;
    let kind = if state.rng.random_bool(0.5) {
        ObstacleKind::Bull
    } else {
        ObstacleKind::Bear
    };

    let id = state.next_entity_id();
    state.obstacles.push_back(Obstacle {
        id,
        x: settings.field.width,
        top_height,
        width: settings.obstacles.width,
        passed: false,
        kind,
    });
    log::debug!("Spawned {kind:?} obstacle {id} with top bar {top_height}");
    events.push(GameEvent::ObstacleSpawned { top_height });
}

fn spawn_power_up(state: &mut GameState, settings: &Settings, events: &mut Vec<GameEvent>) {
    let catalog = &settings.power_ups.catalog;
    let (low, high) = settings.power_up_band();
    let y = low + state.rng.random::<f32>() * (high - low);
    let kind = &catalog[state.rng.random_range(0..catalog.len())];

    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        pos: Vec2::new(
            settings.field.width + settings.obstacles.spawn_distance / 2.0,
            y,
        ),
        size: settings.power_ups.size,
        label: kind.label.clone(),
        color: kind.color,
        collected: false,
    });
    log::debug!("Spawned {} power-up {id}", kind.label);
    events.push(GameEvent::PowerUpSpawned {
        label: kind.label.clone(),
    });
}
