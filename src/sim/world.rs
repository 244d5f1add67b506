//! World stepping: scrolling, pruning and scoring

use super::state::{GameEvent, GameState};
use crate::settings::Settings;

/// Scroll everything left by `speed`, drop what is gone, award passes
pub fn step(state: &mut GameState, settings: &Settings, speed: f32, events: &mut Vec<GameEvent>) {
    for obs in state.obstacles.iter_mut() {
        obs.x -= speed;
    }
    // Obstacles age out in spawn order, so only the front can be off-screen
    if state
        .obstacles
        .front()
        .is_some_and(|front| front.x < -front.width)
    {
        state.obstacles.pop_front();
    }

    let margin = settings.power_ups.despawn_margin;
    for p in state.power_ups.iter_mut() {
        p.pos.x -= speed;
    }
    state
        .power_ups
        .retain(|p| p.pos.x > -margin && !p.collected);

    let ceo_x = state.ceo.pos.x;
    let mut passed = 0;
    for obs in state.obstacles.iter_mut() {
        if !obs.passed && ceo_x > obs.right() {
            obs.passed = true;
            passed += 1;
        }
    }
    if passed > 0 {
        state.score += passed;
        events.push(GameEvent::ScoreChanged(state.score));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind, PowerUp};

    fn obstacle(state: &mut GameState, x: f32) -> Obstacle {
        Obstacle {
            id: state.next_entity_id(),
            x,
            top_height: 200.0,
            width: 60.0,
            passed: false,
            kind: ObstacleKind::Bear,
        }
    }

    fn power_up(state: &mut GameState, x: f32) -> PowerUp {
        PowerUp {
            id: state.next_entity_id(),
            pos: Vec2::new(x, 300.0),
            size: 40.0,
            label: "AI".to_string(),
            color: [255, 0, 255, 255],
            collected: false,
        }
    }

    #[test]
    fn test_moves_obstacles_and_power_ups() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 0);
        let obs = obstacle(&mut state, 400.0);
        state.obstacles.push_back(obs);
        let p = power_up(&mut state, 500.0);
        state.power_ups.push(p);

        step(&mut state, &settings, 3.0, &mut Vec::new());
        assert_eq!(state.obstacles[0].x, 397.0);
        assert_eq!(state.power_ups[0].pos.x, 497.0);
    }

    #[test]
    fn test_score_once_per_obstacle() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 0);
        // CEO x is 120; right edge starts at 124
        let obs = obstacle(&mut state, 64.0);
        state.obstacles.push_back(obs);
        let mut events = Vec::new();

        step(&mut state, &settings, 3.0, &mut events);
        assert_eq!(state.score, 0, "right edge 121 is not yet past 120");
        assert!(events.is_empty());

        step(&mut state, &settings, 3.0, &mut events);
        assert_eq!(state.score, 1);
        assert!(state.obstacles[0].passed);
        assert_eq!(events, vec![GameEvent::ScoreChanged(1)]);

        for _ in 0..10 {
            step(&mut state, &settings, 3.0, &mut events);
        }
        assert_eq!(state.score, 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_prunes_front_obstacle_only() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 0);
        let a = obstacle(&mut state, -59.0);
        let b = obstacle(&mut state, -58.5);
        state.obstacles.push_back(a);
        state.obstacles.push_back(b);

        step(&mut state, &settings, 2.0, &mut Vec::new());
        // Both are now off-screen, but only one leaves per frame
        assert_eq!(state.obstacles.len(), 1);
        step(&mut state, &settings, 2.0, &mut Vec::new());
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_prunes_power_ups() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 0);
        let far = power_up(&mut state, -298.0);
        let mut taken = power_up(&mut state, 200.0);
        taken.collected = true;
        let live = power_up(&mut state, -100.0);
        state.power_ups.extend([far, taken, live]);

        step(&mut state, &settings, 3.0, &mut Vec::new());
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].pos.x, -103.0);
    }
}
