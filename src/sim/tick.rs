//! One simulation frame
//!
//! Order per frame: scroll speed (consumes a boost tick), background chart,
//! then while playing physics, spawner, world step and collisions. After a
//! crash only the fall continues.

use super::state::{GameEvent, GamePhase, GameState};
use super::{chart, collision, physics, spawn, world};
use crate::settings::Settings;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Apply one jump impulse this frame (ignored unless playing)
    pub jump: bool,
}

/// Scroll speed for this frame, consuming one boosted frame if any remain
pub fn scroll_speed(state: &mut GameState, settings: &Settings) -> f32 {
    if state.boost_ticks > 0 {
        state.boost_ticks -= 1;
        settings.obstacles.speed * settings.power_ups.speed_multiplier
    } else {
        settings.obstacles.speed
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, settings: &Settings, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let speed = scroll_speed(state, settings);
    state.speed = speed;
    let boosted = speed > settings.obstacles.speed;

    let playing = state.phase == GamePhase::Playing;
    chart::advance(&mut state.chart, &mut state.rng, settings, playing, boosted);

    match state.phase {
        GamePhase::Playing => {
            physics::integrate(&mut state.ceo, &settings.physics, input.jump);
            state.frame_count += 1;
            spawn::advance(state, settings, speed, &mut events);
            world::step(state, settings, speed, &mut events);
            collision::resolve(state, settings, &mut events);
        }
        GamePhase::GameOver => {
            physics::fall(&mut state.ceo, &settings.physics, settings.field.height);
        }
        GamePhase::Start => {}
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CrashCause, Obstacle, ObstacleKind};

    fn playing(seed: u64) -> (GameState, Settings) {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, seed);
        state.phase = GamePhase::Playing;
        (state, settings)
    }

    fn jump() -> TickInput {
        TickInput { jump: true }
    }

    #[test]
    fn test_start_phase_is_idle() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 1);
        let before = state.clone();
        for _ in 0..200 {
            assert!(tick(&mut state, &settings, &jump()).is_empty());
        }
        assert_eq!(state.ceo, before.ceo);
        assert_eq!(state.chart, before.chart);
        assert_eq!(state.frame_count, 0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_first_obstacle_after_117_frames() {
        let (mut state, settings) = playing(2);
        for frame in 1..=117 {
            // Keep the CEO airborne
            let input = TickInput { jump: frame % 20 == 0 };
            let events = tick(&mut state, &settings, &input);
            let spawned = events
                .iter()
                .any(|e| matches!(e, GameEvent::ObstacleSpawned { .. }));
            assert_eq!(spawned, frame == 117, "frame {frame}");
        }
        assert_eq!(state.obstacles.len(), 1);
        // Spawned at the right edge, then scrolled once
        assert_eq!(state.obstacles[0].x, 477.0);
    }

    #[test]
    fn test_first_obstacle_after_59_boosted_frames() {
        let (mut state, settings) = playing(2);
        state.boost_ticks = 1_000;
        for frame in 1..=59 {
            let input = TickInput { jump: frame % 20 == 0 };
            tick(&mut state, &settings, &input);
            assert_eq!(state.obstacles.len(), usize::from(frame == 59), "frame {frame}");
        }
    }

    #[test]
    fn test_boost_lasts_exactly_its_duration() {
        let (mut state, settings) = playing(3);
        state.boost_ticks = settings.power_ups.duration_frames;
        let mut boosted_frames = 0;
        for frame in 0..400 {
            let input = TickInput { jump: frame % 20 == 0 };
            tick(&mut state, &settings, &input);
            if state.speed == 6.0 {
                boosted_frames += 1;
            } else {
                assert_eq!(state.speed, 3.0);
            }
        }
        assert_eq!(boosted_frames, 300);
        assert_eq!(state.boost_ticks, 0);
    }

    #[test]
    fn test_jump_velocity_sequence() {
        let (mut state, settings) = playing(4);
        tick(&mut state, &settings, &jump());
        let mut velocities = vec![state.ceo.velocity];
        for _ in 0..3 {
            tick(&mut state, &settings, &TickInput::default());
            velocities.push(state.ceo.velocity);
        }
        for (v, e) in velocities.iter().zip([-7.0, -6.6, -6.2, -5.8]) {
            assert!((v - e).abs() < 1e-4, "{v} != {e}");
        }
        assert_eq!(state.frame_count, 4);
    }

    #[test]
    fn test_crash_freezes_world_but_ceo_falls() {
        let (mut state, settings) = playing(5);
        state.obstacles.push_back(Obstacle {
            id: 99,
            x: 150.0,
            top_height: 600.0,
            width: 60.0,
            passed: false,
            kind: ObstacleKind::Bear,
        });

        let events = tick(&mut state, &settings, &TickInput::default());
        assert!(events.contains(&GameEvent::GameOver {
            score: 0,
            cause: CrashCause::Obstacle
        }));
        assert_eq!(state.phase, GamePhase::GameOver);

        let frozen_x = state.obstacles[0].x;
        let frames = state.frame_count;
        let chart = state.chart.clone();
        let y = state.ceo.pos.y;
        for _ in 0..30 {
            let events = tick(&mut state, &settings, &jump());
            assert!(events.is_empty());
        }
        assert_eq!(state.obstacles[0].x, frozen_x);
        assert_eq!(state.frame_count, frames);
        assert_eq!(state.chart, chart);
        assert_eq!(state.spawn_distance, 3.0);
        assert!(state.ceo.pos.y > y, "CEO keeps falling after the crash");
    }

    #[test]
    fn test_falls_into_floor() {
        let (mut state, settings) = playing(6);
        let mut frames = 0;
        while state.phase == GamePhase::Playing {
            tick(&mut state, &settings, &TickInput::default());
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(state.ceo.pos.y + state.ceo.size.y >= settings.field.height);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let (mut state, settings) = playing(seed);
            let mut log = Vec::new();
            for frame in 0..600 {
                let input = TickInput { jump: frame % 18 == 0 };
                log.extend(tick(&mut state, &settings, &input));
            }
            (log, state.score, state.ceo.pos)
        };
        assert_eq!(run(42), run(42));
    }
}
