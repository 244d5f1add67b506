//! Demo-mode controller
//!
//! Steers toward the gap of the next obstacle ahead, or mid-field when the
//! screen is empty. Used by the headless runner.

use super::state::{GamePhase, GameState};
use crate::settings::Settings;

/// Vertical center of the gap the CEO should aim for
pub fn target_y(state: &GameState, settings: &Settings) -> f32 {
    let left = state.ceo.pos.x + settings.ceo.hitbox_inset();
    state
        .obstacles
        .iter()
        .find(|obs| obs.right() > left)
        .map(|obs| obs.top_height + settings.obstacles.gap / 2.0)
        .unwrap_or(settings.field.height / 2.0)
}

/// Should the CEO jump this frame?
pub fn wants_jump(state: &GameState, settings: &Settings) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    let slack = settings.obstacles.gap * 0.1;
    state.ceo.velocity >= 0.0 && state.ceo.center().y > target_y(state, settings) + slack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind};

    fn playing() -> (GameState, Settings) {
        let settings = Settings::default();
        let mut state = GameState::new(&settings, 8);
        state.phase = GamePhase::Playing;
        (state, settings)
    }

    #[test]
    fn test_targets_mid_field_without_obstacles() {
        let (state, settings) = playing();
        assert_eq!(target_y(&state, &settings), 320.0);
    }

    #[test]
    fn test_targets_next_gap_ahead() {
        let (mut state, settings) = playing();
        for (id, x, top_height) in [(1, 20.0, 300.0), (2, 300.0, 120.0)] {
            state.obstacles.push_back(Obstacle {
                id,
                x,
                top_height,
                width: 60.0,
                passed: false,
                kind: ObstacleKind::Bull,
            });
        }
        // The first obstacle is already behind the hitbox
        assert_eq!(target_y(&state, &settings), 210.0);
    }

    #[test]
    fn test_jumps_only_when_low_and_falling() {
        let (mut state, settings) = playing();
        state.ceo.pos.y = 400.0;
        state.ceo.velocity = 1.0;
        assert!(wants_jump(&state, &settings));

        state.ceo.velocity = -3.0;
        assert!(!wants_jump(&state, &settings));

        state.ceo.pos.y = 200.0;
        state.ceo.velocity = 1.0;
        assert!(!wants_jump(&state, &settings));

        state.ceo.pos.y = 400.0;
        state.phase = GamePhase::GameOver;
        assert!(!wants_jump(&state, &settings));
    }
}
