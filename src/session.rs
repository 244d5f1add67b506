//! Screen state around the loop
//!
//! The session is what the page (or the headless runner) holds: it turns
//! presses into play signals and jump requests, and mirrors the score the loop
//! pushes back. The best score lives for the session only.

use crate::game::{GameObserver, PlaySignal, Signals};

/// Which overlay the page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    signals: Signals,
    score: u32,
    best: u32,
    runs: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// One press of Space, ArrowUp, a click or a tap
    ///
    /// Starts a run from the start or game-over screen, otherwise jumps.
    pub fn press(&mut self) {
        match self.signals.play {
            PlaySignal::NotStarted | PlaySignal::Ended => {
                self.score = 0;
                self.runs += 1;
                self.signals.play = PlaySignal::Playing;
                log::debug!("Starting run {}", self.runs);
            }
            PlaySignal::Playing => {}
        }
        self.signals.jump_trigger = self.signals.jump_trigger.wrapping_add(1);
    }

    /// Back to the start screen
    pub fn back_to_start(&mut self) {
        self.signals.play = PlaySignal::NotStarted;
        self.score = 0;
    }

    pub fn signals(&self) -> Signals {
        self.signals
    }

    pub fn screen(&self) -> Screen {
        match self.signals.play {
            PlaySignal::NotStarted => Screen::Start,
            PlaySignal::Playing => Screen::Playing,
            PlaySignal::Ended => Screen::GameOver,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Runs started this session
    pub fn runs(&self) -> u32 {
        self.runs
    }
}

impl GameObserver for Session {
    fn score_changed(&mut self, score: u32) {
        self.score = score;
        self.best = self.best.max(score);
    }

    fn game_over(&mut self, score: u32) {
        self.score = score;
        self.best = self.best.max(score);
        self.signals.play = PlaySignal::Ended;
        log::info!("Run {} over: score {}, best {}", self.runs, score, self.best);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_starts_and_jumps() {
        let mut session = Session::new();
        assert_eq!(session.screen(), Screen::Start);
        session.press();
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.signals().jump_trigger, 1);
        assert_eq!(session.runs(), 1);
    }

    #[test]
    fn test_presses_while_playing_only_jump() {
        let mut session = Session::new();
        session.press();
        session.press();
        session.press();
        assert_eq!(session.signals().jump_trigger, 3);
        assert_eq!(session.runs(), 1);
    }

    #[test]
    fn test_game_over_then_restart() {
        let mut session = Session::new();
        session.press();
        session.score_changed(1);
        session.score_changed(2);
        session.game_over(2);
        assert_eq!(session.screen(), Screen::GameOver);
        assert_eq!(session.best(), 2);

        session.press();
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.score(), 0);
        assert_eq!(session.best(), 2);
        assert_eq!(session.runs(), 2);
    }

    #[test]
    fn test_best_only_grows() {
        let mut session = Session::new();
        session.press();
        session.game_over(5);
        session.press();
        session.game_over(3);
        assert_eq!(session.best(), 5);
        assert_eq!(session.score(), 3);
    }

    #[test]
    fn test_back_to_start() {
        let mut session = Session::new();
        session.press();
        session.score_changed(4);
        session.back_to_start();
        assert_eq!(session.screen(), Screen::Start);
        assert_eq!(session.score(), 0);
        assert_eq!(session.best(), 4);
    }
}
