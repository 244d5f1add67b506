//! The simulation & render loop
//!
//! [`Game`] owns the simulation state and the frame it paints. Once per display
//! frame it reads the signals the UI controls (play state and jump counter),
//! advances the simulation one tick, paints, and reports score changes and the
//! crash back to the UI through a [`GameObserver`].

use crate::platform::{FrameLoop, FrameScheduler};
use crate::renderer::{CeoSprites, FrameBuffer, render};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Play state as the UI sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaySignal {
    #[default]
    NotStarted,
    Playing,
    Ended,
}

/// Inputs the UI writes and the loop reads once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub play: PlaySignal,
    /// Bumped once per jump request; only changes matter
    pub jump_trigger: u64,
}

/// Receives the loop's outputs
pub trait GameObserver {
    /// Score differs from the last reported value
    fn score_changed(&mut self, score: u32);
    /// The run ended in a crash; called once per run
    fn game_over(&mut self, score: u32);
}

/// Simulation state, frame buffer and scheduling of one game
pub struct Game {
    settings: Settings,
    state: GameState,
    frame: FrameBuffer,
    sprites: CeoSprites,
    frames: FrameLoop,
    last_play: PlaySignal,
    last_jump_trigger: u64,
    reported_score: u32,
}

impl Game {
    /// Panics if `settings` fail validation.
    pub fn new(settings: Settings, seed: u64, sprites: CeoSprites) -> Self {
        let state = GameState::new(&settings, seed);
        let frame = FrameBuffer::new(
            settings.field.width.round() as u32,
            settings.field.height.round() as u32,
        );
        log::info!("Game created with seed {seed}");
        Self {
            settings,
            state,
            frame,
            sprites,
            frames: FrameLoop::new(),
            last_play: PlaySignal::NotStarted,
            last_jump_trigger: 0,
            reported_score: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Return every simulation value to its initial state (start screen)
    pub fn reset(&mut self) {
        self.state.reset(&self.settings);
        log::info!("Game reset");
    }

    /// Start requesting frames
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.frames.start(scheduler);
    }

    /// Stop the loop and cancel the pending frame; idempotent
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.frames.stop(scheduler);
    }

    /// Scheduler callback: step once and request the next frame
    ///
    /// Returns false, doing nothing, for a callback that arrives after `stop`.
    pub fn on_frame(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        signals: Signals,
        observer: &mut dyn GameObserver,
    ) -> bool {
        if !self.frames.begin_frame() {
            log::trace!("Ignoring stale frame callback");
            return false;
        }
        self.step(signals, observer);
        self.frames.rearm(scheduler);
        true
    }

    /// One full frame: read signals, tick, report, paint
    pub fn step(&mut self, signals: Signals, observer: &mut dyn GameObserver) -> Vec<GameEvent> {
        let input = self.observe(signals);
        let events = tick(&mut self.state, &self.settings, &input);

        if self.state.score != self.reported_score {
            self.reported_score = self.state.score;
            observer.score_changed(self.state.score);
        }
        for event in &events {
            if let GameEvent::GameOver { score, .. } = event {
                observer.game_over(*score);
            }
        }

        render(&mut self.frame, &self.state, &self.settings, &self.sprites);
        events
    }

    /// Turn signal changes since the last frame into phase changes and a jump
    fn observe(&mut self, signals: Signals) -> TickInput {
        let mut input = TickInput::default();

        if signals.play != self.last_play {
            match signals.play {
                PlaySignal::NotStarted => self.reset(),
                PlaySignal::Playing => self.begin_run(&mut input),
                PlaySignal::Ended => {
                    if self.state.phase == GamePhase::Playing {
                        self.state.phase = GamePhase::GameOver;
                    }
                }
            }
            self.last_play = signals.play;
            // The jump bundled with a start is the start's own jump
            self.last_jump_trigger = signals.jump_trigger;
        } else if signals.jump_trigger != self.last_jump_trigger {
            self.last_jump_trigger = signals.jump_trigger;
            match self.state.phase {
                GamePhase::Playing => input.jump = true,
                // The UI restarted before this loop saw it acknowledge the crash
                GamePhase::GameOver if signals.play == PlaySignal::Playing => {
                    self.begin_run(&mut input)
                }
                _ => {}
            }
        }

        input
    }

    /// Restart and first start alike: fresh state plus one jump
    fn begin_run(&mut self, input: &mut TickInput) {
        self.reset();
        self.state.phase = GamePhase::Playing;
        input.jump = true;
        log::info!("Run started");
    }
}
