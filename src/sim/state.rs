//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives in [`GameState`]; the renderer and
//! the surrounding UI only read it.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Color;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Waiting for the first start; nothing moves but the backdrop
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Crashed; the CEO falls, the world is frozen
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Left the field through the top or bottom
    Bounds,
    /// Hit an obstacle bar
    Obstacle,
}

/// Events emitted by a tick, consumed by the frame loop
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    ObstacleSpawned { top_height: f32 },
    PowerUpSpawned { label: String },
    PowerUpCollected { label: String },
    /// Emitted once per run, on the crash frame
    GameOver { score: u32, cause: CrashCause },
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Ceo {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    /// Vertical velocity (pixels per frame, positive is down)
    pub velocity: f32,
    pub size: Vec2,
    /// Banking angle (radians), derived from velocity
    pub rotation: f32,
}

impl Ceo {
    pub fn new(settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(settings.field.width / 4.0, settings.field.height / 2.0),
            velocity: 0.0,
            size: Vec2::new(settings.ceo.width, settings.ceo.height),
            rotation: 0.0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Cosmetic candle color of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Bull,
    Bear,
}

/// A pair of bars with a gap between them
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Height of the top bar; the gap starts here
    pub top_height: f32,
    pub width: f32,
    /// Set once the CEO clears the right edge
    pub passed: bool,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A collectible speed boost orb
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub id: u32,
    /// Center of the orb
    pub pos: Vec2,
    pub size: f32,
    pub label: String,
    pub color: Color,
    pub collected: bool,
}

/// Scrolling stock-chart backdrop (fixed number of samples)
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    points: VecDeque<f32>,
}

impl Chart {
    pub fn new(points: impl IntoIterator<Item = f32>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.points.back().copied()
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.points.iter().copied()
    }

    /// Drop the oldest sample and append a new one
    pub fn push_shift(&mut self, value: f32) {
        if self.points.pop_front().is_some() {
            self.points.push_back(value);
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub ceo: Ceo,
    /// Sorted by creation order, which is also left-to-right order
    pub obstacles: VecDeque<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub chart: Chart,
    pub score: u32,
    /// Frames of play since the last reset (drives grid scroll and bobbing)
    pub frame_count: u64,
    /// World distance since the last obstacle spawn
    pub spawn_distance: f32,
    /// Remaining boosted frames
    pub boost_ticks: u32,
    /// Scroll speed used by the most recent tick
    pub speed: f32,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh state in the start phase
    ///
    /// Panics if `settings` fails validation.
    pub fn new(settings: &Settings, seed: u64) -> Self {
        if let Err(err) = settings.validate() {
            panic!("invalid settings: {err:#}");
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        let chart = initial_chart(settings, &mut rng);
        Self {
            phase: GamePhase::Start,
            ceo: Ceo::new(settings),
            obstacles: VecDeque::new(),
            power_ups: Vec::new(),
            chart,
            score: 0,
            frame_count: 0,
            spawn_distance: 0.0,
            boost_ticks: 0,
            speed: settings.obstacles.speed,
            rng,
            next_id: 1,
        }
    }

    /// Put every mutable value back to its initial state and enter `Start`
    ///
    /// The RNG keeps running so successive runs differ.
    pub fn reset(&mut self, settings: &Settings) {
        self.phase = GamePhase::Start;
        self.ceo = Ceo::new(settings);
        self.obstacles.clear();
        self.power_ups.clear();
        self.chart = initial_chart(settings, &mut self.rng);
        self.score = 0;
        self.frame_count = 0;
        self.spawn_distance = 0.0;
        self.boost_ticks = 0;
        self.speed = settings.obstacles.speed;
        self.next_id = 1;
    }

    /// Get next entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_ticks > 0
    }
}

fn initial_chart(settings: &Settings, rng: &mut Pcg32) -> Chart {
    let mid = settings.field.height / 2.0;
    let spread = settings.chart.initial_spread;
    Chart::new((0..settings.chart_len()).map(|_| mid + (rng.random::<f32>() - 0.5) * spread))
}
