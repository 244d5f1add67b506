//! CEO Flight - a side-scrolling market arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `renderer`: CPU frame rasterizer plus WebGPU presentation
//! - `platform`: Frame scheduling and browser/native differences
//! - `assets`: Sprite loading with an explicit ready flag
//! - `game`: The per-frame simulation & render loop
//! - `session`: Screen state and score mirror around the loop

pub mod assets;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use game::{Game, GameObserver, PlaySignal, Signals};
pub use session::Session;
pub use settings::Settings;

/// Game configuration defaults
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const GAME_WIDTH: f32 = 480.0;
    pub const GAME_HEIGHT: f32 = 640.0;

    /// Downward acceleration per frame
    pub const GRAVITY: f32 = 0.4;
    /// Velocity set by a jump (negative is up)
    pub const JUMP_STRENGTH: f32 = -7.0;

    /// Nominal scroll speed (pixels per frame)
    pub const OBSTACLE_SPEED: f32 = 3.0;
    /// World distance between obstacle spawns
    pub const OBSTACLE_SPAWN_DISTANCE: f32 = 350.0;
    /// Vertical opening between the top and bottom bar
    pub const OBSTACLE_GAP: f32 = 180.0;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    /// Smallest allowed top or bottom bar
    pub const OBSTACLE_MIN_BAR: f32 = 100.0;

    /// Boost length in frames
    pub const POWERUP_DURATION: u32 = 300;
    pub const POWERUP_SIZE: f32 = 40.0;
    pub const POWERUP_SPEED_MULTIPLIER: f32 = 2.0;
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.35;
    /// Power-ups live until this far past the left edge (labels are wide)
    pub const POWERUP_DESPAWN_MARGIN: f32 = 300.0;

    /// CEO sprite size
    pub const CEO_SIZE: f32 = 75.0;
    /// 12px on a 75px sprite
    pub const CEO_HITBOX_INSET_RATIO: f32 = 0.16;
    /// Post-crash fall stops this far above the bottom
    pub const GROUND_MARGIN: f32 = 50.0;

    /// Background grid cell size
    pub const GRID_SIZE: f32 = 40.0;
}

/// RGBA color, 8 bits per channel
pub type Color = [u8; 4];

/// Parse `#rrggbb` (or `#rrggbbaa`) into a color
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some([channel(0)?, channel(2)?, channel(4)?, 255]),
        8 => Some([channel(0)?, channel(2)?, channel(4)?, channel(6)?]),
        _ => None,
    }
}

/// Format a color back to `#rrggbb`, or `#rrggbbaa` when not opaque
pub fn format_hex_color(c: Color) -> String {
    if c[3] == 255 {
        format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", c[0], c[1], c[2], c[3])
    }
}
