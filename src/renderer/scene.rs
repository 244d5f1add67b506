//! Scene painter
//!
//! Reads the simulation state and paints one frame, back to front:
//! sky, grid, chart, obstacles, power-ups, CEO, speed lines. Never mutates the
//! state, and works whether or not the CEO sprites have loaded.

use glam::Vec2;

use super::canvas::FrameBuffer;
use crate::Color;
use crate::assets::{Sprite, SpriteHandle};
use crate::consts::GRID_SIZE;
use crate::settings::Settings;
use crate::sim::{Ceo, GamePhase, GameState, ObstacleKind, PowerUp};

/// Colors for game elements
pub mod colors {
    use crate::Color;

    pub const SKY: Color = [0x0f, 0x17, 0x2a, 255];
    pub const GRID: Color = [0x1e, 0x29, 0x3b, 255];
    pub const CHART_LINE: Color = [0x22, 0xc5, 0x5e, 255];
    /// Chart green at 10%
    pub const CHART_FILL: Color = [0x22, 0xc5, 0x5e, 26];
    pub const BULL: Color = [0x4a, 0xde, 0x80, 255];
    pub const BEAR: Color = [0xf8, 0x71, 0x71, 255];
    pub const WHITE: Color = [255, 255, 255, 255];
    pub const BLACK: Color = [0, 0, 0, 255];
    pub const SHINE: Color = [255, 255, 255, 102];
    /// Placeholder CEO while playing
    pub const PLACEHOLDER: Color = [0, 0, 255, 255];
    /// Placeholder CEO after a crash
    pub const PLACEHOLDER_CRASHED: Color = [255, 0, 0, 255];
}

const OUTLINE_WIDTH: f32 = 2.0;
const WICK_WIDTH: f32 = 2.0;
const WICK_LENGTH: f32 = 20.0;
const ORB_RING_WIDTH: f32 = 3.0;
const BOB_AMPLITUDE: f32 = 5.0;
const BOB_RATE: f32 = 0.1;
const LABEL_SCALE: f32 = 5.0;
const LABEL_OFFSET: f32 = 35.0;
const LABEL_OUTLINE: f32 = 3.0;

/// CEO artwork: one sprite in flight, one after the crash
#[derive(Debug, Clone, Default)]
pub struct CeoSprites {
    pub flying: SpriteHandle,
    pub crashed: SpriteHandle,
}

impl CeoSprites {
    /// Both poses drawn from the same image
    pub fn shared(handle: SpriteHandle) -> Self {
        Self {
            flying: handle.clone(),
            crashed: handle,
        }
    }
}

/// Paint the whole frame
pub fn render(frame: &mut FrameBuffer, state: &GameState, settings: &Settings, sprites: &CeoSprites) {
    frame.clear(colors::SKY);
    draw_grid(frame, state, settings);
    draw_chart(frame, state, settings);
    draw_obstacles(frame, state, settings);
    draw_power_ups(frame, state);

    let crashed = state.phase == GamePhase::GameOver;
    let handle = if crashed { &sprites.crashed } else { &sprites.flying };
    let sprite = handle.sprite();
    draw_ceo(frame, &state.ceo, sprite.as_deref(), crashed);

    if state.is_boosted() && state.phase == GamePhase::Playing {
        draw_speed_lines(frame, &state.ceo);
    }
}

/// Horizontal offset of the vertical grid lines
pub fn grid_offset(frame_count: u64, speed: f32) -> f32 {
    (frame_count as f32 * (speed / 2.0)) % GRID_SIZE
}

fn draw_grid(frame: &mut FrameBuffer, state: &GameState, settings: &Settings) {
    let (width, height) = (settings.field.width, settings.field.height);
    let offset = grid_offset(state.frame_count, state.speed);
    let mut x = 0.0;
    while x < width {
        frame.fill_rect(x - offset, 0.0, 1.0, height, colors::GRID);
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < height {
        frame.fill_rect(0.0, y, width, 1.0, colors::GRID);
        y += GRID_SIZE;
    }
}

fn draw_chart(frame: &mut FrameBuffer, state: &GameState, settings: &Settings) {
    let n = state.chart.len();
    if n < 2 {
        return;
    }
    let step = settings.field.width / (n - 1) as f32;
    let mut outline: Vec<Vec2> = state
        .chart
        .points()
        .enumerate()
        .map(|(i, y)| Vec2::new(i as f32 * step, y))
        .collect();
    for pair in outline.windows(2) {
        frame.line(pair[0], pair[1], 2.0, colors::CHART_LINE);
    }

    outline.push(Vec2::new(settings.field.width, settings.field.height));
    outline.push(Vec2::new(0.0, settings.field.height));
    frame.fill_polygon(&outline, colors::CHART_FILL);
}

fn draw_obstacles(frame: &mut FrameBuffer, state: &GameState, settings: &Settings) {
    let height = settings.field.height;
    for obs in &state.obstacles {
        let color = match obs.kind {
            ObstacleKind::Bull => colors::BULL,
            ObstacleKind::Bear => colors::BEAR,
        };

        frame.fill_rect(obs.x, 0.0, obs.width, obs.top_height, color);
        frame.stroke_rect(obs.x, 0.0, obs.width, obs.top_height, OUTLINE_WIDTH, colors::WHITE);

        let bottom_y = obs.top_height + settings.obstacles.gap;
        let bottom_h = height - bottom_y;
        frame.fill_rect(obs.x, bottom_y, obs.width, bottom_h, color);
        frame.stroke_rect(obs.x, bottom_y, obs.width, bottom_h, OUTLINE_WIDTH, colors::WHITE);

        let wick_x = obs.x + obs.width / 2.0 - WICK_WIDTH / 2.0;
        frame.fill_rect(wick_x, obs.top_height - WICK_LENGTH, WICK_WIDTH, WICK_LENGTH, colors::WHITE);
        frame.fill_rect(wick_x, bottom_y, WICK_WIDTH, WICK_LENGTH, colors::WHITE);
    }
}

/// Vertical bob shared by every orb this frame
pub fn bob_offset(frame_count: u64) -> f32 {
    (frame_count as f32 * BOB_RATE).sin() * BOB_AMPLITUDE
}

fn draw_power_ups(frame: &mut FrameBuffer, state: &GameState) {
    let bob = bob_offset(state.frame_count);
    for p in &state.power_ups {
        draw_power_up(frame, p, bob);
    }
}

fn draw_power_up(frame: &mut FrameBuffer, p: &PowerUp, bob: f32) {
    let center = p.pos + Vec2::new(0.0, bob);
    let radius = p.size / 2.0;
    frame.fill_circle(center, radius, p.color);
    frame.stroke_circle(center, radius, ORB_RING_WIDTH, colors::WHITE);
    frame.fill_circle(center - Vec2::splat(5.0), 4.0, colors::SHINE);

    let label_center = Vec2::new(center.x, center.y + radius + LABEL_OFFSET);
    frame.draw_text_outlined(
        &p.label,
        label_center,
        LABEL_SCALE,
        LABEL_OUTLINE,
        colors::WHITE,
        colors::BLACK,
    );
}

/// Desaturated look of the crashed CEO: grayscale, 30% sepia, 80% brightness
pub fn crash_tint(c: Color) -> Color {
    let [r, g, b] = [c[0] as f32, c[1] as f32, c[2] as f32];
    let gray = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    let sepia = [
        0.393 * gray + 0.769 * gray + 0.189 * gray,
        0.349 * gray + 0.686 * gray + 0.168 * gray,
        0.272 * gray + 0.534 * gray + 0.131 * gray,
    ];
    let mix = |i: usize| {
        let v = (gray * 0.7 + sepia[i] * 0.3) * 0.8;
        v.round().clamp(0.0, 255.0) as u8
    };
    [mix(0), mix(1), mix(2), c[3]]
}

fn draw_ceo(frame: &mut FrameBuffer, ceo: &Ceo, sprite: Option<&Sprite>, crashed: bool) {
    let center = ceo.center();
    match sprite {
        Some(sprite) => frame.fill_transformed(center, ceo.size, ceo.rotation, |uv| {
            let c = sprite.sample(uv);
            let c = if crashed { crash_tint(c) } else { c };
            (c[3] > 0).then_some(c)
        }),
        None => {
            let color = if crashed {
                colors::PLACEHOLDER_CRASHED
            } else {
                colors::PLACEHOLDER
            };
            frame.fill_transformed(center, ceo.size, ceo.rotation, |_| Some(color));
        }
    }
}

/// Two streaks trailing the CEO, turned with it
fn draw_speed_lines(frame: &mut FrameBuffer, ceo: &Ceo) {
    let center = ceo.center();
    let turn = Vec2::from_angle(ceo.rotation);
    let w = ceo.size.x;
    let at = |x: f32, y: f32| center + turn.rotate(Vec2::new(x, y));
    frame.line(at(-w, -10.0), at(-w - 20.0, -10.0), 2.0, colors::WHITE);
    frame.line(at(-w - 5.0, 10.0), at(-w - 30.0, 10.0), 2.0, colors::WHITE);
}
