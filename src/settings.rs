//! Game settings
//!
//! Every tunable of the simulation and renderer: field size, physics, obstacle
//! spacing, power-up catalog. Loaded from JSON; missing keys use the defaults.

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::Color;
use crate::consts::*;

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
        }
    }
}

/// Character physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsSettings {
    /// Added to velocity every frame
    pub gravity: f32,
    /// Velocity a jump sets (overrides, never adds)
    pub jump_impulse: f32,
    /// Banking angle per unit of velocity (radians)
    pub tilt_per_velocity: f32,
    /// Banking clamp (radians)
    pub max_tilt: f32,
    /// After a crash the character falls until its top reaches `height - ground_margin`
    pub ground_margin: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_STRENGTH,
            tilt_per_velocity: 0.1,
            max_tilt: std::f32::consts::FRAC_PI_4,
            ground_margin: GROUND_MARGIN,
        }
    }
}

/// The player character's sprite box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CeoSettings {
    pub width: f32,
    pub height: f32,
    /// Hitbox shrink on every side, as a fraction of the sprite width
    pub hitbox_inset_ratio: f32,
}

impl Default for CeoSettings {
    fn default() -> Self {
        Self {
            width: CEO_SIZE,
            height: CEO_SIZE,
            hitbox_inset_ratio: CEO_HITBOX_INSET_RATIO,
        }
    }
}

impl CeoSettings {
    pub fn hitbox_inset(&self) -> f32 {
        self.width * self.hitbox_inset_ratio
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObstacleSettings {
    /// Nominal scroll speed (pixels per frame)
    pub speed: f32,
    /// World distance travelled between spawns
    pub spawn_distance: f32,
    pub gap: f32,
    pub width: f32,
    /// Minimum height of either bar
    pub min_bar_height: f32,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            speed: OBSTACLE_SPEED,
            spawn_distance: OBSTACLE_SPAWN_DISTANCE,
            gap: OBSTACLE_GAP,
            width: OBSTACLE_WIDTH,
            min_bar_height: OBSTACLE_MIN_BAR,
        }
    }
}

/// One entry of the power-up catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PowerUpKind {
    pub label: String,
    #[serde(with = "hex_color")]
    pub color: Color,
}

impl PowerUpKind {
    pub fn new(label: &str, color: Color) -> Self {
        Self {
            label: label.to_string(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PowerUpSettings {
    /// Boost length in frames
    pub duration_frames: u32,
    pub size: f32,
    pub speed_multiplier: f32,
    /// Chance of a power-up accompanying each obstacle spawn
    pub spawn_chance: f64,
    /// Power-ups are dropped once `x <= -despawn_margin`
    pub despawn_margin: f32,
    pub catalog: Vec<PowerUpKind>,
}

impl Default for PowerUpSettings {
    fn default() -> Self {
        Self {
            duration_frames: POWERUP_DURATION,
            size: POWERUP_SIZE,
            speed_multiplier: POWERUP_SPEED_MULTIPLIER,
            spawn_chance: POWERUP_SPAWN_CHANCE,
            despawn_margin: POWERUP_DESPAWN_MARGIN,
            catalog: vec![
                PowerUpKind::new("REBRAND", [0x0e, 0xa5, 0xe9, 255]),
                PowerUpKind::new("AI", [0xd9, 0x46, 0xef, 255]),
                PowerUpKind::new("STAFF CUTS", [0xef, 0x44, 0x44, 255]),
                PowerUpKind::new("WHOPPER", [0xf5, 0x9e, 0x0b, 255]),
            ],
        }
    }
}

/// Background stock chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartSettings {
    /// Horizontal distance between samples
    pub spacing: f32,
    /// Samples stay within `[band_margin, height - band_margin]`
    pub band_margin: f32,
    /// Random walk step range at nominal speed
    pub volatility: f32,
    /// Random walk step range while boosted
    pub boosted_volatility: f32,
    /// Spread of the initial samples around mid-field
    pub initial_spread: f32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            band_margin: 100.0,
            volatility: 20.0,
            boosted_volatility: 40.0,
            initial_spread: 100.0,
        }
    }
}

/// All game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub field: FieldSettings,
    pub physics: PhysicsSettings,
    pub ceo: CeoSettings,
    pub obstacles: ObstacleSettings,
    pub power_ups: PowerUpSettings,
    pub chart: ChartSettings,
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(json).context("malformed settings JSON")?;
        settings.validate().context("invalid settings")?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize settings")
    }

    /// Check every precondition the simulation relies on
    pub fn validate(&self) -> anyhow::Result<()> {
        let field = &self.field;
        ensure!(
            field.width > 0.0 && field.height > 0.0,
            "field must have positive size, got {}x{}",
            field.width,
            field.height
        );

        let obs = &self.obstacles;
        ensure!(obs.speed > 0.0, "obstacle speed must be positive");
        ensure!(obs.spawn_distance > 0.0, "spawn distance must be positive");
        ensure!(obs.gap > 0.0, "obstacle gap must be positive");
        ensure!(obs.width > 0.0, "obstacle width must be positive");
        ensure!(obs.min_bar_height >= 0.0, "minimum bar height cannot be negative");
        ensure!(
            obs.gap + 2.0 * obs.min_bar_height <= field.height,
            "gap {} plus two {} bars does not fit a field {} tall",
            obs.gap,
            obs.min_bar_height,
            field.height
        );

        let ceo = &self.ceo;
        ensure!(ceo.width > 0.0 && ceo.height > 0.0, "CEO must have positive size");
        ensure!(
            (0.0..0.5).contains(&ceo.hitbox_inset_ratio),
            "hitbox inset ratio must be in [0, 0.5)"
        );

        let pu = &self.power_ups;
        ensure!(pu.duration_frames > 0, "power-up duration must be positive");
        ensure!(pu.size > 0.0, "power-up size must be positive");
        ensure!(pu.speed_multiplier > 0.0, "speed multiplier must be positive");
        ensure!(
            (0.0..=1.0).contains(&pu.spawn_chance),
            "power-up spawn chance must be in [0, 1], got {}",
            pu.spawn_chance
        );
        ensure!(pu.despawn_margin >= 0.0, "despawn margin cannot be negative");
        ensure!(!pu.catalog.is_empty(), "power-up catalog is empty");
        ensure!(
            self.power_up_band().0 <= self.power_up_band().1,
            "field too short for the power-up band"
        );

        let chart = &self.chart;
        ensure!(chart.spacing > 0.0, "chart spacing must be positive");
        ensure!(
            2.0 * chart.band_margin <= field.height,
            "chart band margin leaves no room"
        );

        Ok(())
    }

    /// Vertical range power-up centers spawn in
    pub fn power_up_band(&self) -> (f32, f32) {
        let margin = self.obstacles.min_bar_height;
        (margin, self.field.height - margin)
    }

    /// Number of background chart samples spanning the field
    pub fn chart_len(&self) -> usize {
        (self.field.width / self.chart.spacing).floor() as usize + 1
    }
}

/// Serde adapter for `#rrggbb` colors
mod hex_color {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::{Color, format_hex_color, parse_hex_color};

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hex_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hex_color(&s).ok_or_else(|| D::Error::custom(format!("invalid color {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.chart_len(), 49);
        assert_eq!(settings.ceo.hitbox_inset(), 12.0);
        assert_eq!(settings.power_ups.catalog.len(), 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "physics": { "gravity": 0.5 }, "obstacles": { "gap": 200 } }"#)
                .unwrap();
        assert_eq!(settings.physics.gravity, 0.5);
        assert_eq!(settings.physics.jump_impulse, JUMP_STRENGTH);
        assert_eq!(settings.obstacles.gap, 200.0);
        assert_eq!(settings.obstacles.spawn_distance, OBSTACLE_SPAWN_DISTANCE);
    }

    #[test]
    fn test_catalog_from_json() {
        let settings = Settings::from_json(
            r##"{ "power_ups": { "catalog": [ { "label": "IPO", "color": "#22c55e" } ] } }"##,
        )
        .unwrap();
        assert_eq!(settings.power_ups.catalog, vec![PowerUpKind::new("IPO", [0x22, 0xc5, 0x5e, 255])]);
    }

    #[test]
    fn test_rejects_bad_color() {
        let err = Settings::from_json(
            r#"{ "power_ups": { "catalog": [ { "label": "IPO", "color": "green" } ] } }"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("invalid color"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(Settings::from_json(r#"{ "physics": { "gravitee": 1.0 } }"#).is_err());
    }

    #[test]
    fn test_rejects_non_positive_spawn_distance() {
        let err = Settings::from_json(r#"{ "obstacles": { "spawn_distance": 0 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("spawn distance"));
    }

    #[test]
    fn test_rejects_gap_that_does_not_fit() {
        let mut settings = Settings::default();
        settings.obstacles.gap = 500.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let mut settings = Settings::default();
        settings.power_ups.catalog.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_catalog_colors() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"#0ea5e9\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
