//! Game tunables and fixed capacities.
//!
//! Capacities and entity geometry are compile-time constants: every slot
//! array is sized by them.  Everything that only scales behaviour lives in
//! `GameConfig` and can be overridden from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::swarm::SweepPolicy;

// ── Capacities ────────────────────────────────────────────────────────────────

pub const ENEMY_ROWS: usize = 3;
pub const ENEMY_COLS: usize = 10;
/// Maximum player shots in flight at once.
pub const BULLET_CAPACITY: usize = 3;

// ── Entity geometry & layout ──────────────────────────────────────────────────

pub const SHIP_WIDTH: f32 = 20.0;
pub const SHIP_HEIGHT: f32 = 20.0;
pub const SHIP_START_X: f32 = 20.0;
/// Distance from the bottom edge of the playfield to the ship's top.
pub const SHIP_BOTTOM_OFFSET: f32 = 50.0;

pub const ENEMY_WIDTH: f32 = 20.0;
pub const ENEMY_HEIGHT: f32 = 20.0;
pub const ENEMY_ORIGIN: f32 = 50.0;
pub const ENEMY_SPACING: f32 = 50.0;

pub const BULLET_WIDTH: f32 = 5.0;
pub const BULLET_HEIGHT: f32 = 5.0;

pub const INITIAL_HEALTH: f32 = 100.0;

/// Coordinate used to park destroyed enemies and retired bullets.
pub const OFF_PLAYFIELD: f32 = -1000.0;

// ── Runtime tunables ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Simulation rate and wall-clock frame cap.
    pub fps: u32,
    /// Ship displacement per move command.
    pub ship_step: f32,
    /// Bullet displacement per fixed step (upward).
    pub bullet_speed: f32,
    /// Vertical drop applied to every enemy on a boundary hit.
    pub descent_step: f32,
    pub initial_sweep_speed: f32,
    /// Added to the sweep speed once per enemy cell on every descent.
    pub sweep_speed_increment: f32,
    pub sweep_policy: SweepPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,
            fps: 60,
            ship_step: 10.0,
            bullet_speed: 10.0,
            descent_step: 20.0,
            initial_sweep_speed: 1.0,
            sweep_speed_increment: 0.01,
            sweep_policy: SweepPolicy::InOrder,
        }
    }
}

impl GameConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        let grid_right =
            ENEMY_ORIGIN + (ENEMY_COLS - 1) as f32 * ENEMY_SPACING + ENEMY_WIDTH;
        if !(self.playfield_width > grid_right.max(SHIP_START_X + SHIP_WIDTH)) {
            return Err(ConfigError::Invalid(format!(
                "playfield_width {} cannot hold the enemy grid (needs more than {})",
                self.playfield_width, grid_right
            )));
        }
        let grid_bottom =
            ENEMY_ORIGIN + (ENEMY_ROWS - 1) as f32 * ENEMY_SPACING + ENEMY_HEIGHT;
        if !(self.playfield_height - SHIP_BOTTOM_OFFSET > grid_bottom) {
            return Err(ConfigError::Invalid(format!(
                "playfield_height {} leaves no room between the grid and the ship",
                self.playfield_height
            )));
        }
        if !(self.bullet_speed > 0.0) {
            return Err(ConfigError::Invalid("bullet_speed must be positive".into()));
        }
        let non_negative = [
            ("ship_step", self.ship_step),
            ("descent_step", self.descent_step),
            ("initial_sweep_speed", self.initial_sweep_speed),
            ("sweep_speed_increment", self.sweep_speed_increment),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Fixed simulation increment in seconds.
    pub fn time_step(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Wall-clock budget per rendered frame, in whole milliseconds.
    pub fn frame_budget_ms(&self) -> u64 {
        1000 / u64::from(self.fps)
    }
}
