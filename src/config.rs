/// Game tunables.
///
/// Every field has a default reproducing the reference 600×600 layout, so a
/// TOML file only needs the values it wants to change.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Ok(Level::Easy),
            "medium" | "med" | "2" => Ok(Level::Medium),
            "hard" | "3" => Ok(Level::Hard),
            other => Err(format!("unknown level `{other}` (easy, medium, hard)")),
        }
    }
}

/// Largest formation a config may ask for.
pub const MAX_GRID_UNITS: usize = 1024;
/// Largest capacity of any bullet or effect pool.
pub const MAX_POOL_CAPACITY: usize = 4096;

// ── Difficulty tables ────────────────────────────────────────────────────────

fn martian_move_timer(level: Level) -> u32 {
    match level {
        Level::Easy => 28,
        Level::Medium => 20,
        Level::Hard => 12,
    }
}

fn martian_shoot_freq(level: Level) -> u32 {
    match level {
        Level::Easy => 110,
        Level::Medium => 75,
        Level::Hard => 40,
    }
}

fn martian_bullet_speed(level: Level) -> f32 {
    match level {
        Level::Easy => 4.0,
        Level::Medium => 5.0,
        Level::Hard => 7.0,
    }
}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    /// Side frame width; also the formation's left limit.
    pub frame_width: u32,
    /// Height of the frame above the playfield.
    pub frame_top: u32,
    pub fps: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            frame_width: 40,
            frame_top: 60,
            fps: 30.0,
        }
    }
}

impl DisplayConfig {
    pub fn canvas_width(&self) -> f32 {
        self.width as f32 - self.frame_width as f32
    }

    /// Bottom limit for every downward bullet; the floor line is drawn here.
    pub fn canvas_height(&self) -> f32 {
        self.height as f32 - self.frame_top as f32
    }

    /// Ship bullets are destroyed once they would cross this line.
    pub fn top_limit(&self) -> f32 {
        self.frame_top as f32 + 50.0
    }

    pub fn right_limit(&self) -> f32 {
        self.canvas_width() - 32.0
    }

    pub fn left_limit(&self) -> f32 {
        self.frame_width as f32
    }

    /// Row at which the formation halts for good.
    pub fn bottom_limit(&self) -> f32 {
        self.height as f32 - 2.0 * self.frame_width as f32 - 10.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub width: u32,
    pub height: u32,
    pub speed: f32,
    pub bullet_speed: f32,
    /// Ticks between permitted shots.
    pub fire_timer: u32,
    pub lives: u32,
    pub bullet_capacity: usize,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            start_x: 300.0,
            start_y: 510.0,
            width: 30,
            height: 20,
            speed: 6.0,
            bullet_speed: 15.0,
            fire_timer: 3,
            lives: 3,
            bullet_capacity: 50,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MartianConfig {
    pub columns: u32,
    pub rows: u32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: u32,
    pub height: u32,
    pub speed: f32,
    pub bullet_speed: f32,
    pub move_timer: u32,
    pub shoot_freq: u32,
    pub animation_period: u32,
    pub bullet_capacity: usize,
    /// Points per row, top row first.  Rows past the end reuse the last entry.
    pub row_points: Vec<u32>,
}

impl Default for MartianConfig {
    fn default() -> Self {
        Self {
            columns: 11,
            rows: 5,
            spacing_x: 32.0,
            spacing_y: 27.0,
            origin_x: 130.0,
            origin_y: 170.0,
            width: 25,
            height: 20,
            speed: 5.0,
            bullet_speed: 5.0,
            move_timer: 20,
            shoot_freq: 75,
            animation_period: 25,
            bullet_capacity: 25,
            row_points: vec![30, 20, 20, 10, 10],
        }
    }
}

impl MartianConfig {
    pub fn total(&self) -> usize {
        (self.columns as usize).saturating_mul(self.rows as usize)
    }

    /// Point value and sprite row for grid row `row`.
    pub fn row_kind(&self, row: u32) -> (u32, u32) {
        let points = self
            .row_points
            .get(row as usize)
            .or_else(|| self.row_points.last())
            .copied()
            .unwrap_or(10);
        let frame_y = match points {
            p if p >= 30 => 0,
            p if p >= 20 => 1,
            _ => 2,
        };
        (points, frame_y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the shooter's x to the muzzle.
    pub muzzle_offset: f32,
    pub orphan_capacity: usize,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 12,
            muzzle_offset: 12.0,
            orphan_capacity: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub width: u32,
    pub height: u32,
    /// Ticks an explosion stays on screen.
    pub lifetime: u32,
    pub capacity: usize,
    /// Explosions spawn this far left of the thing that blew up.
    pub offset_x: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            width: 41,
            height: 34,
            lifetime: 5,
            capacity: 55,
            offset_x: -10.0,
        }
    }
}

// ── Root ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Enemy bullets still explode on the ship but cost no lives.
    pub god_mode: bool,
    pub display: DisplayConfig,
    pub ship: ShipConfig,
    pub martians: MartianConfig,
    pub bullets: BulletConfig,
    pub effects: EffectConfig,
}

impl GameConfig {
    /// Reference configuration with the martian cadence of `level`.
    pub fn for_level(level: Level) -> Self {
        let mut config = Self::default();
        config.apply_level(level);
        config
    }

    pub fn apply_level(&mut self, level: Level) {
        self.martians.move_timer = martian_move_timer(level);
        self.martians.shoot_freq = martian_shoot_freq(level);
        self.martians.bullet_speed = martian_bullet_speed(level);
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }

        if !(self.display.fps > 0.0) {
            return Err(invalid("display.fps", "must be positive"));
        }
        if self.display.right_limit() <= self.display.left_limit() {
            return Err(invalid("display.width", "playfield has no horizontal room"));
        }
        if self.ship.speed <= 0.0 || self.ship.bullet_speed <= 0.0 {
            return Err(invalid("ship.speed", "speeds must be positive"));
        }
        if self.ship.fire_timer == 0 {
            return Err(invalid("ship.fire_timer", "must be at least 1"));
        }
        if self.ship.bullet_capacity == 0 {
            return Err(invalid("ship.bullet_capacity", "must be at least 1"));
        }
        if self.martians.total() == 0 {
            return Err(invalid("martians", "grid must contain at least one unit"));
        }
        if self.martians.total() > MAX_GRID_UNITS {
            return Err(invalid("martians", "grid is too large"));
        }
        if self.martians.speed <= 0.0 || self.martians.bullet_speed <= 0.0 {
            return Err(invalid("martians.speed", "speeds must be positive"));
        }
        if self.martians.move_timer == 0 || self.martians.shoot_freq == 0 {
            return Err(invalid("martians.move_timer", "timers must be at least 1"));
        }
        if self.martians.bullet_capacity == 0 {
            return Err(invalid("martians.bullet_capacity", "must be at least 1"));
        }
        if self.bullets.orphan_capacity == 0 {
            return Err(invalid("bullets.orphan_capacity", "must be at least 1"));
        }
        if self.effects.capacity == 0 {
            return Err(invalid("effects.capacity", "must be at least 1"));
        }
        let capacities = [
            ("ship.bullet_capacity", self.ship.bullet_capacity),
            ("martians.bullet_capacity", self.martians.bullet_capacity),
            ("bullets.orphan_capacity", self.bullets.orphan_capacity),
            ("effects.capacity", self.effects.capacity),
        ];
        if let Some((field, _)) = capacities.iter().find(|(_, c)| *c > MAX_POOL_CAPACITY) {
            return Err(invalid(*field, "capacity is too large"));
        }
        if self.effects.lifetime == 0 {
            return Err(invalid("effects.lifetime", "must be at least 1"));
        }
        Ok(())
    }
}
