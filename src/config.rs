use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{GameError, GameResult};

pub const DUNGEON_WIDTH: i32 = 25;
pub const DUNGEON_HEIGHT: i32 = 18;
pub const MAX_MONSTERS: usize = 40;
pub const WALL_CHANCE: f32 = 0.05;
pub const CHEST_CHANCE: f32 = 0.02;
pub const DEFAULT_SEED: u64 = 123;

/// Largest grid the 80x50 terminal can show next to the HUD.
pub const MAX_GRID_WIDTH: i32 = 76;
pub const MAX_GRID_HEIGHT: i32 = 36;

pub const CONFIG_ENV: &str = "DUNGEON_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dungeon.json";

/// Tunables for a run. Every field falls back to its default when missing
/// from the JSON file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub wall_chance: f32,
    pub chest_chance: f32,
    pub monsters_per_level: usize,
    /// `None` seeds from system entropy, so every run differs.
    pub seed: Option<u64>,
    pub player_health: i32,
    pub player_power: i32,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    /// Replays a key script headlessly instead of opening the terminal.
    pub script: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_WIDTH,
            height: DUNGEON_HEIGHT,
            wall_chance: WALL_CHANCE,
            chest_chance: CHEST_CHANCE,
            monsters_per_level: 4,
            seed: Some(DEFAULT_SEED),
            player_health: 100,
            player_power: 10,
            log_file: None,
            log_level: "info".to_string(),
            script: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(path: &Path, text: &str) -> GameResult<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|source| GameError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> GameResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// Reads `$DUNGEON_CONFIG`, else `dungeon.json` in the working directory,
    /// else the built-in defaults.
    pub fn discover() -> GameResult<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            Self::load(fallback)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.width < 1 || self.width > MAX_GRID_WIDTH {
            return Err(GameError::InvalidConfig(format!(
                "width {} outside 1..={MAX_GRID_WIDTH}",
                self.width
            )));
        }
        if self.height < 1 || self.height > MAX_GRID_HEIGHT {
            return Err(GameError::InvalidConfig(format!(
                "height {} outside 1..={MAX_GRID_HEIGHT}",
                self.height
            )));
        }
        for (name, chance) in [
            ("wall_chance", self.wall_chance),
            ("chest_chance", self.chest_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} {chance} outside 0.0..=1.0"
                )));
            }
        }
        if self.player_health < 1 {
            return Err(GameError::InvalidConfig(
                "player_health must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn monster_budget(&self) -> usize {
        self.monsters_per_level.min(MAX_MONSTERS)
    }
}
