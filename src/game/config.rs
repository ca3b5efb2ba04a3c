use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::direction::Direction;
use super::state::Position;

/// How a new food position is picked after the snake eats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodPlacement {
    /// Uniform over every cell of the board; food may land under the snake
    #[default]
    Uniform,
    /// Uniform over cells not covered by the snake
    AvoidSnake,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square board
    pub board_size: usize,
    /// Milliseconds between two ticks
    pub tick_ms: u64,
    /// Single segment the snake starts with
    pub initial_head: Position,
    /// Food position at the start of every game
    pub initial_food: Position,
    pub initial_direction: Direction,
    pub food_placement: FoodPlacement,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 10,
            tick_ms: 200,
            initial_head: Position::new(0, 0),
            initial_food: Position::new(5, 5),
            initial_direction: Direction::Right,
            food_placement: FoodPlacement::Uniform,
        }
    }
}

impl GameConfig {
    /// Largest board whose layout (two columns per cell, border and six
    /// rows of chrome) still fits in terminal coordinates
    pub const MAX_BOARD_SIZE: usize = (u16::MAX as usize - 6) / 2;

    /// Create a new configuration with a custom board size
    pub fn new(board_size: usize) -> Self {
        Self {
            board_size,
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values; the result is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.board_size * self.board_size
    }

    /// Check that the board size is within `1..=MAX_BOARD_SIZE`, the tick
    /// period is non-zero and the starting cells lie on the board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::Invalid(
                "board_size must be at least 1".to_string(),
            ));
        }

        if self.board_size > Self::MAX_BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "board_size must be at most {}, got {}",
                Self::MAX_BOARD_SIZE,
                self.board_size
            )));
        }

        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_ms must be at least 1".to_string(),
            ));
        }

        if !self.initial_head.is_within(self.board_size) {
            return Err(ConfigError::Invalid(format!(
                "initial_head ({}, {}) is outside a {}x{} board",
                self.initial_head.x, self.initial_head.y, self.board_size, self.board_size
            )));
        }

        if !self.initial_food.is_within(self.board_size) {
            return Err(ConfigError::Invalid(format!(
                "initial_food ({}, {}) is outside a {}x{} board",
                self.initial_food.x, self.initial_food.y, self.board_size, self.board_size
            )));
        }

        Ok(())
    }
}
