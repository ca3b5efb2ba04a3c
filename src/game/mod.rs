//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The terminal shell drives it one tick at a time and feeds it direction requests.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, FoodPlacement, GameConfig};
pub use direction::{request_direction, Direction};
pub use engine::{spawn_food, step, step_with_placement, GameEngine, StepEvent, StepResult};
pub use state::{CollisionType, GameState, Position, Snake};
