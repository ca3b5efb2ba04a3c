//! Snake - a single-screen Snake game for the terminal
//!
//! This library provides:
//! - Core game logic: state, direction control, the tick step (game module)
//! - Key mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive shell driving the fixed-rate ticker (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
