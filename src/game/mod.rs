//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The step engine can be driven directly, which is what the tests do, or
//! through a [`crate::session::Session`] and its tick scheduler.

pub mod apple;
pub mod config;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use apple::{ApplePlacer, RandomPlacer};
pub use config::{AppleRule, ConfigOverrides, Difficulty, GameConfig};
pub use direction::Direction;
pub use engine::{GameEngine, StepInfo, StepOutcome, StepResult};
pub use grid::{Grid, Position};
pub use state::{CollisionKind, GamePhase, GameState, Snake};
