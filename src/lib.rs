//! Grid Snake - the classic snake game on a fixed grid
//!
//! This library provides:
//! - Core game logic: grid, snake, apple placement and the step engine (game module)
//! - Session control with a fixed-interval tick scheduler (session module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod session;
