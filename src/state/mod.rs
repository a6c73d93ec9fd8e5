//! State management module.
//!
//! Holds the active gameplay state:
//! - `GameSession` - One play-through of a chart, ticked once per frame

pub mod game;

// Re-exports for convenient access
pub use game::{GameSession, SessionPhase};
