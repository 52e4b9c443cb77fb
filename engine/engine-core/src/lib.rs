//! Core traits and types for the card battle search engine
//!
//! This crate provides the abstraction the search core consumes:
//! - `Game`: Typed game-state adapter (legal actions, pure transitions,
//!   terminal check, scoring and hidden-information resampling)
//! - `EngineId`: Identification for a game implementation
//! - `GameError`: Failures raised by a transition

pub mod typed;

// Re-export main types for convenience
pub use typed::{EngineId, Game, GameError};
