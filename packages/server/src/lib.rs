//! Emoji quiz matchmaking and round coordinator.
//!
//! Players join over WebSocket, are seated in lobby rooms of five, and play
//! rounds of "guess the phrase from the emoji" until the game is over.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
