//! Utilities shared between Guessroom binaries and libraries.

pub mod logger;
pub mod time;
