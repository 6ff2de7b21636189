//! `ScoreReporter` implementations.
//!
//! - `http`: POSTs each final score to the external score API
//! - `log`: writes final scores to the log when no API is configured

pub mod http;
pub mod log;

pub use http::HttpScoreReporter;
pub use log::LoggingScoreReporter;
