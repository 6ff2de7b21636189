//! Data Transfer Objects (DTOs) for the quiz server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: `{"event": .., "data": ..}` frames
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
