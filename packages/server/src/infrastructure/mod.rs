//! Infrastructure layer: wire DTOs and the adapters behind the domain ports.

pub mod dto;
pub mod message_pusher;
pub mod question_picker;
pub mod score_reporter;

pub use message_pusher::WebSocketMessagePusher;
pub use question_picker::{FixedQuestionPicker, RandomQuestionPicker};
pub use score_reporter::{HttpScoreReporter, LoggingScoreReporter};
