//! Server state shared by the handlers.

use crate::usecase::CoordinatorHandle;

/// Shared application state
pub struct AppState {
    /// Front door of the game coordinator
    pub coordinator: CoordinatorHandle,
}
