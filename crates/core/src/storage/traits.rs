//! Storage repository traits
//!
//! The host talks to persistence through this interface so the SQLite
//! backend can be swapped (or mocked in tests).

use crate::error::Result;
use crate::models::EventState;

/// Whole-event persistence
pub trait StateRepository {
    /// Load everything. An empty database yields an empty state.
    fn load_state(&self) -> Result<EventState>;

    /// Replace everything with `state`, atomically
    fn save_state(&self, state: &EventState) -> Result<()>;

    /// True when there is no roster and no prize
    fn is_empty(&self) -> Result<bool>;
}
