//! Runtime event stream payloads.

use crate::types::Score;

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    /// A user was created at score 0.
    UserAdded {
        /// New user's identity.
        email: String,
    },
    /// A user's score changed on the global and country boards.
    ScoreUpdated {
        /// Rescored user's identity.
        email: String,
        /// Score written.
        score: Score,
    },
    /// A user was removed from the record store and both boards.
    UserRemoved {
        /// Removed user's identity.
        email: String,
    },
}
