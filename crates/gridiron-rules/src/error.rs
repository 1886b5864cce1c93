//! Error types for the `gridiron-rules` crate.

use gridiron_types::Team;

/// Errors that can occur during rules bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    /// The team has no timeouts left in this half or overtime period.
    #[error("{team} team has no timeouts remaining")]
    NoTimeoutsRemaining {
        /// The team that tried to call a timeout.
        team: Team,
    },
}
