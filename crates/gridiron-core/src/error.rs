//! Error types for the game clock.
//!
//! Errors fall into two groups. State-precondition violations mean the
//! caller asked for something the state machine forbids right now; data
//! violations mean a value left its NFL-legal range. Every kind has a
//! recovery path in [`GameClock::recover_from_error`].
//!
//! [`GameClock::recover_from_error`]: crate::clock::GameClock::recover_from_error

use gridiron_rules::RulesError;
use gridiron_types::Quarter;

use crate::provider::ProviderError;

/// Errors returned by [`GameClock`](crate::clock::GameClock) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    // -----------------------------------------------------------------------
    // State preconditions
    // -----------------------------------------------------------------------
    /// `start` was called while the clock was already running.
    #[error("game clock is already running")]
    ClockAlreadyRunning,

    /// `stop` was called while the clock was stopped.
    #[error("game clock is not running")]
    ClockNotRunning,

    /// A play was run before kickoff.
    #[error("game has not started")]
    GameNotStarted,

    /// The game is over.
    #[error("game has already ended")]
    GameAlreadyEnded,

    /// Overtime was requested outside the end of the 4th quarter (or of a
    /// playoff overtime period).
    #[error("cannot enter overtime from {quarter} with {time_remaining}s remaining")]
    InvalidQuarter {
        /// The current period.
        quarter: Quarter,
        /// Seconds left in the current period.
        time_remaining: u32,
    },

    // -----------------------------------------------------------------------
    // Data validity
    // -----------------------------------------------------------------------
    /// A configuration value is out of range or the swap is illegal now.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Which value is wrong and why.
        reason: String,
    },

    /// Time remaining exceeds the current period's length.
    #[error("time remaining {seconds}s exceeds period length {max}s")]
    InvalidTimeRemaining {
        /// The offending value.
        seconds: u32,
        /// The period length.
        max: u32,
    },

    /// Clock state and time remaining disagree.
    #[error("invalid time: {reason}")]
    InvalidTime {
        /// Description of the inconsistency.
        reason: String,
    },

    /// Play clock value above the legal maximum.
    #[error("play clock {seconds}s exceeds 40s")]
    InvalidPlayClock {
        /// The offending value.
        seconds: u32,
    },

    /// Clock speed multiplier out of range. Never raised; speeds are clamped.
    #[error("invalid clock speed multiplier {multiplier}")]
    InvalidSpeed {
        /// The offending multiplier.
        multiplier: u32,
    },

    /// State flags disagree with each other.
    #[error("inconsistent clock state: {reason}")]
    InvalidState {
        /// Which flags disagree.
        reason: String,
    },

    /// Reserved. Never raised: every mutation holds the lock for its whole call.
    #[error("concurrent modification detected")]
    ConcurrentModification,

    // -----------------------------------------------------------------------
    // Wrapped
    // -----------------------------------------------------------------------
    /// The rules engine refused a bookkeeping operation.
    #[error("rules error: {source}")]
    Rules {
        /// The underlying rules error.
        #[from]
        source: RulesError,
    },

    /// The play outcome provider failed.
    #[error("play provider error: {source}")]
    Provider {
        /// The underlying provider error.
        #[from]
        source: ProviderError,
    },
}

impl ClockError {
    /// Whether the caller attempted something the current state forbids.
    pub const fn is_state_violation(&self) -> bool {
        matches!(
            self,
            Self::ClockAlreadyRunning
                | Self::ClockNotRunning
                | Self::GameNotStarted
                | Self::GameAlreadyEnded
                | Self::InvalidQuarter { .. }
        )
    }

    /// Whether a value fell outside its legal range.
    pub const fn is_data_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. }
                | Self::InvalidTimeRemaining { .. }
                | Self::InvalidTime { .. }
                | Self::InvalidPlayClock { .. }
                | Self::InvalidSpeed { .. }
                | Self::InvalidState { .. }
        )
    }
}
