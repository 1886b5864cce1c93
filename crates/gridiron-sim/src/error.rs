//! Error types for the simulator binary.
//!
//! [`SimError`] wraps every failure mode during startup and the game loop
//! so `main` can propagate with `?`.

/// Top-level error for the simulator binary.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Clock configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridiron_core::ConfigError,
    },

    /// The clock rejected an operation.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: gridiron_core::ClockError,
    },

    /// The `simulation` section of the config file was unreadable.
    #[error("settings error: {message}")]
    Settings {
        /// Description of the failure.
        message: String,
    },

    /// The game did not finish within the play limit.
    #[error("game stalled after {plays} plays")]
    Stalled {
        /// Plays run before giving up.
        plays: u32,
    },
}
