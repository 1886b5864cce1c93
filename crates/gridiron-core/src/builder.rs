//! Fluent construction of a [`GameClock`].
//!
//! ```rust,ignore
//! let clock = GameClockBuilder::new()
//!     .quarter_length(600)
//!     .start_quarter(Quarter::Q4)
//!     .clock_speed(ClockSpeed::Fast)
//!     .seed(7)
//!     .build()?;
//! ```

use gridiron_types::{ClockSpeed, PlayClockDuration, Quarter};

use crate::clock::{GameClock, provider_for};
use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::provider::PlayOutcomeProvider;

/// Builder for [`GameClock`].
///
/// Starts from [`ClockConfig::default`]. Nothing is validated until
/// [`GameClockBuilder::build`].
#[derive(Debug, Default)]
pub struct GameClockBuilder {
    /// Configuration being assembled.
    config: ClockConfig,
    /// Period the clock starts in.
    start_quarter: Quarter,
    /// Play-clock length for the first snap.
    play_clock_duration: PlayClockDuration,
    /// Speed override; the configured speed applies when unset.
    clock_speed: Option<ClockSpeed>,
    /// Provider override; one is derived from the configuration when unset.
    provider: Option<Box<dyn PlayOutcomeProvider>>,
}

impl GameClockBuilder {
    /// Start from a default regular-season configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub const fn config(mut self, config: ClockConfig) -> Self {
        self.config = config;
        self
    }

    /// Regulation quarter length in seconds.
    #[must_use]
    pub const fn quarter_length(mut self, seconds: u32) -> Self {
        self.config.quarter_length = seconds;
        self
    }

    /// Period the clock starts in, with full time on the clock.
    #[must_use]
    pub const fn start_quarter(mut self, quarter: Quarter) -> Self {
        self.start_quarter = quarter;
        self
    }

    /// Enable or disable the two-minute warning.
    #[must_use]
    pub const fn two_minute_warning(mut self, enabled: bool) -> Self {
        self.config.features.two_minute_warning = enabled;
        self
    }

    /// Play-clock length for the first snap.
    #[must_use]
    pub const fn play_clock_duration(mut self, duration: PlayClockDuration) -> Self {
        self.play_clock_duration = duration;
        self
    }

    /// Simulation speed.
    #[must_use]
    pub const fn clock_speed(mut self, speed: ClockSpeed) -> Self {
        self.clock_speed = Some(speed);
        self
    }

    /// Playoff overtime format.
    #[must_use]
    pub const fn playoff_rules(mut self, enabled: bool) -> Self {
        self.config.playoff_rules = enabled;
        self
    }

    /// Turn on deterministic mode with `seed`.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.deterministic_mode = true;
        self.config.seed = seed;
        self
    }

    /// Use `provider` for play results.
    #[must_use]
    pub fn provider(mut self, provider: Box<dyn PlayOutcomeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Validate and build the clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if the assembled
    /// configuration is out of range.
    pub fn build(self) -> Result<GameClock, ClockError> {
        self.config.validate()?;
        let provider = self.provider.unwrap_or_else(|| provider_for(&self.config));
        let mut clock = GameClock::from_parts(self.config, provider);

        if self.start_quarter != Quarter::Q1 {
            clock.quarter = self.start_quarter;
            clock.time_remaining = clock.period_length();
            clock.sync_rules();
        }
        if let Some(speed) = self.clock_speed {
            clock.set_clock_speed(speed);
        }
        clock.set_play_clock_duration(self.play_clock_duration);
        Ok(clock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridiron_types::{GameState, PlayCall, PlayResult, PlayType};

    use super::*;
    use crate::provider::ScriptedPlayProvider;

    #[test]
    fn defaults_match_new_clock() {
        let clock = GameClockBuilder::new().build().unwrap();
        assert_eq!(clock.time_remaining(), 900);
        assert_eq!(clock.quarter(), Quarter::Q1);
        assert_eq!(clock.play_clock(), 40);
        assert_eq!(clock.game_state(), GameState::PreGame);
    }

    #[test]
    fn fluent_setters_apply() {
        let clock = GameClockBuilder::new()
            .quarter_length(300)
            .start_quarter(Quarter::Q4)
            .two_minute_warning(false)
            .play_clock_duration(PlayClockDuration::Short)
            .clock_speed(ClockSpeed::Rapid)
            .playoff_rules(true)
            .seed(11)
            .build()
            .unwrap();
        assert_eq!(clock.quarter(), Quarter::Q4);
        assert_eq!(clock.time_remaining(), 300);
        assert!(!clock.config().features.two_minute_warning);
        assert_eq!(clock.play_clock(), 25);
        assert_eq!(clock.clock_speed(), ClockSpeed::Rapid);
        assert!(clock.config().playoff_rules);
        assert!(clock.config().deterministic_mode);
        assert_eq!(clock.situation().quarter, Quarter::Q4);
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn overtime_start_uses_overtime_length() {
        let clock = GameClockBuilder::new()
            .start_quarter(Quarter::Overtime)
            .build()
            .unwrap();
        assert_eq!(clock.time_remaining(), 600);
    }

    #[test]
    fn invalid_configuration_is_an_error_not_a_panic() {
        let result = GameClockBuilder::new().quarter_length(10).build();
        assert!(matches!(
            result,
            Err(ClockError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn custom_provider_is_used() {
        let mut clock = GameClockBuilder::new()
            .provider(Box::new(ScriptedPlayProvider::new([PlayResult::new(
                PlayType::Run,
                9,
            )])))
            .build()
            .unwrap();
        clock.start().unwrap();
        let summary = clock.process_play(PlayCall::Run).unwrap();
        assert_eq!(summary.time_consumed, 9);
    }
}
