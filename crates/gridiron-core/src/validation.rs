//! Consistency checks and recovery for [`GameClock`].
//!
//! The validators are read-only: each returns the first problem it finds
//! as a [`ClockError`]. [`GameClock::recover_from_error`] maps every error
//! kind to a deterministic repair and falls back to
//! [`GameClock::reset_to_valid_state`], so after recovery the validators
//! always pass.

use gridiron_types::{ClockSpeed, ClockState, GameState, Quarter};
use tracing::warn;

use crate::clock::GameClock;
use crate::config::{ClockConfig, MAX_PLAY_CLOCK};
use crate::error::ClockError;

impl GameClock {
    // -----------------------------------------------------------------------
    // Validators
    // -----------------------------------------------------------------------

    /// Check configuration, time, play clock, period, and flags.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate_state(&self) -> Result<(), ClockError> {
        self.validate_configuration()?;
        self.validate_current_time()?;

        if self.play_clock > MAX_PLAY_CLOCK {
            return Err(ClockError::InvalidPlayClock {
                seconds: self.play_clock,
            });
        }
        if self.game_state == GameState::Halftime && self.quarter != Quarter::Q3 {
            return Err(ClockError::InvalidQuarter {
                quarter: self.quarter,
                time_remaining: self.time_remaining,
            });
        }
        if self.is_running != (self.clock_state == ClockState::Running) {
            return Err(ClockError::InvalidState {
                reason: format!(
                    "is_running = {} but clock state is {:?}",
                    self.is_running, self.clock_state
                ),
            });
        }
        if self.is_running && self.game_state != GameState::InProgress {
            return Err(ClockError::InvalidState {
                reason: format!("clock running during {:?}", self.game_state),
            });
        }
        for quarter in [Quarter::Q1, Quarter::Q3] {
            if self.two_minute_warning_given(quarter) {
                return Err(ClockError::InvalidState {
                    reason: format!("two-minute warning recorded in the {quarter} quarter"),
                });
            }
        }
        Ok(())
    }

    /// Check the configuration in force.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] if it is out of range.
    pub fn validate_configuration(&self) -> Result<(), ClockError> {
        self.config.validate()
    }

    /// Check the game clock against the period length and its run state.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidTimeRemaining`] if time exceeds the
    /// period, or [`ClockError::InvalidTime`] if an expired clock shows
    /// time.
    pub fn validate_current_time(&self) -> Result<(), ClockError> {
        let max = self.period_length();
        if self.time_remaining > max {
            return Err(ClockError::InvalidTimeRemaining {
                seconds: self.time_remaining,
                max,
            });
        }
        if self.clock_state == ClockState::Expired && self.time_remaining > 0 {
            return Err(ClockError::InvalidTime {
                reason: format!("clock expired with {}s remaining", self.time_remaining),
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Recovery
    // -----------------------------------------------------------------------

    /// Repair the state behind `error`.
    ///
    /// Applies the repair for the error's kind, then re-validates and
    /// falls back to [`GameClock::reset_to_valid_state`] if anything is
    /// still wrong. Errors that carry no bad state only resynchronize the
    /// run flags.
    pub fn recover_from_error(&mut self, error: &ClockError) {
        warn!(%error, quarter = %self.quarter, time_remaining = self.time_remaining, "recovering from clock error");
        match error {
            ClockError::InvalidTimeRemaining { .. } => {
                self.time_remaining = self.time_remaining.min(self.period_length());
            }
            ClockError::InvalidTime { .. } => {
                if self.clock_state == ClockState::Expired && self.time_remaining > 0 {
                    self.clock_state = ClockState::Stopped;
                    self.is_running = false;
                }
            }
            ClockError::InvalidPlayClock { .. } => {
                self.reset_play_clock();
                self.play_clock = self.play_clock.min(self.time_remaining.max(1));
            }
            ClockError::InvalidQuarter { .. } => {
                if self.game_state == GameState::Halftime && self.quarter != Quarter::Q3 {
                    self.game_state = GameState::InProgress;
                }
            }
            ClockError::InvalidConfiguration { .. } => {
                if self.config.validate().is_err() {
                    self.install_default_config();
                }
            }
            ClockError::InvalidSpeed { .. } => {
                self.clock_speed = ClockSpeed::RealTime;
            }
            ClockError::InvalidState { .. }
            | ClockError::ConcurrentModification
            | ClockError::ClockAlreadyRunning
            | ClockError::ClockNotRunning
            | ClockError::GameNotStarted
            | ClockError::GameAlreadyEnded
            | ClockError::Rules { .. }
            | ClockError::Provider { .. } => {}
        }
        self.sync_clocks();

        if let Err(remaining) = self.validate_state() {
            warn!(error = %remaining, "targeted recovery incomplete, resetting to a valid state");
            self.reset_to_valid_state();
        }
    }

    /// Force every field back into range without losing the game's place.
    ///
    /// Time is clamped to the period, the play clock to its limit, the
    /// run flags are realigned, and stray warning flags are cleared.
    pub fn reset_to_valid_state(&mut self) {
        if self.config.validate().is_err() {
            self.install_default_config();
        }
        self.time_remaining = self.time_remaining.min(self.period_length());
        if self.clock_state == ClockState::Expired && self.time_remaining > 0 {
            self.clock_state = ClockState::Stopped;
        }
        if self.play_clock > MAX_PLAY_CLOCK {
            self.reset_play_clock();
        }
        if self.game_state == GameState::Halftime && self.quarter != Quarter::Q3 {
            self.game_state = GameState::InProgress;
        }
        for quarter in [Quarter::Q1, Quarter::Q3] {
            if let Some(given) = self.two_minute_warning_given.get_mut(quarter.index()) {
                *given = false;
            }
        }
        self.sync_clocks();
        warn!(
            quarter = %self.quarter,
            time_remaining = self.time_remaining,
            game_state = ?self.game_state,
            "clock reset to a valid state"
        );
    }

    /// Realign the run flags with each other and with the game state, and
    /// push the clock's state into the rules engine.
    ///
    /// `clock_state` wins over the legacy `is_running` flag. A clock that
    /// runs outside live play is stopped.
    pub fn sync_clocks(&mut self) {
        self.is_running = self.clock_state == ClockState::Running;
        if self.is_running && self.game_state != GameState::InProgress {
            self.halt();
        }
        self.sync_rules();
    }

    fn install_default_config(&mut self) {
        let config = ClockConfig::default();
        self.rules.set_config(config.rules_config());
        self.clock_speed = config.clock_speed();
        self.config = config;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridiron_types::PlayClockState;

    use super::*;

    #[test]
    fn fresh_clock_is_valid() {
        let clock = GameClock::new();
        assert!(clock.validate_state().is_ok());
        assert!(clock.validate_configuration().is_ok());
        assert!(clock.validate_current_time().is_ok());
    }

    #[test]
    fn detects_time_beyond_period() {
        let mut clock = GameClock::new();
        clock.time_remaining = 1000;
        assert_eq!(
            clock.validate_current_time(),
            Err(ClockError::InvalidTimeRemaining {
                seconds: 1000,
                max: 900,
            })
        );
        let err = clock.validate_state().unwrap_err();
        clock.recover_from_error(&err);
        assert_eq!(clock.time_remaining(), 900);
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn detects_expired_clock_with_time() {
        let mut clock = GameClock::new();
        clock.clock_state = ClockState::Expired;
        let err = clock.validate_state().unwrap_err();
        assert!(matches!(err, ClockError::InvalidTime { .. }));
        clock.recover_from_error(&err);
        assert_eq!(clock.clock_state(), ClockState::Stopped);
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn detects_play_clock_overflow() {
        let mut clock = GameClock::new();
        clock.play_clock = 55;
        let err = clock.validate_state().unwrap_err();
        assert_eq!(err, ClockError::InvalidPlayClock { seconds: 55 });
        clock.recover_from_error(&err);
        assert_eq!(clock.play_clock(), 40);
        assert_eq!(clock.play_clock_state(), PlayClockState::Inactive);
    }

    #[test]
    fn play_clock_recovery_respects_time_left() {
        let mut clock = GameClock::new();
        clock.time_remaining = 12;
        clock.play_clock = 90;
        clock.recover_from_error(&ClockError::InvalidPlayClock { seconds: 90 });
        assert_eq!(clock.play_clock(), 12);
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn detects_flag_disagreement() {
        let mut clock = GameClock::new();
        clock.start().unwrap();
        clock.is_running = false;
        let err = clock.validate_state().unwrap_err();
        assert!(matches!(err, ClockError::InvalidState { .. }));
        clock.recover_from_error(&err);
        assert!(clock.is_running());
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn detects_running_outside_live_play() {
        let mut clock = GameClock::new();
        clock.run();
        assert!(matches!(
            clock.validate_state(),
            Err(ClockError::InvalidState { .. })
        ));
        clock.sync_clocks();
        assert!(!clock.is_running());
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn detects_warning_in_odd_quarter() {
        let mut clock = GameClock::new();
        clock.two_minute_warning_given[0] = true;
        let err = clock.validate_state().unwrap_err();
        assert!(matches!(err, ClockError::InvalidState { .. }));
        clock.recover_from_error(&err);
        assert!(!clock.two_minute_warning_given(Quarter::Q1));
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn detects_halftime_in_wrong_quarter() {
        let mut clock = GameClock::new();
        clock.game_state = GameState::Halftime;
        let err = clock.validate_state().unwrap_err();
        assert!(matches!(err, ClockError::InvalidQuarter { .. }));
        clock.recover_from_error(&err);
        assert_eq!(clock.game_state(), GameState::InProgress);
    }

    #[test]
    fn recovers_from_bad_configuration() {
        let mut clock = GameClock::new();
        clock.config.play_clock_normal = 99;
        let err = clock.validate_configuration().unwrap_err();
        clock.recover_from_error(&err);
        assert_eq!(clock.config(), &ClockConfig::default());
        assert!(clock.validate_state().is_ok());
    }

    #[test]
    fn every_error_kind_recovers_to_valid() {
        let errors = [
            ClockError::ClockAlreadyRunning,
            ClockError::ClockNotRunning,
            ClockError::GameNotStarted,
            ClockError::GameAlreadyEnded,
            ClockError::InvalidQuarter {
                quarter: Quarter::Q2,
                time_remaining: 0,
            },
            ClockError::InvalidConfiguration {
                reason: String::new(),
            },
            ClockError::InvalidTimeRemaining { seconds: 0, max: 0 },
            ClockError::InvalidTime {
                reason: String::new(),
            },
            ClockError::InvalidPlayClock { seconds: 0 },
            ClockError::InvalidSpeed { multiplier: 0 },
            ClockError::InvalidState {
                reason: String::new(),
            },
            ClockError::ConcurrentModification,
        ];
        for err in &errors {
            let mut clock = GameClock::new();
            clock.time_remaining = 5000;
            clock.play_clock = 77;
            clock.is_running = true;
            clock.two_minute_warning_given[2] = true;
            clock.recover_from_error(err);
            assert!(clock.validate_state().is_ok(), "{err} left the clock invalid");
        }
    }

    #[test]
    fn speed_recovery_returns_to_real_time() {
        let mut clock = GameClock::new();
        clock.set_clock_speed(ClockSpeed::Maximum);
        clock.recover_from_error(&ClockError::InvalidSpeed { multiplier: 0 });
        assert_eq!(clock.clock_speed(), ClockSpeed::RealTime);
    }
}
