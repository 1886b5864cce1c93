//! Configuration loading and typed config structures for the game clock.
//!
//! The canonical configuration lives in `gridiron-config.yaml` at the
//! project root. This module defines a strongly-typed struct that mirrors
//! the YAML structure, a loader that reads and validates the file, the NFL
//! range checks, and the rules for swapping configuration mid-game.

use std::path::Path;

use gridiron_rules::RulesConfig;
use gridiron_types::{ClockSpeed, PlayClockDuration, Quarter};
use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// Longest legal period (regulation or overtime) in seconds.
pub const MAX_PERIOD_LENGTH: u32 = 900;

/// Shortest period the simulator accepts in seconds.
pub const MIN_PERIOD_LENGTH: u32 = 60;

/// Longest legal play clock in seconds.
pub const MAX_PLAY_CLOCK: u32 = 40;

/// Shortest play clock the simulator accepts in seconds.
pub const MIN_PLAY_CLOCK: u32 = 10;

/// Fastest simulation speed multiplier.
pub const MAX_SIMULATION_SPEED: u32 = 60;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The file parsed but holds out-of-range values.
    #[error("invalid configuration: {source}")]
    Invalid {
        /// The validation failure.
        source: ClockError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Optional rule features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Stop the clock at 2:00 in the 2nd and 4th quarters.
    #[serde(default = "default_true")]
    pub two_minute_warning: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            two_minute_warning: true,
        }
    }
}

/// Game clock configuration.
///
/// Mirrors the structure of `gridiron-config.yaml`. Every field has a
/// default matching a standard NFL regular-season game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Regulation quarter length in seconds.
    #[serde(default = "default_quarter_length")]
    pub quarter_length: u32,

    /// Regular-season overtime length in seconds.
    #[serde(default = "default_overtime_length")]
    pub overtime_length: u32,

    /// Playoff overtime period length in seconds.
    #[serde(default = "default_playoff_overtime_length")]
    pub playoff_overtime_length: u32,

    /// Standard play clock in seconds.
    #[serde(default = "default_play_clock_normal")]
    pub play_clock_normal: u32,

    /// Play clock after administrative stoppages, in seconds.
    #[serde(default = "default_play_clock_short")]
    pub play_clock_short: u32,

    /// Optional rule features.
    #[serde(default)]
    pub features: FeatureFlags,

    /// Game seconds per tick.
    #[serde(default = "default_simulation_speed")]
    pub simulation_speed: u32,

    /// Playoff overtime format.
    #[serde(default)]
    pub playoff_rules: bool,

    /// Seed play outcomes from `seed` instead of entropy.
    #[serde(default)]
    pub deterministic_mode: bool,

    /// Random seed used in deterministic mode.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            quarter_length: default_quarter_length(),
            overtime_length: default_overtime_length(),
            playoff_overtime_length: default_playoff_overtime_length(),
            play_clock_normal: default_play_clock_normal(),
            play_clock_short: default_play_clock_short(),
            features: FeatureFlags::default(),
            simulation_speed: default_simulation_speed(),
            playoff_rules: false,
            deterministic_mode: false,
            seed: default_seed(),
        }
    }
}

impl ClockConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config
            .validate()
            .map_err(|source| ConfigError::Invalid { source })?;
        Ok(config)
    }

    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    /// Standard regular-season game.
    pub fn regular_season() -> Self {
        Self::default()
    }

    /// Playoff game: overtime periods repeat until someone scores.
    pub fn playoffs() -> Self {
        Self {
            playoff_rules: true,
            ..Self::default()
        }
    }

    /// Fast, reproducible game for tests and batch simulation.
    pub fn testing(seed: u64) -> Self {
        Self {
            simulation_speed: MAX_SIMULATION_SPEED,
            deterministic_mode: true,
            seed,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check every value against its legal range.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfiguration`] naming the first
    /// out-of-range field.
    pub fn validate(&self) -> Result<(), ClockError> {
        check_range("quarter_length", self.quarter_length, MIN_PERIOD_LENGTH, MAX_PERIOD_LENGTH)?;
        check_range("overtime_length", self.overtime_length, MIN_PERIOD_LENGTH, MAX_PERIOD_LENGTH)?;
        check_range(
            "playoff_overtime_length",
            self.playoff_overtime_length,
            MIN_PERIOD_LENGTH,
            MAX_PERIOD_LENGTH,
        )?;
        check_range("play_clock_normal", self.play_clock_normal, MIN_PLAY_CLOCK, MAX_PLAY_CLOCK)?;
        check_range(
            "play_clock_short",
            self.play_clock_short,
            MIN_PLAY_CLOCK,
            self.play_clock_normal,
        )?;
        check_range("simulation_speed", self.simulation_speed, 1, MAX_SIMULATION_SPEED)?;
        Ok(())
    }

    /// Whether swapping `old` for `new` is legal with `time_remaining`
    /// seconds left in the current period.
    ///
    /// The overtime format and deterministic mode cannot change while a
    /// regulation period is partly played, and a quarter-length change must
    /// not rescale a live period down to zero.
    pub fn is_compatible_change(old: &Self, new: &Self, time_remaining: u32) -> bool {
        let mid_period = time_remaining > 0 && time_remaining < old.quarter_length;
        if mid_period
            && (old.playoff_rules != new.playoff_rules
                || old.deterministic_mode != new.deterministic_mode)
        {
            return false;
        }
        !(time_remaining > 0 && rescale(time_remaining, old.quarter_length, new.quarter_length) == 0)
    }

    // -----------------------------------------------------------------------
    // Derived values
    // -----------------------------------------------------------------------

    /// Seconds on a freshly reset play clock of the given kind.
    pub const fn play_clock_seconds(&self, duration: PlayClockDuration) -> u32 {
        match duration {
            PlayClockDuration::Normal => self.play_clock_normal,
            PlayClockDuration::Short => self.play_clock_short,
        }
    }

    /// Overtime length under the active format.
    pub const fn active_overtime_length(&self) -> u32 {
        if self.playoff_rules {
            self.playoff_overtime_length
        } else {
            self.overtime_length
        }
    }

    /// Full length of `quarter`.
    pub const fn period_length(&self, quarter: Quarter) -> u32 {
        if quarter.is_regulation() {
            self.quarter_length
        } else {
            self.active_overtime_length()
        }
    }

    /// Configured speed as a [`ClockSpeed`].
    pub const fn clock_speed(&self) -> ClockSpeed {
        ClockSpeed::from_multiplier(self.simulation_speed)
    }

    /// The subset of settings the rules engine needs.
    pub const fn rules_config(&self) -> RulesConfig {
        RulesConfig {
            quarter_length: self.quarter_length,
            overtime_length: self.overtime_length,
            playoff_overtime_length: self.playoff_overtime_length,
            playoff_rules: self.playoff_rules,
            two_minute_warning: self.features.two_minute_warning,
        }
    }
}

/// Scale `seconds` from a period of `old_length` to one of `new_length`.
pub(crate) fn rescale(seconds: u32, old_length: u32, new_length: u32) -> u32 {
    u64::from(seconds)
        .saturating_mul(u64::from(new_length))
        .checked_div(u64::from(old_length))
        .map_or(seconds, |scaled| u32::try_from(scaled).unwrap_or(u32::MAX))
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), ClockError> {
    if value < min || value > max {
        return Err(ClockError::InvalidConfiguration {
            reason: format!("{field} = {value} is outside {min}..={max}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

const fn default_quarter_length() -> u32 {
    900
}

const fn default_overtime_length() -> u32 {
    600
}

const fn default_playoff_overtime_length() -> u32 {
    900
}

const fn default_play_clock_normal() -> u32 {
    40
}

const fn default_play_clock_short() -> u32 {
    25
}

const fn default_simulation_speed() -> u32 {
    1
}

const fn default_seed() -> u64 {
    42
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ClockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.quarter_length, 900);
        assert_eq!(config.play_clock_normal, 40);
        assert_eq!(config.play_clock_short, 25);
        assert!(config.features.two_minute_warning);
        assert!(!config.playoff_rules);
    }

    #[test]
    fn presets_are_valid() {
        assert!(ClockConfig::regular_season().validate().is_ok());
        assert!(ClockConfig::playoffs().validate().is_ok());
        let testing = ClockConfig::testing(7);
        assert!(testing.validate().is_ok());
        assert!(testing.deterministic_mode);
        assert_eq!(testing.seed, 7);
        assert_eq!(testing.clock_speed(), ClockSpeed::Maximum);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
quarter_length: 600
overtime_length: 300
playoff_overtime_length: 600
play_clock_normal: 35
play_clock_short: 20
features:
  two_minute_warning: false
simulation_speed: 10
playoff_rules: true
deterministic_mode: true
seed: 123
";
        let config = ClockConfig::parse(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.quarter_length, 600);
        assert_eq!(config.overtime_length, 300);
        assert_eq!(config.play_clock_short, 20);
        assert!(!config.features.two_minute_warning);
        assert_eq!(config.clock_speed(), ClockSpeed::VeryFast);
        assert!(config.playoff_rules);
        assert_eq!(config.active_overtime_length(), 600);
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = ClockConfig::parse("seed: 7\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.seed, 7);
        assert_eq!(config.quarter_length, 900);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(ClockConfig::parse("").ok(), Some(ClockConfig::default()));
    }

    #[test]
    fn parse_rejects_out_of_range_values() {
        let result = ClockConfig::parse("play_clock_normal: 45\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn validate_rejects_each_bad_field() {
        let bad = [
            ClockConfig { quarter_length: 30, ..ClockConfig::default() },
            ClockConfig { quarter_length: 1000, ..ClockConfig::default() },
            ClockConfig { overtime_length: 0, ..ClockConfig::default() },
            ClockConfig { play_clock_normal: 41, ..ClockConfig::default() },
            ClockConfig { play_clock_short: 30, play_clock_normal: 25, ..ClockConfig::default() },
            ClockConfig { simulation_speed: 0, ..ClockConfig::default() },
            ClockConfig { simulation_speed: 61, ..ClockConfig::default() },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ClockError::InvalidConfiguration { .. })),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn compatibility_blocks_mid_period_format_changes() {
        let old = ClockConfig::default();
        let playoff = ClockConfig::playoffs();
        assert!(!ClockConfig::is_compatible_change(&old, &playoff, 450));
        assert!(ClockConfig::is_compatible_change(&old, &playoff, 900));
        assert!(ClockConfig::is_compatible_change(&old, &playoff, 0));
    }

    #[test]
    fn compatibility_blocks_rescale_to_zero() {
        let old = ClockConfig::default();
        let short = ClockConfig {
            quarter_length: 60,
            ..ClockConfig::default()
        };
        // 10 s of a 900 s quarter rescales to 0 s of a 60 s quarter.
        assert!(!ClockConfig::is_compatible_change(&old, &short, 10));
        assert!(ClockConfig::is_compatible_change(&old, &short, 450));
    }

    #[test]
    fn rescale_is_proportional() {
        assert_eq!(rescale(450, 900, 600), 300);
        assert_eq!(rescale(900, 900, 900), 900);
        assert_eq!(rescale(5, 0, 600), 5);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("gridiron-config.yaml");
        if path.exists() {
            let config = ClockConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
