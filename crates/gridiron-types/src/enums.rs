//! Enumeration types for the Gridiron game clock.
//!
//! Periods, game and clock states, play-clock durations, clock speeds,
//! teams, stop reasons, and penalty clock impacts.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// A period of play.
///
/// Drives which timing constants apply (regulation length vs. overtime
/// length) and whether the two-minute warning is active (only the 2nd and
/// 4th quarters).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    /// First quarter.
    #[default]
    Q1,
    /// Second quarter (ends the first half).
    Q2,
    /// Third quarter.
    Q3,
    /// Fourth quarter (ends regulation).
    Q4,
    /// Any overtime period.
    Overtime,
}

impl Quarter {
    /// All regulation quarters in order.
    pub const REGULATION: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// One-based period number (overtime is 5).
    pub const fn number(self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
            Self::Overtime => 5,
        }
    }

    /// Zero-based index into per-quarter arrays (`quarter - 1`).
    pub const fn index(self) -> usize {
        match self {
            Self::Q1 => 0,
            Self::Q2 => 1,
            Self::Q3 => 2,
            Self::Q4 => 3,
            Self::Overtime => 4,
        }
    }

    /// Build a quarter from its one-based number. Anything above 4 is
    /// overtime; 0 is rejected.
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => None,
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => Some(Self::Overtime),
        }
    }

    /// The period that follows this one. Overtime is followed by
    /// another overtime period.
    pub const fn next(self) -> Self {
        match self {
            Self::Q1 => Self::Q2,
            Self::Q2 => Self::Q3,
            Self::Q3 => Self::Q4,
            Self::Q4 | Self::Overtime => Self::Overtime,
        }
    }

    /// Whether this is one of the four regulation quarters.
    pub const fn is_regulation(self) -> bool {
        !matches!(self, Self::Overtime)
    }

    /// Whether this quarter closes a half (2nd or 4th).
    ///
    /// Only these quarters carry a two-minute warning, ten-second runoffs,
    /// and untimed downs.
    pub const fn ends_half(self) -> bool {
        matches!(self, Self::Q2 | Self::Q4)
    }

    /// Short display label: `1st`, `2nd`, `3rd`, `4th`, `OT`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Q1 => "1st",
            Self::Q2 => "2nd",
            Self::Q3 => "3rd",
            Self::Q4 => "4th",
            Self::Overtime => "OT",
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Game and clock states
// ---------------------------------------------------------------------------

/// Lifecycle state of the game as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Before the opening kickoff.
    #[default]
    PreGame,
    /// A period is being played. The only state in which the game clock
    /// may run.
    InProgress,
    /// Between the 2nd and 3rd quarters.
    Halftime,
    /// Regulation or the final overtime has ended.
    EndGame,
}

/// Immediate run/stop status of the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    /// The clock is not running.
    #[default]
    Stopped,
    /// The clock is counting down.
    Running,
    /// The period's time has run out.
    Expired,
}

/// Seconds at or below which an active play clock is in its warning phase.
pub const PLAY_CLOCK_WARNING_SECONDS: u32 = 5;

/// Sub-state of the play clock, independent of the game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayClockState {
    /// Not counting (between the end of a play and the ready signal).
    #[default]
    Inactive,
    /// Counting down with more than five seconds left.
    Active,
    /// Counting down with five seconds or fewer left.
    Warning,
    /// Reached zero (delay of game).
    Expired,
}

impl PlayClockState {
    /// State of a counting play clock showing `seconds`.
    pub const fn for_running_clock(seconds: u32) -> Self {
        if seconds == 0 {
            Self::Expired
        } else if seconds <= PLAY_CLOCK_WARNING_SECONDS {
            Self::Warning
        } else {
            Self::Active
        }
    }

    /// Whether the play clock is counting down.
    pub const fn is_counting(self) -> bool {
        matches!(self, Self::Active | Self::Warning)
    }
}

/// Which play-clock length applies after a stoppage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayClockDuration {
    /// The standard 40-second clock.
    #[default]
    Normal,
    /// The 25-second clock used after timeouts, injuries, and
    /// administrative stoppages.
    Short,
}

impl PlayClockDuration {
    /// Standard length in seconds when no configuration overrides it.
    pub const fn default_seconds(self) -> u32 {
        match self {
            Self::Normal => 40,
            Self::Short => 25,
        }
    }
}

// ---------------------------------------------------------------------------
// Clock speed
// ---------------------------------------------------------------------------

/// Simulation speed multiplier applied to game-clock countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockSpeed {
    /// One game second per tick.
    #[default]
    RealTime,
    /// 2x.
    Double,
    /// 5x.
    Fast,
    /// 10x.
    VeryFast,
    /// 30x.
    Rapid,
    /// 60x, one game minute per tick.
    Maximum,
    /// Any other multiplier.
    Custom(u32),
}

impl ClockSpeed {
    /// Game seconds consumed per tick. Never zero.
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::RealTime => 1,
            Self::Double => 2,
            Self::Fast => 5,
            Self::VeryFast => 10,
            Self::Rapid => 30,
            Self::Maximum => 60,
            Self::Custom(0) => 1,
            Self::Custom(n) => n,
        }
    }

    /// Map a raw multiplier onto a named speed, falling back to `Custom`.
    pub const fn from_multiplier(multiplier: u32) -> Self {
        match multiplier {
            0 | 1 => Self::RealTime,
            2 => Self::Double,
            5 => Self::Fast,
            10 => Self::VeryFast,
            30 => Self::Rapid,
            60 => Self::Maximum,
            n => Self::Custom(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// The home team.
    #[default]
    Home,
    /// The visiting team.
    Away,
}

impl Team {
    /// The other side.
    pub const fn opponent(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Away => f.write_str("away"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stoppages
// ---------------------------------------------------------------------------

/// Why the game clock stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A forward pass fell incomplete.
    IncompletePass,
    /// The ball carrier went out of bounds.
    OutOfBounds,
    /// First down inside the final two minutes of a half.
    FirstDown,
    /// Touchdown, field-goal attempt, or safety.
    Score,
    /// A team timeout.
    Timeout,
    /// An injury stoppage.
    Injury,
    /// A penalty was enforced.
    Penalty,
    /// Punt, kickoff, or turnover.
    ChangeOfPossession,
    /// The two-minute warning.
    TwoMinuteWarning,
    /// The period ended.
    QuarterEnd,
}

impl StopReason {
    /// Stable snake-case label for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncompletePass => "incomplete_pass",
            Self::OutOfBounds => "out_of_bounds",
            Self::FirstDown => "first_down",
            Self::Score => "score",
            Self::Timeout => "timeout",
            Self::Injury => "injury",
            Self::Penalty => "penalty",
            Self::ChangeOfPossession => "change_of_possession",
            Self::TwoMinuteWarning => "two_minute_warning",
            Self::QuarterEnd => "quarter_end",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a stopped game clock starts again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartTrigger {
    /// When the referee signals ready for play.
    OnReady,
    /// At the next snap.
    OnSnap,
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Weather conditions affecting how long plays take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// No effect.
    #[default]
    Clear,
    /// Slightly longer plays.
    Wind,
    /// Longer plays.
    Rain,
    /// Much longer plays.
    Snow,
}

impl Weather {
    /// Percentage applied to a play's time consumed.
    pub const fn time_factor_pct(self) -> u32 {
        match self {
            Self::Clear => 100,
            Self::Wind => 105,
            Self::Rain => 110,
            Self::Snow => 120,
        }
    }
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

/// Effect of an enforced penalty on the clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyImpact {
    /// No clock consequence.
    #[default]
    NoImpact,
    /// Stop the game clock; it restarts on the ready signal.
    StopClock,
    /// Reset the play clock without stopping the game clock.
    ResetPlayClock,
    /// Run ten seconds off the game clock (final minute of a half only).
    TenSecondRunoff,
}
