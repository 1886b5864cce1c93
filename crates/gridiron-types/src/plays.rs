//! Play calls, play results, and classified play outcomes.
//!
//! A [`PlayCall`] goes into a play outcome provider, a [`PlayResult`] comes
//! back, and the clock classifies that result into a [`PlayOutcome`]
//! before handing it to the rules engine.

use serde::{Deserialize, Serialize};

use crate::decision::{PenaltyDetails, PenaltyInfo};
use crate::enums::{Team, Weather};

/// The offense's play call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayCall {
    /// Handoff or designed quarterback run.
    Run,
    /// Short or intermediate pass.
    ShortPass,
    /// Downfield pass.
    DeepPass,
    /// Screen pass behind the line.
    Screen,
    /// Quarterback kneel.
    Kneel,
    /// Spike to stop the clock.
    Spike,
    /// Punt.
    Punt,
    /// Field-goal attempt.
    FieldGoal,
    /// Kickoff.
    Kickoff,
}

impl PlayCall {
    /// The broad play type this call produces.
    pub const fn play_type(self) -> PlayType {
        match self {
            Self::Run => PlayType::Run,
            Self::ShortPass | Self::DeepPass | Self::Screen => PlayType::Pass,
            Self::Kneel => PlayType::Kneel,
            Self::Spike => PlayType::Spike,
            Self::Punt => PlayType::Punt,
            Self::FieldGoal => PlayType::FieldGoal,
            Self::Kickoff => PlayType::Kickoff,
        }
    }
}

/// Broad category of a completed play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    /// Rushing play.
    Run,
    /// Passing play.
    Pass,
    /// Quarterback kneel.
    Kneel,
    /// Spike.
    Spike,
    /// Punt.
    Punt,
    /// Field-goal attempt.
    FieldGoal,
    /// Kickoff.
    Kickoff,
}

/// Notable event attached to a play result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialOutcome {
    /// Quarterback sacked behind the line.
    Sack,
    /// Ball carrier fumbled.
    Fumble,
    /// Pass intercepted.
    Interception,
    /// Punt or field goal blocked.
    BlockedKick,
    /// Ball carrier downed in his own end zone.
    Safety,
}

/// What happened on a play, as produced by a play outcome provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayResult {
    /// Broad play category.
    pub play_type: PlayType,
    /// Net yards gained (negative for losses).
    pub yards_gained: i32,
    /// A pass was caught. Always false for non-pass plays.
    pub pass_completed: bool,
    /// The play scored a touchdown.
    pub touchdown: bool,
    /// The play gained a first down.
    pub first_down: bool,
    /// Possession changed on the play.
    pub turnover: bool,
    /// The play ended out of bounds.
    pub out_of_bounds: bool,
    /// Game seconds the play took.
    pub time_consumed: u32,
    /// Resulting yard line, measured from the offense's own goal line (0-100).
    pub field_position: u8,
    /// Sack, fumble, interception, blocked kick, or safety.
    pub special: Option<SpecialOutcome>,
}

impl PlayResult {
    /// A plain result with no yardage and no flags set.
    pub const fn new(play_type: PlayType, time_consumed: u32) -> Self {
        Self {
            play_type,
            yards_gained: 0,
            pass_completed: false,
            touchdown: false,
            first_down: false,
            turnover: false,
            out_of_bounds: false,
            time_consumed,
            field_position: 25,
            special: None,
        }
    }
}

/// Clock-relevant category of a play, as evaluated by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayOutcome {
    /// Forward pass fell incomplete.
    IncompletePass,
    /// Completed pass, receiver tackled in bounds.
    PassInbounds {
        /// The play gained a first down.
        first_down: bool,
    },
    /// Completed pass, receiver went out of bounds.
    PassOutOfBounds,
    /// Run, ball carrier tackled in bounds.
    RunInbounds {
        /// The play gained a first down.
        first_down: bool,
    },
    /// Run, ball carrier went out of bounds.
    RunOutOfBounds,
    /// Quarterback sacked. Treated as an in-bounds run.
    Sack {
        /// The play gained a first down.
        first_down: bool,
    },
    /// Touchdown.
    Touchdown,
    /// Field-goal attempt, made or missed.
    FieldGoalAttempt,
    /// Safety.
    Safety,
    /// Team timeout.
    Timeout {
        /// The team that called it.
        team: Team,
    },
    /// Injury stoppage.
    Injury,
    /// Enforced penalty.
    Penalty(PenaltyInfo),
    /// Punt.
    Punt,
    /// Kickoff.
    Kickoff,
    /// Fumble that went out of bounds.
    FumbleOutOfBounds,
    /// Fumble recovered in bounds by the defense.
    FumbleInbounds,
    /// Interception.
    Interception,
    /// The period ended.
    QuarterEnd,
}

impl PlayOutcome {
    /// Whether this outcome is a score.
    pub const fn is_scoring(&self) -> bool {
        matches!(self, Self::Touchdown | Self::FieldGoalAttempt | Self::Safety)
    }

    /// Whether the ball changes hands after this outcome.
    pub const fn changes_possession(&self) -> bool {
        matches!(
            self,
            Self::Touchdown
                | Self::FieldGoalAttempt
                | Self::Safety
                | Self::Punt
                | Self::Kickoff
                | Self::FumbleInbounds
                | Self::Interception
        )
    }
}

/// Situational modifiers for a play processed with context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayContext {
    /// The offense is running its hurry-up.
    pub hurry_up: bool,
    /// Weather at the stadium.
    pub weather: Weather,
    /// Penalties flagged on the play, resolved before the play itself.
    pub penalties: Vec<PenaltyDetails>,
}

impl PlayContext {
    /// Percentage of raw play time that actually runs off the clock.
    pub const fn time_factor_pct(&self) -> u32 {
        let hurry = if self.hurry_up { HURRY_UP_TIME_PCT } else { 100 };
        // Both factors are at most 120, so the product cannot overflow.
        hurry.saturating_mul(self.weather.time_factor_pct()) / 100
    }
}

/// Percentage of normal play time used by a hurry-up offense.
pub const HURRY_UP_TIME_PCT: u32 = 60;
